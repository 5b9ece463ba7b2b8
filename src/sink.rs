//! Write-only destinations for channel values.

use crate::api::Error;
use crate::model::ChannelId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Receives the next value of a channel. The meter never reads values back.
pub trait ChannelSink: Send + Sync {
    fn set_next_value(&self, channel: ChannelId, value: i64) -> Result<(), Error>;
}

/// Keeps the latest value of every channel in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    values: Mutex<HashMap<ChannelId, i64>>,
    writes: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: ChannelId) -> Option<i64> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel)
            .copied()
    }

    /// Number of writes received so far, over all channels.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ChannelSink for MemorySink {
    fn set_next_value(&self, channel: ChannelId, value: i64) -> Result<(), Error> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
