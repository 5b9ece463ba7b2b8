use crate::api::Error;
use crate::model::{ChannelId, MeterValues};
use crate::sink::ChannelSink;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Writes extracted values to their channels.
///
/// The publisher is gated: while closed every publish is discarded. Closing waits for a publish
/// in progress, so once `close()` returns no further write reaches the sink.
pub struct Publisher {
    sink: Arc<dyn ChannelSink>,
    open: RwLock<bool>,
    /// Last active power written, for diagnostics
    active_power: Mutex<Option<i32>>,
}

impl Publisher {
    pub fn new(sink: Arc<dyn ChannelSink>) -> Self {
        Publisher {
            sink,
            open: RwLock::new(false),
            active_power: Mutex::new(None),
        }
    }

    pub fn open(&self) {
        *self.open.write().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub fn close(&self) {
        *self.open.write().unwrap_or_else(PoisonError::into_inner) = false;
    }

    pub fn active_power(&self) -> Option<i32> {
        *self
            .active_power
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Write every present member of `values`; absent members leave their channel untouched.
    /// Returns the number of channels written.
    pub fn publish(&self, values: &MeterValues) -> Result<usize, Error> {
        let open = self.open.read().unwrap_or_else(PoisonError::into_inner);
        if !*open {
            log::debug!("publisher closed, discarding {:?}", values);
            return Ok(0);
        }

        let mut written = 0;
        if let Some(energy) = values.energy {
            self.sink
                .set_next_value(ChannelId::ActiveConsumptionEnergy, energy)?;
            written += 1;
        }
        if let Some(energy_out) = values.energy_out {
            self.sink
                .set_next_value(ChannelId::ActiveProductionEnergy, energy_out)?;
            written += 1;
        }
        if let Some(power) = values.power {
            self.sink
                .set_next_value(ChannelId::ActivePower, i64::from(power))?;
            *self
                .active_power
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(power);
            written += 1;
        }

        Ok(written)
    }
}
