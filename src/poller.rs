//! Fixed-delay scheduler driving the update ticks.

use crate::api::Error;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct PollHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Runs a tick immediately and then again `interval` after each tick has finished, so ticks never
/// overlap. A failing or panicking tick is logged and the loop carries on.
pub struct Poller {
    name: String,
    handle: Mutex<Option<PollHandle>>,
}

impl Poller {
    pub fn new(name: impl Into<String>) -> Self {
        Poller {
            name: name.into(),
            handle: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |h| !h.task.is_finished())
    }

    /// Spawn the poll loop on the current Tokio runtime.
    pub fn start<F, Fut>(&self, interval: Duration, tick: F) -> Result<(), Error>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::InternalError(format!("poller needs a Tokio runtime: {}", e)))?;

        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if handle.is_some() {
            log::warn!("[{}] poller already running", self.name);
            return Ok(());
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = runtime.spawn(run(self.name.clone(), interval, tick, shutdown_rx));
        *handle = Some(PollHandle { shutdown, task });

        log::info!(
            "[{}] poller started (interval: {}s)",
            self.name,
            interval.as_secs_f32()
        );
        Ok(())
    }

    /// Stop the poll loop. No tick starts after this returns; calling it again, or without
    /// `start`, does nothing.
    pub fn stop(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            /* The loop aborts its in-flight tick; receiver is gone if the loop already ended */
            let _ = handle.shutdown.send(true);
            log::info!("[{}] poller stopped", self.name);
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<F, Fut>(
    name: String,
    interval: Duration,
    tick: F,
    mut shutdown: watch::Receiver<bool>,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    loop {
        if *shutdown.borrow() {
            break;
        }

        /* Own task per tick so that a panic only takes down this tick */
        let mut current = tokio::spawn(tick());
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                current.abort();
                break;
            }
            outcome = &mut current => match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::error!("[{}] Error while updating values: {}", name, e),
                Err(e) if e.is_panic() => log::error!("[{}] Update panicked: {}", name, e),
                Err(e) => log::warn!("[{}] Update cancelled: {}", name, e),
            },
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    log::debug!("[{}] poll loop finished", name);
}
