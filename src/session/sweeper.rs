use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;

use anyhow::Context;

use crate::foundation::error::CoifResult;
use crate::session::store::SessionStore;

/// Background thread that periodically drops idle sessions. Stops when dropped.
#[derive(Debug)]
pub struct SessionSweeper {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionSweeper {
    /// Start sweeping `store` every `sweep_interval`.
    pub fn spawn(store: Arc<SessionStore>) -> CoifResult<Self> {
        let interval = store.config().sweep_interval();
        let (tx, rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("coif-session-sweeper".to_string())
            .spawn(move || {
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            store.sweep_expired();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("session sweeper stopped");
            })
            .context("spawn session sweeper thread")?;

        Ok(Self {
            stop: Some(tx),
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("session sweeper thread panicked");
            }
        }
    }
}

impl Drop for SessionSweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sweeper.rs"]
mod tests;
