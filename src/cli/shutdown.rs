use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared flag set when the process should stop after the current iteration.
///
/// Besides the flag, a request sends on a channel so a sleeping loop wakes
/// up immediately instead of finishing its interval.
#[derive(Clone)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl ShutdownSignal {
    /// Create a new, unset signal
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    /// Check if shutdown has been requested
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Request shutdown and wake any waiter
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        // a pending wake-up is enough
        let _ = self.wake_tx.try_send(());
    }

    /// Sleep for `timeout` or until shutdown is requested.
    ///
    /// Returns true if shutdown was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_requested() {
            return true;
        }
        match self.wake_rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.is_requested()
            }
        }
    }

    /// Route Ctrl-C to this signal
    pub fn install_ctrlc_handler(&self) -> Result<()> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received - stopping after the current iteration");
            signal.request();
        })
        .context("Failed to install Ctrl-C handler")
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
