//! Stop signalling between the engine handle, the engine loop and work tasks.

use tokio::sync::watch;

/// Create a linked trigger/signal pair.
#[must_use]
pub fn stop_channel() -> (StopTrigger, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopTrigger { tx }, StopSignal { rx })
}

/// Sending half; flips the signal once and for all.
#[derive(Debug)]
pub struct StopTrigger {
    tx: watch::Sender<bool>,
}

impl StopTrigger {
    /// Raise the stop flag. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// New receiver observing this trigger.
    #[must_use]
    pub fn subscribe(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving half, cheap to clone into every task.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Whether stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once stop is requested.
    ///
    /// Never resolves if the trigger is dropped without stopping.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
