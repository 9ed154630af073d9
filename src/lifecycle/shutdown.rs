//! Shutdown coordination.

use tokio::sync::watch;

/// Stop switch shared by the signal listener and the HTTP server.
///
/// Backed by a watch channel, so a signal taken after `trigger` still
/// resolves immediately.
#[derive(Clone)]
pub struct Shutdown {
    stopped: watch::Sender<bool>,
}

/// The receiving half handed to the server.
pub struct ShutdownSignal(watch::Receiver<bool>);

impl Shutdown {
    pub fn new() -> Self {
        Self {
            stopped: watch::Sender::new(false),
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal(self.stopped.subscribe())
    }

    pub fn trigger(&self) {
        self.stopped.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once stop was requested, or once every `Shutdown` is gone.
    pub async fn recv(mut self) {
        let _ = self.0.wait_for(|stopped| *stopped).await;
    }
}
