//! Per-load configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::client::Transport;

/// Configuration for one `load()` call
#[derive(Clone)]
pub struct LoadConfig {
    /// Hard deadline for the whole request, armed at load start and never
    /// reset on streaming progress.
    pub timeout: Duration,
    /// Optional transport override; defaults to the loader's own client.
    pub transport: Option<Arc<dyn Transport>>,
}

impl LoadConfig {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            transport: None,
        }
    }

    /// Substitute a custom transport for this load
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("timeout", &self.timeout)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}
