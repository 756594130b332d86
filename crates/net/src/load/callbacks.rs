//! Per-load callback wiring

use bytes::Bytes;
use segload_types::{LoadContext, LoadResult, LoadStats};

use super::classify::LoadFailure;
use super::core::ResponseSummary;

pub(super) type SuccessFn =
    dyn FnMut(&LoadResult, &LoadStats, &LoadContext, &ResponseSummary) + Send;
pub(super) type ProgressFn =
    dyn FnMut(&LoadStats, &LoadContext, &Bytes, &ResponseSummary) + Send;
pub(super) type ErrorFn =
    dyn FnMut(&LoadFailure, &LoadStats, &LoadContext, Option<&ResponseSummary>) + Send;
pub(super) type TimeoutFn =
    dyn FnMut(&LoadStats, &LoadContext, Option<&ResponseSummary>) + Send;
pub(super) type AbortFn = dyn FnMut(&LoadStats, &LoadContext, Option<&ResponseSummary>) + Send;

/// Handler set for one load.
///
/// Exactly one of the terminal handlers (`on_success`, `on_error`,
/// `on_timeout`) fires per load unless the load is aborted, in which case
/// only `on_abort` fires. Unset handlers are no-ops; body streaming reports
/// through `on_progress` only when one is registered.
#[derive(Default)]
pub struct LoadCallbacks {
    pub(super) on_success: Option<Box<SuccessFn>>,
    pub(super) on_progress: Option<Box<ProgressFn>>,
    pub(super) on_error: Option<Box<ErrorFn>>,
    pub(super) on_timeout: Option<Box<TimeoutFn>>,
    pub(super) on_abort: Option<Box<AbortFn>>,
}

impl LoadCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked once with the decoded payload when the load succeeds
    #[must_use]
    pub fn on_success(
        mut self,
        f: impl FnMut(&LoadResult, &LoadStats, &LoadContext, &ResponseSummary) + Send + 'static,
    ) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Invoked for every received body chunk with cumulative stats
    #[must_use]
    pub fn on_progress(
        mut self,
        f: impl FnMut(&LoadStats, &LoadContext, &Bytes, &ResponseSummary) + Send + 'static,
    ) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Invoked once on a transport failure or non-success HTTP status
    #[must_use]
    pub fn on_error(
        mut self,
        f: impl FnMut(&LoadFailure, &LoadStats, &LoadContext, Option<&ResponseSummary>)
            + Send
            + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Invoked once when the watchdog deadline elapses first
    #[must_use]
    pub fn on_timeout(
        mut self,
        f: impl FnMut(&LoadStats, &LoadContext, Option<&ResponseSummary>) + Send + 'static,
    ) -> Self {
        self.on_timeout = Some(Box::new(f));
        self
    }

    /// Invoked once when the caller aborts an in-flight load
    #[must_use]
    pub fn on_abort(
        mut self,
        f: impl FnMut(&LoadStats, &LoadContext, Option<&ResponseSummary>) + Send + 'static,
    ) -> Self {
        self.on_abort = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for LoadCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadCallbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_timeout", &self.on_timeout.is_some())
            .field("on_abort", &self.on_abort.is_some())
            .finish()
    }
}
