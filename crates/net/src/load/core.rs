//! Loader orchestration and settle gating

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use segload_errors::{Error, NetworkError};
use segload_types::{LoadContext, LoadPhase, LoadResult, LoadStats};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::{HttpClient, Transport};

use super::callbacks::LoadCallbacks;
use super::classify::LoadFailure;
use super::config::LoadConfig;
use super::watchdog::TimeoutWatchdog;
use super::{decode, params, pump};

/// Snapshot of the last received response, captured before the body is
/// consumed. Backs [`Loader::response_header`] and the `response` argument
/// of the callbacks.
#[derive(Debug, Clone)]
pub struct ResponseSummary {
    /// Final URL after redirects
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseSummary {
    fn from_response(response: &Response) -> Self {
        Self {
            url: response.url().to_string(),
            status: response.status(),
            headers: response.headers().clone(),
        }
    }
}

/// Terminal result of one load, mirroring the callback that fired
#[derive(Debug)]
pub enum LoadOutcome {
    Success(LoadResult),
    Failed(LoadFailure),
    TimedOut,
    Aborted,
}

#[derive(Default)]
pub(super) struct Inner {
    pub(super) phase: LoadPhase,
    pub(super) stats: LoadStats,
    pub(super) callbacks: LoadCallbacks,
    pub(super) context: Option<Arc<LoadContext>>,
    pub(super) cancel: Option<CancellationToken>,
    pub(super) response: Option<ResponseSummary>,
}

pub(super) fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A single-request, cancellable, timed, progress-observing resource
/// loader.
///
/// One instance runs at most one load at a time; `load()` while a load is
/// in flight is rejected. The loader is `Clone` so `abort()` can be issued
/// from another task. Handlers are invoked outside the internal lock, so
/// they may call back into the loader.
pub struct Loader {
    client: HttpClient,
    inner: Arc<Mutex<Inner>>,
}

impl Loader {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Create with a default HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, Error> {
        Ok(Self::new(HttpClient::with_defaults()?))
    }

    /// Run one load to settlement.
    ///
    /// Exactly one terminal handler (`on_success` | `on_error` |
    /// `on_timeout`) fires unless the load is aborted, in which case only
    /// `on_abort` fires; the returned [`LoadOutcome`] mirrors whichever it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns an error only for contract misuse: calling `load` while a
    /// previous load is still in flight.
    pub async fn load(
        &self,
        context: LoadContext,
        config: LoadConfig,
        callbacks: LoadCallbacks,
    ) -> Result<LoadOutcome, Error> {
        let context = Arc::new(context);
        let cancel = CancellationToken::new();

        {
            let mut inner = lock(&self.inner);
            if inner.phase.is_loading() {
                return Err(Error::internal("load already in progress"));
            }
            inner.phase = LoadPhase::Loading;
            inner.stats = LoadStats::default();
            inner.stats.mark_request_start(Instant::now());
            inner.callbacks = callbacks;
            inner.context = Some(Arc::clone(&context));
            inner.cancel = Some(cancel.clone());
            inner.response = None;
        }

        tracing::debug!(url = %context.url, timeout = ?config.timeout, "starting load");

        let watchdog = TimeoutWatchdog::arm(config.timeout);
        let transport = config
            .transport
            .clone()
            .unwrap_or_else(|| Arc::new(self.client.clone()) as Arc<dyn Transport>);

        let work = run(
            transport,
            Arc::clone(&context),
            cancel.clone(),
            Arc::clone(&self.inner),
        );
        tokio::pin!(work);

        // The watchdog and the token race the work future; the phase gate
        // inside each settle path resolves who actually won.
        let cancel_watch = cancel.clone();
        let outcome = tokio::select! {
            result = &mut work => self.settle_finished(result),
            () = watchdog.expired() => self.settle_timeout(&cancel),
            () = cancel_watch.cancelled() => LoadOutcome::Aborted,
        };
        Ok(outcome)
    }

    /// Abort the in-flight load.
    ///
    /// Sets `stats.aborted`, cancels the shared token and fires `on_abort`.
    /// Any transport or HTTP error still arriving for this load is
    /// swallowed. Safe to call before, during, or after a load; a no-op
    /// once the load has settled.
    pub fn abort(&self) {
        let mut inner = lock(&self.inner);
        if !inner.phase.is_loading() {
            return;
        }
        inner.phase = LoadPhase::Aborted;
        inner.stats.aborted = true;

        let cancel = inner.cancel.clone();
        let stats = inner.stats.clone();
        let context = inner.context.clone();
        let summary = inner.response.clone();
        let mut callbacks = std::mem::take(&mut inner.callbacks);
        drop(inner);

        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        tracing::debug!("load aborted");
        if let (Some(on_abort), Some(context)) = (callbacks.on_abort.as_mut(), context.as_ref()) {
            on_abort(&stats, context, summary.as_ref());
        }
    }

    /// Tear down without notification: an internal abort that never fires
    /// `on_abort`. Releases the token and any registered handlers.
    pub fn destroy(&self) {
        let mut inner = lock(&self.inner);
        if inner.phase.is_loading() {
            inner.phase = LoadPhase::Aborted;
            inner.stats.aborted = true;
        }
        let cancel = inner.cancel.take();
        inner.callbacks = LoadCallbacks::default();
        inner.context = None;
        drop(inner);

        if let Some(cancel) = cancel {
            cancel.cancel();
        }
    }

    /// Header value from the last received response of the current load,
    /// or `None` before headers have arrived. Never panics.
    #[must_use]
    pub fn response_header(&self, name: &str) -> Option<String> {
        let inner = lock(&self.inner);
        let summary = inner.response.as_ref()?;
        summary
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    /// Snapshot of the current load statistics
    #[must_use]
    pub fn stats(&self) -> LoadStats {
        lock(&self.inner).stats.clone()
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        lock(&self.inner).phase
    }

    fn settle_finished(&self, result: Result<LoadResult, Error>) -> LoadOutcome {
        match result {
            Ok(result) => self.settle_success(result),
            Err(error) if error.is_cancelled() => {
                // Whoever triggered the cancellation already reported it;
                // close out the phase if nobody has.
                let mut inner = lock(&self.inner);
                if inner.phase.is_loading() {
                    inner.phase = LoadPhase::Aborted;
                }
                terminal_outcome(inner.phase)
            }
            Err(error) => self.settle_error(&error),
        }
    }

    fn settle_success(&self, result: LoadResult) -> LoadOutcome {
        let mut inner = lock(&self.inner);
        if !inner.phase.is_loading() {
            return terminal_outcome(inner.phase);
        }
        inner.phase = LoadPhase::Succeeded;
        inner.stats.mark_completed(Instant::now());
        inner.stats.finalize_success(result.data.len() as u64);

        let stats = inner.stats.clone();
        let context = inner.context.clone();
        let summary = inner.response.clone();
        let mut callbacks = std::mem::take(&mut inner.callbacks);
        drop(inner);

        tracing::debug!(bytes = stats.bytes_loaded, "load succeeded");
        let summary = summary.unwrap_or_else(|| ResponseSummary {
            url: result.url.clone(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        });
        if let (Some(on_success), Some(context)) =
            (callbacks.on_success.as_mut(), context.as_ref())
        {
            on_success(&result, &stats, context, &summary);
        }
        LoadOutcome::Success(result)
    }

    fn settle_error(&self, error: &Error) -> LoadOutcome {
        let failure = LoadFailure::from_error(error);

        let mut inner = lock(&self.inner);
        if !inner.phase.is_loading() {
            return terminal_outcome(inner.phase);
        }
        inner.phase = LoadPhase::Failed;

        let stats = inner.stats.clone();
        let context = inner.context.clone();
        let summary = inner.response.clone();
        let mut callbacks = std::mem::take(&mut inner.callbacks);
        drop(inner);

        tracing::debug!(%failure, "load failed");
        if let (Some(on_error), Some(context)) = (callbacks.on_error.as_mut(), context.as_ref()) {
            on_error(&failure, &stats, context, summary.as_ref());
        }
        LoadOutcome::Failed(failure)
    }

    fn settle_timeout(&self, cancel: &CancellationToken) -> LoadOutcome {
        let mut inner = lock(&self.inner);
        if !inner.phase.is_loading() {
            return terminal_outcome(inner.phase);
        }
        // Timeout is its own terminal outcome: it does not set
        // `stats.aborted` and reports through `on_timeout`, never
        // `on_abort`.
        inner.phase = LoadPhase::TimedOut;

        let stats = inner.stats.clone();
        let context = inner.context.clone();
        let summary = inner.response.clone();
        let mut callbacks = std::mem::take(&mut inner.callbacks);
        drop(inner);

        cancel.cancel();
        if let Some(context) = context.as_ref() {
            tracing::warn!(url = %context.url, "load timed out");
            if let Some(on_timeout) = callbacks.on_timeout.as_mut() {
                on_timeout(&stats, context, summary.as_ref());
            }
        }
        LoadOutcome::TimedOut
    }
}

impl Clone for Loader {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

fn terminal_outcome(phase: LoadPhase) -> LoadOutcome {
    match phase {
        LoadPhase::TimedOut => LoadOutcome::TimedOut,
        _ => LoadOutcome::Aborted,
    }
}

/// Dispatch, pump and decode one request. Settle gating stays with the
/// caller; this only reports how far the work got.
async fn run(
    transport: Arc<dyn Transport>,
    context: Arc<LoadContext>,
    cancel: CancellationToken,
    inner: Arc<Mutex<Inner>>,
) -> Result<LoadResult, Error> {
    let params = params::build_transport_params(&context, cancel)?;
    let response = transport.dispatch(&context, params).await?;

    // Snapshot metadata before the body is consumed.
    let summary = ResponseSummary::from_response(&response);
    let status = summary.status;
    {
        let mut guard = lock(&inner);
        guard.stats.mark_first_byte(Instant::now());
        guard.response = Some(summary.clone());
    }

    if !status.is_success() {
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }

    if let Some(total) = response.content_length() {
        lock(&inner).stats.set_total(total);
    }

    let body = pump::read_body(response, &inner, &context, &summary).await?;
    let payload = decode::decode_payload(body.freeze(), context.response_type)?;

    Ok(LoadResult {
        url: summary.url,
        data: payload,
    })
}
