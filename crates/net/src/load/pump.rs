//! Streamed body consumption with progress reporting

use std::sync::Mutex;

use bytes::BytesMut;
use futures::StreamExt;
use reqwest::Response;
use segload_errors::{Error, NetworkError};
use segload_types::LoadContext;

use super::core::{lock, Inner, ResponseSummary};

/// Read the response body to completion, feeding the byte counters and the
/// optional progress handler chunk by chunk.
///
/// One reader serves both consumers (the payload accumulator and progress
/// reporting), so progress never delays decode completion and the body is
/// fetched exactly once. Stops silently with `Error::Cancelled` once the
/// load has left the `Loading` phase; the settle gate decides what, if
/// anything, gets reported.
pub(super) async fn read_body(
    response: Response,
    inner: &Mutex<Inner>,
    context: &LoadContext,
    summary: &ResponseSummary,
) -> Result<BytesMut, Error> {
    let mut stream = response.bytes_stream();
    let mut body = BytesMut::new();

    while let Some(next) = stream.next().await {
        let chunk = match next {
            Ok(chunk) => chunk,
            Err(e) => {
                // A read torn down by cancellation is not a load failure.
                if !lock(inner).phase.is_loading() {
                    return Err(Error::Cancelled);
                }
                return Err(NetworkError::TransportFailed(e.to_string()).into());
            }
        };

        body.extend_from_slice(&chunk);

        let (stats, mut on_progress) = {
            let mut guard = lock(inner);
            if !guard.phase.is_loading() {
                return Err(Error::Cancelled);
            }
            guard.stats.record_chunk(chunk.len() as u64);
            (guard.stats.clone(), guard.callbacks.on_progress.take())
        };

        // Handler runs outside the lock so it may call back into the
        // loader (e.g. abort mid-stream).
        if let Some(on_progress) = on_progress.as_mut() {
            on_progress(&stats, context, &chunk, summary);
        }

        if let Some(on_progress) = on_progress {
            let mut guard = lock(inner);
            if guard.callbacks.on_progress.is_none() {
                guard.callbacks.on_progress = Some(on_progress);
            }
        }
    }

    Ok(body)
}
