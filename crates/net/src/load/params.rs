//! Pure derivation of transport parameters from the load description

use reqwest::header::{HeaderMap, HeaderValue, RANGE};
use reqwest::Method;
use segload_errors::{Error, NetworkError};
use segload_types::LoadContext;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Transport-level parameters for one request
#[derive(Debug, Clone)]
pub struct TransportParams {
    pub method: Method,
    pub headers: HeaderMap,
    /// Shared cancel signal; transports must stop promptly once it fires.
    pub cancel: CancellationToken,
}

/// Validate URL and check for supported protocols
fn validate_url(url: &str) -> Result<(), Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(NetworkError::UnsupportedProtocol {
            protocol: scheme.to_string(),
        }
        .into()),
    }
}

/// Derive the transport parameters for the request described by `context`.
///
/// Pure: no network or loader state is touched here, which keeps the
/// builder testable in isolation. The method is always GET; a byte range
/// renders as `Range: bytes=<start>-<end-1>` (inclusive end, standard HTTP
/// range semantics).
///
/// # Errors
///
/// Returns an error for an invalid or non-HTTP URL, or an empty byte range.
pub(super) fn build_transport_params(
    context: &LoadContext,
    cancel: CancellationToken,
) -> Result<TransportParams, Error> {
    validate_url(&context.url)?;

    let mut headers = HeaderMap::new();
    if let Some(range) = context.byte_range {
        if range.is_empty() {
            return Err(Error::internal(format!(
                "empty byte range {}-{}",
                range.start, range.end
            )));
        }
        let value = format!("bytes={}-{}", range.start, range.end - 1);
        let value = HeaderValue::from_str(&value)
            .map_err(|e| Error::internal(format!("range header: {e}")))?;
        headers.insert(RANGE, value);
    }

    Ok(TransportParams {
        method: Method::GET,
        headers,
        cancel,
    })
}
