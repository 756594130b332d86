#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! HTTP resource loading for segload
//!
//! This crate implements the single-request resource loader: one optionally
//! byte-ranged GET with fine-grained timing/byte statistics, an explicit
//! timeout raced against the response, cooperative cancellation, streamed
//! progress reporting and text/binary payload decoding. Retry, caching and
//! payload interpretation live above this crate.

mod client;
mod load;

pub use client::{HttpClient, HttpConfig, Transport};
pub use load::{
    FailureKind, LoadCallbacks, LoadConfig, LoadFailure, LoadOutcome, Loader, ResponseSummary,
    TransportParams,
};

use std::time::Duration;

use segload_errors::{Error, NetworkError};
use segload_types::{LoadContext, ResponseType};
use url::Url;

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to
/// RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}

/// Fetch text content from a URL
///
/// One-shot convenience over [`Loader`] with no progress reporting.
///
/// # Errors
///
/// Returns an error if the request fails, the server returns an error
/// status, the deadline elapses, or the body is not valid UTF-8.
pub async fn fetch_text(client: &HttpClient, url: &str, timeout: Duration) -> Result<String, Error> {
    let loader = Loader::new(client.clone());
    let context = LoadContext::new(url, ResponseType::Text);
    let outcome = loader
        .load(context, LoadConfig::new(timeout), LoadCallbacks::new())
        .await?;

    match outcome {
        LoadOutcome::Success(result) => result
            .data
            .into_text()
            .ok_or_else(|| Error::internal("text load produced a binary payload")),
        LoadOutcome::Failed(failure) => Err(failure.into_error()),
        LoadOutcome::TimedOut => Err(NetworkError::Timeout {
            url: url.to_string(),
        }
        .into()),
        LoadOutcome::Aborted => Err(Error::Cancelled),
    }
}

/// Fetch binary content from a URL
///
/// # Errors
///
/// Returns an error if the request fails, the server returns an error
/// status, or the deadline elapses.
pub async fn fetch_bytes(
    client: &HttpClient,
    url: &str,
    timeout: Duration,
) -> Result<bytes::Bytes, Error> {
    let loader = Loader::new(client.clone());
    let context = LoadContext::new(url, ResponseType::Binary);
    let outcome = loader
        .load(context, LoadConfig::new(timeout), LoadCallbacks::new())
        .await?;

    match outcome {
        LoadOutcome::Success(result) => Ok(result.data.into_bytes()),
        LoadOutcome::Failed(failure) => Err(failure.into_error()),
        LoadOutcome::TimedOut => Err(NetworkError::Timeout {
            url: url.to_string(),
        }
        .into()),
        LoadOutcome::Aborted => Err(Error::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}
