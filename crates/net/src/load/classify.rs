//! Mapping of settle conditions onto the failure taxonomy

use serde::Serialize;

use segload_errors::{Error, NetworkError};

/// Failure taxonomy delivered through the terminal callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No usable response: connection failure, reset, decode failure
    Network,
    /// Response received but the status indicates failure
    HttpStatus,
    /// The watchdog deadline elapsed before settlement
    Timeout,
    /// The caller aborted the load
    Aborted,
}

/// A classified load failure
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub kind: FailureKind,
    /// HTTP status for status failures, otherwise 0
    pub code: u16,
    pub message: String,
    /// Underlying error detail when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LoadFailure {
    /// Classify a transport-path error
    pub(super) fn from_error(error: &Error) -> Self {
        match error {
            Error::Network(NetworkError::HttpError { status, message }) => Self {
                kind: FailureKind::HttpStatus,
                code: *status,
                message: if message.is_empty() {
                    "HTTP error".to_string()
                } else {
                    message.clone()
                },
                details: None,
            },
            other => Self {
                kind: FailureKind::Network,
                code: 0,
                message: other.to_string(),
                details: None,
            },
        }
    }

    /// Map back into the error taxonomy, for callers that await the
    /// outcome instead of registering callbacks.
    #[must_use]
    pub fn into_error(self) -> Error {
        match self.kind {
            FailureKind::HttpStatus => NetworkError::HttpError {
                status: self.code,
                message: self.message,
            }
            .into(),
            FailureKind::Timeout => NetworkError::Timeout {
                url: String::new(),
            }
            .into(),
            FailureKind::Aborted => Error::Cancelled,
            FailureKind::Network => NetworkError::TransportFailed(self.message).into(),
        }
    }
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FailureKind::HttpStatus => write!(f, "HTTP {}: {}", self.code, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_status_code() {
        let error = Error::Network(NetworkError::HttpError {
            status: 404,
            message: "404 Not Found".to_string(),
        });
        let failure = LoadFailure::from_error(&error);
        assert_eq!(failure.kind, FailureKind::HttpStatus);
        assert_eq!(failure.code, 404);
        assert_eq!(failure.message, "404 Not Found");
    }

    #[test]
    fn transport_failure_maps_to_code_zero() {
        let error = Error::Network(NetworkError::TransportFailed("connection reset".to_string()));
        let failure = LoadFailure::from_error(&error);
        assert_eq!(failure.kind, FailureKind::Network);
        assert_eq!(failure.code, 0);
        assert!(failure.message.contains("connection reset"));
    }

    #[test]
    fn empty_status_text_gets_a_default_message() {
        let error = Error::Network(NetworkError::HttpError {
            status: 500,
            message: String::new(),
        });
        let failure = LoadFailure::from_error(&error);
        assert_eq!(failure.message, "HTTP error");
    }

    #[test]
    fn failure_serializes_with_kind_tag() {
        let failure = LoadFailure {
            kind: FailureKind::Timeout,
            code: 0,
            message: "load timed out".to_string(),
            details: None,
        };
        let json = serde_json::to_value(failure).unwrap();
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["code"], 0);
    }
}
