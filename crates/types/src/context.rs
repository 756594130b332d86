//! Description of a single load request

use serde::{Deserialize, Serialize};

/// Half-open byte span of a resource, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered by the range
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Desired representation of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Text,
    Binary,
}

/// Immutable description of one load: target URL, optional byte range and
/// the desired payload representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadContext {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<ByteRange>,
    pub response_type: ResponseType,
}

impl LoadContext {
    #[must_use]
    pub fn new(url: impl Into<String>, response_type: ResponseType) -> Self {
        Self {
            url: url.into(),
            byte_range: None,
            response_type,
        }
    }

    /// Restrict the request to a half-open byte span
    #[must_use]
    pub fn with_byte_range(mut self, range: ByteRange) -> Self {
        self.byte_range = Some(range);
        self
    }
}
