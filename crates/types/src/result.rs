//! Decoded result of a successful load

use bytes::Bytes;

/// Response payload decoded per the context's `ResponseType`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Bytes),
}

impl Payload {
    /// Size of the decoded payload in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Text(text) => Bytes::from(text.into_bytes()),
            Self::Binary(bytes) => bytes,
        }
    }
}

/// Final resolved URL and decoded payload of one successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub url: String,
    pub data: Payload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_len_matches_representation() {
        assert_eq!(Payload::Text("abc".into()).len(), 3);
        assert_eq!(Payload::Binary(Bytes::from_static(b"abcd")).len(), 4);
        assert!(Payload::Text(String::new()).is_empty());
    }

    #[test]
    fn into_text_rejects_binary() {
        assert!(Payload::Binary(Bytes::new()).into_text().is_none());
        assert_eq!(
            Payload::Text("hi".into()).into_text().as_deref(),
            Some("hi")
        );
    }
}
