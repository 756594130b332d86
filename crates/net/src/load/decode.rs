//! Final payload decoding

use bytes::Bytes;
use segload_errors::{Error, NetworkError};
use segload_types::{Payload, ResponseType};

/// Decode the accumulated body per the requested representation.
///
/// Text is strict UTF-8; a decode failure is a transport-class failure, not
/// a panic or a lossy conversion.
pub(super) fn decode_payload(bytes: Bytes, response_type: ResponseType) -> Result<Payload, Error> {
    match response_type {
        ResponseType::Binary => Ok(Payload::Binary(bytes)),
        ResponseType::Text => match String::from_utf8(bytes.into()) {
            Ok(text) => Ok(Payload::Text(text)),
            Err(e) => Err(NetworkError::DecodeFailed(e.to_string()).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_passes_through() {
        let payload = decode_payload(Bytes::from_static(b"\x00\x01\x02"), ResponseType::Binary);
        assert_eq!(payload.unwrap().len(), 3);
    }

    #[test]
    fn text_decodes_utf8() {
        let payload = decode_payload(Bytes::from_static("héllo".as_bytes()), ResponseType::Text);
        assert_eq!(payload.unwrap().into_text().as_deref(), Some("héllo"));
    }

    #[test]
    fn invalid_utf8_is_a_decode_failure() {
        let err = decode_payload(Bytes::from_static(b"\xff\xfe"), ResponseType::Text).unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::DecodeFailed(_))
        ));
    }
}
