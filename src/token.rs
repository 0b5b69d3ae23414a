//! Bearer token payload decoding
//!
//! Tokens are expected in the JWT shape `header.payload.signature`. Only the
//! payload segment is ever inspected; the signature is not verified.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use thiserror::Error;

/// Errors produced while extracting the payload segment of a token
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token had fewer than two dot-separated segments
    #[error("token has no payload segment")]
    MissingPayload,
    /// The payload segment was not valid URL-safe base64 after re-padding
    #[error("payload segment is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Decode the payload segment of a dot-separated bearer token.
///
/// The second segment is re-padded with `=` to a multiple of four characters
/// and decoded with the URL-safe base64 alphabet. The decoded bytes are
/// returned unchanged; callers decide whether to interpret them.
///
/// # Examples
/// ```
/// use userinfo_server::token::decode_payload;
/// let bytes = decode_payload("hdr.eyJhIjoxfQ.sig").unwrap();
/// assert_eq!(bytes, br#"{"a":1}"#);
/// ```
pub fn decode_payload(token: &str) -> Result<Vec<u8>, TokenError> {
    let payload = token.split('.').nth(1).ok_or(TokenError::MissingPayload)?;
    Ok(URL_SAFE.decode(repad(payload))?)
}

/// Restore the `=` padding stripped from a base64url segment.
fn repad(segment: &str) -> String {
    let missing = (4 - segment.len() % 4) % 4;
    format!("{segment}{}", "=".repeat(missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_claims() {
        // 10 characters, needs two padding characters
        let bytes = decode_payload("hdr.eyJhIjoxfQ.sig").unwrap();
        assert_eq!(bytes, br#"{"a":1}"#);
    }

    #[test]
    fn test_padding_lengths() {
        // 0 mod 4: six input bytes encode to eight characters
        assert_eq!(decode_payload("h.YWJjZGVm.s").unwrap(), b"abcdef");
        // 3 mod 4: eight input bytes encode to eleven characters
        assert_eq!(decode_payload("h.MTIzNDU2Nzg.s").unwrap(), b"12345678");
        // 2 mod 4 covered by test_decode_json_claims; 1 mod 4 can never be
        // valid base64 and must fail even after re-padding
        assert!(matches!(
            decode_payload("h.eyJhw.s"),
            Err(TokenError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_url_safe_alphabet() {
        // '-' is only valid in the URL-safe alphabet
        assert_eq!(decode_payload("h.--8.s").unwrap(), vec![0xfb, 0xef]);
    }

    #[test]
    fn test_single_segment_is_rejected() {
        assert!(matches!(
            decode_payload("nodotshere"),
            Err(TokenError::MissingPayload)
        ));
    }

    #[test]
    fn test_two_segments_suffice() {
        // The signature segment is never looked at
        assert_eq!(decode_payload("h.YWJjZGVm").unwrap(), b"abcdef");
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert!(matches!(
            decode_payload("h.not*base64.s"),
            Err(TokenError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_already_padded_payload() {
        assert_eq!(decode_payload("h.eyJhIjoxfQ==.s").unwrap(), br#"{"a":1}"#);
    }
}
