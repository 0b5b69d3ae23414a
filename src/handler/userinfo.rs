//! Diagnostic endpoint module
//!
//! Echoes the decoded payload segment of the bearer token in the
//! `authorization` header. The bytes pass through unchanged: the endpoint
//! shows exactly what the caller's token claims, so no JSON re-validation
//! happens here.

use crate::config::HttpConfig;
use crate::http::{self, response};
use crate::logger;
use crate::token::{self, TokenError};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{HeaderMap, Response};
use thiserror::Error;

/// Why the caller's credentials could not be decoded
#[derive(Debug, Error)]
enum CredentialError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("authorization header contains non-ASCII characters")]
    BadHeaderEncoding,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Serve the diagnostic endpoint
pub fn serve(headers: &HeaderMap, http_config: &HttpConfig, is_head: bool) -> Response<Full<Bytes>> {
    match payload_from_headers(headers) {
        Ok(payload) => response::build_userinfo_response(payload, http_config, is_head),
        Err(err) => {
            logger::log_warning(&format!("userinfo request rejected: {err}"));
            http::build_400_response(&err.to_string())
        }
    }
}

/// Extract and decode the token payload from the request headers
fn payload_from_headers(headers: &HeaderMap) -> Result<Vec<u8>, CredentialError> {
    let value = headers
        .get("authorization")
        .ok_or(CredentialError::MissingHeader)?;
    let token = value
        .to_str()
        .map_err(|_| CredentialError::BadHeaderEncoding)?;
    Ok(token::decode_payload(token)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    fn test_http_config() -> HttpConfig {
        HttpConfig {
            server_name: "test".to_string(),
            enable_cors: false,
        }
    }

    #[test]
    fn test_decodes_payload_segment() {
        let headers = headers_with_auth("hdr.eyJhIjoxfQ.sig");
        assert_eq!(payload_from_headers(&headers).unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn test_missing_header() {
        let err = payload_from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, CredentialError::MissingHeader));
    }

    #[test]
    fn test_single_segment_token() {
        let headers = headers_with_auth("nodots");
        let err = payload_from_headers(&headers).unwrap_err();
        assert!(matches!(err, CredentialError::Token(TokenError::MissingPayload)));
    }

    #[test]
    fn test_serve_success() {
        let headers = headers_with_auth("hdr.eyJhIjoxfQ.sig");
        let resp = serve(&headers, &test_http_config(), false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(resp.headers()["cache-control"], "no-store");
    }

    #[test]
    fn test_serve_rejects_bad_token() {
        let resp = serve(&headers_with_auth("x"), &test_http_config(), false);
        assert_eq!(resp.status(), 400);

        let resp = serve(&HeaderMap::new(), &test_http_config(), false);
        assert_eq!(resp.status(), 400);
    }
}
