//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the
//! diagnostic-route check, and fallthrough to static file serving.

use crate::config::AppState;
use crate::handler::{static_files, userinfo};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let is_head = *req.method() == Method::HEAD;

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);
    let entry = access_log.then(|| new_access_entry(&req, peer_addr));

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 1. Check HTTP method
    // 2. Dispatch to the diagnostic route or the static handler
    let response = match check_http_method(req.method(), state.config.http.enable_cors) {
        Some(resp) => resp,
        None => route_request(&req, &state, is_head).await,
    };

    // 3. Record the completed request
    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
///
/// The diagnostic route is tried first so it shadows any file of the same
/// name under the static root.
async fn route_request(
    req: &Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let path = req.uri().path();

    // 1. Diagnostic route
    if path == state.config.routes.diagnostic_path {
        return userinfo::serve(req.headers(), &state.config.http, is_head);
    }

    // 2. Static files under the configured root
    static_files::serve(path, &state.config, is_head).await
}

/// Start an access log entry from the request line and headers
fn new_access_entry(req: &Request<hyper::body::Incoming>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.referer = header_str(req, "referer");
    entry.user_agent = header_str(req, "user-agent");
    entry
}

fn header_str(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
