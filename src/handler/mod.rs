//! Request handler module
//!
//! Routing dispatch plus the two request handlers: the token-echo diagnostic
//! endpoint and static file serving.

pub mod router;
pub mod static_files;
pub mod userinfo;

// Re-export main entry point
pub use router::handle_request;
