//! A small HTTP server that serves a static webroot and exposes one
//! diagnostic endpoint echoing the decoded payload of the bearer token in
//! the request's `Authorization` header.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod token;
