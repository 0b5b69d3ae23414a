//! Static file serving module
//!
//! Resolves request paths against the configured static root and serves the
//! file bytes with an inferred Content-Type.

use crate::config::Config;
use crate::http::{self, mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Why a static file could not be served
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The path resolves to nothing servable (also covers blocked traversal)
    #[error("file not found")]
    NotFound,
    /// The file exists but could not be read
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),
}

/// Serve a request path from the static root
pub async fn serve(path: &str, config: &Config, is_head: bool) -> Response<Full<Bytes>> {
    let routes = &config.routes;
    match load_from_root(&routes.static_root, path, &routes.index_files).await {
        Ok((content, content_type)) => {
            response::build_static_response(content, content_type, &config.http, is_head)
        }
        Err(StaticFileError::NotFound) => http::build_404_response(),
        Err(StaticFileError::Io(e)) => {
            logger::log_error(&format!("Failed to read '{path}': {e}"));
            http::build_500_response()
        }
    }
}

/// Load a file from the static root with index file support
pub async fn load_from_root(
    root: &str,
    path: &str,
    index_files: &[String],
) -> Result<(Vec<u8>, &'static str), StaticFileError> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let mut file_path = Path::new(root).join(&clean_path);

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!("Static root not accessible '{root}': {e}"));
            return Err(StaticFileError::NotFound);
        }
    };

    // Directory requests resolve through the index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        file_path = resolve_index(&file_path, index_files).ok_or(StaticFileError::NotFound)?;
    }

    // Missing files fail canonicalization, which is the common 404 case
    let Ok(file_canonical) = file_path.canonicalize() else {
        return Err(StaticFileError::NotFound);
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_canonical.display()
        ));
        return Err(StaticFileError::NotFound);
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StaticFileError::NotFound),
        Err(e) => return Err(StaticFileError::Io(e)),
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Ok((content, content_type))
}

/// Pick the first index file that exists in the directory
fn resolve_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
