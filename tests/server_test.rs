//! End-to-end tests driving a bound server over real HTTP.
//!
//! Each test binds port 0 on localhost and talks to the server with a
//! plain HTTP client, so nothing here depends on a fixed port or a
//! pre-existing webroot.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use tempfile::TempDir;
use userinfo_server::config::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
};
use userinfo_server::server::Server;

fn test_config(static_root: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        routes: RoutesConfig {
            static_root: static_root.to_str().unwrap().to_string(),
            diagnostic_path: "/userinfo".to_string(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
            show_headers: false,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
        },
        http: HttpConfig {
            server_name: "UserinfoServer/test".to_string(),
            enable_cors: false,
        },
    }
}

fn spawn_server(static_root: &Path) -> SocketAddr {
    let server = Server::bind(test_config(static_root)).unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

fn webroot() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>demo</h1>").unwrap();
    dir
}

#[tokio::test]
async fn userinfo_echoes_decoded_token_payload() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    // "eyJhIjoxfQ" is 10 characters and needs two padding characters
    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/userinfo"))
        .header("Authorization", "hdr.eyJhIjoxfQ.sig")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/json");
    assert_eq!(resp.headers()["cache-control"], "no-store");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), br#"{"a":1}"#);
}

#[tokio::test]
async fn userinfo_without_authorization_is_rejected() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    let resp = reqwest::get(format!("http://{addr}/userinfo")).await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn userinfo_with_single_segment_token_is_rejected() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/userinfo"))
        .header("Authorization", "no-dots-in-here")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn static_file_served_with_exact_bytes() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    let resp = reqwest::get(format!("http://{addr}/index.html")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"<h1>demo</h1>");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    let resp = reqwest::get(format!("http://{addr}/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn root_serves_directory_index() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"<h1>demo</h1>");
}

#[tokio::test]
async fn post_is_method_not_allowed() {
    let dir = webroot();
    let addr = spawn_server(dir.path());

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/userinfo"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.headers()["allow"], "GET, HEAD, OPTIONS");
}
