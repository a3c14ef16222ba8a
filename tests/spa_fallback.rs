//! Dispatch-level tests over a temporary served root
//!
//! Exercise the full response path (method check, path containment, SPA
//! fallback, static resolution, cache-busting decoration) without a TCP
//! listener in the way.

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use spaserve::config::{
    AppState, Config, LiveReloadConfig, LoggingConfig, PerformanceConfig, ServerConfig, SpaConfig,
    StaticConfig, LIVERELOAD_PORT,
};
use spaserve::handler::{respond, RequestContext};
use std::path::Path;

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
const INDEX_HTML: &str = "<html><body>spa entry</body></html>";

fn served_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("app/assets")).unwrap();
    std::fs::write(root.path().join("app/index.html"), INDEX_HTML).unwrap();
    std::fs::write(root.path().join("app/logo.png"), PNG_BYTES).unwrap();
    std::fs::create_dir_all(root.path().join("docs")).unwrap();
    std::fs::write(root.path().join("docs/index.html"), "<html>docs</html>").unwrap();
    std::fs::create_dir_all(root.path().join("files")).unwrap();
    std::fs::write(root.path().join("files/notes.txt"), "notes").unwrap();
    std::fs::write(root.path().join("other.txt"), "plain text").unwrap();
    root
}

fn state_for(root: &Path) -> AppState {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            workers: None,
        },
        static_files: StaticConfig {
            root: root.to_string_lossy().into_owned(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        },
        spa: SpaConfig {
            prefix: "/app/".to_string(),
            index: "index.html".to_string(),
        },
        logging: LoggingConfig {
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        },
        livereload: LiveReloadConfig {
            enabled: false,
            port: LIVERELOAD_PORT,
            debounce_ms: 300,
            watch_dir: None,
        },
    };
    AppState::new(&config)
}

async fn get(state: &AppState, path: &str) -> Response<Full<Bytes>> {
    let ctx = RequestContext {
        path,
        is_head: false,
        access_log: false,
    };
    respond(&Method::GET, &ctx, state).await
}

async fn body_of(response: Response<Full<Bytes>>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn assert_no_cache_headers<B>(response: &Response<B>) {
    assert_eq!(
        response.headers().get("Cache-Control").unwrap(),
        "no-store, no-cache, must-revalidate"
    );
    assert_eq!(response.headers().get("Pragma").unwrap(), "no-cache");
    assert_eq!(response.headers().get("Expires").unwrap(), "0");
}

#[tokio::test]
async fn deep_link_under_prefix_serves_index() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/app/dashboard/settings").await;
    assert_eq!(response.status(), 200);
    assert_no_cache_headers(&response);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(body_of(response).await, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn prefix_directory_serves_index() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/app/").await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn real_file_under_prefix_served_unmodified() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/app/logo.png").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("Content-Type").unwrap(), "image/png");
    assert_no_cache_headers(&response);
    assert_eq!(body_of(response).await, PNG_BYTES);
}

#[tokio::test]
async fn outside_prefix_missing_is_plain_404() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/other/missing").await;
    assert_eq!(response.status(), 404);
    assert_no_cache_headers(&response);
    let body = body_of(response).await;
    assert_ne!(body, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn missing_index_under_prefix_is_404() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("app")).unwrap();
    let state = state_for(root.path());

    let response = get(&state, "/app/deep/link").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn traversal_is_rejected_with_client_error() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/app/../../etc/passwd").await;
    assert_eq!(response.status(), 400);
    assert_no_cache_headers(&response);
}

#[tokio::test]
async fn encoded_traversal_is_rejected() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/%2e%2e/%2e%2e/etc/passwd").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn file_outside_prefix_served_as_is() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/other.txt").await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_of(response).await, b"plain text");
}

#[tokio::test]
async fn directory_with_index_outside_prefix_serves_it() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/docs/").await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, b"<html>docs</html>");
}

#[tokio::test]
async fn directory_without_slash_redirects() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/docs").await;
    assert_eq!(response.status(), 301);
    assert_eq!(response.headers().get("Location").unwrap(), "/docs/");
    assert_no_cache_headers(&response);
}

#[tokio::test]
async fn directory_without_index_gets_listing() {
    let root = served_root();
    let state = state_for(root.path());

    let response = get(&state, "/files/").await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
    let body = String::from_utf8(body_of(response).await).unwrap();
    assert!(body.contains("notes.txt"));
    assert!(body.contains("Directory listing for /files/"));
}

#[tokio::test]
async fn head_gets_headers_without_body() {
    let root = served_root();
    let state = state_for(root.path());

    let ctx = RequestContext {
        path: "/app/logo.png",
        is_head: true,
        access_log: false,
    };
    let response = respond(&Method::HEAD, &ctx, &state).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("Content-Length").unwrap(),
        PNG_BYTES.len().to_string().as_str()
    );
    assert_no_cache_headers(&response);
    assert!(body_of(response).await.is_empty());
}

#[tokio::test]
async fn post_is_rejected_with_405_and_headers() {
    let root = served_root();
    let state = state_for(root.path());

    let ctx = RequestContext {
        path: "/app/",
        is_head: false,
        access_log: false,
    };
    let response = respond(&Method::POST, &ctx, &state).await;
    assert_eq!(response.status(), 405);
    assert_no_cache_headers(&response);
}

#[tokio::test]
async fn percent_encoded_file_name_resolves() {
    let root = served_root();
    std::fs::write(root.path().join("files/my file.txt"), "spaced").unwrap();
    let state = state_for(root.path());

    let response = get(&state, "/files/my%20file.txt").await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, b"spaced");
}
