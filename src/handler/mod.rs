//! Request handling module
//!
//! Entry point for HTTP request processing: method validation, path
//! decoding and containment, SPA fallback, static resolution, and the
//! final cache-busting decoration every response receives.

pub mod spa;
pub mod static_files;

use crate::config::AppState;
use crate::http::{self, no_cache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub is_head: bool,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let access_log = state.cached_access_log.load(Ordering::Relaxed);

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: method == Method::HEAD,
        access_log,
    };
    let response = respond(&method, &ctx, &state).await;

    if access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            method.to_string(),
            req.uri().path().to_string(),
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_size(&response);
        entry.referer = header_value(&req, "referer");
        entry.user_agent = header_value(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Answer a request: method check, resolution, cache-busting decoration
///
/// Every response passes through here, so none can leave cacheable.
pub async fn respond(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let mut response = match check_http_method(method) {
        Some(resp) => resp,
        None => dispatch(ctx, state).await,
    };
    no_cache::apply(&mut response);
    response
}

/// Resolve and answer a validated GET/HEAD request
///
/// Order matters: decode, contain, then let the SPA rule inspect the
/// candidate before normal static resolution sees it.
pub async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let decoded = match http::path::decode(ctx.path) {
        Ok(decoded) => decoded,
        Err(rejection) => {
            logger::log_warning(&format!("Rejected path '{}': {rejection}", ctx.path));
            return http::build_400_response(&rejection.to_string());
        }
    };

    let root = Path::new(&state.config.static_files.root);
    let candidate = match http::path::resolve(root, &decoded) {
        Ok(candidate) => candidate,
        Err(rejection) => {
            logger::log_warning(&format!("Rejected path '{}': {rejection}", ctx.path));
            return http::build_400_response(&rejection.to_string());
        }
    };

    if let Some(index_path) = spa::fallback_target(&state.config.spa, root, &decoded, &candidate) {
        // Deliberate rewrite: the URL the client asked for is not the file returned
        return static_files::serve_file(ctx, &index_path).await;
    }

    static_files::serve_resolved(ctx, &decoded, &candidate, &state.config.static_files).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Exact response body size for access logging
fn body_size(response: &Response<Full<Bytes>>) -> usize {
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(0)
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
