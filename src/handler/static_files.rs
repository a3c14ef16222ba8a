//! Static file serving module
//!
//! Handles file loading, directory index lookup, directory listings, and
//! response building for resolved filesystem targets.

use crate::config::StaticConfig;
use crate::handler::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters percent-encoded inside listing hrefs
const HREF_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'%');

/// Serve a resolved filesystem target
///
/// Regular files are streamed with a guessed content type; directories go
/// through index lookup and fall back to a generated listing; missing
/// entries produce a 404. Read failures on entries that exist surface as
/// 500 rather than being folded into "not found".
pub async fn serve_resolved(
    ctx: &RequestContext<'_>,
    decoded_path: &str,
    candidate: &Path,
    cfg: &StaticConfig,
) -> Response<Full<Bytes>> {
    match fs::metadata(candidate).await {
        Ok(meta) if meta.is_dir() => serve_directory(ctx, decoded_path, candidate, cfg).await,
        Ok(_) => serve_file(ctx, candidate).await,
        Err(e) if e.kind() == io::ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat '{}': {e}",
                candidate.display()
            ));
            http::build_500_response()
        }
    }
}

/// Serve a directory: redirect to the slash form, try index files, then list
async fn serve_directory(
    ctx: &RequestContext<'_>,
    decoded_path: &str,
    dir: &Path,
    cfg: &StaticConfig,
) -> Response<Full<Bytes>> {
    // Relative links only resolve correctly against the trailing-slash URL
    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&format!("{}/", ctx.path));
    }

    for index_file in &cfg.index_files {
        let index_path = dir.join(index_file);
        if index_path.is_file() {
            return serve_file(ctx, &index_path).await;
        }
    }

    match render_listing(decoded_path, dir).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to list '{}': {e}", dir.display()));
            http::build_500_response()
        }
    }
}

/// Serve a single file's bytes
pub async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => http::build_file_response(content, mime::guess_for_path(path), ctx.is_head),
        Err(e) if e.kind() == io::ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// Render an HTML listing for a directory without an index file
async fn render_listing(decoded_path: &str, dir: &Path) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        entries.push((name, is_dir));
    }
    entries.sort();

    let title = format!("Directory listing for {}", escape_html(decoded_path));
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for (name, is_dir) in &entries {
        let suffix = if *is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<li><a href=\"{}{suffix}\">{}{suffix}</a></li>\n",
            utf8_percent_encode(name, HREF_ENCODE),
            escape_html(name),
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Escape text for embedding in HTML
fn escape_html(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '&' => "&amp;".chars().collect::<Vec<_>>(),
            '<' => "&lt;".chars().collect(),
            '>' => "&gt;".chars().collect(),
            '"' => "&quot;".chars().collect(),
            c => vec![c],
        })
        .collect()
}
