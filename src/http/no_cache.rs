//! Cache-busting header injection
//!
//! Every response leaving the server carries the strongest trio of
//! cache-disabling headers recognised by browsers and proxies. Applied as a
//! final decoration step after handler dispatch so no code path can emit a
//! cacheable response.

use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::Response;

pub const CACHE_CONTROL_VALUE: &str = "no-store, no-cache, must-revalidate";
pub const PRAGMA_VALUE: &str = "no-cache";
pub const EXPIRES_VALUE: &str = "0";

/// Force the cache-disabling headers onto a response
///
/// Replaces any cache headers a handler may have set.
pub fn apply<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
    headers.insert(EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}
