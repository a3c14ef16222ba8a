//! Request path decoding and containment
//!
//! Turns a raw URL path into a filesystem target under the served root.
//! Decoding happens before containment checks, so an encoded `%2e%2e` is
//! rejected the same way a literal `..` is. The resolved target can never
//! leave the served root.

use percent_encoding::percent_decode_str;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a request path was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRejection {
    /// Percent-decoding produced invalid UTF-8
    Decode,
    /// A `..` component would escape the served root
    Traversal,
}

impl fmt::Display for PathRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => write!(f, "request path is not valid UTF-8 after decoding"),
            Self::Traversal => write!(f, "request path escapes the served root"),
        }
    }
}

/// Percent-decode a raw request path
///
/// `+` is left untouched; it only means a space in query strings, not paths.
pub fn decode(raw: &str) -> Result<String, PathRejection> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|_| PathRejection::Decode)
}

/// Resolve a decoded URL path against the served root
///
/// Walks the path component by component. Empty and `.` components are
/// skipped; any `..` component is rejected outright rather than normalized,
/// so the result always stays inside `root`.
pub fn resolve(root: &Path, decoded: &str) -> Result<PathBuf, PathRejection> {
    let mut target = root.to_path_buf();
    for component in decoded.split('/') {
        match component {
            "" | "." => {}
            ".." => return Err(PathRejection::Traversal),
            segment => target.push(segment),
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain() {
        assert_eq!(decode("/app/index.html").unwrap(), "/app/index.html");
    }

    #[test]
    fn test_decode_percent_escapes() {
        assert_eq!(decode("/app/my%20file.txt").unwrap(), "/app/my file.txt");
        assert_eq!(decode("/%E2%9C%93").unwrap(), "/\u{2713}");
    }

    #[test]
    fn test_decode_plus_is_literal() {
        assert_eq!(decode("/a+b").unwrap(), "/a+b");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert_eq!(decode("/%ff%fe").unwrap_err(), PathRejection::Decode);
    }

    #[test]
    fn test_resolve_simple() {
        let target = resolve(Path::new("root"), "/app/logo.png").unwrap();
        assert_eq!(target, Path::new("root").join("app").join("logo.png"));
    }

    #[test]
    fn test_resolve_skips_empty_and_dot() {
        let target = resolve(Path::new("root"), "//app/./x").unwrap();
        assert_eq!(target, Path::new("root").join("app").join("x"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let err = resolve(Path::new("root"), "/app/../../etc/passwd").unwrap_err();
        assert_eq!(err, PathRejection::Traversal);
    }

    #[test]
    fn test_encoded_traversal_rejected_after_decode() {
        let decoded = decode("/%2e%2e/secret").unwrap();
        assert_eq!(decoded, "/../secret");
        assert_eq!(
            resolve(Path::new("root"), &decoded).unwrap_err(),
            PathRejection::Traversal
        );
    }

    #[test]
    fn test_root_path_resolves_to_root() {
        assert_eq!(resolve(Path::new("root"), "/").unwrap(), Path::new("root"));
    }
}
