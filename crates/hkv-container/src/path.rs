//! Node path parsing.
//!
//! Paths are `/`-separated segment lists:
//! - Empty segments are dropped, so `/a//b/` and `a/b` address the same node
//! - The empty segment list addresses the root group
//! - Segments must not be `.` or `..`
//! - Segments must not contain NUL

use crate::error::{ContainerError, ContainerResult};

/// Path separator.
pub const SEPARATOR: char = '/';

/// Split a path into its normalized segments.
///
/// # Examples
///
/// ```
/// use hkv_container::path::segments;
///
/// assert_eq!(segments("/pickled/a/b").unwrap(), vec!["pickled", "a", "b"]);
/// assert!(segments("/").unwrap().is_empty());
/// assert!(segments("a/../b").is_err());
/// ```
pub fn segments(path: &str) -> ContainerResult<Vec<&str>> {
    let mut out = Vec::new();
    for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(ContainerError::InvalidPath {
                path: path.to_string(),
                reason: format!("relative segment {segment:?} is not allowed"),
            });
        }
        if segment.contains('\0') {
            return Err(ContainerError::InvalidPath {
                path: path.to_string(),
                reason: "segment contains NUL".into(),
            });
        }
        out.push(segment);
    }
    Ok(out)
}

/// Canonical form of a path: segments joined by `/`, no leading or trailing
/// separator. The root is the empty string.
pub fn normalize(path: &str) -> ContainerResult<String> {
    Ok(segments(path)?.join("/"))
}

/// Join a relative child path onto a parent.
pub fn join(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => parent.to_string(),
        _ => format!("{parent}{SEPARATOR}{child}"),
    }
}
