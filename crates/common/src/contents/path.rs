//! Helpers for opaque `/`-separated namespace paths.
//!
//! A namespace path carries no backend-internal meaning beyond its first
//! segment, which names the backend alias. Everything here is plain string
//! work; backends translate local paths to filesystem paths themselves.

/// Trim leading and trailing separators.
pub fn strip_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Split a full path into `(alias, local_path)`.
///
/// Returns `None` for the empty (root) path. The local path may be empty
/// when the full path is just an alias.
pub fn split_alias(path: &str) -> Option<(&str, &str)> {
    let path = strip_slashes(path);
    if path.is_empty() {
        return None;
    }
    match path.split_once('/') {
        Some((alias, local)) => Some((alias, local)),
        None => Some((path, "")),
    }
}

/// Last segment of a path, or the whole path if it has one segment.
pub fn basename(path: &str) -> &str {
    strip_slashes(path).rsplit('/').next().unwrap_or("")
}

/// Everything before the last segment, or `""` for a single segment.
pub fn parent(path: &str) -> &str {
    let path = strip_slashes(path);
    match path.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    }
}

/// Join two path fragments, ignoring empty sides.
pub fn join(left: &str, right: &str) -> String {
    let left = strip_slashes(left);
    let right = strip_slashes(right);
    if left.is_empty() {
        right.to_string()
    } else if right.is_empty() {
        left.to_string()
    } else {
        format!("{}/{}", left, right)
    }
}

/// Split a document name into `(stem, extension)`, where the extension
/// includes the leading dot. A name with no dot has an empty extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
