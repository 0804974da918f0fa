//! Canonical virtual path handling.
//!
//! Table paths are slash-separated and rooted on every platform, so they
//! are handled as strings rather than `std::path::Path`. Every incoming
//! path is canonicalized before lookup, which makes all spellings of the
//! same path resolve to the same record.

/// Canonicalize a virtual path.
///
/// Collapses redundant separators, resolves `.` and `..` segments
/// (clamping `..` at the root), and forces a leading `/`. An empty path
/// canonicalizes to `/`.
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len());
    for s in &segments {
        out.push('/');
        out.push_str(s);
    }
    out
}

/// Join a path onto a prefix and canonicalize the result.
pub fn join(prefix: &str, path: &str) -> String {
    canonicalize(&format!("{prefix}/{path}"))
}

/// Base name of a canonical path. The root's name is `/`.
pub fn base_name(canonical: &str) -> &str {
    match canonical.rfind('/') {
        Some(i) if canonical.len() > i + 1 => &canonical[i + 1..],
        _ => "/",
    }
}

/// Parent of a canonical path, `None` for the root.
pub fn parent(canonical: &str) -> Option<&str> {
    if canonical == "/" {
        return None;
    }
    match canonical.rfind('/') {
        Some(0) => Some("/"),
        Some(i) => Some(&canonical[..i]),
        None => None,
    }
}
