//! Error types for table construction and filesystem operations.

use thiserror::Error;

/// Errors surfaced by filesystem operations.
///
/// `Clone` is required: decode outcomes are memoized per asset, so the
/// stored error is handed out again on every later call.
#[derive(Debug, Clone, Error)]
pub enum FsError {
    /// Path is not present in the asset table (or, in local mode, the
    /// backing file does not exist on the host).
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload transport or decompression failed. Memoized per asset.
    #[error("decode failed: {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Decoded length does not match the size recorded in the table.
    /// Memoized per asset; the mismatched content is never returned.
    #[error("size mismatch: {path}: declared {declared}, decoded {actual}")]
    SizeMismatch {
        path: String,
        declared: u64,
        actual: u64,
    },

    /// A directory exists in the table but its listing was never
    /// registered. This indicates a defective table build.
    #[error("no listing for directory: {0}")]
    MissingListing(String),

    /// The operation does not apply to this handle (readdir on a file,
    /// read after close, and similar).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Sentinel for readdir with a positive count on an exhausted
    /// listing. Not a failure.
    #[error("end of listing")]
    EndOfListing,

    /// Host filesystem error in local mode.
    #[error("io error: {0}")]
    Io(String),

    /// Content is not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    Utf8(String),
}

/// Defects detected while building a registry from a compiled table.
///
/// These are build problems, not runtime conditions: a well-formed table
/// never produces them.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported table version: {0}")]
    UnsupportedVersion(u64),

    #[error("duplicate path: {0}")]
    DuplicatePath(String),

    #[error("missing root entry")]
    MissingRoot,

    #[error("invalid entry: {path}: {reason}")]
    InvalidEntry { path: String, reason: String },
}

impl TableError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Map a host filesystem error, keeping NotFound distinct.
pub(crate) fn host_error(path: &std::path::Path, err: std::io::Error) -> FsError {
    if err.kind() == std::io::ErrorKind::NotFound {
        FsError::NotFound(path.display().to_string())
    } else {
        FsError::Io(format!("{}: {err}", path.display()))
    }
}
