//! Virtual file handles.
//!
//! A `SchemaFile` is what open returns in either mode: a seekable
//! reader over the materialized bytes for embedded assets, or over the
//! real file in local mode. Directory handles read as empty and serve
//! listings through `readdir`.

use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::{FsError, host_error};
use crate::registry::{AssetRecord, AssetRegistry};

/// Metadata for one asset or host file.
#[derive(Debug, Clone)]
pub struct FileStat {
    /// Base name; `/` for the root directory.
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

#[derive(Debug)]
enum FileInner {
    /// Embedded content at an owned cursor position.
    Bytes(Cursor<Arc<[u8]>>),
    /// Open host file in local mode.
    File(tokio::fs::File),
    /// Host directory in local mode; listed on demand.
    LocalDir(PathBuf),
    /// The host file was released by `close`.
    Released,
}

/// An open handle onto one asset.
///
/// Handles own their read position; two handles on the same asset share
/// the materialized bytes but seek independently.
#[derive(Debug)]
pub struct SchemaFile {
    path: String,
    stat: FileStat,
    registry: Option<Arc<AssetRegistry>>,
    inner: FileInner,
    closed: bool,
}

impl SchemaFile {
    pub(crate) fn embedded(
        record: &AssetRecord,
        bytes: Arc<[u8]>,
        registry: Arc<AssetRegistry>,
    ) -> Self {
        Self {
            path: record.path().to_string(),
            stat: record.stat(),
            registry: Some(registry),
            inner: FileInner::Bytes(Cursor::new(bytes)),
            closed: false,
        }
    }

    pub(crate) fn local_file(canonical: &str, stat: FileStat, file: tokio::fs::File) -> Self {
        Self {
            path: canonical.to_string(),
            stat,
            registry: None,
            inner: FileInner::File(file),
            closed: false,
        }
    }

    pub(crate) fn local_dir(canonical: &str, stat: FileStat, dir: PathBuf) -> Self {
        Self {
            path: canonical.to_string(),
            stat,
            registry: None,
            inner: FileInner::LocalDir(dir),
            closed: false,
        }
    }

    /// Canonical path this handle was opened at.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Metadata snapshot. Valid after close.
    pub fn stat(&self) -> FileStat {
        self.stat.clone()
    }

    /// Read from the current position into `buf`. Directories read as
    /// empty.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        if self.closed {
            return Err(FsError::InvalidOperation(format!(
                "read on closed handle: {}",
                self.path
            )));
        }
        match &mut self.inner {
            FileInner::Bytes(cursor) => {
                Read::read(cursor, buf).map_err(|e| FsError::Io(e.to_string()))
            }
            FileInner::File(file) => file.read(buf).await.map_err(|e| FsError::Io(e.to_string())),
            FileInner::LocalDir(_) => Ok(0),
            FileInner::Released => Err(FsError::InvalidOperation(format!(
                "read on closed handle: {}",
                self.path
            ))),
        }
    }

    /// Read everything from the current position to the end.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>, FsError> {
        let mut out = Vec::new();
        loop {
            let mut buf = [0u8; 8192];
            let n = self.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(out)
    }

    /// Reposition the read cursor. Not valid on directories.
    pub async fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        if self.closed {
            return Err(FsError::InvalidOperation(format!(
                "seek on closed handle: {}",
                self.path
            )));
        }
        if self.stat.is_dir {
            return Err(FsError::InvalidOperation(format!(
                "seek on directory: {}",
                self.path
            )));
        }
        match &mut self.inner {
            FileInner::Bytes(cursor) => {
                Seek::seek(cursor, pos).map_err(|e| FsError::Io(e.to_string()))
            }
            FileInner::File(file) => file.seek(pos).await.map_err(|e| FsError::Io(e.to_string())),
            FileInner::LocalDir(_) | FileInner::Released => Err(FsError::InvalidOperation(
                format!("seek on closed handle: {}", self.path),
            )),
        }
    }

    /// Release transient resources. Idempotent; repeated calls are
    /// no-ops. Read and seek fail afterwards, stat and readdir do not:
    /// listings and metadata are not transient.
    pub fn close(&mut self) {
        if matches!(self.inner, FileInner::File(_)) {
            self.inner = FileInner::Released;
        }
        self.closed = true;
    }

    /// List a directory.
    ///
    /// The full child list is derived on every call and truncated to
    /// `count`; no cursor state is kept, so repeated calls return the
    /// same entries. `count <= 0` means the whole list. A positive
    /// count on an empty directory returns `EndOfListing`.
    pub async fn readdir(&self, count: isize) -> Result<Vec<FileStat>, FsError> {
        if !self.stat.is_dir {
            return Err(FsError::InvalidOperation(format!(
                "not a directory: {}",
                self.path
            )));
        }

        let all: Vec<FileStat> = match &self.inner {
            FileInner::LocalDir(dir) => host_listing(dir).await?,
            _ => {
                let registry = self
                    .registry
                    .as_ref()
                    .ok_or_else(|| FsError::MissingListing(self.path.clone()))?;
                match registry.listing(&self.path) {
                    Some(children) => children.iter().map(|r| r.stat()).collect(),
                    None => return Err(FsError::MissingListing(self.path.clone())),
                }
            }
        };

        if all.is_empty() && count > 0 {
            return Err(FsError::EndOfListing);
        }
        let take = if count <= 0 || count as usize >= all.len() {
            all.len()
        } else {
            count as usize
        };
        Ok(all[..take].to_vec())
    }
}

/// Snapshot of a host directory, sorted by name for stable output.
async fn host_listing(dir: &Path) -> Result<Vec<FileStat>, FsError> {
    let mut rd = tokio::fs::read_dir(dir).await.map_err(|e| host_error(dir, e))?;
    let mut out = Vec::new();
    while let Some(entry) = rd.next_entry().await.map_err(|e| host_error(dir, e))? {
        let meta = entry
            .metadata()
            .await
            .map_err(|e| host_error(&entry.path(), e))?;
        out.push(FileStat {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir: meta.is_dir(),
        });
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}
