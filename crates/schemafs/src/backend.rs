//! Storage backends behind the facade.
//!
//! `SchemaBackend` is the strategy seam selected once at construction:
//! `EmbeddedBackend` serves materialized table payloads, `LocalBackend`
//! serves the same logical paths from real files for development loops.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use tracing::trace;

use crate::error::{FsError, host_error};
use crate::handle::{FileStat, SchemaFile};
use crate::registry::AssetRegistry;

/// Read-only source of assets, keyed by canonical path.
#[async_trait]
pub trait SchemaBackend: Send + Sync {
    /// Open a handle at a canonical path.
    async fn open(&self, canonical: &str) -> Result<SchemaFile, FsError>;
}

/// Serves assets from the compiled table.
pub struct EmbeddedBackend {
    registry: Arc<AssetRegistry>,
}

impl EmbeddedBackend {
    pub fn new(registry: Arc<AssetRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SchemaBackend for EmbeddedBackend {
    async fn open(&self, canonical: &str) -> Result<SchemaFile, FsError> {
        let record = self
            .registry
            .lookup(canonical)
            .ok_or_else(|| FsError::NotFound(canonical.to_string()))?;
        let bytes = record.materialize().await?;
        trace!(path = canonical, "opened embedded asset");
        Ok(SchemaFile::embedded(record, bytes, self.registry.clone()))
    }
}

/// Serves table paths from real files under a root directory.
///
/// The table still decides what exists: a path absent from it is
/// NotFound even when a matching host file is present. Payloads are
/// never consulted.
pub struct LocalBackend {
    registry: Arc<AssetRegistry>,
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(registry: Arc<AssetRegistry>, root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            root: root.into(),
        }
    }
}

#[async_trait]
impl SchemaBackend for LocalBackend {
    async fn open(&self, canonical: &str) -> Result<SchemaFile, FsError> {
        let record = self
            .registry
            .lookup(canonical)
            .ok_or_else(|| FsError::NotFound(canonical.to_string()))?;
        let host = self.root.join(record.local_source_path());

        let meta = tokio::fs::metadata(&host).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FsError::NotFound(canonical.to_string())
            } else {
                host_error(&host, e)
            }
        })?;
        let stat = FileStat {
            name: record.name().to_string(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir: meta.is_dir(),
        };

        trace!(path = canonical, host = %host.display(), "opened local asset");
        if meta.is_dir() {
            Ok(SchemaFile::local_dir(canonical, stat, host))
        } else {
            let file = tokio::fs::File::open(&host)
                .await
                .map_err(|e| host_error(&host, e))?;
            Ok(SchemaFile::local_file(canonical, stat, file))
        }
    }
}
