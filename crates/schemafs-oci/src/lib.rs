//! Container image schema documents, compiled in and served through
//! [`schemafs`].
//!
//! The table in `src/table.json` is emitted by the schema packer from
//! the JSON Schema sources; regenerate it there rather than editing it.
//! Shipped documents:
//!
//! - `/image-manifest-schema.json`: image manifest
//! - `/image-index-schema.json`: image index
//! - `/image-layout-schema.json`: layout marker
//! - `/config-schema.json`: image configuration
//! - `/content-descriptor.json`: content descriptors
//! - `/defs.json`, `/defs-descriptor.json`: shared definitions
//!
//! ```no_run
//! # async fn demo() -> Result<(), schemafs::FsError> {
//! let manifest = schemafs_oci::read_string("/image-manifest-schema.json").await?;
//! # Ok(()) }
//! ```

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use schemafs::{AssetRegistry, FsError, SchemaFs};

static TABLE: &str = include_str!("table.json");

/// Registry over the compiled table. Built on first use, shared after.
pub fn registry() -> Arc<AssetRegistry> {
    static REGISTRY: OnceLock<Arc<AssetRegistry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| {
            Arc::new(AssetRegistry::from_json(TABLE).expect("shipped schema table is malformed"))
        })
        .clone()
}

/// Embedded filesystem over the shipped schemas.
pub fn filesystem() -> SchemaFs {
    SchemaFs::embedded(registry())
}

/// Local-mode filesystem resolving the schema sources under `root`.
pub fn local_filesystem(root: impl Into<PathBuf>) -> SchemaFs {
    SchemaFs::local(registry(), root)
}

/// One-shot read of a shipped schema document.
pub async fn read(path: &str) -> Result<Vec<u8>, FsError> {
    filesystem().read(path).await
}

/// One-shot read of a shipped schema document as UTF-8 text.
pub async fn read_string(path: &str) -> Result<String, FsError> {
    filesystem().read_to_string(path).await
}
