//! Filesystem facade.
//!
//! `SchemaFs` binds a registry to one backend, chosen at construction,
//! and optionally rewrites every path under a mount prefix so a subtree
//! of the table appears as the root. Callers never see which backend is
//! underneath.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::{EmbeddedBackend, LocalBackend, SchemaBackend};
use crate::error::FsError;
use crate::handle::SchemaFile;
use crate::path::{canonicalize, join};
use crate::registry::AssetRegistry;

/// Construction options: backing mode plus an optional mount prefix.
#[derive(Debug, Clone)]
pub struct FsOptions {
    /// Read real files under `local_root` instead of embedded payloads.
    pub use_local: bool,
    /// Root directory resolved against in local mode.
    pub local_root: PathBuf,
    /// Expose only this subtree, as if it were the root.
    pub mount: Option<String>,
}

impl Default for FsOptions {
    fn default() -> Self {
        Self {
            use_local: false,
            local_root: PathBuf::from("."),
            mount: None,
        }
    }
}

/// Virtual filesystem over one asset registry.
#[derive(Clone)]
pub struct SchemaFs {
    backend: Arc<dyn SchemaBackend>,
    mount: String,
}

impl SchemaFs {
    /// Facade over `registry` configured by `options`.
    pub fn with_options(registry: Arc<AssetRegistry>, options: FsOptions) -> Self {
        let backend: Arc<dyn SchemaBackend> = if options.use_local {
            Arc::new(LocalBackend::new(registry, options.local_root))
        } else {
            Arc::new(EmbeddedBackend::new(registry))
        };
        let mount = options.mount.as_deref().map(normalize_mount).unwrap_or_default();
        Self { backend, mount }
    }

    /// Embedded-mode facade over `registry`.
    pub fn embedded(registry: Arc<AssetRegistry>) -> Self {
        Self::with_options(registry, FsOptions::default())
    }

    /// Local-mode facade resolving table paths under `root`.
    pub fn local(registry: Arc<AssetRegistry>, root: impl Into<PathBuf>) -> Self {
        Self::with_options(
            registry,
            FsOptions {
                use_local: true,
                local_root: root.into(),
                mount: None,
            },
        )
    }

    /// View of a subtree, exposed as if it were the root.
    ///
    /// Pure path rewriting over the same backend; views compose, and
    /// `subtree("/")` is the identity.
    pub fn subtree(&self, prefix: &str) -> Self {
        Self {
            backend: self.backend.clone(),
            mount: normalize_mount(&format!("{}/{}", self.mount, prefix)),
        }
    }

    /// Open a handle. The path is canonicalized (and mount-prefixed)
    /// before lookup, so any spelling of the same path works.
    pub async fn open(&self, path: &str) -> Result<SchemaFile, FsError> {
        let canonical = if self.mount.is_empty() {
            canonicalize(path)
        } else {
            join(&self.mount, path)
        };
        self.backend.open(&canonical).await
    }

    /// One-shot read of a whole asset.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let mut file = self.open(path).await?;
        file.read_to_end().await
    }

    /// One-shot read of a whole asset as UTF-8 text.
    pub async fn read_to_string(&self, path: &str) -> Result<String, FsError> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|e| FsError::Utf8(e.to_string()))
    }
}

/// Canonical mount prefix; the root collapses to the empty prefix.
fn normalize_mount(prefix: &str) -> String {
    match canonicalize(prefix) {
        p if p == "/" => String::new(),
        p => p,
    }
}
