//! schemafs: an embedded read-only virtual filesystem for compiled
//! schema assets.
//!
//! A build-time packer walks a set of schema documents and emits a
//! compiled table: gzip payloads carried as base64 text plus the
//! metadata needed to serve them. This crate is the runtime half:
//!
//! - **AssetRegistry**: the validated, immutable form of one table
//! - **SchemaFs**: open/read over a registry, embedded or local mode,
//!   with optional subtree mounts
//! - **SchemaFile**: seekable handles with stat and snapshot directory
//!   listings
//!
//! Payloads decode lazily and exactly once per asset; the bytes and any
//! decode failure are both memoized. Local mode serves the same logical
//! paths from real files for fast edit loops, bypassing payloads
//! entirely.

mod backend;
mod error;
mod fs;
mod handle;
mod materialize;
mod path;
mod registry;
mod table;

#[cfg(test)]
mod testutil;

pub use backend::{EmbeddedBackend, LocalBackend, SchemaBackend};
pub use error::{FsError, TableError};
pub use fs::{FsOptions, SchemaFs};
pub use handle::{FileStat, SchemaFile};
pub use path::canonicalize;
pub use registry::{AssetRecord, AssetRegistry};
pub use table::{TABLE_VERSION, TableDoc, TableEntry};
