//! Compiled asset table format.
//!
//! A table is a JSON document emitted by the asset packer at build time
//! and embedded into a data crate. The layout is a compatibility
//! boundary: field names and meanings must stay stable so old tables
//! remain readable.

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Format version this crate reads and writes.
pub const TABLE_VERSION: u64 = 1;

/// The table document: format version plus one entry per asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDoc {
    pub version: u64,
    pub entries: Vec<TableEntry>,
}

/// One persisted asset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    /// Canonical slash-rooted path; the lookup key.
    pub path: String,
    /// Relative path used in local mode (`.` for the root).
    #[serde(default)]
    pub local_source_path: String,
    /// Decompressed length; 0 for directories and empty files.
    pub declared_size: i64,
    /// Modification time, seconds since the Unix epoch.
    pub mod_time_epoch_sec: i64,
    /// Whether this entry is a directory.
    pub is_directory: bool,
    /// Base64 text of the gzip-compressed content. Absent when
    /// `declared_size` is 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl TableDoc {
    /// Parse a compiled table document, checking the format version.
    pub fn parse(json: &str) -> Result<Self, TableError> {
        let doc: TableDoc = serde_json::from_str(json)?;
        if doc.version != TABLE_VERSION {
            return Err(TableError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }
}

impl TableEntry {
    /// Directory entry.
    pub fn directory(
        path: impl Into<String>,
        local_source_path: impl Into<String>,
        mod_time_epoch_sec: i64,
    ) -> Self {
        Self {
            path: path.into(),
            local_source_path: local_source_path.into(),
            declared_size: 0,
            mod_time_epoch_sec,
            is_directory: true,
            payload: None,
        }
    }

    /// File entry carrying a compressed payload.
    pub fn file(
        path: impl Into<String>,
        local_source_path: impl Into<String>,
        declared_size: u64,
        mod_time_epoch_sec: i64,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            local_source_path: local_source_path.into(),
            declared_size: declared_size as i64,
            mod_time_epoch_sec,
            is_directory: false,
            payload: Some(payload.into()),
        }
    }

    /// Zero-length file entry; carries no payload.
    pub fn empty_file(
        path: impl Into<String>,
        local_source_path: impl Into<String>,
        mod_time_epoch_sec: i64,
    ) -> Self {
        Self {
            path: path.into(),
            local_source_path: local_source_path.into(),
            declared_size: 0,
            mod_time_epoch_sec,
            is_directory: false,
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_table() {
        let json = r#"{
            "version": 1,
            "entries": [
                {"path": "/", "localSourcePath": ".", "declaredSize": 0,
                 "modTimeEpochSec": 1700000000, "isDirectory": true},
                {"path": "/a.json", "localSourcePath": "a.json", "declaredSize": 2,
                 "modTimeEpochSec": 1700000001, "isDirectory": false, "payload": "abcd"}
            ]
        }"#;
        let doc = TableDoc::parse(json).unwrap();
        assert_eq!(doc.version, 1);
        assert_eq!(doc.entries.len(), 2);
        assert!(doc.entries[0].is_directory);
        assert_eq!(doc.entries[1].payload.as_deref(), Some("abcd"));
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let json = r#"{"version": 99, "entries": []}"#;
        let err = TableDoc::parse(json).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedVersion(99)));
    }

    #[test]
    fn test_entry_field_spelling_is_stable() {
        // The serialized field names are the compatibility boundary.
        let entry = TableEntry::file("/a.json", "a.json", 2, 1700000000, "abcd");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"localSourcePath\""));
        assert!(json.contains("\"declaredSize\""));
        assert!(json.contains("\"modTimeEpochSec\""));
        assert!(json.contains("\"isDirectory\""));
    }

    #[test]
    fn test_directory_entry_omits_payload() {
        let entry = TableEntry::directory("/", ".", 1700000000);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("payload"));
    }
}
