//! Integration tests over the shipped schema table.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use schemafs::FsError;

const SCHEMA_PATHS: [&str; 7] = [
    "/config-schema.json",
    "/content-descriptor.json",
    "/defs-descriptor.json",
    "/defs.json",
    "/image-index-schema.json",
    "/image-layout-schema.json",
    "/image-manifest-schema.json",
];

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("schemafs-oci-test-{}-{}", std::process::id(), id))
}

async fn cleanup(dir: &Path) {
    let _ = tokio::fs::remove_dir_all(dir).await;
}

// ============================================================================
// Shipped table
// ============================================================================

#[test]
fn shipped_table_builds() {
    let reg = schemafs_oci::registry();
    // Seven documents plus the root directory.
    assert_eq!(reg.len(), 8);
    assert!(reg.lookup("/").unwrap().is_directory());
}

#[test]
fn shipped_registry_is_shared() {
    let a = schemafs_oci::registry();
    let b = schemafs_oci::registry();
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn every_schema_decodes_to_its_declared_size() {
    let fs = schemafs_oci::filesystem();
    for path in SCHEMA_PATHS {
        let stat = fs.open(path).await.unwrap().stat();
        let bytes = fs.read(path).await.unwrap();
        assert_eq!(bytes.len() as u64, stat.size, "size of {path}");
        assert!(!bytes.is_empty(), "{path} is empty");
    }
}

#[tokio::test]
async fn every_schema_parses_as_json() {
    for path in SCHEMA_PATHS {
        let bytes = schemafs_oci::read(path).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value.is_object(), "{path} is not a JSON object");
    }
}

#[tokio::test]
async fn root_listing_is_complete_and_ordered() {
    let fs = schemafs_oci::filesystem();
    let root = fs.open("/").await.unwrap();
    let names: Vec<_> = root
        .readdir(-1)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();

    let expected: Vec<_> = SCHEMA_PATHS
        .iter()
        .map(|p| p.trim_start_matches('/').to_string())
        .collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn missing_schema_is_not_found() {
    let err = schemafs_oci::read("/missing.json").await.unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
}

// ============================================================================
// Document content
// ============================================================================

#[tokio::test]
async fn defs_schema_defines_shared_integer_types() {
    let defs = schemafs_oci::read_string("/defs.json").await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&defs).unwrap();
    let definitions = value.get("definitions").unwrap();
    for name in ["int8", "int16", "int32", "int64"] {
        assert!(definitions.get(name).is_some(), "missing definition {name}");
    }
}

#[tokio::test]
async fn manifest_schema_pins_schema_version_two() {
    let manifest = schemafs_oci::read_string("/image-manifest-schema.json")
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    let version = value
        .get("properties")
        .and_then(|p| p.get("schemaVersion"))
        .unwrap();
    assert_eq!(version.get("minimum"), version.get("maximum"));
}

// ============================================================================
// Local mode
// ============================================================================

#[tokio::test]
async fn local_mode_serves_edited_sources() {
    let root = temp_dir();
    tokio::fs::create_dir_all(&root).await.unwrap();
    tokio::fs::write(root.join("defs.json"), b"{\"definitions\": {}}")
        .await
        .unwrap();

    let fs = schemafs_oci::local_filesystem(&root);
    assert_eq!(
        fs.read("/defs.json").await.unwrap(),
        b"{\"definitions\": {}}"
    );

    cleanup(&root).await;
}
