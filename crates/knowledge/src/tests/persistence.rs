//! Save and load of the persisted index.

use super::{documents, index_in};
use crate::error::IoError;
use crate::types::{approx_eq, DEFAULT_TOLERANCE};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_round_trip() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index
        .build(
            documents(&["cats are mammals", "the sky is blue"]),
            vec![vec![0.25, -1.5, 3.0], vec![1e-7, 0.0, -0.5]],
        )
        .unwrap();
    index.save_to_disk().unwrap();

    let mut loaded = index_in(&temp);
    loaded.load_from_disk().unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.dimension(), 3);
    for (original, restored) in index.entries().iter().zip(loaded.entries()) {
        assert_eq!(original.document, restored.document);
        assert!(approx_eq(
            &original.embedding,
            &restored.embedding,
            DEFAULT_TOLERANCE
        ));
    }
}

#[test]
fn test_vector_file_layout() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index
        .build(documents(&["a"]), vec![vec![1.0, 2.0]])
        .unwrap();
    index.save_to_disk().unwrap();

    let bytes = fs::read(&index.paths().vectors).unwrap();
    assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &1.0f32.to_le_bytes());
    assert_eq!(&bytes[12..16], &2.0f32.to_le_bytes());
    assert_eq!(bytes.len(), 16);

    let metadata: serde_json::Value =
        serde_json::from_slice(&fs::read(&index.paths().metadata).unwrap()).unwrap();
    assert_eq!(metadata[0]["id"], "doc-0");
    assert_eq!(metadata[0]["source"], "data/a.txt");
    assert_eq!(metadata[0]["content"], "a");
}

#[test]
fn test_count_mismatch() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index
        .build(documents(&["a", "b"]), vec![vec![1.0], vec![2.0]])
        .unwrap();
    index.save_to_disk().unwrap();

    fs::write(
        &index.paths().metadata,
        r#"[{"id": "doc-0", "source": "data/a.txt", "content": "a"}]"#,
    )
    .unwrap();

    let mut loaded = index_in(&temp);
    let err = loaded.load_from_disk().unwrap_err();
    assert!(matches!(
        err,
        IoError::CountMismatch {
            metadata: 1,
            vectors: 2
        }
    ));
    assert!(loaded.is_empty());
}

#[test]
fn test_truncated_vector_file() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index
        .build(documents(&["a", "b"]), vec![vec![1.0, 0.0], vec![0.0, 1.0]])
        .unwrap();
    index.save_to_disk().unwrap();

    let bytes = fs::read(&index.paths().vectors).unwrap();
    fs::write(&index.paths().vectors, &bytes[..bytes.len() - 3]).unwrap();

    let mut loaded = index_in(&temp);
    assert!(matches!(
        loaded.load_from_disk(),
        Err(IoError::Corrupt { .. })
    ));
    assert!(loaded.is_empty());
    assert_eq!(loaded.dimension(), 0);
}

#[test]
fn test_zero_dimension_header_rejected() {
    let temp = TempDir::new().unwrap();
    let index = index_in(&temp);
    fs::create_dir_all(temp.path().join("artifacts")).unwrap();

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    fs::write(&index.paths().vectors, bytes).unwrap();
    fs::write(&index.paths().metadata, "[]").unwrap();

    let mut loaded = index_in(&temp);
    assert!(matches!(
        loaded.load_from_disk(),
        Err(IoError::Corrupt { .. })
    ));
}

#[test]
fn test_empty_index_files_rejected() {
    let temp = TempDir::new().unwrap();
    let index = index_in(&temp);
    fs::create_dir_all(temp.path().join("artifacts")).unwrap();

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    fs::write(&index.paths().vectors, bytes).unwrap();
    fs::write(&index.paths().metadata, "[]").unwrap();

    let mut loaded = index_in(&temp);
    assert!(matches!(
        loaded.load_from_disk(),
        Err(IoError::Corrupt { .. })
    ));
    assert!(loaded.is_empty());
    assert_eq!(loaded.dimension(), 0);
}

#[test]
fn test_missing_files() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    assert!(!index.exists_on_disk());
    assert!(matches!(
        index.load_from_disk(),
        Err(IoError::OpenFailed { .. })
    ));
}

#[test]
fn test_invalid_metadata_json() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index.build(documents(&["a"]), vec![vec![1.0]]).unwrap();
    index.save_to_disk().unwrap();
    fs::write(&index.paths().metadata, "not json").unwrap();

    let mut loaded = index_in(&temp);
    assert!(matches!(
        loaded.load_from_disk(),
        Err(IoError::Corrupt { .. })
    ));
}

#[test]
fn test_load_replaces_previous_contents() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index.build(documents(&["a"]), vec![vec![1.0]]).unwrap();
    index.save_to_disk().unwrap();

    let mut other = index_in(&temp);
    other
        .build(documents(&["x", "y"]), vec![vec![1.0, 0.0], vec![0.0, 1.0]])
        .unwrap();
    other.load_from_disk().unwrap();

    assert_eq!(other.len(), 1);
    assert_eq!(other.dimension(), 1);
    assert_eq!(other.entries()[0].document.content, "a");
}

#[test]
fn test_no_temp_files_left_behind() {
    let temp = TempDir::new().unwrap();
    let mut index = index_in(&temp);
    index.build(documents(&["a"]), vec![vec![1.0]]).unwrap();
    index.save_to_disk().unwrap();

    let names: Vec<String> = fs::read_dir(temp.path().join("artifacts"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| !n.ends_with(".tmp")));
}
