//! On-disk format of the index.
//!
//! Vector file: little-endian `u32` entry count `N`, `u32` dimension `D`,
//! then `N * D` little-endian `f32` values in entry order. No padding,
//! magic or version.
//!
//! Metadata file: pretty-printed JSON array of `{id, source, content}`
//! records in the same order.

use crate::error::IoError;
use crate::types::Document;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const HEADER_LEN: usize = 8;
const FLOAT_LEN: usize = 4;

/// Encode vectors that all have length `dimension`.
pub(crate) fn encode_vectors<'a, I>(
    vectors: I,
    count: usize,
    dimension: usize,
    path: &Path,
) -> Result<Vec<u8>, IoError>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let too_large = |what: &str| IoError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("{} does not fit in a u32", what),
    };
    let n = u32::try_from(count).map_err(|_| too_large("entry count"))?;
    let d = u32::try_from(dimension).map_err(|_| too_large("dimension"))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + count * dimension * FLOAT_LEN);
    bytes.extend_from_slice(&n.to_le_bytes());
    bytes.extend_from_slice(&d.to_le_bytes());
    for vector in vectors {
        for value in vector {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    Ok(bytes)
}

/// Decode a vector file into `(dimension, vectors)`.
pub(crate) fn decode_vectors(bytes: &[u8], path: &Path) -> Result<(usize, Vec<Vec<f32>>), IoError> {
    let corrupt = |reason: String| IoError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    if bytes.len() < HEADER_LEN {
        return Err(corrupt(format!(
            "file is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let dimension = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

    if count == 0 {
        return Err(corrupt("index has no entries".to_string()));
    }
    if dimension == 0 {
        return Err(corrupt(format!("{} entries with dimension 0", count)));
    }

    let expected = count
        .checked_mul(dimension)
        .and_then(|floats| floats.checked_mul(FLOAT_LEN))
        .and_then(|body| body.checked_add(HEADER_LEN))
        .ok_or_else(|| corrupt(format!("header {} x {} overflows", count, dimension)))?;

    if bytes.len() != expected {
        return Err(corrupt(format!(
            "expected {} bytes for {} x {} floats, found {}",
            expected,
            count,
            dimension,
            bytes.len()
        )));
    }

    let values: Vec<f32> = bytes[HEADER_LEN..]
        .chunks_exact(FLOAT_LEN)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let vectors = values.chunks(dimension).map(<[f32]>::to_vec).collect();

    Ok((dimension, vectors))
}

pub(crate) fn encode_metadata<'a, I>(documents: I, path: &Path) -> Result<Vec<u8>, IoError>
where
    I: IntoIterator<Item = &'a Document>,
{
    let records: Vec<&Document> = documents.into_iter().collect();
    serde_json::to_vec_pretty(&records).map_err(|e| IoError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("failed to serialize metadata: {}", e),
    })
}

pub(crate) fn decode_metadata(bytes: &[u8], path: &Path) -> Result<Vec<Document>, IoError> {
    serde_json::from_slice(bytes).map_err(|e| IoError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("invalid metadata JSON: {}", e),
    })
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    std::fs::read(path).map_err(|source| IoError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| IoError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp_path = tmp_path(path);
    std::fs::write(&tmp_path, bytes).map_err(|source| IoError::WriteFailed {
        path: tmp_path.clone(),
        source,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|source| IoError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("index"));
    name.push(".tmp");
    path.with_file_name(name)
}
