//! Single-file snapshot of the embedding table.
//!
//! The file is one `rkyv` archive of [`EmbeddingSnapshot`]. Reads go through a read-only
//! memory map and are validated before deserializing; writes land in a temp file in the same
//! directory and are renamed over the target.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;
use rkyv::{Archive, Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::CachedEmbedding;
use super::error::{CacheError, CacheResult};
use crate::constants::SNAPSHOT_VERSION;
use crate::hashing::TextFingerprint;

/// One persisted table row.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct SnapshotEntry {
    pub id: String,
    /// BLAKE3 fingerprint of the text the vector was computed from.
    pub fingerprint: TextFingerprint,
    pub vector: Vec<f32>,
}

/// Whole-table snapshot.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct EmbeddingSnapshot {
    pub version: u32,
    pub embedding_dim: u32,
    pub entries: Vec<SnapshotEntry>,
}

impl EmbeddingSnapshot {
    /// Copies a table into a snapshot (rows sorted by id).
    pub(crate) fn from_table(embedding_dim: usize, table: &HashMap<String, CachedEmbedding>) -> Self {
        let mut entries: Vec<SnapshotEntry> = table
            .iter()
            .map(|(id, cached)| SnapshotEntry {
                id: id.clone(),
                fingerprint: cached.fingerprint,
                vector: cached.vector.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            version: SNAPSHOT_VERSION,
            embedding_dim: embedding_dim as u32,
            entries,
        }
    }
}

/// Reads a snapshot written for `embedding_dim`-dimensional vectors. `Ok(None)` when the file
/// does not exist.
pub fn read_snapshot(
    path: &Path,
    embedding_dim: usize,
) -> CacheResult<Option<EmbeddingSnapshot>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if file.metadata()?.len() == 0 {
        return Err(CacheError::InvalidSnapshot("file is empty".to_string()));
    }

    // SAFETY: The map is read-only and dropped before this function returns. Writers never
    // modify the file in place; they rename a new file over it.
    let mmap = unsafe { Mmap::map(&file)? };

    let snapshot = rkyv::from_bytes::<EmbeddingSnapshot, RkyvError>(&mmap)
        .map_err(|e| CacheError::InvalidSnapshot(e.to_string()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CacheError::InvalidSnapshot(format!(
            "unsupported version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    if snapshot.embedding_dim as usize != embedding_dim {
        return Err(CacheError::InvalidSnapshot(format!(
            "snapshot holds {}-dimensional vectors (expected {})",
            snapshot.embedding_dim, embedding_dim
        )));
    }

    Ok(Some(snapshot))
}

/// Atomically replaces `path` with `snapshot`.
pub fn write_snapshot(path: &Path, snapshot: &EmbeddingSnapshot) -> CacheResult<u64> {
    let bytes = rkyv::to_bytes::<RkyvError>(snapshot)
        .map_err(|e| CacheError::Serialization(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CacheError::Io(e.error))?;

    Ok(bytes.len() as u64)
}
