//! Snapshot persistence for the vector index.
//!
//! A snapshot is a directory holding two JSON files:
//!
//! ```text
//! {index_path}/
//! ├── meta.json    # format version, metric, dimension, counts, timestamps
//! └── index.json   # entries: id, vector, chunk metadata
//! ```
//!
//! Each file is written to a `.tmp` sibling and renamed into place.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{DocMindError, Result};
use crate::core::storage::vector_index::{IndexEntry, Metric, VectorIndex};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

const META_FILE: &str = "meta.json";
const INDEX_FILE: &str = "index.json";

/// Snapshot metadata (meta.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub format_version: u32,
    pub metric: Metric,
    pub dimension: Option<usize>,
    pub entries: usize,
    pub next_id: u64,
    pub created_at: DateTime<Utc>,
    pub persisted_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotBody {
    entries: Vec<IndexEntry>,
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn corrupt(path: &Path, reason: impl Into<String>) -> DocMindError {
    DocMindError::IndexCorrupt {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Whether a snapshot exists at `path`
pub fn snapshot_exists(path: &Path) -> bool {
    path.join(INDEX_FILE).is_file()
}

/// Read only the metadata of a snapshot
pub fn read_meta(path: &Path) -> Result<SnapshotMeta> {
    if !snapshot_exists(path) {
        return Err(DocMindError::IndexNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path.join(META_FILE))
        .map_err(|e| corrupt(path, format!("cannot read {}: {}", META_FILE, e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| corrupt(path, format!("invalid {}: {}", META_FILE, e)))
}

/// Delete the snapshot at `path`; returns false if there was none.
///
/// Only snapshot files are removed. The directory itself goes only
/// if nothing else is left in it.
pub fn delete_snapshot(path: &Path) -> Result<bool> {
    if !snapshot_exists(path) {
        return Ok(false);
    }

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == INDEX_FILE || name == META_FILE || name.ends_with(".json.tmp") {
            fs::remove_file(entry.path())?;
        }
    }

    if fs::read_dir(path)?.next().is_none() {
        fs::remove_dir(path)?;
    }

    info!("Deleted index snapshot at {}", path.display());
    Ok(true)
}

impl VectorIndex {
    /// Write a snapshot of the index to the directory `path`
    pub fn persist(&self, path: &Path) -> Result<SnapshotMeta> {
        fs::create_dir_all(path)?;

        let meta = SnapshotMeta {
            format_version: SNAPSHOT_VERSION,
            metric: self.metric,
            dimension: self.dimension,
            entries: self.entries.len(),
            next_id: self.next_id,
            created_at: self.created_at,
            persisted_at: Utc::now(),
        };

        // Body before meta: meta never describes entries missing from disk
        let body = serde_json::to_vec(&SnapshotBodyRef {
            entries: &self.entries,
        })?;
        write_atomic(&path.join(INDEX_FILE), &body)?;
        write_atomic(&path.join(META_FILE), &serde_json::to_vec_pretty(&meta)?)?;

        debug!(
            "Persisted {} entries ({} bytes) to {}",
            meta.entries,
            body.len(),
            path.display()
        );
        Ok(meta)
    }

    /// Load a snapshot written by [`VectorIndex::persist`]
    pub fn load(path: &Path) -> Result<Self> {
        let meta = read_meta(path)?;
        if meta.format_version != SNAPSHOT_VERSION {
            return Err(corrupt(
                path,
                format!(
                    "unsupported format version {} (expected {})",
                    meta.format_version, SNAPSHOT_VERSION
                ),
            ));
        }

        let contents = fs::read_to_string(path.join(INDEX_FILE))
            .map_err(|e| corrupt(path, format!("cannot read {}: {}", INDEX_FILE, e)))?;
        let body: SnapshotBody = serde_json::from_str(&contents)
            .map_err(|e| corrupt(path, format!("invalid {}: {}", INDEX_FILE, e)))?;

        check_consistency(path, &meta, &body.entries)?;

        Ok(Self {
            metric: meta.metric,
            dimension: meta.dimension,
            entries: body.entries,
            next_id: meta.next_id,
            created_at: meta.created_at,
        })
    }
}

#[derive(Serialize)]
struct SnapshotBodyRef<'a> {
    entries: &'a [IndexEntry],
}

fn check_consistency(path: &Path, meta: &SnapshotMeta, entries: &[IndexEntry]) -> Result<()> {
    if entries.len() != meta.entries {
        return Err(corrupt(
            path,
            format!(
                "meta.json lists {} entries, index.json has {}",
                meta.entries,
                entries.len()
            ),
        ));
    }

    match meta.dimension {
        None if !entries.is_empty() => {
            return Err(corrupt(path, "entries present but no dimension recorded"));
        }
        Some(0) => return Err(corrupt(path, "dimension is 0")),
        _ => {}
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if Some(entry.vector.len()) != meta.dimension {
            return Err(corrupt(
                path,
                format!(
                    "entry {} has {} dimensions, expected {:?}",
                    entry.id,
                    entry.vector.len(),
                    meta.dimension
                ),
            ));
        }
        if entry.id >= meta.next_id {
            return Err(corrupt(
                path,
                format!("entry id {} is not below next_id {}", entry.id, meta.next_id),
            ));
        }
        if !seen.insert(entry.id) {
            return Err(corrupt(path, format!("duplicate entry id {}", entry.id)));
        }
    }

    Ok(())
}
