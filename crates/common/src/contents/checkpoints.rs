//! Checkpoint naming and directory scanning, shared by the bundle engine and
//! the passthrough backend.
//!
//! A checkpoint is a copy of a document's primary file, stored under a
//! reserved `.checkpoints` directory as `<stem>---<id><ext>`. The id is the
//! creation time at second resolution, which sorts lexicographically. This
//! layout is load-bearing: existing stores are read in place, so it must not
//! change shape.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::Result;
use super::model::Checkpoint;
use super::path::split_extension;

/// Reserved subdirectory holding checkpoint snapshots.
pub const CHECKPOINT_DIR: &str = ".checkpoints";

const ID_SEPARATOR: &str = "---";

/// Sortable second-resolution id for a checkpoint created now.
pub fn new_checkpoint_id() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Snapshot filename for `doc_name` at checkpoint `id`.
pub fn checkpoint_filename(doc_name: &str, id: &str) -> String {
    let (stem, ext) = split_extension(doc_name);
    format!("{stem}{ID_SEPARATOR}{id}{ext}")
}

/// Full path of a snapshot inside `dir`.
pub fn checkpoint_path(dir: &Path, doc_name: &str, id: &str) -> PathBuf {
    dir.join(checkpoint_filename(doc_name, id))
}

/// All checkpoints for `doc_name` under `dir`, oldest first.
///
/// A missing checkpoint directory is an empty listing, not an error.
pub fn scan(dir: &Path, doc_name: &str) -> Result<Vec<Checkpoint>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let (stem, ext) = split_extension(doc_name);
    let prefix = format!("{stem}{ID_SEPARATOR}");

    let mut checkpoints = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(rest) = file_name.strip_prefix(&prefix) else {
            continue;
        };
        let Some(id) = rest.strip_suffix(ext) else {
            continue;
        };
        let last_modified = file_mtime(&entry.path())?;
        checkpoints.push(Checkpoint {
            id: id.to_string(),
            last_modified,
        });
    }
    // ids are second-resolution timestamps, so name order is time order
    checkpoints.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(checkpoints)
}

/// Modification time of a file as UTC.
pub fn file_mtime(path: &Path) -> Result<DateTime<Utc>> {
    let meta = fs::metadata(path)?;
    let modified = meta.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}
