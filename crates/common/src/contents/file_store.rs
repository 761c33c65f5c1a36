//! Flat-file storage: a thin primitive layer over a root directory, plus the
//! adapter that makes it satisfy the [`Backend`] contract.
//!
//! The bundle engine reuses [`FileStore`] for the ordinary files that live
//! next to bundles; [`PassthroughBackend`] is the standalone provider for
//! roots that hold conventional flat documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::backend::{Backend, ReadOptions};
use super::checkpoints::{self, CHECKPOINT_DIR};
use super::codec::{DocumentCodec, JsonCodec};
use super::error::{ContentsError, Result};
use super::model::{Checkpoint, Content, ContentModel, EntryType};
use super::path::{basename, join, parent, strip_slashes};

/// Plain-filesystem primitives rooted at a directory.
///
/// Owns its root exclusively; no other provider may point at an overlapping
/// root (validated at configuration time).
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    trash: Option<PathBuf>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            trash: None,
        }
    }

    /// Configure a trash directory, enabling delete.
    pub fn with_trash(mut self, trash: impl Into<PathBuf>) -> Self {
        self.trash = Some(trash.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Translate a backend-local path into a filesystem path under the root.
    ///
    /// Rejects `.` and `..` segments so a local path can never escape.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let path = strip_slashes(path);
        let mut os_path = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(ContentsError::Validation(format!(
                    "path segment not allowed: {path}"
                )));
            }
            os_path.push(segment);
        }
        Ok(os_path)
    }

    /// Move a file or directory into the trash, or fail with `Unsupported`
    /// when no trash directory is configured. Name collisions inside the
    /// trash get a timestamp suffix.
    pub fn discard(&self, os_path: &Path) -> Result<()> {
        let Some(trash) = &self.trash else {
            return Err(ContentsError::Unsupported(
                "delete requires a configured trash directory".to_string(),
            ));
        };
        fs::create_dir_all(trash)?;
        let name = os_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut target = trash.join(&name);
        if target.exists() {
            let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
            target = trash.join(format!("{name}---{stamp}"));
        }
        debug!(from = %os_path.display(), to = %target.display(), "discarding to trash");
        fs::rename(os_path, target)?;
        Ok(())
    }
}

/// `(created, last_modified)` for a filesystem entry, best effort.
pub(super) fn file_times(os_path: &Path) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let Ok(meta) = fs::metadata(os_path) else {
        return (None, None);
    };
    let created = meta.created().ok().map(DateTime::<Utc>::from);
    let modified = meta.modified().ok().map(DateTime::<Utc>::from);
    (created, modified)
}

/// Adapter exposing a [`FileStore`] root of conventional flat files through
/// the [`Backend`] contract. Files carrying the document extension surface
/// as notebooks; everything else is a plain file or directory.
pub struct PassthroughBackend {
    store: FileStore,
    extension: String,
    codec: Arc<dyn DocumentCodec>,
}

impl PassthroughBackend {
    pub fn new(store: FileStore, extension: impl Into<String>) -> Self {
        Self {
            store,
            extension: extension.into(),
            codec: Arc::new(JsonCodec),
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn DocumentCodec>) -> Self {
        self.codec = codec;
        self
    }

    fn entry_type(&self, os_path: &Path, name: &str) -> EntryType {
        if os_path.is_dir() {
            EntryType::Directory
        } else if name.ends_with(&self.extension) {
            EntryType::Notebook
        } else {
            EntryType::File
        }
    }

    fn base_model(&self, path: &str, entry_type: EntryType, os_path: &Path) -> ContentModel {
        let mut model = ContentModel::new(basename(path), path, entry_type);
        let (created, modified) = file_times(os_path);
        model.created = created;
        model.last_modified = modified;
        model
    }

    fn checkpoint_dir(&self, path: &str) -> Result<PathBuf> {
        let dir = join(parent(path), CHECKPOINT_DIR);
        self.store.resolve(&dir)
    }

    fn document_path(&self, path: &str) -> Result<PathBuf> {
        let os_path = self.store.resolve(path)?;
        if !os_path.is_file() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        Ok(os_path)
    }
}

impl Backend for PassthroughBackend {
    fn exists(&self, path: &str) -> bool {
        self.store
            .resolve(path)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.store
            .resolve(path)
            .map(|p| p.is_dir())
            .unwrap_or(false)
    }

    fn is_document(&self, path: &str) -> bool {
        basename(path).ends_with(&self.extension)
            && self
                .store
                .resolve(path)
                .map(|p| p.is_file())
                .unwrap_or(false)
    }

    fn list(&self, path: &str) -> Result<Vec<ContentModel>> {
        let os_path = self.store.resolve(path)?;
        if !os_path.is_dir() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        let mut dirs = Vec::new();
        let mut notebooks = Vec::new();
        let mut files = Vec::new();
        for entry in fs::read_dir(&os_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == CHECKPOINT_DIR {
                continue;
            }
            let child_path = join(path, &name);
            let child_os = entry.path();
            match self.entry_type(&child_os, &name) {
                EntryType::Directory => {
                    dirs.push(self.base_model(&child_path, EntryType::Directory, &child_os))
                }
                EntryType::Notebook => {
                    notebooks.push(self.base_model(&child_path, EntryType::Notebook, &child_os))
                }
                EntryType::File => {
                    files.push(self.base_model(&child_path, EntryType::File, &child_os))
                }
            }
        }
        for group in [&mut dirs, &mut notebooks, &mut files] {
            group.sort_by(|a, b| a.name.cmp(&b.name));
        }
        dirs.extend(notebooks);
        dirs.extend(files);
        Ok(dirs)
    }

    fn read(&self, path: &str, opts: ReadOptions) -> Result<ContentModel> {
        let os_path = self.store.resolve(path)?;
        if os_path.is_dir() {
            let mut model = self.base_model(path, EntryType::Directory, &os_path);
            model.content = Some(Content::Listing(self.list(path)?));
            model.format = Some("json".to_string());
            return Ok(model);
        }
        if !os_path.is_file() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        let entry_type = self.entry_type(&os_path, basename(path));
        let mut model = self.base_model(path, entry_type, &os_path);
        if opts.content {
            let bytes = fs::read(&os_path)?;
            model.content = Some(match entry_type {
                EntryType::Notebook => {
                    model.format = Some("json".to_string());
                    Content::Json(self.codec.decode(&bytes)?)
                }
                _ => {
                    model.format = Some("text".to_string());
                    Content::Text(String::from_utf8_lossy(&bytes).into_owned())
                }
            });
        }
        Ok(model)
    }

    fn write(&self, model: &ContentModel, path: &str) -> Result<ContentModel> {
        let os_path = self.store.resolve(path)?;
        if let Some(dir) = os_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let bytes = match &model.content {
            Some(Content::Json(value)) => self.codec.encode(value)?,
            Some(Content::Text(text)) => text.clone().into_bytes(),
            _ => {
                return Err(ContentsError::Validation(
                    "save payload has no document body".to_string(),
                ))
            }
        };
        debug!(path, "writing flat document");
        fs::write(&os_path, bytes)?;
        self.read(path, ReadOptions::default())
    }

    fn rename(&self, path: &str, new_path: &str) -> Result<ContentModel> {
        let os_path = self.document_path(path)?;
        let new_os_path = self.store.resolve(new_path)?;
        if new_os_path.exists() {
            return Err(ContentsError::Conflict(new_path.to_string()));
        }
        if let Some(dir) = new_os_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::rename(&os_path, &new_os_path)?;
        self.read(new_path, ReadOptions::default())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let os_path = self.store.resolve(path)?;
        if !os_path.exists() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        self.store.discard(&os_path)
    }

    fn create_checkpoint(&self, path: &str) -> Result<Checkpoint> {
        let os_path = self.document_path(path)?;
        let dir = self.checkpoint_dir(path)?;
        fs::create_dir_all(&dir)?;
        let id = checkpoints::new_checkpoint_id();
        let cp_path = checkpoints::checkpoint_path(&dir, basename(path), &id);
        fs::copy(&os_path, &cp_path)?;
        Ok(Checkpoint {
            last_modified: checkpoints::file_mtime(&cp_path)?,
            id,
        })
    }

    fn list_checkpoints(&self, path: &str) -> Result<Vec<Checkpoint>> {
        checkpoints::scan(&self.checkpoint_dir(path)?, basename(path))
    }

    fn restore_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()> {
        let dir = self.checkpoint_dir(path)?;
        let cp_path = checkpoints::checkpoint_path(&dir, basename(path), checkpoint_id);
        if !cp_path.is_file() {
            return Err(ContentsError::NotFound(format!(
                "checkpoint {checkpoint_id} for {path}"
            )));
        }
        let os_path = self.store.resolve(path)?;
        fs::copy(&cp_path, &os_path)?;
        Ok(())
    }

    fn delete_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()> {
        let dir = self.checkpoint_dir(path)?;
        let cp_path = checkpoints::checkpoint_path(&dir, basename(path), checkpoint_id);
        if !cp_path.is_file() {
            return Err(ContentsError::NotFound(format!(
                "checkpoint {checkpoint_id} for {path}"
            )));
        }
        fs::remove_file(cp_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = FileStore::new("/tmp/root");
        assert!(store.resolve("a/../b").is_err());
        assert!(store.resolve("..").is_err());
        assert_eq!(store.resolve("a/b").unwrap(), PathBuf::from("/tmp/root/a/b"));
    }

    #[test]
    fn test_discard_requires_trash() {
        let temp = tempfile::TempDir::new().unwrap();
        let victim = temp.path().join("doomed.txt");
        fs::write(&victim, b"x").unwrap();

        let store = FileStore::new(temp.path());
        assert!(matches!(
            store.discard(&victim),
            Err(ContentsError::Unsupported(_))
        ));

        let store = FileStore::new(temp.path()).with_trash(temp.path().join(".trash"));
        store.discard(&victim).unwrap();
        assert!(!victim.exists());
        assert!(temp.path().join(".trash/doomed.txt").exists());
    }
}
