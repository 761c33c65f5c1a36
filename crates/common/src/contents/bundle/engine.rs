use std::fs;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::contents::backend::{Backend, ReadOptions};
use crate::contents::checkpoints::{self, CHECKPOINT_DIR};
use crate::contents::codec::{DocumentCodec, JsonCodec, NoopSigner, TrustSigner};
use crate::contents::error::{ContentsError, Result};
use crate::contents::file_store::{file_times, FileStore};
use crate::contents::model::{Checkpoint, Content, ContentModel, EntryType};
use crate::contents::path::{basename, join, parent};

use super::bundle::{is_bundle_dir, Bundle};

/// Backend where every document is a [`Bundle`] somewhere under a root
/// directory.
///
/// For this backend `is_dir` means "directory that is not a bundle": bundles
/// are directories on disk but documents in the namespace, and every caller
/// decides between the two through the same predicate.
pub struct BundleBackend {
    files: FileStore,
    extension: String,
    codec: Arc<dyn DocumentCodec>,
    signer: Arc<dyn TrustSigner>,
}

impl BundleBackend {
    pub fn new(files: FileStore) -> Self {
        Self {
            files,
            extension: ".ipynb".to_string(),
            codec: Arc::new(JsonCodec),
            signer: Arc::new(NoopSigner),
        }
    }

    /// Override the document extension (leading dot included).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn DocumentCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn TrustSigner>) -> Self {
        self.signer = signer;
        self
    }

    fn bundle_at(&self, path: &str) -> Result<Bundle> {
        let parent_os = self.files.resolve(parent(path))?;
        Ok(Bundle::new(basename(path), parent_os))
    }

    /// Model for an existing bundle. Sidecar names are always present;
    /// bodies only when requested.
    fn bundle_model(&self, path: &str, opts: ReadOptions) -> Result<ContentModel> {
        let bundle = self.bundle_at(path)?;
        let mut model = ContentModel::new(bundle.name(), path, EntryType::Notebook);
        let (created, modified) = file_times(&bundle.primary_path());
        model.created = created;
        model.last_modified = modified;
        if opts.content {
            let bytes = fs::read(bundle.primary_path())?;
            model.content = Some(Content::Json(self.codec.decode(&bytes)?));
            model.format = Some("json".to_string());
        }
        for name in bundle.sidecars()? {
            let body = if opts.auxiliary_content {
                // unreadable sidecars are listed without content, not dropped
                fs::read(bundle.dir().join(&name))
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
            } else {
                None
            };
            model.auxiliary_files.insert(name, body);
        }
        Ok(model)
    }

    fn plain_file_model(&self, path: &str) -> Result<ContentModel> {
        let os_path = self.files.resolve(path)?;
        let mut model = ContentModel::new(basename(path), path, EntryType::File);
        let (created, modified) = file_times(&os_path);
        model.created = created;
        model.last_modified = modified;
        Ok(model)
    }
}

impl Backend for BundleBackend {
    fn exists(&self, path: &str) -> bool {
        self.files
            .resolve(path)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> bool {
        !self.is_document(path)
            && self
                .files
                .resolve(path)
                .map(|p| p.is_dir())
                .unwrap_or(false)
    }

    fn is_document(&self, path: &str) -> bool {
        basename(path).ends_with(&self.extension)
            && self
                .files
                .resolve(path)
                .map(|p| is_bundle_dir(&p))
                .unwrap_or(false)
    }

    fn list(&self, path: &str) -> Result<Vec<ContentModel>> {
        let os_path = self.files.resolve(path)?;
        if !os_path.is_dir() || self.is_document(path) {
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
            if entry.file_type()?.is_dir() {
                if name.ends_with(&self.extension) && is_bundle_dir(&entry.path()) {
                    notebooks.push(self.bundle_model(&child_path, ReadOptions::default())?);
                } else {
                    dirs.push(ContentModel::directory(&name, &child_path));
                }
            } else if entry.file_type()?.is_file() {
                files.push(self.plain_file_model(&child_path)?);
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
        if self.is_document(path) {
            return self.bundle_model(path, opts);
        }
        if self.is_dir(path) {
            let mut model = ContentModel::directory(basename(path), path);
            model.content = Some(Content::Listing(self.list(path)?));
            model.format = Some("json".to_string());
            return Ok(model);
        }
        let os_path = self.files.resolve(path)?;
        if os_path.is_file() {
            let mut model = self.plain_file_model(path)?;
            if opts.content {
                let bytes = fs::read(&os_path)?;
                model.content = Some(Content::Text(String::from_utf8_lossy(&bytes).into_owned()));
                model.format = Some("text".to_string());
            }
            return Ok(model);
        }
        Err(ContentsError::NotFound(path.to_string()))
    }

    /// Persist a document into its bundle.
    ///
    /// Sidecar writes are additive and overwriting: entries present in the
    /// payload replace files of the same name, files absent from the payload
    /// stay untouched. If the bundle already exists with zero checkpoints,
    /// one is taken before anything is overwritten.
    fn write(&self, model: &ContentModel, path: &str) -> Result<ContentModel> {
        if !basename(path).ends_with(&self.extension) {
            return Err(ContentsError::Validation(format!(
                "document path must carry the {} extension: {path}",
                self.extension
            )));
        }
        let Some(body) = model.json_content() else {
            return Err(ContentsError::Validation(
                "save payload has no document body".to_string(),
            ));
        };
        let bundle = self.bundle_at(path)?;

        if bundle.exists() && self.list_checkpoints(path)?.is_empty() {
            debug!(path, "preserving last good state before first overwrite");
            self.create_checkpoint(path)?;
        }

        fs::create_dir_all(bundle.dir())?;

        let mut document = body.clone();
        self.signer.sign_if_needed(&mut document)?;
        let bytes = self.codec.encode(&document)?;
        debug!(path, sidecars = model.auxiliary_files.len(), "writing bundle");
        fs::write(bundle.primary_path(), bytes)?;

        for (name, body) in &model.auxiliary_files {
            if let Some(body) = body {
                fs::write(bundle.dir().join(name), body.as_bytes())?;
            }
        }

        self.read(path, ReadOptions::default())
    }

    /// Two-phase, same-directory rename: the primary file first, then the
    /// bundle directory. Cross-directory moves and existing destinations are
    /// rejected before any filesystem mutation.
    fn rename(&self, path: &str, new_path: &str) -> Result<ContentModel> {
        if !self.is_document(path) {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        let new_name = basename(new_path);
        if !new_name.ends_with(&self.extension) {
            return Err(ContentsError::Validation(format!(
                "rename target must keep the {} extension: {new_path}",
                self.extension
            )));
        }
        if parent(path) != parent(new_path) {
            return Err(ContentsError::Unsupported(format!(
                "cross-directory rename is not supported: {path} -> {new_path}"
            )));
        }
        let bundle = self.bundle_at(path)?;
        let target = self.bundle_at(new_path)?;
        if target.dir().exists() {
            return Err(ContentsError::Conflict(new_path.to_string()));
        }

        let renamed_primary = bundle.dir().join(new_name);
        fs::rename(bundle.primary_path(), &renamed_primary)?;
        if let Err(e) = fs::rename(bundle.dir(), target.dir()) {
            // put the primary file back so the original bundle stays intact
            if let Err(revert) = fs::rename(&renamed_primary, bundle.primary_path()) {
                warn!(path, %revert, "could not revert primary rename");
            }
            return Err(e.into());
        }
        debug!(path, new_path, "renamed bundle");
        self.read(new_path, ReadOptions::default())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let os_path = self.files.resolve(path)?;
        if !os_path.exists() {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        self.files.discard(&os_path)
    }

    /// Snapshot the primary document file only; sidecars are never included.
    fn create_checkpoint(&self, path: &str) -> Result<Checkpoint> {
        if !self.is_document(path) {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        let bundle = self.bundle_at(path)?;
        let dir = bundle.checkpoint_dir();
        fs::create_dir_all(&dir)?;
        let id = checkpoints::new_checkpoint_id();
        let cp_path = checkpoints::checkpoint_path(&dir, bundle.name(), &id);
        fs::copy(bundle.primary_path(), &cp_path)?;
        debug!(path, id, "created checkpoint");
        Ok(Checkpoint {
            last_modified: checkpoints::file_mtime(&cp_path)?,
            id,
        })
    }

    fn list_checkpoints(&self, path: &str) -> Result<Vec<Checkpoint>> {
        let bundle = self.bundle_at(path)?;
        checkpoints::scan(&bundle.checkpoint_dir(), bundle.name())
    }

    fn restore_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()> {
        if !self.is_document(path) {
            return Err(ContentsError::NotFound(path.to_string()));
        }
        let bundle = self.bundle_at(path)?;
        let cp_path =
            checkpoints::checkpoint_path(&bundle.checkpoint_dir(), bundle.name(), checkpoint_id);
        if !cp_path.is_file() {
            return Err(ContentsError::NotFound(format!(
                "checkpoint {checkpoint_id} for {path}"
            )));
        }
        fs::copy(&cp_path, bundle.primary_path())?;
        debug!(path, checkpoint_id, "restored checkpoint");
        Ok(())
    }

    fn delete_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()> {
        let bundle = self.bundle_at(path)?;
        let cp_path =
            checkpoints::checkpoint_path(&bundle.checkpoint_dir(), bundle.name(), checkpoint_id);
        if !cp_path.is_file() {
            return Err(ContentsError::NotFound(format!(
                "checkpoint {checkpoint_id} for {path}"
            )));
        }
        fs::remove_file(cp_path)?;
        Ok(())
    }
}
