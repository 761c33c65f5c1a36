use super::error::Result;
use super::model::{Checkpoint, ContentModel};

/// Controls how much content a read pulls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Include the document/file body
    pub content: bool,
    /// Include sidecar file bodies (names are always included)
    pub auxiliary_content: bool,
}

impl ReadOptions {
    pub fn with_content() -> Self {
        Self {
            content: true,
            auxiliary_content: false,
        }
    }

    pub fn full() -> Self {
        Self {
            content: true,
            auxiliary_content: true,
        }
    }
}

/// Capability contract every storage provider implements.
///
/// All paths are backend-local: the router strips the alias segment before
/// delegating and re-prepends it to every path in the result. Operations are
/// synchronous and blocking; the surrounding server owns any async behavior.
pub trait Backend: Send + Sync {
    fn exists(&self, path: &str) -> bool;

    fn is_dir(&self, path: &str) -> bool;

    /// Whether `path` is a document this backend owns. For bundle storage
    /// this is the directory-contains-same-named-file predicate.
    fn is_document(&self, path: &str) -> bool;

    /// Directories and documents directly under `path`.
    fn list(&self, path: &str) -> Result<Vec<ContentModel>>;

    /// Read a single entry. Fails with `NotFound` if `path` does not exist.
    fn read(&self, path: &str, opts: ReadOptions) -> Result<ContentModel>;

    /// Persist a document. Fails with `Validation` if the model lacks a
    /// document body. Returns the stored model without content.
    fn write(&self, model: &ContentModel, path: &str) -> Result<ContentModel>;

    /// Rename a document. Fails with `Conflict` if `new_path` exists.
    fn rename(&self, path: &str, new_path: &str) -> Result<ContentModel>;

    /// Remove a document. Fails with `Unsupported` when the backend has no
    /// configured removal location.
    fn delete(&self, path: &str) -> Result<()>;

    fn create_checkpoint(&self, path: &str) -> Result<Checkpoint>;

    fn list_checkpoints(&self, path: &str) -> Result<Vec<Checkpoint>>;

    fn restore_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()>;

    fn delete_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()>;
}
