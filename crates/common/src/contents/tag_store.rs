//! Remote tag-organized store contract and the save-mirroring observer.
//!
//! The remote store's query and grouping logic lives elsewhere; this module
//! only consumes its save contract. [`TagStoreMirror`] is the canonical
//! middleware example: it pushes every successful save (primary document
//! plus sidecars) to the remote store without the router or the bundle
//! engine knowing about it.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::backend::ReadOptions;
use super::error::Result;
use super::middleware::{HookContext, Middleware};
use super::model::{Content, ContentModel};
use super::path::join;

/// Save contract of the remote tag-organized store.
pub trait TagStore: Send + Sync {
    /// Persist a document snapshot under `id` with its file set.
    fn save(&self, id: &str, description: &str, files: &BTreeMap<String, String>) -> Result<()>;
}

/// Middleware that mirrors saved documents to a [`TagStore`].
pub struct TagStoreMirror {
    store: Arc<dyn TagStore>,
}

impl TagStoreMirror {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }
}

impl Middleware for TagStoreMirror {
    fn post_save(&self, cx: &HookContext<'_>, _model: &ContentModel) -> Result<()> {
        // re-read with full content; the saved model deliberately has none
        let model = cx.backend.read(cx.local_path, ReadOptions::full())?;
        let mut files = BTreeMap::new();
        if let Some(Content::Json(body)) = &model.content {
            files.insert(model.name.clone(), serde_json::to_string_pretty(body)?);
        }
        for (name, body) in &model.auxiliary_files {
            if let Some(body) = body {
                files.insert(name.clone(), body.clone());
            }
        }
        let id = join(cx.alias, cx.local_path);
        debug!(id, files = files.len(), "mirroring save to tag store");
        self.store.save(&id, &model.name, &files)
    }
}

/// In-memory [`TagStore`] double for tests and local development.
#[derive(Default)]
pub struct MemoryTagStore {
    saved: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The file set last saved under `id`, if any.
    pub fn get_by_id(&self, id: &str) -> Option<BTreeMap<String, String>> {
        self.saved.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.saved.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.lock().is_empty()
    }
}

impl TagStore for MemoryTagStore {
    fn save(&self, id: &str, _description: &str, files: &BTreeMap<String, String>) -> Result<()> {
        self.saved.lock().insert(id.to_string(), files.clone());
        Ok(())
    }
}
