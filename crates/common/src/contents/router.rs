use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::backend::{Backend, ReadOptions};
use super::error::{ContentsError, Result};
use super::middleware::{HookContext, MiddlewareStack};
use super::model::{Checkpoint, Content, ContentModel};
use super::path::{join, split_alias, strip_slashes};
use super::root::RootBackend;

/// Alias → backend mapping, built once at startup and handed to the router.
///
/// Backends own their storage roots exclusively; configuration validation
/// rejects overlapping roots before anything is registered here.
#[derive(Default, Clone)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under an alias. Aliases are single path segments
    /// and unique.
    pub fn register(&mut self, alias: impl Into<String>, backend: Arc<dyn Backend>) -> Result<()> {
        let alias = alias.into();
        if alias.is_empty() || alias.contains('/') {
            return Err(ContentsError::Validation(format!(
                "backend alias must be a single non-empty path segment: '{alias}'"
            )));
        }
        if self.backends.contains_key(&alias) {
            return Err(ContentsError::Validation(format!(
                "backend alias '{alias}' is already registered"
            )));
        }
        self.backends.insert(alias, backend);
        Ok(())
    }

    pub fn get(&self, alias: &str) -> Option<&Arc<dyn Backend>> {
        self.backends.get(alias)
    }

    pub fn aliases(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// Routes namespace paths to registered backends.
///
/// The first path segment selects the backend; the remainder is passed
/// through unchanged. Results are rewritten back to full-namespace form, so
/// callers never observe backend-local paths. Mutating operations serialize
/// on a per-canonical-path mutex; readers run unlocked and tolerate
/// observing a document mid-write.
pub struct Router {
    registry: BackendRegistry,
    root: RootBackend,
    middleware: MiddlewareStack,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

enum Resolved<'a> {
    Root,
    Backend {
        alias: &'a str,
        backend: &'a dyn Backend,
        local_path: &'a str,
    },
}

impl Router {
    pub fn new(registry: BackendRegistry) -> Self {
        Self::with_middleware(registry, MiddlewareStack::new())
    }

    pub fn with_middleware(registry: BackendRegistry, middleware: MiddlewareStack) -> Self {
        let root = RootBackend::new(registry.aliases());
        Self {
            registry,
            root,
            middleware,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a full namespace path to `(backend, local_path)`.
    ///
    /// The empty path resolves to the root pseudo-backend.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Result<(&'a dyn Backend, &'a str)> {
        match self.resolve_parts(path)? {
            Resolved::Root => Ok((&self.root as &dyn Backend, "")),
            Resolved::Backend {
                backend,
                local_path,
                ..
            } => Ok((backend, local_path)),
        }
    }

    fn resolve_parts<'a>(&'a self, path: &'a str) -> Result<Resolved<'a>> {
        let Some((alias, local_path)) = split_alias(path) else {
            return Ok(Resolved::Root);
        };
        let backend = self
            .registry
            .get(alias)
            .ok_or_else(|| ContentsError::UnknownBackend(alias.to_string()))?;
        Ok(Resolved::Backend {
            alias,
            backend: backend.as_ref(),
            local_path,
        })
    }

    /// Re-prepend the alias to every path in a result model, recursively
    /// through directory listings.
    fn rewrite(alias: &str, mut model: ContentModel) -> ContentModel {
        model.path = join(alias, &model.path);
        if let Some(Content::Listing(entries)) = model.content.take() {
            model.content = Some(Content::Listing(
                entries.into_iter().map(|m| Self::rewrite(alias, m)).collect(),
            ));
        }
        model
    }

    fn path_lock(&self, canonical: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        // drop entries no caller holds anymore, so the table tracks paths
        // under mutation rather than every path ever mutated
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(canonical.to_string()).or_default().clone()
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        let (backend, local_path) = self.resolve(path)?;
        Ok(backend.exists(local_path))
    }

    /// Read a single entry, directory listings included.
    pub fn get(&self, path: &str, opts: ReadOptions) -> Result<ContentModel> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.read("", opts),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                debug!(alias, local_path, "get");
                let model = backend.read(local_path, opts)?;
                Ok(Self::rewrite(alias, model))
            }
        }
    }

    /// List the entries directly under `path`. The empty path yields the
    /// synthetic root listing: one directory per registered alias.
    pub fn list(&self, path: &str) -> Result<Vec<ContentModel>> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.list(""),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                let entries = backend.list(local_path)?;
                Ok(entries
                    .into_iter()
                    .map(|m| Self::rewrite(alias, m))
                    .collect())
            }
        }
    }

    /// Persist a document, routing through the middleware bus: pre-hooks in
    /// registration order, the backend write, then post-hooks only if the
    /// write succeeded.
    pub fn save(&self, model: &ContentModel, path: &str) -> Result<ContentModel> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.write(model, ""),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                let canonical = join(alias, local_path);
                let lock = self.path_lock(&canonical);
                let _guard = lock.lock();

                // the payload's path must be backend-local before delegation
                let mut local_model = model.clone();
                local_model.path = local_path.to_string();

                let cx = HookContext {
                    alias,
                    backend,
                    local_path,
                };
                self.middleware.dispatch(|m| m.pre_save(&cx, &local_model))?;
                debug!(alias, local_path, "save");
                let saved = backend.write(&local_model, local_path)?;
                self.middleware.dispatch(|m| m.post_save(&cx, &saved))?;
                Ok(Self::rewrite(alias, saved))
            }
        }
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.delete(""),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                let canonical = join(alias, local_path);
                let lock = self.path_lock(&canonical);
                let _guard = lock.lock();

                let cx = HookContext {
                    alias,
                    backend,
                    local_path,
                };
                self.middleware.dispatch(|m| m.pre_delete(&cx))?;
                debug!(alias, local_path, "delete");
                backend.delete(local_path)?;
                self.middleware.dispatch(|m| m.post_delete(&cx))
            }
        }
    }

    /// Rename within one backend. The alias segment of both paths must
    /// match; a rename is never a cross-backend move.
    pub fn rename(&self, path: &str, new_path: &str) -> Result<ContentModel> {
        let new_parts = split_alias(new_path);
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.rename("", strip_slashes(new_path)),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                let Some((new_alias, new_local)) = new_parts else {
                    return Err(ContentsError::Validation(format!(
                        "rename target is the namespace root: {new_path}"
                    )));
                };
                if new_alias != alias {
                    return Err(ContentsError::Unsupported(format!(
                        "rename cannot move between backends: {alias} -> {new_alias}"
                    )));
                }
                let canonical = join(alias, local_path);
                let lock = self.path_lock(&canonical);
                let _guard = lock.lock();

                let cx = HookContext {
                    alias,
                    backend,
                    local_path,
                };
                self.middleware.dispatch(|m| m.pre_rename(&cx, new_local))?;
                debug!(alias, local_path, new_local, "rename");
                let model = backend.rename(local_path, new_local)?;
                self.middleware.dispatch(|m| m.post_rename(&cx, new_local))?;
                Ok(Self::rewrite(alias, model))
            }
        }
    }

    pub fn create_checkpoint(&self, path: &str) -> Result<Checkpoint> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.create_checkpoint(""),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                // same canonical key as save/delete/rename, so sloppy
                // slashes cannot split one document across two locks
                let lock = self.path_lock(&join(alias, local_path));
                let _guard = lock.lock();
                backend.create_checkpoint(local_path)
            }
        }
    }

    pub fn list_checkpoints(&self, path: &str) -> Result<Vec<Checkpoint>> {
        let (backend, local_path) = self.resolve(path)?;
        backend.list_checkpoints(local_path)
    }

    pub fn restore_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.restore_checkpoint(checkpoint_id, ""),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                let lock = self.path_lock(&join(alias, local_path));
                let _guard = lock.lock();
                backend.restore_checkpoint(checkpoint_id, local_path)
            }
        }
    }

    pub fn delete_checkpoint(&self, checkpoint_id: &str, path: &str) -> Result<()> {
        match self.resolve_parts(path)? {
            Resolved::Root => self.root.delete_checkpoint(checkpoint_id, ""),
            Resolved::Backend {
                alias,
                backend,
                local_path,
            } => {
                let lock = self.path_lock(&join(alias, local_path));
                let _guard = lock.lock();
                backend.delete_checkpoint(checkpoint_id, local_path)
            }
        }
    }
}
