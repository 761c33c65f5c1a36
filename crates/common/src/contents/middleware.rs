//! Middleware hook bus.
//!
//! Observers register once at startup and are invoked in registration order
//! around the router's mutating operations. Every hook has a default no-op
//! body, so an observer implements only the hooks it cares about; there is
//! no capability probing at dispatch time.
//!
//! Hook failures are not contained: a pre-hook error aborts the operation
//! before the backend runs, a post-hook error surfaces after the backend has
//! already committed. Post-hooks are skipped entirely when the backend call
//! fails.

use std::sync::Arc;

use super::backend::Backend;
use super::error::{ContentsError, Result};
use super::model::ContentModel;

/// What a hook is told about the operation it observes. Read-only: observers
/// must not assume exclusive access to the backend's storage.
pub struct HookContext<'a> {
    /// Alias of the backend the operation resolved to
    pub alias: &'a str,
    pub backend: &'a dyn Backend,
    /// Backend-local path, alias already stripped
    pub local_path: &'a str,
}

/// Observer with optional pre/post hooks for mutating operations.
#[allow(unused_variables)]
pub trait Middleware: Send + Sync {
    fn pre_save(&self, cx: &HookContext<'_>, model: &ContentModel) -> Result<()> {
        Ok(())
    }

    fn post_save(&self, cx: &HookContext<'_>, model: &ContentModel) -> Result<()> {
        Ok(())
    }

    fn pre_delete(&self, cx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    fn post_delete(&self, cx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    fn pre_rename(&self, cx: &HookContext<'_>, new_local_path: &str) -> Result<()> {
        Ok(())
    }

    fn post_rename(&self, cx: &HookContext<'_>, new_local_path: &str) -> Result<()> {
        Ok(())
    }
}

/// Observers in registration order, keyed by name.
#[derive(Default, Clone)]
pub struct MiddlewareStack {
    observers: Vec<(String, Arc<dyn Middleware>)>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Names are unique; a duplicate is a `Validation`
    /// error since registration only happens at startup.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        observer: Arc<dyn Middleware>,
    ) -> Result<()> {
        let name = name.into();
        if self.observers.iter().any(|(n, _)| *n == name) {
            return Err(ContentsError::Validation(format!(
                "middleware '{name}' is already registered"
            )));
        }
        self.observers.push((name, observer));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Run `hook` for every observer in registration order, stopping at the
    /// first failure and naming the observer that failed.
    pub fn dispatch<F>(&self, mut hook: F) -> Result<()>
    where
        F: FnMut(&dyn Middleware) -> Result<()>,
    {
        for (name, observer) in &self.observers {
            hook(observer.as_ref()).map_err(|e| ContentsError::Middleware {
                name: name.clone(),
                source: Box::new(e),
            })?;
        }
        Ok(())
    }
}
