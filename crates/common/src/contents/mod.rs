//! Document namespace core
//!
//! This module defines the pieces that make up bindery's virtual document
//! namespace:
//!
//! - **[`Backend`]**: the capability contract every storage provider satisfies
//! - **[`BundleBackend`]**: directory-encapsulated documents with sidecar
//!   files and timestamped checkpoints
//! - **[`PassthroughBackend`]**: flat files adapted to the same contract
//! - **[`Router`]**: alias-based dispatch over a [`BackendRegistry`], with
//!   path rewriting and the root pseudo-listing
//! - **[`Middleware`]**: ordered observers with pre/post hooks around
//!   mutating operations
//!
//! # Architecture
//!
//! A full namespace path is opaque except for its first segment, which names
//! the backend that owns the remainder:
//!
//! ```text
//!            Router.resolve("docs/reports/q3.ipynb")
//!                          |
//!              +-----------+-----------+
//!              |                       |
//!        alias "docs"          local "reports/q3.ipynb"
//!              |                       |
//!        BundleBackend  <--- operates on local path only
//! ```
//!
//! The router re-prepends the alias to every path a backend returns, so
//! callers never observe backend-local paths. An empty path resolves to the
//! root pseudo-backend, which lists one directory per registered alias.
//!
//! # Bundles
//!
//! A bundle is a directory whose name carries the document extension and
//! which contains a file of the identical name. That co-location is the sole
//! existence predicate for "is this a document". Every other file directly
//! inside the directory is a sidecar; checkpoints live under a reserved
//! `.checkpoints` subdirectory and snapshot the primary file only.

mod backend;
mod bundle;
mod checkpoints;
mod codec;
mod error;
mod file_store;
mod middleware;
mod model;
pub mod path;
mod root;
mod router;
mod tag_store;

pub use backend::{Backend, ReadOptions};
pub use bundle::{Bundle, BundleBackend};
pub use codec::{DocumentCodec, JsonCodec, NoopSigner, TrustSigner};
pub use error::{ContentsError, Result};
pub use file_store::{FileStore, PassthroughBackend};
pub use middleware::{HookContext, Middleware, MiddlewareStack};
pub use model::{Checkpoint, Content, ContentModel, EntryType};
pub use root::RootBackend;
pub use router::{BackendRegistry, Router};
pub use tag_store::{MemoryTagStore, TagStore, TagStoreMirror};
