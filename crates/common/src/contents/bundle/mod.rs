//! Bundle storage: directory-encapsulated documents.
//!
//! A bundle keeps a document together with its sidecar files inside one
//! directory named after the document. [`Bundle`] locates one on disk and
//! answers the existence predicate; [`BundleBackend`] implements the full
//! [`Backend`](super::Backend) contract on top of it.

mod bundle;
mod engine;

pub use bundle::Bundle;
pub use engine::BundleBackend;
