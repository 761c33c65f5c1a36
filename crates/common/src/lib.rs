/**
 * Virtual document namespace over heterogeneous
 *  storage providers.
 * The router dispatches on the first path segment;
 *  providers implement the Backend contract in
 *  contents::backend.
 */
pub mod contents;
/**
 * Backend registration read from TOML at startup.
 * Validates aliases and storage roots before the
 *  registry is built.
 */
pub mod config;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::contents::{
        Backend, BackendRegistry, BundleBackend, Checkpoint, ContentModel, ContentsError,
        EntryType, Middleware, PassthroughBackend, ReadOptions, Router,
    };
}
