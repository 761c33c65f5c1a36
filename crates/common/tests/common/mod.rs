//! Shared test utilities for namespace integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use common::contents::{
    BackendRegistry, BundleBackend, ContentModel, FileStore, MiddlewareStack, Router,
};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Honor `RUST_LOG` in test runs; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Router with a single bundle backend under alias `docs`, rooted at an
/// empty temp directory (trash configured so delete works).
pub fn setup_bundle_router() -> (Router, TempDir) {
    setup_bundle_router_with_middleware(MiddlewareStack::new())
}

pub fn setup_bundle_router_with_middleware(middleware: MiddlewareStack) -> (Router, TempDir) {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let docs_root = temp.path().join("docs");
    std::fs::create_dir_all(&docs_root).unwrap();

    let store = FileStore::new(&docs_root).with_trash(temp.path().join("trash"));
    let mut registry = BackendRegistry::new();
    registry
        .register("docs", Arc::new(BundleBackend::new(store)))
        .unwrap();

    (Router::with_middleware(registry, middleware), temp)
}

/// A minimal notebook body; `marker` makes each revision distinguishable.
pub fn nb_body(marker: &str) -> serde_json::Value {
    serde_json::json!({
        "cells": [{"cell_type": "code", "source": marker}],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5,
    })
}

/// Save payload for a notebook with the given sidecar files.
pub fn nb_payload(name: &str, marker: &str, sidecars: &[(&str, &str)]) -> ContentModel {
    let mut model = ContentModel::notebook(name, name, nb_body(marker));
    for (file, body) in sidecars {
        model
            .auxiliary_files
            .insert(file.to_string(), Some(body.to_string()));
    }
    model
}

/// On-disk bundle directory for a document saved at `docs/<name>`.
pub fn bundle_dir(temp: &TempDir, name: &str) -> std::path::PathBuf {
    temp.path().join("docs").join(name)
}

/// Raw bytes of a file, panicking with the path on failure.
pub fn read_bytes(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
