//! Integration tests for namespace resolution, path rewriting, and the root
//! pseudo-listing.

mod common;

use std::sync::Arc;

use self::common::{init_tracing, nb_payload, setup_bundle_router};
use tempfile::TempDir;

use ::common::contents::{
    Backend, BackendRegistry, BundleBackend, ContentsError, EntryType, FileStore, PassthroughBackend,
    ReadOptions, Router,
};

/// Router with one bundle backend (`docs`) and one passthrough backend
/// (`scratch`), each rooted in its own temp subdirectory.
fn setup_two_backends() -> (Router, TempDir) {
    init_tracing();
    let temp = TempDir::new().unwrap();
    for sub in ["docs", "scratch"] {
        std::fs::create_dir_all(temp.path().join(sub)).unwrap();
    }
    let mut registry = BackendRegistry::new();
    registry
        .register(
            "docs",
            Arc::new(BundleBackend::new(FileStore::new(temp.path().join("docs")))),
        )
        .unwrap();
    registry
        .register(
            "scratch",
            Arc::new(PassthroughBackend::new(
                FileStore::new(temp.path().join("scratch")),
                ".ipynb",
            )),
        )
        .unwrap();
    (Router::new(registry), temp)
}

#[test]
fn test_resolve_round_trip() {
    let (router, _temp) = setup_two_backends();

    let (_, local) = router.resolve("docs/a/b/n.ipynb").unwrap();
    assert_eq!(local, "a/b/n.ipynb");

    // leading slash and bare alias both resolve
    let (_, local) = router.resolve("/docs/n.ipynb").unwrap();
    assert_eq!(local, "n.ipynb");
    let (_, local) = router.resolve("docs").unwrap();
    assert_eq!(local, "");
}

#[test]
fn test_unknown_backend_error() {
    let (router, _temp) = setup_two_backends();
    let err = router.get("nope/n.ipynb", ReadOptions::default()).unwrap_err();
    match err {
        ContentsError::UnknownBackend(alias) => assert_eq!(alias, "nope"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_root_listing_completeness() {
    let (router, _temp) = setup_two_backends();

    let entries = router.list("").unwrap();
    let mut names: Vec<&str> = entries.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["docs", "scratch"]);
    assert!(entries.iter().all(|m| m.entry_type == EntryType::Directory));

    // the root read carries the same listing as content
    let model = router.get("", ReadOptions::default()).unwrap();
    assert_eq!(model.listing().unwrap().len(), 2);
}

#[test]
fn test_returned_paths_are_full_namespace() {
    let (router, _temp) = setup_two_backends();

    router
        .save(&nb_payload("n.ipynb", "v1", &[]), "docs/sub/n.ipynb")
        .unwrap();

    let model = router.get("docs/sub/n.ipynb", ReadOptions::default()).unwrap();
    assert_eq!(model.path, "docs/sub/n.ipynb");

    // nested listings are rewritten too
    let dir = router.get("docs", ReadOptions::default()).unwrap();
    let listing = dir.listing().unwrap();
    assert!(listing.iter().all(|m| m.path.starts_with("docs/")));
}

#[test]
fn test_backends_are_isolated() {
    let (router, temp) = setup_two_backends();

    router
        .save(&nb_payload("n.ipynb", "v1", &[]), "docs/n.ipynb")
        .unwrap();
    router
        .save(&nb_payload("n.ipynb", "v2", &[]), "scratch/n.ipynb")
        .unwrap();

    // bundle layout on one side, flat file on the other
    assert!(temp.path().join("docs/n.ipynb/n.ipynb").is_file());
    assert!(temp.path().join("scratch/n.ipynb").is_file());

    let docs = router.list("docs").unwrap();
    let scratch = router.list("scratch").unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(scratch.len(), 1);
    assert_eq!(docs[0].path, "docs/n.ipynb");
    assert_eq!(scratch[0].path, "scratch/n.ipynb");
}

#[test]
fn test_exists_through_router() {
    let (router, _temp) = setup_bundle_router();
    assert!(!router.exists("docs/n.ipynb").unwrap());
    router
        .save(&nb_payload("n.ipynb", "v1", &[]), "docs/n.ipynb")
        .unwrap();
    assert!(router.exists("docs/n.ipynb").unwrap());
    assert!(router.exists("").unwrap());
}

#[test]
fn test_root_backend_refuses_mutation() {
    let (router, _temp) = setup_two_backends();
    let (root, _) = router.resolve("").unwrap();
    assert!(matches!(
        root.delete(""),
        Err(ContentsError::Unsupported(_))
    ));
    assert!(matches!(
        root.create_checkpoint(""),
        Err(ContentsError::Unsupported(_))
    ));
}
