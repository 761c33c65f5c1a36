//! Integration tests for the checkpoint lifecycle.

mod common;

use self::common::{bundle_dir, nb_body, nb_payload, read_bytes, setup_bundle_router};

use ::common::contents::{ContentsError, ReadOptions};

#[test]
fn test_checkpoint_on_first_overwrite_only() {
    let (router, _temp) = setup_bundle_router();
    let payload = nb_payload("n.ipynb", "v1", &[]);

    // fresh save: no checkpoint
    router.save(&payload, "docs/n.ipynb").unwrap();
    assert!(router.list_checkpoints("docs/n.ipynb").unwrap().is_empty());

    // first overwrite: exactly one
    router.save(&payload, "docs/n.ipynb").unwrap();
    assert_eq!(router.list_checkpoints("docs/n.ipynb").unwrap().len(), 1);

    // further overwrites: still one — the policy is "ensure at least one
    // exists", not one per save
    router.save(&payload, "docs/n.ipynb").unwrap();
    assert_eq!(router.list_checkpoints("docs/n.ipynb").unwrap().len(), 1);
}

#[test]
fn test_checkpoint_captures_pre_overwrite_bytes() {
    let (router, temp) = setup_bundle_router();

    router
        .save(&nb_payload("n.ipynb", "before", &[]), "docs/n.ipynb")
        .unwrap();
    let dir = bundle_dir(&temp, "n.ipynb");
    let before = read_bytes(&dir.join("n.ipynb"));

    router
        .save(&nb_payload("n.ipynb", "after", &[]), "docs/n.ipynb")
        .unwrap();

    let checkpoints = router.list_checkpoints("docs/n.ipynb").unwrap();
    assert_eq!(checkpoints.len(), 1);
    let cp_file = dir
        .join(".checkpoints")
        .join(format!("n---{}.ipynb", checkpoints[0].id));
    assert_eq!(read_bytes(&cp_file), before);
    assert_ne!(read_bytes(&dir.join("n.ipynb")), before);
}

#[test]
fn test_checkpoints_never_contain_sidecars() {
    let (router, temp) = setup_bundle_router();

    let payload = nb_payload("n.ipynb", "v1", &[("a.py", "# a"), ("b.csv", "1,2")]);
    router.save(&payload, "docs/n.ipynb").unwrap();
    router.create_checkpoint("docs/n.ipynb").unwrap();

    let cp_dir = bundle_dir(&temp, "n.ipynb").join(".checkpoints");
    let entries: Vec<String> = std::fs::read_dir(&cp_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("n---"));
    assert!(entries[0].ends_with(".ipynb"));
}

#[test]
fn test_explicit_checkpoint_and_restore() {
    let (router, _temp) = setup_bundle_router();

    router
        .save(&nb_payload("n.ipynb", "good", &[]), "docs/n.ipynb")
        .unwrap();
    let checkpoint = router.create_checkpoint("docs/n.ipynb").unwrap();

    router
        .save(&nb_payload("n.ipynb", "bad", &[]), "docs/n.ipynb")
        .unwrap();
    router
        .restore_checkpoint(&checkpoint.id, "docs/n.ipynb")
        .unwrap();

    let model = router
        .get("docs/n.ipynb", ReadOptions::with_content())
        .unwrap();
    assert_eq!(model.json_content(), Some(&nb_body("good")));
}

#[test]
fn test_delete_checkpoint() {
    let (router, _temp) = setup_bundle_router();

    router
        .save(&nb_payload("n.ipynb", "v1", &[]), "docs/n.ipynb")
        .unwrap();
    let checkpoint = router.create_checkpoint("docs/n.ipynb").unwrap();
    assert_eq!(router.list_checkpoints("docs/n.ipynb").unwrap().len(), 1);

    router
        .delete_checkpoint(&checkpoint.id, "docs/n.ipynb")
        .unwrap();
    assert!(router.list_checkpoints("docs/n.ipynb").unwrap().is_empty());
}

#[test]
fn test_missing_checkpoint_operations_not_found() {
    let (router, _temp) = setup_bundle_router();

    router
        .save(&nb_payload("n.ipynb", "v1", &[]), "docs/n.ipynb")
        .unwrap();

    assert!(matches!(
        router.restore_checkpoint("2020-01-01 00:00:00", "docs/n.ipynb"),
        Err(ContentsError::NotFound(_))
    ));
    assert!(matches!(
        router.delete_checkpoint("2020-01-01 00:00:00", "docs/n.ipynb"),
        Err(ContentsError::NotFound(_))
    ));
}

#[test]
fn test_checkpoints_of_missing_bundle_is_empty_listing() {
    let (router, _temp) = setup_bundle_router();
    assert!(router
        .list_checkpoints("docs/ghost.ipynb")
        .unwrap()
        .is_empty());
}
