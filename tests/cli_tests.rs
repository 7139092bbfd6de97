//! Integration tests for the unidup CLI surface

mod common;

use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_flag() {
    unidup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("unidup"));
}

#[test]
fn test_version_flag() {
    unidup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");

    unidup()
        .arg("--store")
        .arg(&store)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized unidup store"));

    unidup()
        .arg("--store")
        .arg(&store)
        .arg("init")
        .assert()
        .success();

    assert!(store.join("unidup.db").is_file());
    assert!(store.join("blobs").is_dir());
    assert!(store.join("versions").is_dir());
    assert!(store.join("config.toml").is_file());
}

#[test]
fn test_commands_require_a_store() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    // Data/store error (exit 3)
    unidup()
        .arg("--store")
        .arg(&missing)
        .arg("groups")
        .assert()
        .failure()
        .code(3);

    unidup()
        .arg("--store")
        .arg(&missing)
        .args(["run", "--yes"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_groups_lists_duplicates_largest_first() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let conn = init_store(&store);

    for (id, hash) in [(1, "small"), (2, "small"), (3, "big"), (4, "big"), (5, "big")] {
        seed_asset(&conn, id, &format!("{id}.jpg"));
        seed_version(&conn, id, 1, hash);
    }

    unidup()
        .arg("--store")
        .arg(&store)
        .arg("groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("big  3 members  [3, 4, 5]"))
        .stdout(predicate::str::contains("small  2 members  [1, 2]"));
}

#[test]
fn test_groups_json_output() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let conn = init_store(&store);

    for id in [1, 2] {
        seed_asset(&conn, id, &format!("{id}.jpg"));
        seed_version(&conn, id, 1, "abc");
    }

    let output = unidup()
        .arg("--store")
        .arg(&store)
        .args(["--format", "json", "groups"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed[0]["fingerprint"], "abc");
    assert_eq!(parsed[0]["member_count"], 2);
    assert_eq!(parsed[0]["members"], serde_json::json!([1, 2]));
}

#[test]
fn test_run_with_no_duplicates_is_clean_success() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let _conn = init_store(&store);

    unidup()
        .arg("--store")
        .arg(&store)
        .args(["run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicate assets detected!"));
}

#[test]
fn test_run_with_unknown_target_asset_fails() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let _conn = init_store(&store);

    unidup()
        .arg("--store")
        .arg(&store)
        .args(["run", "--yes", "--asset-id", "404"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("no eligible version history"));
}

#[test]
fn test_cleanup_versions_repoints_and_removes_snapshots() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let conn = init_store(&store);

    seed_asset(&conn, 1, "1.jpg");
    seed_version(&conn, 1, 1, "abc");
    seed_version(&conn, 1, 2, "abc");
    std::fs::write(store.join("versions").join("2.bin"), b"payload").unwrap();

    unidup()
        .arg("--store")
        .arg(&store)
        .args(["cleanup-versions", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Repointed 1 duplicate version(s), removed 1 snapshot(s)",
        ));

    let stored_binary_id: i64 = conn
        .query_row(
            "SELECT stored_binary_id FROM versions WHERE id = 2",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored_binary_id, 1);
    assert!(!store.join("versions").join("2.bin").exists());
}
