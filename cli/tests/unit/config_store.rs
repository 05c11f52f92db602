//! Tests for the `.env` backed `ConfigStore`.

#![allow(clippy::expect_used)]

use moemail_deploy::application::ports::ConfigStore;
use moemail_deploy::infra::env_store::{ENV_FILE_NAME, EnvFileStore};

use crate::mocks::entries;

fn store_in(dir: &tempfile::TempDir, content: Option<&str>) -> EnvFileStore {
    let path = dir.path().join(ENV_FILE_NAME);
    if let Some(content) = content {
        std::fs::write(&path, content).expect("seed .env");
    }
    EnvFileStore::open(path).expect("open store")
}

#[test]
fn test_missing_file_is_an_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, None);

    assert!(store.snapshot().is_empty());
    assert!(!store.path().exists(), "opening must not create the file");
}

#[test]
fn test_merge_update_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, None);

    store
        .merge_update(&entries(&[("KV_NAMESPACE_ID", "kv-1"), ("DATABASE_NAME", "moemail")]))
        .expect("merge");

    let reopened = store_in(&dir, None);
    assert_eq!(reopened.snapshot(), store.snapshot());
    assert_eq!(reopened.get("KV_NAMESPACE_ID").as_deref(), Some("kv-1"));
}

#[test]
fn test_merge_update_keeps_untouched_keys_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, Some("# deploy settings\nA=1\nB=2\n\nC=3\n"));

    store
        .merge_update(&entries(&[("B", "20"), ("D", "4")]))
        .expect("merge");

    let content = std::fs::read_to_string(store.path()).expect("read");
    assert_eq!(content, "A=\"1\"\nB=\"20\"\nC=\"3\"\nD=\"4\"\n");
}

#[test]
fn test_invalid_key_leaves_file_and_view_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, Some("A=1\n"));

    let err = store
        .merge_update(&entries(&[("B", "2"), ("NOT VALID", "x")]))
        .expect_err("bad key");

    assert!(err.to_string().contains("NOT VALID"), "got: {err}");
    assert_eq!(std::fs::read_to_string(store.path()).expect("read"), "A=1\n");
    assert_eq!(store.get("B"), None);
}

#[test]
fn test_multiline_value_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, None);

    assert!(store.merge_update(&entries(&[("A", "one\ntwo")])).is_err());
    assert!(!store.path().exists());
}

#[test]
fn test_merge_update_keeps_edits_made_after_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, Some("A=1\n"));
    std::fs::write(store.path(), "A=1\nEDITED=yes\n").expect("external edit");

    store.merge_update(&entries(&[("B", "2")])).expect("merge");

    assert_eq!(
        std::fs::read_to_string(store.path()).expect("read"),
        "A=\"1\"\nEDITED=\"yes\"\nB=\"2\"\n"
    );
    assert_eq!(store.get("EDITED").as_deref(), Some("yes"));
}

#[test]
fn test_values_survive_unrelated_writes_and_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, None);
    let tricky = entries(&[
        ("TOKEN", "'quoted'"),
        ("PAD", " padded "),
        ("MIXED", r#"a"b\c $HOME # x"#),
    ]);

    store.merge_update(&tricky).expect("first write");
    store
        .merge_update(&entries(&[("OTHER", "1")]))
        .expect("unrelated write");

    for (key, value) in &tricky {
        assert_eq!(store.get(key).as_ref(), Some(value), "after rewrite: {key}");
    }
    let reopened = store_in(&dir, None);
    for (key, value) in &tricky {
        assert_eq!(reopened.get(key).as_ref(), Some(value), "after reopen: {key}");
    }
}

#[test]
fn test_malformed_lines_are_skipped_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, Some("garbage line\nAUTH_SECRET=\"quoted\"\n"));

    assert_eq!(store.snapshot(), entries(&[("AUTH_SECRET", "quoted")]));
}

#[test]
fn test_get_falls_back_to_process_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir, Some("HOME=from-file\n"));

    assert_eq!(store.get("HOME").as_deref(), Some("from-file"));
    assert_eq!(
        store.get("PATH"),
        std::env::var("PATH").ok(),
        "keys absent from the file come from the environment"
    );
    assert!(!store.snapshot().contains_key("PATH"));
}
