//! Tests for the slot store.

use super::*;
use tempfile::TempDir;

fn file_store(tmp: &TempDir) -> KvStore {
    KvStore::file(tmp.path().join("test.redb")).unwrap()
}

#[tokio::test]
async fn test_set_and_get() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    store.set("slot1", b"value1").await.unwrap();
    let value = store.get("slot1").await.unwrap().unwrap();
    assert_eq!(value, b"value1");
}

#[tokio::test]
async fn test_get_nonexistent_key() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    let result = store.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    store.set("slot1", b"value1").await.unwrap();
    assert!(store.delete("slot1").await.unwrap());
    assert!(store.get("slot1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_nonexistent_is_noop() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    assert!(!store.delete("nonexistent").await.unwrap());
    // Second call still succeeds and still reports absence.
    assert!(!store.delete("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_exists() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    assert!(!store.exists("slot1").await.unwrap());

    store.set("slot1", b"value1").await.unwrap();
    assert!(store.exists("slot1").await.unwrap());

    store.delete("slot1").await.unwrap();
    assert!(!store.exists("slot1").await.unwrap());
}

#[tokio::test]
async fn test_overwrite_value() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    store.set("slot1", b"value1").await.unwrap();
    store.set("slot1", b"value2").await.unwrap();

    let value = store.get("slot1").await.unwrap().unwrap();
    assert_eq!(value, b"value2");
}

#[tokio::test]
async fn test_list_keys_with_prefix() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    store.set("history", b"a").await.unwrap();
    store.set("history_backup", b"b").await.unwrap();
    store.set("settings", b"c").await.unwrap();

    let all = store.list_keys(None).await.unwrap();
    assert_eq!(all.len(), 3);

    let history = store.list_keys(Some("history")).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|k| k.starts_with("history")));
}

#[tokio::test]
async fn test_binary_data_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    let payload: Vec<u8> = (0u8..=255).collect();
    store.set("binary", &payload).await.unwrap();

    let value = store.get("binary").await.unwrap().unwrap();
    assert_eq!(value, payload);
}

#[tokio::test]
async fn test_persistence_across_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test.redb");

    {
        let store = KvStore::file(&path).unwrap();
        store.set("slot1", b"survives").await.unwrap();
    }

    let reopened = KvStore::file(&path).unwrap();
    let value = reopened.get("slot1").await.unwrap().unwrap();
    assert_eq!(value, b"survives");
}

#[tokio::test]
async fn test_memory_backend_round_trip() {
    let store = KvStore::memory();

    store.set("slot1", b"value1").await.unwrap();
    assert_eq!(store.get("slot1").await.unwrap().unwrap(), b"value1");
    assert!(store.delete("slot1").await.unwrap());
    assert!(store.get("slot1").await.unwrap().is_none());
}
