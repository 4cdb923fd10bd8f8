//! LocalStorage against a real database file

use kindview_core::{KindCache, StateStore};
use kindview_storage::LocalStorage;
use tempfile::TempDir;

#[test]
fn state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("kindview.db");

    {
        let storage = LocalStorage::open(&path).unwrap();
        storage.save_state(r#"{"kind":"User"}"#).unwrap();
        storage.store_kinds(&["User".to_string()]).unwrap();
    }

    assert!(path.exists());
    let storage = LocalStorage::open(&path).unwrap();
    assert_eq!(storage.path(), path.as_path());
    assert_eq!(storage.load_state().unwrap().as_deref(), Some(r#"{"kind":"User"}"#));
    assert_eq!(storage.load_kinds().unwrap(), Some(vec!["User".to_string()]));
}

#[test]
fn unwritable_location_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();

    assert!(LocalStorage::open(blocker.join("kindview.db")).is_err());
}
