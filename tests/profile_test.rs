//! Integration tests for profile persistence, rooted in a temp directory so
//! nothing touches the real home profile store

use chatdrill::profile::ProfileManager;
use tempfile::TempDir;

fn manager() -> (TempDir, ProfileManager) {
    let dir = TempDir::new().unwrap();
    let manager = ProfileManager::with_dir(dir.path().join("profiles")).unwrap();
    (dir, manager)
}

#[test]
fn test_create_and_list() {
    let (_dir, manager) = manager();

    let path = manager.create_profile("wa-login", "firefox").unwrap();
    assert!(path.is_dir());
    assert!(path.join("metadata.json").is_file());

    let profiles = manager.list_profiles().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "wa-login");
    assert_eq!(profiles[0].browser, "firefox");
}

#[test]
fn test_create_rejects_duplicate() {
    let (_dir, manager) = manager();

    manager.create_profile("wa-login", "firefox").unwrap();
    let err = manager.create_profile("wa-login", "chrome").unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_get_or_create_creates_on_demand() {
    let (_dir, manager) = manager();

    let path = manager.get_or_create("fresh", "chrome").unwrap();
    assert!(path.is_dir());

    let profiles = manager.list_profiles().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].browser, "chrome");
}

#[test]
fn test_get_or_create_touches_last_used() {
    let (_dir, manager) = manager();

    manager.create_profile("wa-login", "firefox").unwrap();
    let before = manager.list_profiles().unwrap()[0].last_used;

    std::thread::sleep(std::time::Duration::from_millis(10));
    manager.get_or_create("wa-login", "firefox").unwrap();
    let after = manager.list_profiles().unwrap()[0].last_used;

    assert!(after > before);
}

#[test]
fn test_delete_profile() {
    let (_dir, manager) = manager();

    let path = manager.create_profile("wa-login", "firefox").unwrap();
    manager.delete_profile("wa-login").unwrap();
    assert!(!path.exists());
    assert!(manager.list_profiles().unwrap().is_empty());
}

#[test]
fn test_delete_nonexistent_errors() {
    let (_dir, manager) = manager();

    let err = manager.delete_profile("no-such-profile").unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_list_orders_by_recency() {
    let (_dir, manager) = manager();

    manager.create_profile("older", "firefox").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(10));
    manager.create_profile("newer", "firefox").unwrap();

    let profiles = manager.list_profiles().unwrap();
    assert_eq!(profiles[0].name, "newer");
    assert_eq!(profiles[1].name, "older");
}
