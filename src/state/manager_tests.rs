//! Tests for StateManager

use super::*;
use tempfile::tempdir;

fn cursor(s: &str) -> Cursor {
    s.parse().unwrap()
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(r#"{"tickets": "2024-01-01T00:00:00Z"}"#).unwrap();
    assert_eq!(
        manager.cursor("tickets").await,
        Some(cursor("2024-01-01T00:00:00Z"))
    );
    assert!(StateManager::from_json("[1, 2]").is_err());
}

#[tokio::test]
async fn test_from_json_empty_string() {
    let manager = StateManager::from_json("  ").unwrap();
    assert!(manager.snapshot().await.is_empty());
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[tokio::test]
async fn test_advance_cursor() {
    let manager = StateManager::in_memory();

    assert!(manager.get_cursor("contacts").await.is_none());

    assert!(manager
        .advance_cursor("contacts", cursor("2024-01-01T00:00:01Z"))
        .await
        .unwrap());
    assert!(!manager
        .advance_cursor("contacts", cursor("2023-01-01T00:00:00Z"))
        .await
        .unwrap());

    assert_eq!(
        manager.get_cursor("contacts").await,
        Some("2024-01-01T00:00:01Z".to_string())
    );
}

#[tokio::test]
async fn test_independent_keys() {
    let manager = StateManager::in_memory();

    manager
        .advance_cursor("tickets", cursor("2024-03-01T00:00:00Z"))
        .await
        .unwrap();
    manager
        .advance_cursor("spam_tickets", cursor("2024-01-01T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(
        manager.cursor("tickets").await,
        Some(cursor("2024-03-01T00:00:00Z"))
    );
    assert_eq!(
        manager.cursor("spam_tickets").await,
        Some(cursor("2024-01-01T00:00:00Z"))
    );
    assert!(manager.cursor("deleted_tickets").await.is_none());
}

#[tokio::test]
async fn test_unparseable_cursor_is_ignored() {
    let manager = StateManager::from_json(r#"{"tickets": "last tuesday"}"#).unwrap();
    assert_eq!(
        manager.get_cursor("tickets").await.as_deref(),
        Some("last tuesday")
    );
    assert!(manager.cursor("tickets").await.is_none());
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    assert!(!path.exists());
    manager.save().await.unwrap();
    assert!(StateManager::from_file(&path).unwrap().snapshot().await.is_empty());

    manager
        .advance_cursor("tickets", cursor("2024-05-01T00:00:00Z"))
        .await
        .unwrap();

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_cursor("tickets").await,
        Some("2024-05-01T00:00:00Z".to_string())
    );
}

#[tokio::test]
async fn test_unchanged_cursor_does_not_rewrite_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"tickets": "2024-05-01T00:00:00Z"}"#).unwrap();

    let manager = StateManager::from_file(&path).unwrap();
    assert!(!manager
        .advance_cursor("tickets", cursor("2024-04-01T00:00:00Z"))
        .await
        .unwrap());

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"tickets": "2024-05-01T00:00:00Z"}"#
    );
}

#[tokio::test]
async fn test_auto_save_on_advance() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("auto_state.json");

    let manager = StateManager::new(&path);
    manager
        .advance_cursor("contacts", cursor("2024-05-01T00:00:00Z"))
        .await
        .unwrap();

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_cursor("contacts").await,
        Some("2024-05-01T00:00:00Z".to_string())
    );
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nonexistent.json");

    let manager = StateManager::from_file(&path).unwrap();

    assert!(manager.get_cursor("tickets").await.is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_save_in_memory_noop() {
    let manager = StateManager::in_memory();
    manager
        .advance_cursor("tickets", cursor("2024-05-01T00:00:00Z"))
        .await
        .unwrap();
    manager.save().await.unwrap();
}

#[tokio::test]
async fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("invalid.json");

    tokio::fs::write(&path, "{ invalid json }").await.unwrap();

    assert!(StateManager::from_file(&path).is_err());
}

// ============================================================================
// Clone Tests
// ============================================================================

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let cloned = manager.clone();

    manager
        .advance_cursor("groups", cursor("2024-05-01T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(
        cloned.get_cursor("groups").await,
        Some("2024-05-01T00:00:00Z".to_string())
    );
}

#[tokio::test]
async fn test_to_json() {
    let manager = StateManager::in_memory();
    manager
        .advance_cursor("tickets", cursor("2024-05-01T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(
        manager.to_json().await.unwrap(),
        r#"{"tickets":"2024-05-01T00:00:00Z"}"#
    );
}
