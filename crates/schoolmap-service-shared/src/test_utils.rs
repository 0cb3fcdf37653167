//! Test utilities for handler testing.
//!
//! Builders for [`AppState`] backed by an in-memory store, an on-disk store
//! in a temporary directory, a store whose table was never created (every
//! query fails, which exercises the 500 paths), or a store whose database
//! cannot be opened at all.

use std::time::Duration;

use tempfile::TempDir;

use schoolmap_lib::{
    GeoPoint, NewSchool, School, SchoolStore, SqliteConnectionManager, SqlitePool, StoreConfig,
};

use crate::state::AppState;

/// In-memory state with the schools table in place.
///
/// # Panics
///
/// Panics if SQLite cannot open an in-memory database.
pub async fn test_state() -> AppState {
    let store = SchoolStore::open_in_memory()
        .unwrap_or_else(|e| panic!("failed to open in-memory store: {e}"));
    store
        .ensure_schema()
        .await
        .unwrap_or_else(|e| panic!("failed to create schema: {e}"));
    AppState::new(store)
}

/// In-memory state without a schools table. Reads and writes fail with a
/// storage error while the pool itself stays healthy.
pub fn unbootstrapped_state() -> AppState {
    let store = SchoolStore::open_in_memory()
        .unwrap_or_else(|e| panic!("failed to open in-memory store: {e}"));
    AppState::new(store)
}

/// State whose database file lives in a directory that does not exist.
/// Every connection checkout fails after a short wait, so readiness reports
/// the store as unreachable.
pub fn unreachable_state() -> AppState {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let path = dir.path().join("missing").join("schools.db");

    let pool = SqlitePool::builder()
        .max_size(1)
        .min_idle(Some(0))
        .connection_timeout(Duration::from_millis(200))
        .build_unchecked(SqliteConnectionManager::file(path));
    AppState::new(SchoolStore::from_pool(pool))
}

/// On-disk state with `pool_size` connections. Keep the returned directory
/// alive for as long as the state is used.
pub async fn temp_file_state(pool_size: usize) -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let config = StoreConfig::default()
        .with_path(dir.path().join("schools.db"))
        .with_pool_size(pool_size);
    let state = AppState::open(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to open temp store: {e}"));
    (dir, state)
}

/// Insert a school directly through the store.
pub async fn seed_school(
    state: &AppState,
    name: &str,
    latitude: f64,
    longitude: f64,
) -> School {
    let location = GeoPoint::new(latitude, longitude)
        .unwrap_or_else(|e| panic!("bad fixture coordinates: {e}"));
    state
        .store()
        .create(NewSchool::new(name, format!("{name} Road"), location))
        .await
        .unwrap_or_else(|e| panic!("failed to seed school: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_starts_empty() {
        let state = test_state().await;
        assert!(state.store().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unbootstrapped_state_fails_queries() {
        let state = unbootstrapped_state();
        assert!(state.store().list_all().await.is_err());
        assert!(state.store().ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_state_fails_ping() {
        let state = unreachable_state();
        assert!(state.store().ping().await.is_err());
    }

    #[tokio::test]
    async fn test_temp_file_state_and_seed() {
        let (_dir, state) = temp_file_state(3).await;
        let school = seed_school(&state, "Hillview", 12.5, 77.5).await;

        assert_eq!(school.address, "Hillview Road");
        assert_eq!(state.store().pool().max_size(), 3);
        assert_eq!(state.store().list_all().await.unwrap(), vec![school]);
    }
}
