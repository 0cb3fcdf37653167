//! Application state for the HTTP service.
//!
//! Handlers reach the store only through this struct, which `main` builds
//! once and hands to the router with `Router::with_state`.

use schoolmap_lib::{SchoolStore, StoreConfig};

/// Shared application state for all axum handlers.
///
/// Cloning is cheap: the store's connection pool sits behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use schoolmap_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let schools = state.store().list_all().await;
/// }
///
/// let state = AppState::open(&StoreConfig::default()).await?;
/// let app = Router::new()
///     .route("/listSchools", get(handler))
///     .with_state(state);
/// ```
#[derive(Debug, Clone)]
pub struct AppState {
    store: SchoolStore,
}

impl AppState {
    /// Wrap an already opened store.
    pub fn new(store: SchoolStore) -> Self {
        Self { store }
    }

    /// Open the store described by `config` and make sure its table exists.
    pub async fn open(config: &StoreConfig) -> schoolmap_lib::Result<Self> {
        let store = SchoolStore::open(config)?;
        store.ensure_schema().await?;
        tracing::info!(
            path = %config.path.display(),
            pool_size = config.pool_size,
            "school store ready"
        );
        Ok(Self::new(store))
    }

    /// Access the school store.
    pub fn store(&self) -> &SchoolStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_bootstraps_schema() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::default()
            .with_path(dir.path().join("nested/schools.db"))
            .with_pool_size(2);

        let state = AppState::open(&config).await.unwrap();
        assert!(state.store().list_all().await.unwrap().is_empty());
        assert_eq!(state.store().pool().max_size(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let state = AppState::new(SchoolStore::open_in_memory().unwrap());
        state.store().ensure_schema().await.unwrap();
        let other = state.clone();

        let location = schoolmap_lib::GeoPoint::new(1.0, 1.0).unwrap();
        other
            .store()
            .create(schoolmap_lib::NewSchool::new("A", "B", location))
            .await
            .unwrap();

        assert_eq!(state.store().list_all().await.unwrap().len(), 1);
    }
}
