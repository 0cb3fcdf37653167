use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::pool::{open_file_pool, open_memory_pool, SqlitePool};
use crate::school::{NewSchool, School};

const CREATE_SCHOOLS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS schools (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL
    )";

/// Default database file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "school_management.db";

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Default time a connection waits on a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for opening a [`SchoolStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// Number of connections kept open.
    pub pool_size: usize,
    /// SQLite busy timeout applied to every connection.
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StoreConfig {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }
}

/// Create the `schools` table if it does not exist yet.
pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(CREATE_SCHOOLS_TABLE)?;
    Ok(())
}

/// Insert a validated school and return it with its assigned identifier.
pub fn insert_school(connection: &Connection, school: &NewSchool) -> Result<School> {
    connection.execute(
        "INSERT INTO schools (name, address, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
        params![
            school.name,
            school.address,
            school.location.latitude(),
            school.location.longitude()
        ],
    )?;
    let id = connection.last_insert_rowid();
    debug!(school_id = id, "inserted school");

    Ok(school.clone().into_school(id))
}

/// Load every stored school.
pub fn load_schools(connection: &Connection) -> Result<Vec<School>> {
    let mut stmt =
        connection.prepare("SELECT id, name, address, latitude, longitude FROM schools ORDER BY id")?;
    let rows = stmt.query_map([], row_to_school)?;

    let mut schools = Vec::new();
    for entry in rows {
        schools.push(entry?);
    }
    Ok(schools)
}

fn row_to_school(row: &Row<'_>) -> rusqlite::Result<School> {
    Ok(School {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
    })
}

/// SQLite-backed school repository.
///
/// The store owns a [`SqlitePool`] and is cheap to clone; every clone
/// shares the same pool. Each operation checks out one connection on the
/// blocking thread pool, runs its query there, and returns the connection
/// afterwards.
#[derive(Debug, Clone)]
pub struct SchoolStore {
    pool: SqlitePool,
}

impl SchoolStore {
    /// Open a file-backed store with `config.pool_size` connections.
    ///
    /// Missing parent directories are created. Connections use WAL journaling
    /// so readers do not block the single writer.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!(
            path = %config.path.display(),
            pool_size = config.pool_size,
            "opening school store"
        );
        let pool = open_file_pool(&config.path, config.pool_size, config.busy_timeout)?;
        Ok(Self { pool })
    }

    /// Open a private in-memory store backed by a single connection.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            pool: open_memory_pool()?,
        })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the backing table. Safe to call any number of times.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.with_connection(ensure_schema).await
    }

    /// Persist a new school and return the stored record.
    pub async fn create(&self, school: NewSchool) -> Result<School> {
        self.with_connection(move |conn| insert_school(conn, &school)).await
    }

    /// Every stored school. Callers must not rely on the order.
    pub async fn list_all(&self) -> Result<Vec<School>> {
        self.with_connection(load_schools).await
    }

    /// Round-trip a trivial query to check the database is reachable.
    pub async fn ping(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }

    async fn with_connection<T, F>(&self, query: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            query(&conn)
        })
        .await
        .map_err(|err| Error::BlockingTask {
            message: err.to_string(),
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    fn memory_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn new_school(name: &str, lat: f64, lon: f64) -> NewSchool {
        NewSchool::new(name, "1 High Street", GeoPoint::new(lat, lon).unwrap())
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = memory_connection();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schools'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_insert_assigns_ascending_ids() {
        let conn = memory_connection();
        let first = insert_school(&conn, &new_school("A", 1.0, 1.0)).unwrap();
        let second = insert_school(&conn, &new_school("B", 2.0, 2.0)).unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.name, "A");
        assert_eq!(second.latitude, 2.0);
    }

    #[test]
    fn test_load_schools_round_trips_fields() {
        let conn = memory_connection();
        let stored = insert_school(&conn, &new_school("Riverside", -33.8688, 151.2093)).unwrap();

        let loaded = load_schools(&conn).unwrap();
        assert_eq!(loaded, vec![stored]);
    }

    #[test]
    fn test_load_without_schema_fails() {
        let conn = Connection::open_in_memory().unwrap();
        let err = load_schools(&conn).unwrap_err();
        assert!(matches!(err, Error::Sqlite(_)));
        assert!(err.is_storage());
    }

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("school_management.db"));
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));

        let config = config.with_path("/tmp/x.db").with_pool_size(3);
        assert_eq!(config.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.pool_size, 3);
    }

    #[tokio::test]
    async fn test_in_memory_store_create_and_list() {
        let store = SchoolStore::open_in_memory().unwrap();
        store.ensure_schema().await.unwrap();

        let created = store.create(new_school("Hillcrest", 10.0, 20.0)).await.unwrap();
        let all = store.list_all().await.unwrap();

        assert_eq!(all, vec![created]);
        assert_eq!(store.pool().state().idle_connections, 1);
    }

    #[tokio::test]
    async fn test_store_error_releases_connection() {
        let store = SchoolStore::open_in_memory().unwrap();
        assert!(store.list_all().await.is_err());
        assert_eq!(store.pool().state().idle_connections, 1);
        store.ping().await.unwrap();
    }
}
