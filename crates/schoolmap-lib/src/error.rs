use thiserror::Error;

use crate::geo::Axis;

/// Convenient result alias for the schoolmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate was non-numeric, non-finite, or outside its range.
    #[error("{axis} must be a valid number between {min} and {max}", min = .axis.min(), max = .axis.max())]
    InvalidCoordinate { axis: Axis },

    /// A connection pool must hold at least one connection.
    #[error("connection pool size must be at least 1, got {size}")]
    InvalidPoolSize { size: usize },

    /// No connection could be opened or checked out in time.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The blocking task running a query panicked or was cancelled.
    #[error("database task failed: {message}")]
    BlockingTask { message: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error comes from the backing store rather than from caller input.
    pub fn is_storage(&self) -> bool {
        !matches!(self, Error::InvalidCoordinate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinate_message_names_range() {
        let err = Error::InvalidCoordinate {
            axis: Axis::Latitude,
        };
        assert_eq!(
            err.to_string(),
            "Latitude must be a valid number between -90 and 90"
        );

        let err = Error::InvalidCoordinate {
            axis: Axis::Longitude,
        };
        assert_eq!(
            err.to_string(),
            "Longitude must be a valid number between -180 and 180"
        );
    }

    #[test]
    fn storage_classification() {
        assert!(Error::InvalidPoolSize { size: 0 }.is_storage());
        assert!(Error::BlockingTask {
            message: "cancelled".to_string()
        }
        .is_storage());
        assert!(!Error::InvalidCoordinate {
            axis: Axis::Latitude
        }
        .is_storage());
    }
}
