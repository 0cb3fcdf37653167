//! Schoolmap library entry points.
//!
//! This crate owns the school domain: the [`School`] record, coordinate
//! parsing and great-circle distance, proximity ranking, and the
//! SQLite-backed [`SchoolStore`]. HTTP services should depend on the items
//! exported here instead of reimplementing behavior.
//!

pub mod db;
pub mod error;
pub mod geo;
pub mod pool;
pub mod school;

pub use db::{SchoolStore, StoreConfig};
pub use error::{Error, Result};
pub use geo::{distance_km, Axis, GeoPoint, EARTH_RADIUS_KM};
pub use pool::{SqliteConnectionManager, SqlitePool};
pub use school::{rank_by_distance, NewSchool, RankedSchool, School, SchoolId};
