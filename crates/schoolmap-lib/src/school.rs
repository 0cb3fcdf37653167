//! School records and proximity ranking.

use serde::{Deserialize, Serialize};

use crate::geo::{distance_km, GeoPoint};

/// Numeric identifier assigned by the store.
pub type SchoolId = i64;

/// A persisted school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl School {
    /// Location of the school as a [`GeoPoint`].
    ///
    /// Records are validated before persistence, so this only fails for rows
    /// written to the database by something other than this crate.
    pub fn location(&self) -> crate::Result<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Validated input for creating a school.
///
/// `name` and `address` are expected to be trimmed and non-empty; the request
/// layer guarantees that before building one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
}

impl NewSchool {
    pub fn new(name: impl Into<String>, address: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            location,
        }
    }

    /// Attach the identifier assigned by the store.
    pub fn into_school(self, id: SchoolId) -> School {
        School {
            id,
            name: self.name,
            address: self.address,
            latitude: self.location.latitude(),
            longitude: self.location.longitude(),
        }
    }
}

/// A school annotated with its distance to a query location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSchool {
    #[serde(flatten)]
    pub school: School,
    /// Distance from the query location in kilometres.
    pub distance: f64,
}

/// Annotate every school with its distance from `origin` and sort nearest first.
///
/// The sort is stable, so schools at equal distance keep their input order.
pub fn rank_by_distance(origin: GeoPoint, schools: Vec<School>) -> Vec<RankedSchool> {
    let mut ranked: Vec<RankedSchool> = schools
        .into_iter()
        .map(|school| {
            let distance = distance_between(origin, &school);
            RankedSchool { school, distance }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

fn distance_between(origin: GeoPoint, school: &School) -> f64 {
    match school.location() {
        Ok(location) => distance_km(origin, location),
        Err(_) => {
            tracing::warn!(
                school_id = school.id,
                latitude = school.latitude,
                longitude = school.longitude,
                "stored school has out-of-range coordinates; ranking it last"
            );
            f64::INFINITY
        }
    }
}
