//! Geographic coordinates and great-circle distance.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: kilometres on a spherical earth

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// One of the two coordinate axes, with its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn min(self) -> f64 {
        match self {
            Axis::Latitude => -90.0,
            Axis::Longitude => -180.0,
        }
    }

    pub fn max(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    /// Check that `value` is finite and inside this axis' closed range.
    pub fn check(self, value: f64) -> Result<f64> {
        if value.is_finite() && (self.min()..=self.max()).contains(&value) {
            Ok(value)
        } else {
            Err(Error::InvalidCoordinate { axis: self })
        }
    }

    /// Parse a textual coordinate.
    ///
    /// The whole trimmed string must be a number: `"12abc"` is rejected rather
    /// than truncated to 12. NaN and infinities are rejected as well.
    ///
    /// ```
    /// use schoolmap_lib::Axis;
    ///
    /// assert_eq!(Axis::Latitude.parse(" 45.5 ").unwrap(), 45.5);
    /// assert!(Axis::Latitude.parse("91").is_err());
    /// assert!(Axis::Longitude.parse("12abc").is_err());
    /// ```
    pub fn parse(self, raw: &str) -> Result<f64> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidCoordinate { axis: self })?;
        self.check(value)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Axis::Latitude => "Latitude",
            Axis::Longitude => "Longitude",
        };
        f.write_str(value)
    }
}

/// A validated (latitude, longitude) pair in degrees.
///
/// Deserialization applies the same range checks as [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawGeoPoint) -> Result<Self> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: Axis::Latitude.check(latitude)?,
            longitude: Axis::Longitude.check(longitude)?,
        })
    }

    /// Build a point from raw text, using the same rules as [`Axis::parse`].
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        Ok(Self {
            latitude: Axis::Latitude.parse(latitude)?,
            longitude: Axis::Longitude.parse(longitude)?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point in kilometres.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_km(*self, *other)
    }
}

/// Great-circle distance between two points in kilometres (haversine).
///
/// ```
/// use schoolmap_lib::{distance_km, GeoPoint};
///
/// let equator = GeoPoint::new(0.0, 0.0).unwrap();
/// let one_north = GeoPoint::new(1.0, 0.0).unwrap();
/// let d = distance_km(equator, one_north);
/// assert!((d - 111.19).abs() < 0.1);
/// ```
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1.0 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}
