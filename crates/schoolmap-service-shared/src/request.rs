//! Request types and validation for HTTP endpoints.
//!
//! Raw request types accept whatever the caller sent; [`Validate::validate`]
//! turns them into typed values from `schoolmap-lib` or rejects them with a
//! message naming the failed constraint. Nothing untyped reaches a handler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use schoolmap_lib::{Axis, Error as LibError, GeoPoint, NewSchool};

use crate::ApiError;

/// Validation trait for request types.
///
/// Implementations check every field and either return the typed value the
/// handler works with or an [`ApiError::Validation`] for the first failed
/// constraint.
pub trait Validate {
    /// Typed value produced on success.
    type Output;

    fn validate(&self) -> Result<Self::Output, ApiError>;
}

/// Body of `POST /addSchool` as received.
///
/// Fields are kept as raw JSON so that a missing field, a wrong type, and an
/// out-of-range value each get their own message. Coordinates may be JSON
/// numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddSchoolRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

/// Form-encoded body of `POST /addSchool`.
///
/// Every value arrives as text; converting into [`AddSchoolRequest`] keeps
/// them as JSON strings so they go through the same checks as a JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddSchoolForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl From<AddSchoolForm> for AddSchoolRequest {
    fn from(form: AddSchoolForm) -> Self {
        Self {
            name: form.name.map(Value::String),
            address: form.address.map(Value::String),
            latitude: form.latitude.map(Value::String),
            longitude: form.longitude.map(Value::String),
        }
    }
}

const REQUIRED_SCHOOL_FIELDS: &str = "name, address, latitude, longitude";

impl Validate for AddSchoolRequest {
    type Output = NewSchool;

    fn validate(&self) -> Result<NewSchool, ApiError> {
        let fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ApiError::validation(format!(
                "All fields are required: {REQUIRED_SCHOOL_FIELDS} (missing: {})",
                missing.join(", ")
            )));
        }

        let name = non_empty_text(present(&self.name), "Name")?;
        let address = non_empty_text(present(&self.address), "Address")?;
        let latitude = coordinate(present(&self.latitude), Axis::Latitude)?;
        let longitude = coordinate(present(&self.longitude), Axis::Longitude)?;

        let location = GeoPoint::new(latitude, longitude)
            .map_err(|err| ApiError::validation(err.to_string()))?;

        Ok(NewSchool::new(name, address, location))
    }
}

/// Query string of `GET /listSchools` as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Validate for LocationQuery {
    type Output = GeoPoint;

    fn validate(&self) -> Result<GeoPoint, ApiError> {
        let provided = |raw: &Option<String>| {
            raw.as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let (Some(latitude), Some(longitude)) =
            (provided(&self.latitude), provided(&self.longitude))
        else {
            return Err(ApiError::validation(
                "Both latitude and longitude query parameters are required",
            ));
        };

        GeoPoint::parse(&latitude, &longitude).map_err(|err| ApiError::validation(err.to_string()))
    }
}

/// JSON `null` counts as absent.
fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

fn non_empty_text(value: Option<&Value>, label: &str) -> Result<String, ApiError> {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ApiError::validation(format!(
            "{label} must be a non-empty string"
        ))),
    }
}

fn coordinate(value: Option<&Value>, axis: Axis) -> Result<f64, ApiError> {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or(LibError::InvalidCoordinate { axis })
            .and_then(|v| axis.check(v)),
        Some(Value::String(text)) => axis.parse(text),
        _ => Err(LibError::InvalidCoordinate { axis }),
    };
    parsed.map_err(|err| ApiError::validation(err.to_string()))
}
