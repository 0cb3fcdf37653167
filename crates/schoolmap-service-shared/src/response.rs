//! Response wrapper for successful HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use schoolmap_lib::{GeoPoint, RankedSchool, School, SchoolId};

/// Successful response: a human-readable `message` next to the payload fields.
///
/// # Example
///
/// ```
/// use schoolmap_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Count {
///     total: usize,
/// }
///
/// let response = ServiceResponse::ok("Counted", Count { total: 3 });
/// let json = serde_json::to_string(&response).unwrap();
/// assert_eq!(json, r#"{"message":"Counted","total":3}"#);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub message: String,

    #[serde(flatten)]
    pub data: T,

    #[serde(skip, default = "default_status")]
    pub status: u16,
}

fn default_status() -> u16 {
    StatusCode::OK.as_u16()
}

impl<T> ServiceResponse<T> {
    /// 200 OK response.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 Created response.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            status: status.as_u16(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Payload of `POST /addSchool`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSchoolResponse {
    pub school_id: SchoolId,
    pub school: School,
}

impl From<School> for AddSchoolResponse {
    fn from(school: School) -> Self {
        Self {
            school_id: school.id,
            school,
        }
    }
}

/// Payload of `GET /listSchools`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSchoolsResponse {
    /// The validated query location.
    pub user_location: GeoPoint,
    /// Schools sorted nearest first.
    pub schools: Vec<RankedSchool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn school() -> School {
        School {
            id: 7,
            name: "Lakeside".to_string(),
            address: "3 Shore Road".to_string(),
            latitude: 10.0,
            longitude: 20.0,
        }
    }

    #[test]
    fn test_created_status() {
        let response = ServiceResponse::created("School added successfully", ());
        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(
            ServiceResponse::ok("x", ()).status_code(),
            StatusCode::OK
        );
    }

    #[test]
    fn test_add_school_shape() {
        let response =
            ServiceResponse::created("School added successfully", AddSchoolResponse::from(school()));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "message": "School added successfully",
                "schoolId": 7,
                "school": {
                    "id": 7,
                    "name": "Lakeside",
                    "address": "3 Shore Road",
                    "latitude": 10.0,
                    "longitude": 20.0
                }
            })
        );
    }

    #[test]
    fn test_list_schools_shape() {
        let payload = ListSchoolsResponse {
            user_location: GeoPoint::new(1.5, 2.5).unwrap(),
            schools: vec![RankedSchool {
                school: school(),
                distance: 99.5,
            }],
        };
        let value =
            serde_json::to_value(ServiceResponse::ok("Schools retrieved successfully", payload))
                .unwrap();

        assert_eq!(value["message"], "Schools retrieved successfully");
        assert_eq!(value["userLocation"], json!({"latitude": 1.5, "longitude": 2.5}));
        assert_eq!(value["schools"][0]["id"], 7);
        assert_eq!(value["schools"][0]["distance"], 99.5);
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_into_response_uses_status() {
        let response =
            ServiceResponse::created("made", AddSchoolResponse::from(school())).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
