//! Request handlers for the school endpoints.

use axum::{
    extract::{rejection::QueryRejection, FromRequest, Query, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};
use tracing::{debug, info};

use schoolmap_lib::rank_by_distance;
use schoolmap_service_shared::{
    record_request_rejected, record_school_created, record_schools_listed, AddSchoolForm,
    AddSchoolRequest, AddSchoolResponse, ApiError, AppState, ListSchoolsResponse, LocationQuery,
    ServiceResponse, Validate,
};

const ADD_SCHOOL: &str = "add_school";
const LIST_SCHOOLS: &str = "list_schools";

/// Body of `POST /addSchool`, either JSON or `application/x-www-form-urlencoded`.
///
/// Unreadable bodies are rejected with a 400 `{"error": ...}`.
#[derive(Debug)]
pub struct SchoolBody(pub AddSchoolRequest);

impl<S> FromRequest<S> for SchoolBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = if is_form(req.headers()) {
            Form::<AddSchoolForm>::from_request(req, state)
                .await
                .map(|Form(form)| AddSchoolRequest::from(form))
                .map_err(|rejection| format!("Invalid form body: {}", rejection.body_text()))
        } else {
            Json::<AddSchoolRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|rejection| format!("Invalid JSON body: {}", rejection.body_text()))
        };

        parsed.map(Self).map_err(|message| {
            record_request_rejected("validation_error", ADD_SCHOOL);
            ApiError::validation(message)
        })
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Handle `POST /addSchool`.
pub async fn add_school(
    State(state): State<AppState>,
    SchoolBody(request): SchoolBody,
) -> Result<ServiceResponse<AddSchoolResponse>, ApiError> {
    let school = request.validate().inspect_err(|_| {
        record_request_rejected("validation_error", ADD_SCHOOL);
    })?;

    let school = state.store().create(school).await.map_err(|err| {
        record_request_rejected("storage_error", ADD_SCHOOL);
        ApiError::from_lib_error(err, "adding school")
    })?;

    record_school_created();
    info!(school_id = school.id, name = %school.name, "school created");

    Ok(ServiceResponse::created(
        "School added successfully",
        AddSchoolResponse::from(school),
    ))
}

/// Handle `GET /listSchools?latitude=..&longitude=..`.
///
/// The location is validated before the store is touched.
pub async fn list_schools(
    State(state): State<AppState>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<ServiceResponse<ListSchoolsResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        record_request_rejected("validation_error", LIST_SCHOOLS);
        ApiError::validation(format!("Invalid query string: {}", rejection.body_text()))
    })?;

    let origin = query.validate().inspect_err(|_| {
        record_request_rejected("validation_error", LIST_SCHOOLS);
    })?;

    let schools = state.store().list_all().await.map_err(|err| {
        record_request_rejected("storage_error", LIST_SCHOOLS);
        ApiError::from_lib_error(err, "fetching schools")
    })?;

    let ranked = rank_by_distance(origin, schools);
    record_schools_listed(ranked.len());
    debug!(
        latitude = origin.latitude(),
        longitude = origin.longitude(),
        count = ranked.len(),
        "schools ranked"
    );

    Ok(ServiceResponse::ok(
        "Schools retrieved successfully",
        ListSchoolsResponse {
            user_location: origin,
            schools: ranked,
        },
    ))
}

/// Fallback for unmatched paths and methods.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_is_form() {
        assert!(is_form(&headers("application/x-www-form-urlencoded")));
        assert!(is_form(&headers("Application/X-WWW-Form-Urlencoded; charset=utf-8")));
        assert!(!is_form(&headers("application/json")));
        assert!(!is_form(&HeaderMap::new()));
    }
}
