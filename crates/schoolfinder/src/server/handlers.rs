//! Request handlers and the mapping from crate errors to HTTP responses.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::AppState;
use crate::error::Error;
use crate::school::{RankedSchool, SchoolSubmission};
use crate::service;

/// Body returned after a school is stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddSchoolResponse {
    /// Confirmation text.
    pub message: String,
    /// Identifier assigned by the store.
    pub id: i64,
}

/// Body returned by the proximity listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListSchoolsResponse {
    /// Number of schools returned.
    pub count: usize,
    /// Schools nearest first.
    pub schools: Vec<RankedSchool>,
}

/// Raw query parameters for the proximity listing.
///
/// Kept as text so that parsing goes through the validator.
#[derive(Debug, Default, Deserialize)]
pub struct ListSchoolsQuery {
    latitude: Option<String>,
    longitude: Option<String>,
}

/// An error on its way back to the client.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.reason, "field": err.field })),
            )
                .into_response(),
            other => {
                error!(error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// `POST /addSchool`
pub async fn add_school(
    State(state): State<AppState>,
    Json(submission): Json<SchoolSubmission>,
) -> Result<(StatusCode, Json<AddSchoolResponse>), ApiError> {
    let id = state
        .with_storage(move |storage| service::add_school(storage, &submission))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddSchoolResponse {
            message: "School added successfully".to_string(),
            id,
        }),
    ))
}

/// `GET /listSchools?latitude=..&longitude=..`
pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<ListSchoolsQuery>,
) -> Result<Json<ListSchoolsResponse>, ApiError> {
    let ListSchoolsQuery {
        latitude,
        longitude,
    } = query;
    let schools = state
        .with_storage(move |storage| {
            service::list_schools(storage, latitude.as_deref(), longitude.as_deref())
        })
        .await?;

    Ok(Json(ListSchoolsResponse {
        count: schools.len(),
        schools,
    }))
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
