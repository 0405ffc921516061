//! The HTTP boundary translation (spec §7): every leaf crate fails with a
//! typed `IdentityError`; this is the single place that becomes a status
//! code and JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use identity_core::error::IdentityError;
use serde_json::json;

pub struct ApiError(pub IdentityError);

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
