//! Maps `pictdb_core::Error` onto an HTTP response. Every failure surfaces as `500`
//! with a small JSON body; callers needing a different status for a given kind can
//! match on `.0` before the `IntoResponse` conversion runs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub struct HttpError(pub pictdb_core::Error);

impl From<pictdb_core::Error> for HttpError {
    fn from(e: pictdb_core::Error) -> Self {
        HttpError(e)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
