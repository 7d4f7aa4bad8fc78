use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wall-clock format of [`Envelope::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Success wrapper around every non-empty 2xx body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// Request path the body answers.
    pub path: String,
    /// Local time the response was built, `YYYY-MM-DD hh:mm:ss`.
    pub timestamp: String,
    pub status: u16,
    /// Always `"success"`; failures are rendered as Problem Details instead.
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(status: StatusCode, path: impl Into<String>, data: T) -> Self {
        Self {
            path: path.into(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            status: status.as_u16(),
            message: "success".to_string(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Short aliases for JSON responses
pub type JsonBody<T> = Json<T>;
pub type JsonPage<T> = Envelope<page_core::Page<T>>;

/// 200 OK wrapped in the envelope
pub fn ok_json<T: Serialize>(path: &str, value: T) -> Envelope<T> {
    Envelope::new(StatusCode::OK, path, value)
}

/// 201 Created wrapped in the envelope
pub fn created_json<T: Serialize>(path: &str, value: T) -> Envelope<T> {
    Envelope::new(StatusCode::CREATED, path, value)
}

/// 204 No Content
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Convert any IntoResponse into a concrete Response (useful for unified signatures)
pub fn to_response<R: IntoResponse>(r: R) -> Response {
    r.into_response()
}
