use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub enum DatabaseError {
    ServerError,
}

pub enum ApiError {
    Validation(&'static str),
    Conflict(&'static str),
    NotFound(&'static str),
    CooldownActive,
    ServerError,
}

impl From<DatabaseError> for ApiError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::ServerError => Self::ServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::Conflict(message) => (StatusCode::CONFLICT, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::CooldownActive => (StatusCode::TOO_MANY_REQUESTS, "Check-in cooldown active"),
            Self::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
