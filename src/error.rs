use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ClimbwallError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("route {0} not found")]
    RouteNotFound(i64),

    #[error("no route at `{0}`")]
    MalformedRouteId(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("field `{0}` must not be empty")]
    MissingField(&'static str),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("stored value is invalid: {0}")]
    InvalidData(String),
}

impl IntoResponse for ClimbwallError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            ClimbwallError::RouteNotFound(id) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: format!("Route {id} does not exist."),
                },
            ),
            ClimbwallError::MalformedRouteId(raw) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: format!("Route {raw} does not exist."),
                },
            ),
            ClimbwallError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password.".to_string(),
                },
            ),
            ClimbwallError::DuplicateEmail(_) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "DUPLICATE_EMAIL".to_string(),
                    message: "A user with this email already exists.".to_string(),
                },
            ),
            ClimbwallError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "MISSING_FIELD".to_string(),
                    message: format!("Field `{field}` must not be empty."),
                },
            ),
            ClimbwallError::DatabaseError(_)
            | ClimbwallError::PasswordHash(_)
            | ClimbwallError::InvalidData(_) => {
                tracing::error!(error = %self, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
