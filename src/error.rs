use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use crate::api::hal::{Link, Links, HAL_JSON};
use crate::domain::models::errors::Errors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Username not found: {0}")]
    UsernameNotFound(String),
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Validation failed")]
    Validation(Errors, Link),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("OAuth error: {}", .0.error)]
    OAuth(OAuthError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

/// RFC 6749 section 5.2 error body.
#[derive(Debug, Serialize)]
pub struct OAuthError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl OAuthError {
    pub fn invalid_client() -> Self {
        Self { status: StatusCode::UNAUTHORIZED, error: "invalid_client", error_description: Some("Bad client credentials".into()) }
    }

    pub fn invalid_grant(description: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, error: "invalid_grant", error_description: Some(description.into()) }
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, error: "invalid_request", error_description: Some(description.into()) }
    }

    pub fn unsupported_grant_type(grant_type: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "unsupported_grant_type",
            error_description: Some(format!("Unsupported grant type: {}", grant_type)),
        }
    }
}

impl From<OAuthError> for AppError {
    fn from(e: OAuthError) -> Self {
        AppError::OAuth(e)
    }
}

#[derive(Serialize)]
struct ErrorResource<'a> {
    errors: &'a [crate::domain::models::errors::ObjectError],
    #[serde(rename = "_links")]
    links: Links,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Validation(errors, index) => {
                let body = ErrorResource {
                    errors: errors.errors(),
                    links: Links::new().with("index", index.clone()),
                };
                return (
                    StatusCode::BAD_REQUEST,
                    [(header::CONTENT_TYPE, HAL_JSON)],
                    Json(body),
                ).into_response();
            }
            AppError::OAuth(e) => {
                let mut response = (e.status, Json(e)).into_response();
                if e.status == StatusCode::UNAUTHORIZED {
                    response.headers_mut().insert(
                        header::WWW_AUTHENTICATE,
                        header::HeaderValue::from_static("Basic realm=\"oauth2/client\""),
                    );
                }
                return response;
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::UsernameNotFound(username) => (StatusCode::UNAUTHORIZED, format!("Username not found: {}", username)),
            AppError::BadCredentials => (StatusCode::UNAUTHORIZED, "Bad credentials".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
