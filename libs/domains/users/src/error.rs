use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn not_found_by_id(id: i64) -> Self {
        UserError::NotFound(format!("User not found with id: {}", id))
    }

    pub fn not_found_by_email(email: &str) -> Self {
        UserError::NotFound(format!("User not found with email: {}", email))
    }

    pub fn email_in_use(email: &str) -> Self {
        UserError::Conflict(format!("Email already in use: {}", email))
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(errors) => AppError::ValidationError(errors),
            UserError::NotFound(msg) => AppError::NotFound(msg),
            UserError::Conflict(msg) => AppError::Conflict(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
