//! Error types for the Biblio server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    NoSuchAuthor = 6,
    NoSuchBorrow = 7,
    Duplicate = 8,
    BookBorrowed = 9,
    AlreadyReturned = 10,
    BadValue = 11,
}

/// Entity kind carried by lookup failures, so the wire-level error code
/// does not depend on message wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Author,
    Book,
    Borrow,
}

impl Entity {
    fn not_found_code(self) -> ErrorCode {
        match self {
            Entity::User => ErrorCode::NoSuchUser,
            Entity::Author => ErrorCode::NoSuchAuthor,
            Entity::Book => ErrorCode::NoSuchBook,
            Entity::Borrow => ErrorCode::NoSuchBorrow,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {1}")]
    NotFound(Entity, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Already returned: {0}")]
    AlreadyReturned(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::NotFound(entity, _) => entity.not_found_code(),
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::Internal(_) => ErrorCode::Failure,
            AppError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            AppError::BusinessRule(_) => ErrorCode::BookBorrowed,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(_, msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::AlreadyReturned(msg) | AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_follows_entity() {
        assert_eq!(
            AppError::NotFound(Entity::User, "User with id 3 not found".into()).code(),
            ErrorCode::NoSuchUser
        );
        assert_eq!(
            AppError::NotFound(Entity::Author, "Author with id 3 not found".into()).code(),
            ErrorCode::NoSuchAuthor
        );
        assert_eq!(
            AppError::NotFound(Entity::Borrow, "Borrow record with id 3 not found".into()).code(),
            ErrorCode::NoSuchBorrow
        );
        assert_eq!(
            AppError::NotFound(Entity::Book, "Book with id 3 not found".into()).code(),
            ErrorCode::NoSuchBook
        );
    }

    #[test]
    fn not_found_code_survives_rewording() {
        // Codes come from the entity, never from message text
        assert_eq!(
            AppError::NotFound(Entity::User, "No user with id 7".into()).code(),
            ErrorCode::NoSuchUser
        );
        assert_eq!(
            AppError::NotFound(Entity::Borrow, "Record with id 7 not found".into()).code(),
            ErrorCode::NoSuchBorrow
        );
    }

    #[test]
    fn returned_and_borrowed_map_to_distinct_codes() {
        assert_eq!(
            AppError::AlreadyReturned("Borrow record is already returned".into()).code(),
            ErrorCode::AlreadyReturned
        );
        assert_eq!(
            AppError::BusinessRule("Book is already borrowed".into()).code(),
            ErrorCode::BookBorrowed
        );
        // Wording changes do not move the code
        assert_eq!(
            AppError::AlreadyReturned("loan closed".into()).code(),
            ErrorCode::AlreadyReturned
        );
    }
}
