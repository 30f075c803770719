//! API handlers for Biblio REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{author::AuthorSummary, book::BookSummary, user::UserSummary, User},
    AppState,
};

/// Paginated list response
#[derive(Serialize, ToSchema)]
#[aliases(
    PaginatedAuthors = PaginatedResponse<AuthorSummary>,
    PaginatedBooks = PaginatedResponse<BookSummary>,
    PaginatedUsers = PaginatedResponse<UserSummary>
)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Extractor for the user behind a bearer token
///
/// Resolves the `Authorization: Bearer <token>` header against the stored
/// tokens; unknown and expired tokens both reject with 401.
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

        let user = state.services.auth.validate(token).await?;

        Ok(AuthenticatedUser(user))
    }
}
