//! Authentication endpoints: token issuance, revocation, identity

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::User};

use super::AuthenticatedUser;

/// Token request
#[derive(Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    /// Opaque bearer token
    pub token: String,
    pub token_type: String,
    /// Expiration instant (ISO 8601)
    pub expires_at: DateTime<Utc>,
}

/// Issue (or refresh) a bearer token for a user
///
/// Repeated calls while the current token still has more than the refresh
/// window of validity left return the same token.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn issue_token(
    State(state): State<crate::AppState>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let (grant, _user) = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(TokenResponse {
        token: grant.token,
        token_type: "Bearer".to_string(),
        expires_at: grant.expires_at,
    }))
}

/// Revoke the caller's token
#[utoipa::path(
    delete,
    path = "/auth/token",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn revoke_token(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.auth.revoke(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the authenticated user's own record
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
