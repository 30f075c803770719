//! Borrow management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow::{BorrowDetails, CreateBorrow},
};

use super::AuthenticatedUser;

/// Get all borrow records for a user, with accrued costs
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's borrow records", body = Vec<BorrowDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let borrows = state.services.borrows.get_user_borrows(user_id).await?;
    Ok(Json(borrows))
}

/// Get a borrow record with its accrued cost
#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow record", body = BorrowDetails),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowDetails>> {
    let borrow = state.services.borrows.get_details(id).await?;
    Ok(Json(borrow))
}

/// Issue a book to a user
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Book issued", body = BorrowDetails),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User or book not found"),
        (status = 422, description = "Book is already borrowed")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowDetails>)> {
    let borrow = state.services.borrows.create(request).await?;
    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowDetails),
        (status = 404, description = "Borrow record not found"),
        (status = 422, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowDetails>> {
    let borrow = state.services.borrows.return_borrow(id).await?;
    Ok(Json(borrow))
}
