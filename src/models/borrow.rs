//! Borrow record model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrow record from database
///
/// A record is "open" while `return_date` is absent and transitions to
/// "closed" exactly once, via the return endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl BorrowRecord {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Borrow record with book/user context and accrued cost
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub book_id: i32,
    pub book_name: String,
    pub isbn: String,
    pub user_id: i32,
    pub username: String,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    /// Cost accrued so far (open borrows are evaluated against today)
    pub cost: i64,
}

/// Create borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrow {
    pub book_id: i32,
    pub user_id: i32,
    /// Defaults to today when omitted; must not be in the future
    pub issue_date: Option<NaiveDate>,
}
