//! Borrow records repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult, Entity},
    models::borrow::{BorrowDetails, BorrowRecord},
};

/// A joined borrow row before cost evaluation
#[derive(Debug, Clone)]
pub struct BorrowJoined {
    pub id: i32,
    pub book_id: i32,
    pub book_name: String,
    pub isbn: String,
    pub user_id: i32,
    pub username: String,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl BorrowJoined {
    pub fn into_details(self, cost: i64) -> BorrowDetails {
        BorrowDetails {
            id: self.id,
            book_id: self.book_id,
            book_name: self.book_name,
            isbn: self.isbn,
            user_id: self.user_id,
            username: self.username,
            issue_date: self.issue_date,
            return_date: self.return_date,
            cost,
        }
    }
}

const JOINED_SELECT: &str = r#"
    SELECT br.id, br.book_id, br.user_id, br.issue_date, br.return_date,
           b.name as book_name, b.isbn, u.username
    FROM borrow_records br
    JOIN books b ON br.book_id = b.id
    JOIN users u ON br.user_id = u.id
"#;

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(Entity::Borrow, format!("Borrow record with id {} not found", id))
            })
    }

    /// Get borrow record with book and user context
    pub async fn get_joined(&self, id: i32) -> AppResult<BorrowJoined> {
        let row = sqlx::query(&format!("{JOINED_SELECT} WHERE br.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(Entity::Borrow, format!("Borrow record with id {} not found", id))
            })?;

        Ok(row_to_joined(&row))
    }

    /// Get all borrow records for a user, most recent first
    pub async fn get_user_borrows(&self, user_id: i32) -> AppResult<Vec<BorrowJoined>> {
        let rows = sqlx::query(&format!(
            "{JOINED_SELECT} WHERE br.user_id = $1 ORDER BY br.issue_date DESC, br.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_joined).collect())
    }

    /// Whether an open borrow exists for the given book
    pub async fn book_is_borrowed(&self, book_id: i32) -> AppResult<bool> {
        let borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_records WHERE book_id = $1 AND return_date IS NULL)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(borrowed)
    }

    /// Create a new borrow record
    pub async fn create(&self, book_id: i32, user_id: i32, issue_date: NaiveDate) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO borrow_records (book_id, user_id, issue_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(issue_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Close a borrow record by setting its return date
    pub async fn set_return_date(&self, id: i32, return_date: NaiveDate) -> AppResult<()> {
        sqlx::query("UPDATE borrow_records SET return_date = $2 WHERE id = $1")
            .bind(id)
            .bind(return_date)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_joined(row: &sqlx::postgres::PgRow) -> BorrowJoined {
    BorrowJoined {
        id: row.get("id"),
        book_id: row.get("book_id"),
        book_name: row.get("book_name"),
        isbn: row.get("isbn"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        issue_date: row.get("issue_date"),
        return_date: row.get("return_date"),
    }
}
