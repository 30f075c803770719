//! Users repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Entity},
    models::user::{CreateUser, UpdateUser, User, UserQuery, UserSummary},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::User, format!("User with id {} not found", id)))
    }

    /// Get user by username (primary authentication method)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by exact bearer token match
    pub async fn get_by_token(&self, token: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check if username already exists
    pub async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1) AND id != $2)",
            )
            .bind(username)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))")
                .bind(username)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Search users with pagination
    pub async fn search(&self, query: &UserQuery) -> AppResult<(Vec<UserSummary>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let name_filter = query.name.as_ref().map(|n| format!("%{}%", n.to_lowercase()));

        let total: i64 = if let Some(ref pattern) = name_filter {
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM users
                WHERE LOWER(username) LIKE $1
                   OR LOWER(firstname) LIKE $1
                   OR LOWER(lastname) LIKE $1
                "#,
            )
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await?
        };

        let select = r#"
            SELECT u.id, u.username, u.firstname, u.lastname,
                   (SELECT COUNT(*) FROM borrow_records b
                    WHERE b.user_id = u.id AND b.return_date IS NULL) as nb_open_borrows
            FROM users u
        "#;

        let users = if let Some(ref pattern) = name_filter {
            sqlx::query_as::<_, UserSummary>(&format!(
                r#"{select}
                WHERE LOWER(u.username) LIKE $1
                   OR LOWER(u.firstname) LIKE $1
                   OR LOWER(u.lastname) LIKE $1
                ORDER BY u.username
                LIMIT $2 OFFSET $3
                "#,
            ))
            .bind(pattern)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, UserSummary>(&format!(
                "{select} ORDER BY u.username LIMIT $1 OFFSET $2"
            ))
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        Ok((users, total))
    }

    /// Create a new user
    pub async fn create(&self, user: &CreateUser, password_hash: &str) -> AppResult<User> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (username, password, firstname, lastname, email, crea_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(password_hash)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing user
    pub async fn update(
        &self,
        id: i32,
        user: &UpdateUser,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                password = COALESCE($3, password),
                firstname = COALESCE($4, firstname),
                lastname = COALESCE($5, lastname),
                email = COALESCE($6, email),
                modif_date = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&user.username)
        .bind(&password_hash)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Store a freshly issued token and its expiration
    pub async fn set_token(
        &self,
        id: i32,
        token: &str,
        expiration: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE users SET token = $2, token_expiration = $3 WHERE id = $1")
            .bind(id)
            .bind(token)
            .bind(expiration)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Move the token expiration without touching the token value
    pub async fn set_token_expiration(&self, id: i32, expiration: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE users SET token_expiration = $2 WHERE id = $1")
            .bind(id)
            .bind(expiration)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
