//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Entity},
    models::{
        author::{AuthorQuery, AuthorSummary, CreateAuthor, UpdateAuthor},
        Author, Book,
    },
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(Entity::Author, format!("Author with id {} not found", id))
            })
    }

    /// Check if an author name is already taken
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM authors WHERE LOWER(name) = LOWER($1) AND id != $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE LOWER(name) = LOWER($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Search authors with pagination
    pub async fn search(&self, query: &AuthorQuery) -> AppResult<(Vec<AuthorSummary>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let name_filter = query.name.as_ref().map(|n| format!("%{}%", n.to_lowercase()));

        let total: i64 = if let Some(ref pattern) = name_filter {
            sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE LOWER(name) LIKE $1")
                .bind(pattern)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT COUNT(*) FROM authors")
                .fetch_one(&self.pool)
                .await?
        };

        let select = r#"
            SELECT a.id, a.name,
                   (SELECT COUNT(*) FROM books b WHERE b.author_id = a.id) as nb_books
            FROM authors a
        "#;

        let authors = if let Some(ref pattern) = name_filter {
            sqlx::query_as::<_, AuthorSummary>(&format!(
                "{select} WHERE LOWER(a.name) LIKE $1 ORDER BY a.name LIMIT $2 OFFSET $3"
            ))
            .bind(pattern)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, AuthorSummary>(&format!(
                "{select} ORDER BY a.name LIMIT $1 OFFSET $2"
            ))
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        Ok((authors, total))
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id",
        )
        .bind(&author.name)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing author
    pub async fn update(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        sqlx::query("UPDATE authors SET name = COALESCE($2, name) WHERE id = $1")
            .bind(id)
            .bind(&author.name)
            .execute(&self.pool)
            .await?;

        self.get_by_id(id).await
    }

    /// Get all books by an author
    pub async fn get_books(&self, id: i32) -> AppResult<Vec<Book>> {
        let books =
            sqlx::query_as::<_, Book>("SELECT * FROM books WHERE author_id = $1 ORDER BY name")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(books)
    }
}
