//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Entity},
    models::{
        book::{BookQuery, BookSummary, CreateBook, UpdateBook},
        Book,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Book, format!("Book with id {} not found", id)))
    }

    /// Check if an ISBN is already registered
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Search books with pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookSummary>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref name) = query.name {
            params.push(format!("%{}%", name.to_lowercase()));
            conditions.push(format!("LOWER(b.name) LIKE ${}", params.len()));
        }

        if let Some(ref isbn) = query.isbn {
            params.push(isbn.clone());
            conditions.push(format!("b.isbn = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM books b {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT b.id, b.name, b.isbn, b.author_id, a.name as author_name,
                   NOT EXISTS (
                       SELECT 1 FROM borrow_records br
                       WHERE br.book_id = b.id AND br.return_date IS NULL
                   ) as available
            FROM books b
            LEFT JOIN authors a ON b.author_id = a.id
            {}
            ORDER BY b.name
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );

        let mut select_builder = sqlx::query_as::<_, BookSummary>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO books (name, isbn, author_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&book.name)
        .bind(&book.isbn)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing book
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query(
            r#"
            UPDATE books SET
                name = COALESCE($2, name),
                isbn = COALESCE($3, isbn),
                author_id = COALESCE($4, author_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.name)
        .bind(&book.isbn)
        .bind(book.author_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }
}
