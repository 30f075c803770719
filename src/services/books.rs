//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookQuery, BookSummary, CreateBook, UpdateBook},
        Book,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Search books
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.search(query).await
    }

    /// Create a new book
    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        // The author must exist before the book can reference it
        self.repository.authors.get_by_id(book.author_id).await?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict("ISBN already registered".to_string()));
        }

        self.repository.books.create(&book).await
    }

    /// Update an existing book
    pub async fn update(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;

        if let Some(author_id) = book.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict("ISBN already registered".to_string()));
            }
        }

        self.repository.books.update(id, &book).await
    }
}
