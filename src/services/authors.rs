//! Author management service

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{AuthorQuery, AuthorSummary, CreateAuthor, UpdateAuthor},
        Author, Book,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Search authors
    pub async fn search(&self, query: &AuthorQuery) -> AppResult<(Vec<AuthorSummary>, i64)> {
        self.repository.authors.search(query).await
    }

    /// Create a new author
    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        if self
            .repository
            .authors
            .name_exists(&author.name, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Author with this name already exists".to_string(),
            ));
        }

        self.repository.authors.create(&author).await
    }

    /// Update an existing author
    pub async fn update(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await?;

        if let Some(ref name) = author.name {
            if self.repository.authors.name_exists(name, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Author with this name already exists".to_string(),
                ));
            }
        }

        self.repository.authors.update(id, &author).await
    }

    /// List all books by an author
    pub async fn get_books(&self, id: i32) -> AppResult<Vec<Book>> {
        self.repository.authors.get_by_id(id).await?;
        self.repository.authors.get_books(id).await
    }
}
