//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod borrows;
pub mod users;

use crate::{
    config::{AuthConfig, BorrowsConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
    pub users: users::UsersService,
    /// Kept for cross-cutting operations such as the readiness probe
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        borrows_config: BorrowsConfig,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone(), borrows_config),
            users: users::UsersService::new(repository.clone()),
            repository,
        }
    }
}
