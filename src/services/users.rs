//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserQuery, UserSummary},
    repository::Repository,
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Search users
    pub async fn search(&self, query: &UserQuery) -> AppResult<(Vec<UserSummary>, i64)> {
        self.repository.users.search(query).await
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        if self
            .repository
            .users
            .username_exists(&user.username, None)
            .await?
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, None).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = hash_password(&user.password)?;
        self.repository.users.create(&user, &password_hash).await
    }

    /// Update an existing user
    pub async fn update(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        self.repository.users.get_by_id(id).await?;

        if let Some(ref username) = user.username {
            if self
                .repository
                .users
                .username_exists(username, Some(id))
                .await?
            {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }

        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = match user.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        self.repository.users.update(id, &user, password_hash).await
    }
}
