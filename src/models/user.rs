//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Opaque bearer token, if one has been issued
    #[serde(skip_serializing)]
    pub token: Option<String>,
    #[serde(skip_serializing)]
    pub token_expiration: Option<DateTime<Utc>>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the stored token is live at `now`.
    ///
    /// Expiration is exclusive: a token whose expiration equals `now`
    /// is already invalid.
    pub fn token_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.token_expiration) {
            (Some(_), Some(exp)) => exp > now,
            _ => false,
        }
    }
}

/// Short user representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nb_open_borrows: Option<i64>,
}

/// User query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Filter on username, first name or last name (substring match)
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_token(token: Option<&str>, exp: Option<DateTime<Utc>>) -> User {
        User {
            id: 1,
            username: "alice".into(),
            firstname: None,
            lastname: None,
            email: None,
            password: None,
            token: token.map(String::from),
            token_expiration: exp,
            crea_date: None,
            modif_date: None,
        }
    }

    #[test]
    fn token_without_expiration_is_invalid() {
        let now = Utc::now();
        assert!(!user_with_token(Some("abc"), None).token_valid_at(now));
        assert!(!user_with_token(None, Some(now + Duration::hours(1))).token_valid_at(now));
    }

    #[test]
    fn expiration_boundary_is_exclusive() {
        let now = Utc::now();
        assert!(!user_with_token(Some("abc"), Some(now)).token_valid_at(now));
        assert!(user_with_token(Some("abc"), Some(now + Duration::seconds(1))).token_valid_at(now));
    }
}
