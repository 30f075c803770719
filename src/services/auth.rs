//! Authentication service: password checks and the bearer-token lifecycle
//!
//! Tokens are opaque 24-byte random values, base64-encoded, stored on the
//! user row together with their expiration. A single token per user exists
//! at any time.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::User,
    repository::Repository,
};

/// An issued token and its expiration instant
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, then issue or refresh a token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(TokenGrant, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let grant = self.issue_or_refresh(&user).await?;
        Ok((grant, user))
    }

    /// Return the user's live token, or mint a new one
    ///
    /// A token whose remaining validity exceeds the refresh window is
    /// handed back unchanged, so clients polling for a token do not churn
    /// through fresh values on every call.
    pub async fn issue_or_refresh(&self, user: &User) -> AppResult<TokenGrant> {
        let now = Utc::now();

        if let Some(grant) = reusable_grant(user, now, self.config.refresh_window_seconds) {
            return Ok(grant);
        }

        let token = generate_token();
        let expires_at = now + Duration::seconds(self.config.token_ttl_seconds);

        self.repository
            .users
            .set_token(user.id, &token, expires_at)
            .await?;

        tracing::debug!(user_id = user.id, "Issued new token");

        Ok(TokenGrant { token, expires_at })
    }

    /// Invalidate the user's token without deleting its value
    ///
    /// The expiration is moved one second into the past, so a subsequent
    /// `validate` with the same token fails.
    pub async fn revoke(&self, user_id: i32) -> AppResult<()> {
        let expiration = Utc::now() - Duration::seconds(1);
        self.repository
            .users
            .set_token_expiration(user_id, expiration)
            .await?;

        tracing::debug!(user_id, "Token revoked");

        Ok(())
    }

    /// Resolve a bearer token to its user
    ///
    /// Unknown and expired tokens collapse into the same negative result.
    pub async fn validate(&self, token: &str) -> AppResult<User> {
        let user = self
            .repository
            .users
            .get_by_token(token)
            .await?
            .filter(|u| u.token_valid_at(Utc::now()))
            .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

        Ok(user)
    }
}

/// Decide whether the stored token can be handed back as-is
fn reusable_grant(user: &User, now: DateTime<Utc>, refresh_window_seconds: i64) -> Option<TokenGrant> {
    match (&user.token, user.token_expiration) {
        (Some(token), Some(expiration))
            if expiration > now + Duration::seconds(refresh_window_seconds) =>
        {
            Some(TokenGrant {
                token: token.clone(),
                expires_at: expiration,
            })
        }
        _ => None,
    }
}

/// Generate a fresh opaque token from the OS random source
fn generate_token() -> String {
    let mut bytes = [0u8; 24];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify user password against the stored argon2 hash
pub fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    if let Some(ref hash) = user.password {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        return Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok());
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(token: Option<&str>, expiration: Option<DateTime<Utc>>) -> User {
        User {
            id: 1,
            username: "alice".into(),
            firstname: None,
            lastname: None,
            email: None,
            password: None,
            token: token.map(String::from),
            token_expiration: expiration,
            crea_date: None,
            modif_date: None,
        }
    }

    #[test]
    fn live_token_outside_window_is_reused() {
        let now = Utc::now();
        let u = user(Some("tok"), Some(now + Duration::seconds(61)));
        let grant = reusable_grant(&u, now, 60).expect("token should be reused");
        assert_eq!(grant.token, "tok");
        assert_eq!(grant.expires_at, u.token_expiration.unwrap());
    }

    #[test]
    fn token_inside_refresh_window_is_replaced() {
        let now = Utc::now();
        // 60 s remaining is not strictly more than the window
        let u = user(Some("tok"), Some(now + Duration::seconds(60)));
        assert!(reusable_grant(&u, now, 60).is_none());

        let u = user(Some("tok"), Some(now + Duration::seconds(30)));
        assert!(reusable_grant(&u, now, 60).is_none());
    }

    #[test]
    fn expired_or_absent_token_is_replaced() {
        let now = Utc::now();
        assert!(reusable_grant(&user(None, None), now, 60).is_none());
        assert!(reusable_grant(&user(Some("tok"), None), now, 60).is_none());
        assert!(reusable_grant(&user(Some("tok"), Some(now - Duration::seconds(1))), now, 60).is_none());
    }

    #[test]
    fn generated_tokens_are_distinct_base64() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 24 raw bytes encode to 32 base64 characters
        assert_eq!(a.len(), 32);
        assert!(BASE64.decode(&a).is_ok());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        let mut u = user(None, None);
        u.password = Some(hash);
        assert!(verify_password(&u, "s3cret").unwrap());
        assert!(!verify_password(&u, "wrong").unwrap());
    }

    #[test]
    fn missing_hash_never_verifies() {
        let u = user(None, None);
        assert!(!verify_password(&u, "anything").unwrap());
    }
}
