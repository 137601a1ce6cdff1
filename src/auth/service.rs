use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, AppResult};
use crate::core::types::{CreateUserRequest, LoginRequest, User};
use crate::crypto::service::CryptoService;
use crate::storage::database::Database;
use crate::storage::{parse_timestamp, parse_uuid};

pub struct AuthService {
    db: Arc<Database>,
    crypto: Arc<CryptoService>,
    config: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: Option<String>,
    password_hash: String,
    created_at: String,
    last_seen: Option<String>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        Ok(User {
            id: parse_uuid(&self.id)?,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: parse_timestamp(&self.created_at)?,
            last_seen: self.last_seen.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

impl AuthService {
    pub fn new(db: Arc<Database>, crypto: Arc<CryptoService>, config: AuthConfig) -> Self {
        Self { db, crypto, config }
    }

    /// Register a new user
    pub async fn register(&self, request: CreateUserRequest) -> AppResult<User> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AppError::Auth("Username is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::Auth("Password is required".to_string()));
        }

        // Check if username is already taken
        let existing_user: Option<(String,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(self.db.pool())
                .await?;

        if existing_user.is_some() {
            return Err(AppError::Auth("Username already taken".to_string()));
        }

        let password_hash = self.crypto.hash_password(&request.password)?;
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id.to_string())
        .bind(username)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(now.to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(User {
            id: user_id,
            username: username.to_string(),
            email: request.email,
            password_hash,
            created_at: now,
            last_seen: None,
        })
    }

    /// Login a user
    pub async fn login(&self, request: LoginRequest) -> AppResult<(User, Session)> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, email, password_hash, created_at, last_seen \
             FROM users WHERE username = ?",
        )
        .bind(request.username.trim())
        .fetch_optional(self.db.pool())
        .await?;

        let mut user = row
            .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?
            .into_user()?;

        let is_valid = self
            .crypto
            .verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }

        let session = self.create_session(user.id).await?;

        // Update last seen
        let now = Utc::now();
        sqlx::query("UPDATE users SET last_seen = ? WHERE id = ?")
            .bind(now.to_rfc3339())
            .bind(user.id.to_string())
            .execute(self.db.pool())
            .await?;
        user.last_seen = Some(now);

        Ok((user, session))
    }

    /// Create a new session for a user
    pub async fn create_session(&self, user_id: Uuid) -> AppResult<Session> {
        let session_id = Uuid::new_v4();
        let token = self.crypto.generate_token()?;
        let token_hash = self.crypto.hash_data(&token);
        let expires_at = Utc::now() + Duration::days(self.config.session_ttl_days);

        sqlx::query("INSERT INTO sessions (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)")
            .bind(session_id.to_string())
            .bind(user_id.to_string())
            .bind(&token_hash)
            .bind(expires_at.to_rfc3339())
            .execute(self.db.pool())
            .await?;

        Ok(Session {
            id: session_id,
            user_id,
            token,
            expires_at,
        })
    }

    /// Validate a session token
    pub async fn validate_session(&self, token: &str) -> AppResult<User> {
        let token_hash = self.crypto.hash_data(token);
        let now = Utc::now();

        let row: Option<UserRow> = sqlx::query_as(
            "SELECT u.id, u.username, u.email, u.password_hash, u.created_at, u.last_seen \
             FROM sessions s \
             JOIN users u ON s.user_id = u.id \
             WHERE s.token_hash = ? AND s.expires_at > ?",
        )
        .bind(&token_hash)
        .bind(now.to_rfc3339())
        .fetch_optional(self.db.pool())
        .await?;

        row.ok_or_else(|| AppError::Auth("Invalid or expired session".to_string()))?
            .into_user()
    }

    /// Logout a user (invalidate session)
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let token_hash = self.crypto.hash_data(token);

        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(&token_hash)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired_sessions(&self) -> AppResult<()> {
        let now = Utc::now();

        sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now.to_rfc3339())
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}
