//! Authentication Module
//!
//! Handles account creation, login and token issuance. Users live in the
//! `users` table of the shared SQLite pool.

pub mod middleware;
pub mod token;
pub mod validator;

pub use token::{bearer_token, AuthError, TokenAuthority, TokenIdentity};
pub use validator::{validate_signup, UsernameLookup};

use crate::error::{Error, Result};
use anyhow::Context;
use async_trait::async_trait;
use bcrypt::{hash, verify};
use bloglist_core::SignupRequest;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

/// User record stored in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Public user info (no sensitive data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub name: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
        }
    }
}

type UserRow = (String, String, String, String);

fn user_from_row((id, username, name, password_hash): UserRow) -> User {
    User {
        id,
        username,
        name,
        password_hash,
    }
}

/// Auth manager handles all authentication
pub struct AuthManager {
    pool: SqlitePool,
    tokens: TokenAuthority,
    bcrypt_cost: u32,
}

impl AuthManager {
    pub fn new(pool: SqlitePool, tokens: TokenAuthority, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    /// Register a new user
    pub async fn register(&self, req: &SignupRequest) -> Result<User> {
        let credentials = validate_signup(req, self).await?;

        let password = credentials.password.to_owned();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .context("Password hashing task failed")?
            .context("Failed to hash password")?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: credentials.username.to_owned(),
            name: credentials.name.to_owned(),
            password_hash,
        };

        sqlx::query(
            "INSERT INTO users (id, username, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent signup for the same name
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Validation(bloglist_core::ValidationError::UsernameTaken)
            }
            other => other.into(),
        })?;

        info!("[Auth] User registered: {}", user.username);

        Ok(user)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let user = match self.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("[Auth] Login for unknown user {}", username);
                return Err(Error::LoginFail);
            }
        };

        let candidate = password.to_owned();
        let stored = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify(candidate, &stored))
            .await
            .context("Password verification task failed")?
            .context("Failed to verify password")?;

        if !valid {
            warn!("[Auth] Failed login attempt for {}", username);
            return Err(Error::LoginFail);
        }

        let token = self.tokens.issue(&user.username, &user.id)?;

        info!("[Auth] User logged in: {}", user.username);

        Ok((user, token))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<UserInfo> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| UserInfo::from(user_from_row(r)))
            .ok_or(Error::NotFound("user"))
    }

    /// List all users in registration order
    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash FROM users ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserInfo::from(user_from_row(row)))
            .collect())
    }
}

#[async_trait]
impl UsernameLookup for AuthManager {
    async fn username_taken(&self, username: &str) -> Result<bool> {
        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(existing.is_some())
    }
}
