//! Bloglist server configuration

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::auth::AuthManager;
use crate::store::BlogStore;

pub const DEFAULT_PORT: u16 = 3003;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://bloglist.sqlite";
pub const DEFAULT_TEST_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Who may update or delete a blog entry.
///
/// Both policies require a valid token; they only differ in whether the
/// caller must also be the entry's creator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Only the creating user
    #[default]
    Owner,
    /// Any authenticated user
    AnyUser,
}

impl OwnershipPolicy {
    pub fn permits(&self, owner_id: &str, caller_id: &str) -> bool {
        match self {
            OwnershipPolicy::Owner => owner_id == caller_id,
            OwnershipPolicy::AnyUser => true,
        }
    }
}

impl FromStr for OwnershipPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(OwnershipPolicy::Owner),
            "any-user" | "any_user" | "anyuser" => Ok(OwnershipPolicy::AnyUser),
            other => Err(anyhow::anyhow!(
                "unknown ownership policy {other:?} (expected \"owner\" or \"any-user\")"
            )),
        }
    }
}

/// Configuration for the Bloglist server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// sqlx connection string for the store
    pub database_url: String,
    /// HMAC secret for signing tokens
    pub secret: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Who may modify a blog entry
    pub ownership: OwnershipPolicy,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Token lifetime in seconds, between one second and [`MAX_TOKEN_TTL_SECS`].
pub fn token_ttl(secs: u64) -> anyhow::Result<Duration> {
    if secs == 0 || secs > MAX_TOKEN_TTL_SECS {
        anyhow::bail!("TOKEN_TTL_SECS must be between 1 and {MAX_TOKEN_TTL_SECS}, got {secs}");
    }
    Ok(Duration::from_secs(secs))
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl ServerConfig {
    /// Defaults with the given signing secret and an in-memory store.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_TEST_DATABASE_URL.to_string(),
            secret: secret.into(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            ownership: OwnershipPolicy::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// `SECRET` is required. When `APP_ENV=test`, `TEST_DATABASE_URL` is used
    /// in place of `DATABASE_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("SECRET").context("SECRET must be set to sign tokens")?;
        if secret.is_empty() {
            anyhow::bail!("SECRET must not be empty");
        }

        let testing = std::env::var("APP_ENV").is_ok_and(|env| env == "test");
        let database_url = if testing {
            std::env::var("TEST_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_TEST_DATABASE_URL.to_string())
        } else {
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
        };

        let ownership = match std::env::var("OWNERSHIP_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => OwnershipPolicy::default(),
        };

        Ok(Self {
            port: env_parse("PORT").unwrap_or(DEFAULT_PORT),
            database_url,
            secret,
            token_ttl: token_ttl(env_parse("TOKEN_TTL_SECS").unwrap_or(DEFAULT_TOKEN_TTL_SECS))?,
            ownership,
            bcrypt_cost: env_parse("BCRYPT_COST").unwrap_or(bcrypt::DEFAULT_COST),
        })
    }

    pub fn with_ownership(mut self, ownership: OwnershipPolicy) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<BlogStore>,
    pub auth: Arc<AuthManager>,
}
