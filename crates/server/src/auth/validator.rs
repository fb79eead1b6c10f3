//! Credential Validator
//!
//! Gate for account creation. Presence and length are checked first by
//! `bloglist_core::validation`; the uniqueness lookup hits the user store and
//! only runs once the cheap checks pass.

use async_trait::async_trait;
use bloglist_core::validation::{check_credentials, Credentials};
use bloglist_core::{SignupRequest, ValidationError};

use crate::error::Result;

/// Answers whether a username is already registered
#[async_trait]
pub trait UsernameLookup: Send + Sync {
    async fn username_taken(&self, username: &str) -> Result<bool>;
}

pub async fn validate_signup<'a, L>(req: &'a SignupRequest, users: &L) -> Result<Credentials<'a>>
where
    L: UsernameLookup + ?Sized,
{
    let credentials = check_credentials(req)?;

    if users.username_taken(credentials.username).await? {
        return Err(ValidationError::UsernameTaken.into());
    }

    Ok(credentials)
}
