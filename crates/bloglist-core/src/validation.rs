//! Input checks for signup and blog payloads
//!
//! Only shape checks live here. The username uniqueness check needs the user
//! store and is run by the server after [`check_credentials`] passes.

use crate::error::ValidationError;
use crate::models::{BlogUpdate, NewBlog, SignupRequest};

/// Minimum length, in characters, of a username or password
pub const MIN_CREDENTIAL_LEN: usize = 3;

/// Signup fields that passed the presence and length checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub password: &'a str,
}

/// A creation payload with its required fields resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn likes_from(value: Option<i64>) -> Result<u64, ValidationError> {
    match value {
        None => Ok(0),
        Some(likes) => u64::try_from(likes).map_err(|_| ValidationError::NegativeLikes),
    }
}

/// Presence first, then length.
pub fn check_credentials(req: &SignupRequest) -> Result<Credentials<'_>, ValidationError> {
    let (Some(username), Some(password)) = (
        present(req.username.as_deref()),
        present(req.password.as_deref()),
    ) else {
        return Err(ValidationError::MissingCredentials);
    };

    if username.chars().count() < MIN_CREDENTIAL_LEN
        || password.chars().count() < MIN_CREDENTIAL_LEN
    {
        return Err(ValidationError::CredentialsTooShort {
            min: MIN_CREDENTIAL_LEN,
        });
    }

    Ok(Credentials {
        username,
        name: req.name.as_deref().unwrap_or_default(),
        password,
    })
}

pub fn check_new_blog(blog: NewBlog) -> Result<ValidBlog, ValidationError> {
    let title = non_blank(blog.title.as_deref())
        .ok_or(ValidationError::MissingField("title"))?
        .to_string();
    let url = non_blank(blog.url.as_deref())
        .ok_or(ValidationError::MissingField("url"))?
        .to_string();
    let likes = likes_from(blog.likes)?;

    Ok(ValidBlog {
        title,
        author: blog.author.filter(|a| !a.trim().is_empty()),
        url,
        likes,
    })
}

/// Fields that are present must still be valid; absent ones are skipped.
pub fn check_update(update: &BlogUpdate) -> Result<(), ValidationError> {
    if update.title.is_some() && non_blank(update.title.as_deref()).is_none() {
        return Err(ValidationError::MissingField("title"));
    }
    if update.url.is_some() && non_blank(update.url.as_deref()).is_none() {
        return Err(ValidationError::MissingField("url"));
    }
    if update.likes.is_some() {
        likes_from(update.likes)?;
    }
    Ok(())
}
