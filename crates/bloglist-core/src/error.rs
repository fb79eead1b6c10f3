//! Domain error types.

use thiserror::Error;

/// Rejected user or blog input. The display text is shown to clients as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username and password must be provided")]
    MissingCredentials,

    #[error("username and password must be at least {min} characters long")]
    CredentialsTooShort { min: usize },

    #[error("expected `username` to be unique")]
    UsernameTaken,

    #[error("`{0}` is required")]
    MissingField(&'static str),

    #[error("likes must be a non-negative integer")]
    NegativeLikes,

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Returned by aggregations that have no meaningful answer for an empty list.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("blog list is empty")]
pub struct EmptyInputError;
