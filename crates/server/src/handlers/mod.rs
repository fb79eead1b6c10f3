//! Handlers for server
//!
//! Thin axum handlers: decode the request, call the store or auth manager,
//! map the outcome onto a status code.

pub mod auth;
pub mod blogs;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use bloglist_core::ValidationError;

use crate::error::Result;

// Re-export AppState from config
pub use crate::config::AppState;

pub use auth::login;
pub use blogs::{
    blog_stats, create_blog, delete_blog, get_blog, like_blog, list_blogs, update_blog,
};
pub use users::{create_user, get_user, list_users};

/// Unwrap a JSON body, reporting decode failures as `{error}` 400s.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}

pub async fn health_check() -> &'static str {
    "OK"
}
