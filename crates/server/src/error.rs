use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bloglist_core::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum Error {
    // Input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Auth
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid username or password")]
    LoginFail,
    #[error("only the creator can modify this blog")]
    Forbidden,
    #[error("auth context missing")]
    AuthFailCtxNotInRequestExt,

    // Model
    #[error("{0} not found")]
    NotFound(&'static str),

    // Generic
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) | Error::LoginFail => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AuthFailCtxNotInRequestExt | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::AuthFailCtxNotInRequestExt | Error::Internal(_) => {
                error!("Request failed: {}", self);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(format!("{err:#}"))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Internal(err.to_string())
    }
}
