use crate::auth::{bearer_token, AuthError};
use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::Result;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(h) => h.to_str().map_err(|_| AuthError::WrongFormat)?,
        None => {
            warn!("Rejected {} {}: no token", req.method(), req.uri().path());
            return Err(AuthError::Missing.into());
        }
    };

    let identity = bearer_token(auth_header)
        .and_then(|token| state.auth.tokens().verify(token))
        .inspect_err(|e| warn!("Rejected {} {}: {}", req.method(), req.uri().path(), e))?;

    req.extensions_mut()
        .insert(Ctx::new(identity.user_id, identity.username));

    Ok(next.run(req).await)
}
