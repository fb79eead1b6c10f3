use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use bloglist_core::{group_by, BlogRecord, SignupRequest};
use serde::Serialize;
use tracing::info;

use super::json_body;
use crate::auth::UserInfo;
use crate::config::AppState;
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct UserWithBlogs {
    #[serde(flatten)]
    pub user: UserInfo,
    pub blogs: Vec<BlogRecord>,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    let req = json_body(payload)?;
    info!(
        "POST /api/users - {}",
        req.username.as_deref().unwrap_or("<missing>")
    );

    let user = state.auth.register(&req).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserWithBlogs>>> {
    info!("GET /api/users");

    let users = state.auth.list_users().await?;
    let blogs = state.store.list().await?;

    let mut by_owner: HashMap<&str, Vec<&BlogRecord>> =
        group_by(&blogs, |blog| blog.user.as_str()).into_iter().collect();

    let body = users
        .into_iter()
        .map(|user| {
            let blogs = by_owner
                .remove(user.id.as_str())
                .unwrap_or_default()
                .into_iter()
                .cloned()
                .collect();
            UserWithBlogs { user, blogs }
        })
        .collect();

    Ok(Json(body))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserWithBlogs>> {
    info!("GET /api/users/{}", id);

    let user = state.auth.get_user(&id).await?;
    let blogs = state.store.list_by_user(&user.id).await?;

    Ok(Json(UserWithBlogs { user, blogs }))
}
