//! Blog handlers
//!
//! Reads are public. Create, update, delete and like sit behind
//! `mw_require_auth`, so a `Ctx` is always present by the time they run.
//! Update and delete additionally consult the configured ownership policy.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use bloglist_core::validation::{check_new_blog, check_update};
use bloglist_core::{summarize, BlogRecord, BlogUpdate, NewBlog, StatsSummary};
use tracing::{info, warn};

use super::json_body;
use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogRecord>>> {
    info!("GET /api/blogs");
    Ok(Json(state.store.list().await?))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogRecord>> {
    info!("GET /api/blogs/{}", id);
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("blog"))
}

/// GET /api/blogs/stats
pub async fn blog_stats(State(state): State<AppState>) -> Result<Json<StatsSummary>> {
    info!("GET /api/blogs/stats");
    let blogs = state.store.list().await?;
    Ok(Json(summarize(&blogs)))
}

/// POST /api/blogs
pub async fn create_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<NewBlog>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogRecord>)> {
    info!("POST /api/blogs - by {}", ctx.username());

    let blog = check_new_blog(json_body(payload)?)?;
    let record = state.store.create(blog, ctx.user_id()).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch a blog the caller is allowed to modify.
async fn modifiable_blog(state: &AppState, ctx: &Ctx, id: &str) -> Result<BlogRecord> {
    let blog = state.store.get(id).await?.ok_or(Error::NotFound("blog"))?;

    if !state.config.ownership.permits(&blog.user, ctx.user_id()) {
        warn!(
            "User {} may not modify blog {} owned by {}",
            ctx.username(),
            id,
            blog.user
        );
        return Err(Error::Forbidden);
    }

    Ok(blog)
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    payload: std::result::Result<Json<BlogUpdate>, JsonRejection>,
) -> Result<Json<BlogRecord>> {
    info!("PUT /api/blogs/{} - by {}", id, ctx.username());

    let update = json_body(payload)?;
    check_update(&update)?;
    modifiable_blog(&state, &ctx, &id).await?;

    state
        .store
        .update(&id, update)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("blog"))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    info!("DELETE /api/blogs/{} - by {}", id, ctx.username());

    modifiable_blog(&state, &ctx, &id).await?;

    if state.store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound("blog"))
    }
}

/// POST /api/blogs/{id}/like
pub async fn like_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<BlogRecord>> {
    info!("POST /api/blogs/{}/like - by {}", id, ctx.username());

    state
        .store
        .like(&id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("blog"))
}
