//! Router
//!
//! Public reads are mounted directly; mutating blog routes go through
//! `mw_require_auth` via `route_layer` so token checks run before any
//! handler touches the store.

use crate::auth::middleware::mw_require_auth;
use crate::config::AppState;
use crate::handlers;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/blogs", post(handlers::create_blog))
        .route(
            "/api/blogs/{id}",
            put(handlers::update_blog).delete(handlers::delete_blog),
        )
        .route("/api/blogs/{id}/like", post(handlers::like_blog))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    Router::new()
        .route("/api/blogs", get(handlers::list_blogs))
        .route("/api/blogs/stats", get(handlers::blog_stats))
        .route("/api/blogs/{id}", get(handlers::get_blog))
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/{id}", get(handlers::get_user))
        .route("/api/login", post(handlers::login))
        .route("/health", get(handlers::health_check))
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
