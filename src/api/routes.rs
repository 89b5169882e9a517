//! HTTP API route definitions.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_user, delete_user, get_user, health, list_users, metrics, openapi, root, upsert_user,
    upsert_user_without_id, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // User endpoints
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/user", post(create_user).put(upsert_user_without_id))
        .route("/user/:id", put(upsert_user).delete(delete_user))
        // Observability
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
