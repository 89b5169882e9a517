//! HTTP API handlers.
//!
//! Handlers only translate between HTTP and the [`UserStore`]; every
//! business rule lives in the store.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{ApiError, StoreError};
use crate::metrics::RequestTimer;
use crate::store::{InMemoryUserStore, User, UserPayload, UserStore};

use super::docs::ApiDoc;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store backing the user routes.
    pub store: Arc<dyn UserStore>,
    /// Prometheus handle, present when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryUserStore::seeded()))
    }
}

/// Greeting response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Greeting text.
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Envelope for a created record.
#[derive(Debug, Serialize, ToSchema)]
pub struct DataResponse {
    /// The stored record.
    pub data: User,
}

/// Root handler - static greeting.
pub async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "hello, world",
    })
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// List every user.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let _timer = RequestTimer::new("list_users");
    Json(state.store.list())
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let _timer = RequestTimer::new("get_user");
    state
        .store
        .get_by_id(&id)
        .map(Json)
        .ok_or(ApiError::UserNotFound)
}

/// Create a user. A missing id is replaced by a fresh UUID.
#[utoipa::path(
    post,
    path = "/user",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = DataResponse),
        (status = 400, description = "Malformed body or rejected by the store")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse>), ApiError> {
    let _timer = RequestTimer::new("create_user");
    let Json(payload) = payload.map_err(|rejection| {
        debug!(%rejection, "create body rejected");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let id = match payload.id.as_str() {
        "" => Uuid::new_v4().to_string(),
        id => id.to_string(),
    };
    let user = payload.into_user(id);

    state.store.create(user.clone())?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// Create or replace the user stored under the path id.
#[utoipa::path(
    put,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User stored"),
        (status = 400, description = "Malformed body or rejected by the store")
    )
)]
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let _timer = RequestTimer::new("upsert_user");
    let Json(payload) = payload.map_err(|rejection| {
        debug!(%rejection, "upsert body rejected");
        ApiError::BadRequest("Bad Request".to_string())
    })?;

    state.store.upsert(payload.into_user(id))?;
    Ok(Json(json!({})))
}

/// PUT without a path id.
pub async fn upsert_user_without_id() -> ApiError {
    ApiError::MissingId
}

/// Delete the user stored under the path id.
#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _timer = RequestTimer::new("delete_user");
    match state.store.delete_by_id(&id) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::UserNotFound) => Err(ApiError::NotFound),
        Err(err) => {
            error!(%id, error = %err, "failed to delete user");
            Err(ApiError::Internal)
        }
    }
}

/// Prometheus text exposition, 404 when metrics are disabled.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => ApiError::NotFound.into_response(),
    }
}

/// OpenAPI document for the user routes.
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
