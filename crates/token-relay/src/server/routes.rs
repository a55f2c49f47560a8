//! Router and request handlers.
//!
//! Every endpoint speaks the same JSON envelope: `{"success": true, ...}`
//! on the happy path, `{"success": false, "error": <message>}` otherwise
//! (see [`StoreError`]'s `IntoResponse`). Unmatched paths fall through to
//! static file serving; anything still unmatched gets a JSON 404.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{StoreError, StoreResult};
use crate::service::TokenService;

/// Shared state for HTTP handlers.
pub struct AppState {
    pub service: TokenService,
}

/// Body of `POST /api/save-token`.
#[derive(Debug, Deserialize)]
pub struct SaveTokenRequest {
    pub token: Option<String>,
    pub channel: Option<String>,
}

/// Body of `POST /api/mark-used` and `POST /api/delete-token`.
#[derive(Debug, Deserialize)]
pub struct TokenIdRequest {
    pub id: Option<String>,
}

/// Build the application router.
pub fn create_router(service: TokenService, static_dir: &Path) -> Router {
    let state = Arc::new(AppState { service });

    // Anything the API doesn't claim is tried against the frontend files,
    // and a miss there becomes the JSON 404.
    let static_files = ServeDir::new(static_dir).not_found_service(handle_not_found.into_service());

    Router::new()
        .route("/health", get(health_check))
        .route("/api/save-token", post(handle_save_token))
        .route("/api/get-tokens", get(handle_get_tokens))
        .route("/api/get-new-tokens", get(handle_get_new_tokens))
        .route("/api/mark-used", post(handle_mark_used))
        .route("/api/delete-token", post(handle_delete_token))
        .route("/api/stats", get(handle_stats))
        .route("/api/clear-all", post(handle_clear_all))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "token-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.service.storage()
    }))
}

/// `POST /api/save-token`
async fn handle_save_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveTokenRequest>,
) -> StoreResult<Response> {
    let token = req.token.unwrap_or_default();
    let id = state.service.save(&token, req.channel.as_deref()).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "id": id,
        "message": "Token saved successfully",
        "storage": state.service.storage()
    }))
    .into_response())
}

/// `GET /api/get-tokens`
async fn handle_get_tokens(State(state): State<Arc<AppState>>) -> StoreResult<Response> {
    let tokens = state.service.list_all().await?;
    tracing::debug!(count = tokens.len(), "Retrieved tokens");

    Ok(Json(serde_json::json!({
        "success": true,
        "tokens": tokens,
        "count": tokens.len(),
        "storage": state.service.storage()
    }))
    .into_response())
}

/// `GET /api/get-new-tokens`
async fn handle_get_new_tokens(State(state): State<Arc<AppState>>) -> StoreResult<Response> {
    let tokens = state.service.list_unused().await?;
    tracing::debug!(count = tokens.len(), "Retrieved unused tokens");

    Ok(Json(serde_json::json!({
        "success": true,
        "tokens": tokens,
        "count": tokens.len()
    }))
    .into_response())
}

/// `POST /api/mark-used`
async fn handle_mark_used(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenIdRequest>,
) -> StoreResult<Response> {
    let Some(id) = req.id.filter(|id| !id.is_empty()) else {
        return Err(StoreError::validation("id", "Token ID is required"));
    };

    state.service.mark_used(&id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Token marked as used"
    }))
    .into_response())
}

/// `POST /api/delete-token`
///
/// A missing id is indistinguishable from an unknown one here: both are a
/// lookup that matches nothing, so both answer 404.
async fn handle_delete_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenIdRequest>,
) -> StoreResult<Response> {
    let id = req.id.unwrap_or_default();
    state.service.delete(&id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Token deleted"
    }))
    .into_response())
}

/// `GET /api/stats`
async fn handle_stats(State(state): State<Arc<AppState>>) -> StoreResult<Response> {
    let stats = state.service.stats().await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "stats": stats,
        "storage": state.service.storage()
    }))
    .into_response())
}

/// `POST /api/clear-all`
async fn handle_clear_all(State(state): State<Arc<AppState>>) -> StoreResult<Response> {
    state.service.clear().await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "All tokens cleared"
    }))
    .into_response())
}

async fn handle_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "Not found"
        })),
    )
        .into_response()
}
