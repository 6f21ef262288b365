//! API Handlers
//!
//! HTTP request handlers for the chat endpoints. Handlers validate input and
//! delegate to [`ChatService`]; errors render through [`AppError`].

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::cache::CacheRegistry;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    AddMessageRequest, CreateSessionRequest, CreateUserRequest, DeleteResponse, HealthResponse,
    ListQuery, RenameSessionRequest, StatsResponse, UpdateUserRequest,
};
use crate::pagination::Page;
use crate::service::ChatService;
use crate::store::{ChatMessage, ChatSession, ChatStore, User};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChatService>,
}

impl AppState {
    pub fn new(service: ChatService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Builds an empty store and a fresh cache registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(ChatStore::new());
        let caches = Arc::new(CacheRegistry::from_config(config));
        Self::new(ChatService::new(store, caches, config))
    }
}

fn reject(validation: Option<String>) -> Result<()> {
    match validation {
        Some(message) => Err(AppError::InvalidRequest(message)),
        None => Ok(()),
    }
}

// == Users ==
/// Handler for POST /users
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    reject(req.validate())?;
    let user = state.service.create_user(req.name, req.email).await;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>> {
    Ok(Json(state.service.get_user(id).await?))
}

/// Handler for PATCH /users/:id
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    reject(req.validate())?;
    let user = state.service.update_user(id, req.name, req.email).await?;
    Ok(Json(user))
}

// == Sessions ==
/// Handler for GET /users/:id/sessions
///
/// Query: `limit`, `cursor`, `search`.
pub async fn list_sessions_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ChatSession>>> {
    let request = state.service.page_request(query.limit, query.cursor);
    let page = state
        .service
        .list_sessions(user_id, &request, query.search.as_deref())
        .await?;
    Ok(Json(page))
}

/// Handler for POST /users/:id/sessions
pub async fn create_session_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ChatSession>)> {
    reject(req.validate())?;
    let session = state.service.create_session(user_id, req.title).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Handler for GET /sessions/:id
pub async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatSession>> {
    Ok(Json(state.service.get_session(id).await?))
}

/// Handler for PATCH /sessions/:id
pub async fn rename_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<ChatSession>> {
    reject(req.validate())?;
    Ok(Json(state.service.rename_session(id, req.title).await?))
}

/// Handler for DELETE /sessions/:id
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.service.delete_session(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

// == Messages ==
/// Handler for GET /sessions/:id/messages
pub async fn list_messages_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ChatMessage>>> {
    let request = state.service.page_request(query.limit, query.cursor);
    Ok(Json(state.service.list_messages(session_id, &request).await?))
}

/// Handler for POST /sessions/:id/messages
pub async fn add_message_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    reject(req.validate())?;
    let message = state
        .service
        .add_message(session_id, req.role, req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

// == Operations ==
/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.service.cache_stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
