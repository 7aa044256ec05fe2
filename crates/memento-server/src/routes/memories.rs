//! Memory CRUD endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use memento_core::{CreateMemoryParams, ListedMemory, Memory, MemoryPatch};

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::pagination::page_request;
use crate::state::AppState;

/// Request body for creating a memory.
#[derive(Debug, Deserialize)]
pub struct CreateMemoryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Response wrapping a single memory.
#[derive(Debug, Serialize)]
pub struct MemoryResponse {
    pub memory: Memory,
}

/// Create a memory owned by the session identity.
/// POST /memories
pub async fn create_memory(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateMemoryRequest>,
) -> ApiResult<(StatusCode, Json<MemoryResponse>)> {
    let memory = state
        .service
        .create_memory(CreateMemoryParams {
            user_id: identity.user_id,
            title: request.title,
            content: request.content.unwrap_or_default(),
            tags: request.tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MemoryResponse { memory })))
}

/// Query parameters for the public listing.
#[derive(Debug, Deserialize)]
pub struct ListMemoriesQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Comma-separated tag filter.
    pub tags: Option<String>,
}

/// Response for listing memories.
#[derive(Debug, Serialize)]
pub struct ListMemoriesResponse {
    pub memories: Vec<ListedMemory>,
}

/// List all memories, newest first, with owner annotations.
/// GET /memories
pub async fn list_memories(
    State(state): State<AppState>,
    Query(query): Query<ListMemoriesQuery>,
) -> ApiResult<Json<ListMemoriesResponse>> {
    let tags = query.tags.as_deref().map(parse_tags).filter(|t| !t.is_empty());
    let memories = state
        .service
        .list_memories(page_request(query.page, query.limit), tags)
        .await?;

    Ok(Json(ListMemoriesResponse { memories }))
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get a single memory. Reads are public.
/// GET /memories/:id
pub async fn get_memory(
    State(state): State<AppState>,
    Path(memory_id): Path<String>,
) -> ApiResult<Json<MemoryResponse>> {
    let memory = state.service.get_memory_by_id(&memory_id).await?;
    Ok(Json(MemoryResponse { memory }))
}

/// Request body for updating a memory. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateMemoryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Update a memory owned by the session identity.
/// PUT /memories/:id
pub async fn update_memory(
    State(state): State<AppState>,
    identity: Identity,
    Path(memory_id): Path<String>,
    Json(request): Json<UpdateMemoryRequest>,
) -> ApiResult<Json<MemoryResponse>> {
    let patch = MemoryPatch {
        title: request.title,
        content: request.content,
        tags: request.tags,
    };
    let memory = state
        .service
        .update_memory(&memory_id, &identity.user_id, patch)
        .await?;

    Ok(Json(MemoryResponse { memory }))
}

/// Delete a memory owned by the session identity. The owner comes from
/// the session, never from the request body.
/// DELETE /memories/:id
pub async fn delete_memory(
    State(state): State<AppState>,
    identity: Identity,
    Path(memory_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .service
        .delete_memory(&memory_id, &identity.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Memory deleted successfully."
    })))
}
