//! Per-owner listing endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use memento_core::Memory;

use crate::error::ApiResult;
use crate::pagination::PageQuery;
use crate::state::AppState;

/// Response for listing one owner's memories.
#[derive(Debug, Serialize)]
pub struct OwnerMemoriesResponse {
    pub memories: Vec<Memory>,
}

/// List a single owner's memories, newest first.
/// GET /users/:id/memories
pub async fn list_memories_by_owner(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<OwnerMemoriesResponse>> {
    let memories = state
        .service
        .list_memories_by_owner(&user_id, query.into_request())
        .await?;

    Ok(Json(OwnerMemoriesResponse { memories }))
}
