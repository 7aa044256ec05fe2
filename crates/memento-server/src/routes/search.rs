//! Search endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use memento_core::SearchPage;

use crate::error::ApiResult;
use crate::pagination::page_request;
use crate::state::AppState;

/// Query parameters for searching memories.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// The search query; substring over title or content.
    pub query: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Search memories by case-insensitive substring. The payload carries
/// pagination metadata alongside the slice.
/// GET /memories/search
pub async fn search_memories(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchPage>> {
    let result = state
        .service
        .search_memories(
            query.query.as_deref().unwrap_or(""),
            page_request(query.page, query.limit),
        )
        .await?;

    Ok(Json(result))
}
