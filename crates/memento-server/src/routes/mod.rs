//! Route definitions for the REST API.

mod auth;
mod health;
mod memories;
mod search;
mod users;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Memory operations
        .route("/memories", post(memories::create_memory))
        .route("/memories", get(memories::list_memories))
        .route("/memories/search", get(search::search_memories))
        .route("/memories/:id", get(memories::get_memory))
        .route("/memories/:id", put(memories::update_memory))
        .route("/memories/:id", delete(memories::delete_memory))
        // Per-owner listing
        .route("/users/:id/memories", get(users::list_memories_by_owner))
        // Sessions
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        // Attach state
        .with_state(state)
}

pub use auth::*;
pub use health::*;
pub use memories::*;
pub use search::*;
pub use users::*;
