//! memento-server - REST API server for memento.
//!
//! This crate provides the HTTP boundary over the memento memory
//! service: routing, session auth, CORS, request logging, and the
//! error-to-status mapping.
//!
//! # Example
//!
//! ```ignore
//! use memento_server::{create_server, AppState, ServerConfig};
//! use memento_core::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let store = SqliteStore::new(&config.database_path).unwrap();
//!     let state = AppState::with_store(store, &config);
//!     let app = create_server(state, config.web_origin.as_deref());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState, web_origin: Option<&str>) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer(web_origin))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
