//! memento-core - Core library for memento.
//!
//! This crate provides the memory types, the store capability traits,
//! the SQLite store, and the [`MemoryService`] access layer.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use memento_core::{CreateMemoryParams, MemoryService, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::new("memento.db")?);
//! let service = MemoryService::new(store);
//!
//! let memory = service
//!     .create_memory(CreateMemoryParams {
//!         user_id: "user-1".to_string(),
//!         title: Some("First entry".to_string()),
//!         content: "We finally shipped.".to_string(),
//!         tags: None,
//!     })
//!     .await?;
//! ```

pub mod error;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{MemoryError, MemoryResult, StoreError, StoreResult};
pub use service::{CreateMemoryParams, MemoryService};
pub use store::SqliteStore;
pub use traits::{MemoryFilter, MemoryStore, UserDirectory};
pub use types::{
    ListedMemory, Memory, MemoryPatch, NewMemory, NewUser, OwnerRef, PageRequest, SearchPage, User,
};
