//! Store traits and related types.
//!
//! The memory service depends on a capability-typed persistent store;
//! the session layer depends on a user directory. Both are supplied at
//! construction, never reached through ambient global state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::types::{Memory, MemoryPatch, NewMemory, NewUser, OwnerRef, User};

/// Filter applied to counts and listings.
///
/// All clauses are conjunctive: a memory matches when it satisfies every
/// clause that is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryFilter {
    /// Restrict to a single owner.
    pub user_id: Option<String>,
    /// Case-insensitive substring over title OR content.
    pub query: Option<String>,
    /// Restrict to memories carrying at least one of these tags.
    pub tags: Option<Vec<String>>,
}

impl MemoryFilter {
    /// Filter scoped to one owner's memories.
    pub fn owner(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Filter matching a substring of title or content.
    pub fn matching(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Filter matching memories that carry at least one of the tags.
    pub fn tagged(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }
}

/// Persistent collection of memory records.
///
/// Listings are always ordered by creation time descending, with
/// insertion order breaking ties. Single-record operations are atomic;
/// check-then-act sequences across calls are not isolated by design.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Count memories matching the filter.
    async fn count(&self, filter: &MemoryFilter) -> StoreResult<usize>;

    /// Fetch an ordered slice of memories matching the filter.
    async fn find_many(
        &self,
        filter: &MemoryFilter,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Memory>>;

    /// Fetch a single memory by id, or `None` if it does not exist.
    async fn find_unique(&self, id: &str) -> StoreResult<Option<Memory>>;

    /// Insert a new memory, generating id and timestamps.
    async fn create(&self, draft: NewMemory) -> StoreResult<Memory>;

    /// Apply a partial update and refresh `updated_at`. Fails with
    /// [`crate::error::StoreError::NotFound`] if the row is gone.
    async fn update(&self, id: &str, patch: MemoryPatch) -> StoreResult<Memory>;

    /// Permanently remove a memory. Fails with
    /// [`crate::error::StoreError::NotFound`] if the row is gone.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Resolve owner display references for the given user ids. Unknown
    /// ids are simply absent from the result.
    async fn owners(&self, user_ids: &[String]) -> StoreResult<Vec<OwnerRef>>;
}

/// Directory of registered users, consumed by the session layer.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a user. Fails on duplicate email.
    async fn create_user(&self, draft: NewUser) -> StoreResult<User>;

    /// Look up a user by email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Look up a user by id.
    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;
}
