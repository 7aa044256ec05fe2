//! The memory service.
//!
//! Seven operations over a capability-typed [`MemoryStore`]: list,
//! create, read, update, delete, list-by-owner, and search. They share
//! one pagination gate and one error taxonomy ([`MemoryError`]).
//! Ownership is the sole authorization rule: reads are public, writes
//! require the caller to own the record.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{MemoryError, MemoryResult};
use crate::traits::{MemoryFilter, MemoryStore};
use crate::types::{
    ListedMemory, Memory, MemoryPatch, NewMemory, OwnerRef, PageRequest, SearchPage,
};

/// Caller-supplied fields for creating a memory.
#[derive(Debug, Clone)]
pub struct CreateMemoryParams {
    /// The owning user, from the verified identity.
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub tags: Option<Vec<String>>,
}

/// The memory access layer.
#[derive(Clone)]
pub struct MemoryService {
    store: Arc<dyn MemoryStore>,
}

impl MemoryService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self { store }
    }

    /// List all memories, newest first, annotated with their owners.
    ///
    /// When `tags` is present, only memories carrying at least one of
    /// the requested tags are counted and returned.
    pub async fn list_memories(
        &self,
        request: PageRequest,
        tags: Option<Vec<String>>,
    ) -> MemoryResult<Vec<ListedMemory>> {
        let filter = MemoryFilter {
            tags,
            ..MemoryFilter::default()
        };

        let total = self.store.count(&filter).await?;
        let (offset, _) = page_window(total, request)?;

        let memories = self.store.find_many(&filter, offset, request.limit).await?;
        self.annotate_owners(memories).await
    }

    /// Create a memory owned by `user_id`.
    pub async fn create_memory(&self, params: CreateMemoryParams) -> MemoryResult<Memory> {
        if params.user_id.is_empty() {
            return Err(MemoryError::OwnerRequired);
        }
        if params.content.is_empty() {
            return Err(MemoryError::ContentRequired);
        }

        let draft = NewMemory {
            user_id: params.user_id,
            title: params.title,
            content: params.content,
            tags: params.tags.unwrap_or_default(),
        };
        Ok(self.store.create(draft).await?)
    }

    /// Fetch a single memory. Reads are public, so there is no
    /// ownership check here.
    pub async fn get_memory_by_id(&self, memory_id: &str) -> MemoryResult<Memory> {
        self.store
            .find_unique(memory_id)
            .await?
            .ok_or_else(|| MemoryError::not_found(memory_id))
    }

    /// Apply a partial update to a memory the caller owns.
    ///
    /// Existence is checked before ownership, so a missing record is
    /// always `MEMORY_NOT_FOUND` even for a non-owner.
    pub async fn update_memory(
        &self,
        memory_id: &str,
        user_id: &str,
        patch: MemoryPatch,
    ) -> MemoryResult<Memory> {
        self.authorize_owner(memory_id, user_id).await?;
        Ok(self.store.update(memory_id, patch).await?)
    }

    /// Permanently delete a memory the caller owns.
    pub async fn delete_memory(&self, memory_id: &str, user_id: &str) -> MemoryResult<()> {
        self.authorize_owner(memory_id, user_id).await?;
        Ok(self.store.delete(memory_id).await?)
    }

    /// List one owner's memories, newest first.
    pub async fn list_memories_by_owner(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> MemoryResult<Vec<Memory>> {
        let filter = MemoryFilter::owner(user_id);
        let total = self.store.count(&filter).await?;
        let (offset, _) = page_window(total, request)?;
        Ok(self.store.find_many(&filter, offset, request.limit).await?)
    }

    /// Search memories by case-insensitive substring over title or
    /// content. The success payload carries pagination metadata.
    pub async fn search_memories(
        &self,
        query: &str,
        request: PageRequest,
    ) -> MemoryResult<SearchPage> {
        if query.trim().is_empty() {
            return Err(MemoryError::QueryRequired);
        }

        let filter = MemoryFilter::matching(query);
        let total = self.store.count(&filter).await?;
        let (offset, total_pages) = page_window(total, request)?;

        let memories = self.store.find_many(&filter, offset, request.limit).await?;
        Ok(SearchPage {
            memories,
            page: request.page,
            total_pages,
            total_memories: total,
        })
    }

    /// Fetch a memory and verify the caller owns it.
    async fn authorize_owner(&self, memory_id: &str, user_id: &str) -> MemoryResult<Memory> {
        let memory = self
            .store
            .find_unique(memory_id)
            .await?
            .ok_or_else(|| MemoryError::not_found(memory_id))?;
        if memory.user_id != user_id {
            return Err(MemoryError::not_authorized(memory_id));
        }
        Ok(memory)
    }

    /// Attach owner references to a page of memories.
    async fn annotate_owners(&self, memories: Vec<Memory>) -> MemoryResult<Vec<ListedMemory>> {
        let mut user_ids: Vec<String> = memories.iter().map(|m| m.user_id.clone()).collect();
        user_ids.sort();
        user_ids.dedup();

        let owners: HashMap<String, OwnerRef> = self
            .store
            .owners(&user_ids)
            .await?
            .into_iter()
            .map(|o| (o.id.clone(), o))
            .collect();

        Ok(memories
            .into_iter()
            .map(|memory| {
                let user = owners
                    .get(&memory.user_id)
                    .cloned()
                    .unwrap_or_else(|| OwnerRef::unresolved(memory.user_id.clone()));
                ListedMemory { memory, user }
            })
            .collect())
    }
}

/// Shared pagination gate.
///
/// An empty collection is `NO_MEMORIES` regardless of the requested
/// page; only a non-empty collection can yield `PAGE_OUT_OF_RANGE`.
/// Returns the slice offset and the total page count.
fn page_window(total: usize, request: PageRequest) -> MemoryResult<(usize, usize)> {
    if total == 0 {
        return Err(MemoryError::NoMemories);
    }
    let total_pages = total.div_ceil(request.limit);
    if request.page > total_pages {
        return Err(MemoryError::PageOutOfRange {
            page: request.page,
            total_pages,
        });
    }
    Ok((request.offset(), total_pages))
}
