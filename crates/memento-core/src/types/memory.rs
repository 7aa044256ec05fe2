//! Memory record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    /// Unique identifier, generated by the store.
    pub id: String,
    /// Identifier of the owning user. Set at creation, never reassigned.
    pub user_id: String,
    /// Optional short title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The note body. Never empty for a persisted memory.
    pub content: String,
    /// Tags attached to this memory.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp; sort key for listings (descending).
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update.
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a memory. The store
/// generates id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemory {
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

impl NewMemory {
    /// Create a draft with required fields only.
    pub fn new(user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: None,
            content: content.into(),
            tags: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Partial update for a memory. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl MemoryPatch {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Owner annotation attached to public listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRef {
    /// The owner's user id.
    pub id: String,
    /// Display name, when the owner is known to the directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OwnerRef {
    /// An owner reference with no resolved display name.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// A memory annotated with its owner, as returned by the public listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedMemory {
    #[serde(flatten)]
    pub memory: Memory,
    /// The owning user's id and display name.
    pub user: OwnerRef,
}

/// A registered user, as seen by the session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
