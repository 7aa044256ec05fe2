//! SQLite-backed memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::{MemoryFilter, MemoryStore, UserDirectory};
use crate::types::{Memory, MemoryPatch, NewMemory, NewUser, OwnerRef, User};

/// SQLite implementation of [`MemoryStore`] and [`UserDirectory`].
///
/// Tags are stored as a JSON array column; timestamps as RFC 3339 text.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn new(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::database(e.to_string()))?;
        }

        let conn = Connection::open(db_path.as_ref())?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_tables()?;
        Ok(store)
    }

    /// Open an in-memory store. Used by tests and throwaway setups.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS memories (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                title      TEXT,
                content    TEXT NOT NULL,
                tags       TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_memories_user_id ON memories(user_id);
            CREATE INDEX IF NOT EXISTS idx_memories_created_at ON memories(created_at);

            CREATE TABLE IF NOT EXISTS users (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Build the WHERE clause and its text parameters for a filter.
    fn filter_sql(filter: &MemoryFilter) -> (String, Vec<String>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(ref user_id) = filter.user_id {
            clauses.push("user_id = ?".to_string());
            values.push(user_id.clone());
        }

        if let Some(ref query) = filter.query {
            // instr does literal substring matching, so the query needs
            // no wildcard escaping.
            clauses.push(
                "(instr(lower(coalesce(title, '')), lower(?)) > 0 \
                 OR instr(lower(content), lower(?)) > 0)"
                    .to_string(),
            );
            values.push(query.clone());
            values.push(query.clone());
        }

        if let Some(ref tags) = filter.tags {
            if !tags.is_empty() {
                let placeholders = vec!["?"; tags.len()].join(", ");
                clauses.push(format!(
                    "EXISTS (SELECT 1 FROM json_each(memories.tags) \
                     WHERE json_each.value IN ({placeholders}))"
                ));
                values.extend(tags.iter().cloned());
            }
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

/// Map a row from `SELECT id, user_id, title, content, tags, created_at,
/// updated_at` into a [`Memory`].
fn memory_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Memory> {
    let tags_json: String = row.get(4)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Memory {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        tags,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
    })
}

fn parse_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

const MEMORY_COLUMNS: &str = "id, user_id, title, content, tags, created_at, updated_at";

#[async_trait]
impl MemoryStore for SqliteStore {
    async fn count(&self, filter: &MemoryFilter) -> StoreResult<usize> {
        let (where_sql, values) = Self::filter_sql(filter);
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT COUNT(*) FROM memories {where_sql}");
        let count: i64 =
            conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn find_many(
        &self,
        filter: &MemoryFilter,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Memory>> {
        let (where_sql, values) = Self::filter_sql(filter);
        let conn = self.conn.lock().unwrap();
        // rowid breaks ties between memories created in the same instant.
        let sql = format!(
            "SELECT {MEMORY_COLUMNS} FROM memories {where_sql} \
             ORDER BY created_at DESC, rowid DESC LIMIT {limit} OFFSET {offset}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), memory_from_row)?;
        let mut memories = Vec::new();
        for row in rows {
            memories.push(row?);
        }
        Ok(memories)
    }

    async fn find_unique(&self, id: &str) -> StoreResult<Option<Memory>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?");
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], memory_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: NewMemory) -> StoreResult<Memory> {
        let now = Utc::now();
        let memory = Memory {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };

        let tags_json = serde_json::to_string(&memory.tags)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO memories (id, user_id, title, content, tags, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                memory.id,
                memory.user_id,
                memory.title,
                memory.content,
                tags_json,
                memory.created_at.to_rfc3339(),
                memory.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(memory)
    }

    async fn update(&self, id: &str, patch: MemoryPatch) -> StoreResult<Memory> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?");
        let existing = {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query_map(params![id], memory_from_row)?;
            match rows.next() {
                Some(row) => row?,
                None => return Err(StoreError::not_found(id)),
            }
        };

        let updated = Memory {
            title: patch.title.or(existing.title),
            content: patch.content.unwrap_or(existing.content),
            tags: patch.tags.unwrap_or(existing.tags),
            updated_at: Utc::now(),
            ..existing
        };

        let tags_json = serde_json::to_string(&updated.tags)?;
        let affected = conn.execute(
            "UPDATE memories SET title = ?1, content = ?2, tags = ?3, updated_at = ?4 \
             WHERE id = ?5",
            params![
                updated.title,
                updated.content,
                tags_json,
                updated.updated_at.to_rfc3339(),
                id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM memories WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    async fn owners(&self, user_ids: &[String]) -> StoreResult<Vec<OwnerRef>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; user_ids.len()].join(", ");
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT id, name FROM users WHERE id IN ({placeholders})");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(user_ids.iter()), |row| {
            Ok(OwnerRef {
                id: row.get(0)?,
                name: Some(row.get(1)?),
            })
        })?;
        let mut owners = Vec::new();
        for row in rows {
            owners.push(row?);
        }
        Ok(owners)
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_timestamp(row, 4)?,
    })
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn create_user(&self, draft: NewUser) -> StoreResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            email: draft.email,
            password_hash: draft.password_hash,
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
        )?;
        let mut rows = stmt.query_map(params![email], user_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id], user_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}
