//! Store implementations.

mod sqlite;

pub use sqlite::SqliteStore;
