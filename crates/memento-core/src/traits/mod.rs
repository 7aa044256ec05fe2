//! Capability traits consumed by the service and session layers.

mod store;

pub use store::{MemoryFilter, MemoryStore, UserDirectory};
