//! Core types for memento.

mod memory;
mod page;

pub use memory::{ListedMemory, Memory, MemoryPatch, NewMemory, NewUser, OwnerRef, User};
pub use page::{PageRequest, SearchPage};
