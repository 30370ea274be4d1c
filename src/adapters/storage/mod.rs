//! Storage Adapters
//!
//! Implementations of the StateStorage port for persisting conversation state.
//!
//! ## Available Adapters
//!
//! - **FileStateStorage** - Stores state as YAML files on disk
//! - **InMemoryStateStorage** - Stores state in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileStateStorage, InMemoryStateStorage};
//!
//! // Survives restarts
//! let storage = FileStateStorage::new("./data/conversations");
//!
//! // Testing and the console host
//! let storage = InMemoryStateStorage::new();
//! ```

mod file_state_storage;
mod in_memory_state_storage;

pub use file_state_storage::FileStateStorage;
pub use in_memory_state_storage::InMemoryStateStorage;
