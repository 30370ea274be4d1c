//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `StateStorage` - Persists conversation state between turns
//! - `Recognizer` - Optional natural-language recognizer used for pre-fill

mod recognizer;
mod state_storage;

pub use recognizer::{Recognizer, RecognizerError};
pub use state_storage::{StateStorage, StateStorageError};
