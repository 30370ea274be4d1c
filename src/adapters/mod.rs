//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Conversation state storage (in-memory, YAML files)
//! - `recognizer` - Natural-language recognizers (LUIS v3, scripted)

pub mod recognizer;
pub mod storage;

pub use recognizer::{LuisConfig, LuisRecognizer, ScriptedRecognizer};
pub use storage::{FileStateStorage, InMemoryStateStorage};
