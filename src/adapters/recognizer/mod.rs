//! Recognizer Adapters.
//!
//! Implementations of the Recognizer port.
//!
//! ## Available Adapters
//!
//! - `LuisRecognizer` - LUIS v3 prediction endpoint over HTTP
//! - `ScriptedRecognizer` - Canned results for tests and demos

mod luis_recognizer;
mod scripted_recognizer;

pub use luis_recognizer::{normalize_entities, LuisConfig, LuisRecognizer};
pub use scripted_recognizer::{ScriptedRecognizer, ScriptedReply};
