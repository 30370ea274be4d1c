//! Recognizer result as produced by the NLU engine.
//!
//! Entities keep the engine's nested JSON layout:
//!
//! ```json
//! {
//!   "$instance": { "From": [{ "text": "Taipei", "startIndex": 5 }] },
//!   "From": [{ "Airport": [["TPE"]] }],
//!   "datetime": [{ "type": "date", "timex": ["2023-11-15"] }]
//! }
//! ```
//!
//! Nothing about that layout is guaranteed, so accessors return `Option`
//! and never index blindly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Key under which the engine stores raw text spans.
pub const INSTANCE_KEY: &str = "$instance";

/// Key of the built-in date/time entity.
pub const DATETIME_KEY: &str = "datetime";

/// Score attached to one intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub score: f64,
}

/// One turn's recognition output. Read-only once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub intents: HashMap<String, IntentScore>,
    #[serde(default)]
    pub entities: Value,
}

impl RecognizerResult {
    pub fn new(text: impl Into<String>, entities: Value) -> Self {
        Self {
            text: text.into(),
            intents: HashMap::new(),
            entities,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>, score: f64) -> Self {
        self.intents.insert(intent.into(), IntentScore { score });
        self
    }

    /// Highest scoring intent, if any.
    pub fn top_intent(&self) -> Option<(&str, f64)> {
        self.intents
            .iter()
            .max_by(|a, b| a.1.score.total_cmp(&b.1.score))
            .map(|(name, s)| (name.as_str(), s.score))
    }

    /// Raw text spans recorded for an entity.
    pub fn instances(&self, entity: &str) -> Option<&Vec<Value>> {
        self.entities.get(INSTANCE_KEY)?.get(entity)?.as_array()
    }

    /// Typed/resolved values recorded for an entity.
    pub fn resolutions(&self, entity: &str) -> Option<&Vec<Value>> {
        self.entities.get(entity)?.as_array()
    }
}
