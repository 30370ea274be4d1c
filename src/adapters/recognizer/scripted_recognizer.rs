//! Scripted Recognizer for testing.
//!
//! Returns canned results for known utterances so tests and demos can
//! exercise pre-fill and date recognition without a live service.
//!
//! ```ignore
//! let recognizer = ScriptedRecognizer::new()
//!     .with_result("昨天在台北車站", RecognizerResult::new("", entities));
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::recognition::RecognizerResult;
use crate::ports::{Recognizer, RecognizerError};

/// A canned reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Result(RecognizerResult),
    /// Fails with `RecognizerError::Network` carrying this message.
    Failure(String),
}

#[derive(Debug, Clone)]
pub struct ScriptedRecognizer {
    replies: Arc<Mutex<HashMap<String, ScriptedReply>>>,
    configured: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRecognizer {
    /// A configured recognizer with no scripted replies; unknown text
    /// recognizes to an empty result.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(HashMap::new())),
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A recognizer that reports itself unconfigured.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_result(self, text: impl Into<String>, result: RecognizerResult) -> Self {
        lock(&self.replies).insert(text.into(), ScriptedReply::Result(result));
        self
    }

    pub fn with_failure(self, text: impl Into<String>, message: impl Into<String>) -> Self {
        lock(&self.replies).insert(text.into(), ScriptedReply::Failure(message.into()));
        self
    }

    /// Utterances recognized so far, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn recognize(&self, text: &str) -> Result<RecognizerResult, RecognizerError> {
        if !self.configured {
            return Err(RecognizerError::NotConfigured);
        }
        lock(&self.calls).push(text.to_string());

        match lock(&self.replies).get(text).cloned() {
            Some(ScriptedReply::Result(mut result)) => {
                if result.text.is_empty() {
                    result.text = text.to_string();
                }
                Ok(result)
            }
            Some(ScriptedReply::Failure(message)) => Err(RecognizerError::Network(message)),
            None => Ok(RecognizerResult::new(text, serde_json::Value::Null)),
        }
    }
}
