//! Recognizer Port - Interface for the natural-language recognizer.
//!
//! The recognizer turns one user utterance into intents and entities. It is
//! optional: when it is not configured the dialog runs purely on prompts and
//! the step behaviour is identical.

use async_trait::async_trait;

use crate::domain::recognition::RecognizerResult;

/// Errors that can occur while calling the recognizer.
#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    /// One of application id, endpoint key or endpoint is missing.
    #[error("recognizer is not configured")]
    NotConfigured,

    /// Subscription key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Request did not complete.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("recognizer returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Port for natural-language recognition.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// True when the recognizer can be called at all.
    fn is_configured(&self) -> bool;

    /// Recognizes one utterance.
    ///
    /// # Errors
    ///
    /// Returns `RecognizerError::NotConfigured` when called while unconfigured.
    async fn recognize(&self, text: &str) -> Result<RecognizerResult, RecognizerError>;
}
