//! Recognizer configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// LUIS recognizer configuration
///
/// The recognizer is optional. It is used only when application id, endpoint
/// key and endpoint are all present and non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerConfig {
    /// LUIS application id
    pub application_id: Option<String>,

    /// Endpoint (subscription) key
    pub endpoint_key: Option<Secret<String>>,

    /// Endpoint base URL, e.g. `https://westus.api.cognitive.microsoft.com`
    pub endpoint: Option<String>,

    /// Publishing slot
    #[serde(default = "default_slot")]
    pub slot: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RecognizerConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that all three credentials are present
    pub fn is_configured(&self) -> bool {
        let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
        present(self.application_id.as_deref())
            && present(self.endpoint_key.as_ref().map(|k| k.expose_secret().as_str()))
            && present(self.endpoint.as_deref())
    }

    /// Some but not all credentials are present
    pub fn is_partial(&self) -> bool {
        let any = self.application_id.is_some() || self.endpoint_key.is_some() || self.endpoint.is_some();
        any && !self.is_configured()
    }

    /// Validate recognizer configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }

        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(ValidationError::InvalidRecognizerEndpoint);
            }
        }

        if self.slot.trim().is_empty() {
            return Err(ValidationError::MissingRequired("RECOGNIZER__SLOT"));
        }

        Ok(())
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            endpoint_key: None,
            endpoint: None,
            slot: default_slot(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_slot() -> String {
    "production".to_string()
}

fn default_timeout() -> u64 {
    10
}
