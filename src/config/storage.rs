//! Conversation state storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Which StateStorage adapter to use
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Base directory for the file backend
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.path.is_none() {
            return Err(ValidationError::MissingRequired("STORAGE__PATH"));
        }
        Ok(())
    }
}
