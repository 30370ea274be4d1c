//! Dialog configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::dialog::{PromptCatalog, PromptCatalogError, DEFAULT_LOCALE};

use super::error::ValidationError;

/// Dialog configuration (locale and prompt text)
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    /// Locale for new conversations
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Optional YAML file overriding built-in prompt text
    pub prompt_file: Option<PathBuf>,
}

impl DialogConfig {
    /// Build the prompt catalog, applying the override file if one is set
    pub fn prompt_catalog(&self) -> Result<PromptCatalog, PromptCatalogError> {
        match &self.prompt_file {
            Some(path) => PromptCatalog::load(path),
            None => Ok(PromptCatalog::builtin()),
        }
    }

    /// Validate dialog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.locale.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DIALOG__LOCALE"));
        }

        if let Some(path) = &self.prompt_file {
            if !path.is_file() {
                return Err(ValidationError::PromptFileNotFound(path.display().to_string()));
            }
        }

        Ok(())
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            prompt_file: None,
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}
