//! Date resolution sub-dialog.
//!
//! Started by the report's date step whenever the known date is missing or
//! ambiguous. Keeps asking until the answer classifies as definite and only
//! then ends, returning the `YYYY-MM-DD` date portion to its caller.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::domain::datetime::{classify, normalize_date_text, DateClassification};
use crate::domain::report::SlotValue;

use super::errors::DialogError;
use super::frame::{DialogFrame, DialogId};
use super::prompts::{PromptCatalog, PromptKey, PromptKind};
use super::transition::{DialogResult, StepTransition};

pub struct DateResolver {
    catalog: Arc<PromptCatalog>,
}

impl DateResolver {
    pub fn new(catalog: Arc<PromptCatalog>) -> Self {
        Self { catalog }
    }

    /// On entry `last_input` is the seed handed over by the caller; on resume
    /// it is the user's answer. Relative answers such as "yesterday" are
    /// resolved against `today`.
    pub fn advance(
        &self,
        frame: &DialogFrame,
        last_input: Option<&SlotValue>,
        locale: &str,
        today: NaiveDate,
    ) -> Result<StepTransition, DialogError> {
        if frame.dialog != DialogId::DateResolver {
            return Err(DialogError::InvalidState(format!(
                "date resolver cannot run {:?} frames",
                frame.dialog
            )));
        }

        let candidate = last_input
            .and_then(SlotValue::as_text)
            .map(str::trim)
            .filter(|text| !text.is_empty());

        if frame.awaiting.is_none() {
            return Ok(self.enter(candidate, locale));
        }

        let resolved = candidate.and_then(|text| normalize_date_text(text, today));
        match resolved.as_deref().map(classify) {
            Some(DateClassification::Definite(date)) => {
                debug!(%date, "Date resolved");
                Ok(resolved_to(date))
            }
            _ => {
                debug!(answer = ?candidate, "Date answer still ambiguous");
                Ok(StepTransition::prompt(self.catalog.retry(
                    PromptKey::DateRetry,
                    PromptKind::FreeText,
                    locale,
                )))
            }
        }
    }

    fn enter(&self, seed: Option<&str>, locale: &str) -> StepTransition {
        match seed {
            None => StepTransition::prompt(self.catalog.prompt(PromptKey::DateInitial, PromptKind::FreeText, locale)),
            Some(seed) => match classify(seed) {
                DateClassification::Definite(date) => resolved_to(date),
                DateClassification::Ambiguous => {
                    StepTransition::prompt(self.catalog.prompt(PromptKey::DateRetry, PromptKind::FreeText, locale))
                }
            },
        }
    }
}

fn resolved_to(date: String) -> StepTransition {
    StepTransition::end(Some(DialogResult::Value(SlotValue::Text(date))))
}
