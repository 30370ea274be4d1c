//! Dialog frames.

use serde::{Deserialize, Serialize};

use crate::domain::report::{Report, SlotValue};

use super::prompts::PromptSpec;

/// The dialogs a frame can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogId {
    IncidentReport,
    DateResolver,
}

/// What a suspended frame is waiting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "snake_case")]
pub enum Awaiting {
    /// An answer to the prompt it sent.
    Answer { prompt: PromptSpec },
    /// The result of a child dialog it started.
    Child { dialog: DialogId },
}

/// One running dialog.
///
/// A frame owns its report. For the date resolver the report stays empty and
/// `pending_result` carries the seed expression until the first step reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogFrame {
    pub dialog: DialogId,
    pub step_index: usize,
    #[serde(default)]
    pub report: Report,
    /// Last value waiting to be consumed by the step at `step_index`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_result: Option<SlotValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awaiting: Option<Awaiting>,
    /// Consecutive unusable answers at the current step.
    #[serde(default)]
    pub retries: u32,
}

impl DialogFrame {
    pub fn incident_report(report: Report) -> Self {
        Self {
            dialog: DialogId::IncidentReport,
            step_index: 0,
            report,
            pending_result: None,
            awaiting: None,
            retries: 0,
        }
    }

    pub fn date_resolver(seed: Option<SlotValue>) -> Self {
        Self {
            dialog: DialogId::DateResolver,
            step_index: 0,
            report: Report::default(),
            pending_result: seed,
            awaiting: None,
            retries: 0,
        }
    }

    /// Frame for `dialog`, seeded with a value from its caller.
    pub fn start(dialog: DialogId, seed: Option<SlotValue>) -> Self {
        match dialog {
            DialogId::IncidentReport => Self::incident_report(Report::default()),
            DialogId::DateResolver => Self::date_resolver(seed),
        }
    }

    /// Prompt this frame is waiting on, if any.
    pub fn outstanding_prompt(&self) -> Option<&PromptSpec> {
        match &self.awaiting {
            Some(Awaiting::Answer { prompt }) => Some(prompt),
            _ => None,
        }
    }

    pub fn is_waiting_for_child(&self) -> bool {
        matches!(self.awaiting, Some(Awaiting::Child { .. }))
    }
}
