//! The incident report step table.
//!
//! The waterfall is data, not a chain of bound methods: each entry says what
//! kind of step it is, which report field it fills and which prompt it shows.
//! The sequencer walks the table in order.

use serde::{Deserialize, Serialize};

use crate::domain::report::ReportField;

use super::prompts::PromptKey;

/// Identity of a step in the incident report dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Welcome,
    DateTime,
    Position,
    Accident,
    People,
    PeopleDie,
    Details,
    EndNotice,
    Inform,
    Final,
}

/// How a step behaves on entry and when its answer arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Sends the welcome card and asks for a free-text description.
    Welcome,
    /// Skips when a definite date is known, otherwise delegates to the date resolver.
    DateResolution,
    /// Skips when its field is set, otherwise prompts for free text.
    SkippableText,
    /// Skips when its field is set, otherwise prompts yes/no.
    SkippableConfirm,
    /// Always prompts yes/no, even if a value is already known.
    MandatoryConfirm,
    /// Sends a fixed message and continues without waiting.
    Notice,
    /// Asks for submission and ends the dialog.
    Final,
}

/// One row of the step table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    pub id: StepId,
    pub kind: StepKind,
    pub field: Option<ReportField>,
    pub prompt: PromptKey,
}

impl StepDef {
    const fn new(id: StepId, kind: StepKind, field: Option<ReportField>, prompt: PromptKey) -> Self {
        Self { id, kind, field, prompt }
    }

    /// True for steps that are skipped when their field is already known.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self.kind,
            StepKind::SkippableText | StepKind::SkippableConfirm | StepKind::DateResolution
        )
    }
}

/// The fixed order of the incident report dialog.
pub const INCIDENT_STEPS: [StepDef; 10] = [
    StepDef::new(StepId::Welcome, StepKind::Welcome, Some(ReportField::Origin), PromptKey::Welcome),
    StepDef::new(StepId::DateTime, StepKind::DateResolution, Some(ReportField::Date), PromptKey::DateInitial),
    StepDef::new(StepId::Position, StepKind::SkippableText, Some(ReportField::Position), PromptKey::Position),
    StepDef::new(StepId::Accident, StepKind::MandatoryConfirm, Some(ReportField::Accident), PromptKey::Accident),
    StepDef::new(StepId::People, StepKind::SkippableText, Some(ReportField::People), PromptKey::People),
    StepDef::new(StepId::PeopleDie, StepKind::MandatoryConfirm, Some(ReportField::PeopleDie), PromptKey::PeopleDie),
    StepDef::new(StepId::Details, StepKind::SkippableText, Some(ReportField::Details), PromptKey::Details),
    StepDef::new(StepId::EndNotice, StepKind::Notice, None, PromptKey::EndNotice),
    StepDef::new(StepId::Inform, StepKind::SkippableConfirm, Some(ReportField::Inform), PromptKey::Inform),
    StepDef::new(StepId::Final, StepKind::Final, None, PromptKey::Final),
];

/// Looks up a step by position.
pub fn step_at(index: usize) -> Option<&'static StepDef> {
    INCIDENT_STEPS.get(index)
}

/// Position of a step in the table.
pub fn index_of(id: StepId) -> usize {
    INCIDENT_STEPS
        .iter()
        .position(|step| step.id == id)
        .unwrap_or(INCIDENT_STEPS.len())
}
