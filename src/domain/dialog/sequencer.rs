//! Step sequencer for the incident report dialog.
//!
//! `advance` is a pure function of the frame and the last user input. A step
//! runs its *entry* phase when the frame is not waiting on anything, and its
//! *resume* phase when the frame was suspended on a prompt or a child dialog.

use std::sync::Arc;

use crate::domain::datetime::is_ambiguous;
use crate::domain::report::{Report, ReportField, SlotValue};

use super::errors::DialogError;
use super::frame::{DialogFrame, DialogId};
use super::prompts::{PromptCatalog, PromptKind};
use super::step::{step_at, StepDef, StepKind};
use super::transition::{DialogResult, StepTransition};

pub struct StepSequencer {
    catalog: Arc<PromptCatalog>,
}

impl StepSequencer {
    pub fn new(catalog: Arc<PromptCatalog>) -> Self {
        Self { catalog }
    }

    /// Decides what the step at `frame.step_index` does next.
    pub fn advance(
        &self,
        frame: &DialogFrame,
        last_input: Option<&SlotValue>,
        locale: &str,
    ) -> Result<StepTransition, DialogError> {
        if frame.dialog != DialogId::IncidentReport {
            return Err(DialogError::InvalidState(format!(
                "step sequencer cannot run {:?} frames",
                frame.dialog
            )));
        }

        let step = step_at(frame.step_index).ok_or(DialogError::StepOutOfRange {
            dialog: frame.dialog,
            index: frame.step_index,
        })?;
        let next = frame.step_index + 1;

        if frame.awaiting.is_some() {
            self.resume(step, next, &frame.report, last_input, locale)
        } else {
            self.enter(step, next, &frame.report, locale)
        }
    }

    fn enter(
        &self,
        step: &StepDef,
        next: usize,
        report: &Report,
        locale: &str,
    ) -> Result<StepTransition, DialogError> {
        let transition = match step.kind {
            StepKind::Welcome => {
                StepTransition::prompt(self.catalog.prompt(step.prompt, PromptKind::FreeText, locale))
                    .with_activity(self.catalog.welcome_card())
            }
            StepKind::DateResolution => match &report.date {
                Some(date) if !is_ambiguous(date) => {
                    StepTransition::continue_to(next, Some(SlotValue::text(date.clone())))
                }
                seed => StepTransition::delegate(DialogId::DateResolver, seed.clone().map(SlotValue::Text)),
            },
            StepKind::SkippableText | StepKind::SkippableConfirm => {
                let field = field_of(step)?;
                match report.get(field) {
                    Some(value) => StepTransition::continue_to(next, Some(value)),
                    None => StepTransition::prompt(self.catalog.prompt(step.prompt, prompt_kind(step), locale)),
                }
            }
            StepKind::MandatoryConfirm | StepKind::Final => {
                StepTransition::prompt(self.catalog.prompt(step.prompt, PromptKind::Confirm, locale))
            }
            StepKind::Notice => {
                StepTransition::continue_to(next, None).with_activity(self.catalog.notice(step.prompt, locale))
            }
        };
        Ok(transition)
    }

    fn resume(
        &self,
        step: &StepDef,
        next: usize,
        report: &Report,
        answer: Option<&SlotValue>,
        locale: &str,
    ) -> Result<StepTransition, DialogError> {
        let transition = match step.kind {
            StepKind::Welcome => match non_blank_text(answer) {
                Some(text) => {
                    let value = SlotValue::text(text);
                    let transition = StepTransition::continue_to(next, Some(value.clone()));
                    if report.is_set(ReportField::Origin) {
                        transition
                    } else {
                        transition.with_update(ReportField::Origin, value)
                    }
                }
                None => StepTransition::continue_to(next, None),
            },
            StepKind::DateResolution => match non_blank_text(answer) {
                Some(date) => {
                    let value = SlotValue::text(date);
                    StepTransition::continue_to(next, Some(value.clone())).with_update(ReportField::Date, value)
                }
                None => StepTransition::delegate(DialogId::DateResolver, report.date.clone().map(SlotValue::Text)),
            },
            StepKind::SkippableText => match non_blank_text(answer) {
                Some(text) => {
                    let value = SlotValue::text(text);
                    StepTransition::continue_to(next, Some(value.clone())).with_update(field_of(step)?, value)
                }
                None => StepTransition::prompt(self.catalog.retry(step.prompt, PromptKind::FreeText, locale)),
            },
            StepKind::SkippableConfirm | StepKind::MandatoryConfirm => {
                match answer.and_then(SlotValue::as_bool) {
                    Some(flag) => {
                        let value = SlotValue::Bool(flag);
                        StepTransition::continue_to(next, Some(value.clone())).with_update(field_of(step)?, value)
                    }
                    None => StepTransition::prompt(self.catalog.retry(step.prompt, PromptKind::Confirm, locale)),
                }
            }
            StepKind::Notice => StepTransition::continue_to(next, None),
            StepKind::Final => {
                let submitted = answer.map(SlotValue::is_true).unwrap_or(false);
                if submitted {
                    StepTransition::end(Some(DialogResult::Report(report.clone())))
                } else {
                    StepTransition::end(None)
                }
            }
        };
        Ok(transition)
    }
}

fn field_of(step: &StepDef) -> Result<ReportField, DialogError> {
    step.field
        .ok_or_else(|| DialogError::InvalidState(format!("step {:?} has no report field", step.id)))
}

fn prompt_kind(step: &StepDef) -> PromptKind {
    match step.kind {
        StepKind::SkippableConfirm | StepKind::MandatoryConfirm | StepKind::Final => PromptKind::Confirm,
        _ => PromptKind::FreeText,
    }
}

fn non_blank_text(answer: Option<&SlotValue>) -> Option<String> {
    answer
        .and_then(SlotValue::as_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
