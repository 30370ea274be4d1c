//! Dialog runner.
//!
//! Routes each turn to the active frame and keeps stepping until some frame
//! prompts the user or the root dialog ends. Frames are suspended and resumed
//! through the [`DialogStack`], so a turn never blocks waiting for input.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

use crate::domain::report::{parse_confirmation, Report, SlotValue};

use super::date_resolver::DateResolver;
use super::errors::DialogError;
use super::frame::{Awaiting, DialogFrame, DialogId};
use super::prompts::{Activity, PromptCatalog, PromptKind, PromptSpec};
use super::sequencer::StepSequencer;
use super::stack::DialogStack;
use super::transition::{DialogResult, StepOutcome};

/// How the root dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The user confirmed submission.
    Submitted(Report),
    /// The user declined (or did not confirm) submission.
    Declined,
}

impl DialogOutcome {
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Submitted(report) => Some(report),
            Self::Declined => None,
        }
    }
}

/// Everything a turn produced for the channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutput {
    /// Messages to send before the prompt, in order.
    pub activities: Vec<Activity>,
    /// The question the conversation is now waiting on.
    pub prompt: Option<PromptSpec>,
    /// Set once the root dialog has ended.
    pub outcome: Option<DialogOutcome>,
}

impl TurnOutput {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

pub struct DialogRunner {
    catalog: Arc<PromptCatalog>,
    sequencer: StepSequencer,
    resolver: DateResolver,
    reference_date: Option<NaiveDate>,
}

impl DialogRunner {
    pub fn new(catalog: Arc<PromptCatalog>) -> Self {
        Self {
            sequencer: StepSequencer::new(Arc::clone(&catalog)),
            resolver: DateResolver::new(Arc::clone(&catalog)),
            catalog,
            reference_date: None,
        }
    }

    /// Pins "today" for relative date answers. Defaults to the local date.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    pub fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Starts the incident report dialog on an empty stack.
    pub fn begin(&self, stack: &mut DialogStack, report: Report, locale: &str) -> Result<TurnOutput, DialogError> {
        if !stack.is_empty() {
            return Err(DialogError::InvalidState(format!(
                "dialog already running with {} frame(s)",
                stack.depth()
            )));
        }
        stack.push(DialogFrame::incident_report(report));
        self.drive(stack, locale)
    }

    /// Delivers the user's answer to the active frame.
    ///
    /// Text answering a yes/no prompt is read through the confirmation
    /// vocabulary first; text that is neither is passed on unchanged.
    pub fn resume(&self, stack: &mut DialogStack, input: SlotValue, locale: &str) -> Result<TurnOutput, DialogError> {
        let frame = stack.require_active_mut()?;
        let kind = frame
            .outstanding_prompt()
            .map(|prompt| prompt.kind)
            .ok_or(DialogError::NotAwaitingInput(frame.dialog))?;

        let input = match (kind, input) {
            (PromptKind::Confirm, SlotValue::Text(text)) => match parse_confirmation(&text) {
                Some(flag) => SlotValue::Bool(flag),
                None => SlotValue::Text(text),
            },
            (_, input) => input,
        };

        frame.pending_result = Some(input);
        self.drive(stack, locale)
    }

    /// Removes every frame. Returns how many were unwound.
    pub fn cancel(&self, stack: &mut DialogStack) -> usize {
        let unwound = stack.unwind();
        debug!(frames = unwound.len(), "Dialog stack unwound");
        unwound.len()
    }

    /// The prompt the conversation is currently waiting on.
    pub fn pending_prompt<'a>(&self, stack: &'a DialogStack) -> Option<&'a PromptSpec> {
        stack.active().and_then(DialogFrame::outstanding_prompt)
    }

    fn drive(&self, stack: &mut DialogStack, locale: &str) -> Result<TurnOutput, DialogError> {
        let today = self.today();
        let mut output = TurnOutput::default();

        loop {
            let frame = stack.require_active_mut()?;
            let input = frame.pending_result.take();
            let transition = match frame.dialog {
                DialogId::IncidentReport => self.sequencer.advance(frame, input.as_ref(), locale)?,
                DialogId::DateResolver => self.resolver.advance(frame, input.as_ref(), locale, today)?,
            };

            output.activities.extend(transition.activities);
            for (field, value) in transition.updates {
                frame.report.set(field, value)?;
            }

            match transition.outcome {
                StepOutcome::Prompt(spec) => {
                    frame.retries = if spec.retry { frame.retries + 1 } else { 0 };
                    debug!(
                        dialog = ?frame.dialog,
                        step = frame.step_index,
                        prompt = spec.key.as_str(),
                        retries = frame.retries,
                        "Prompting user"
                    );
                    frame.awaiting = Some(Awaiting::Answer { prompt: spec.clone() });
                    output.prompt = Some(spec);
                    return Ok(output);
                }
                StepOutcome::Continue { next, value } => {
                    debug!(dialog = ?frame.dialog, from = frame.step_index, to = next, "Step continued");
                    frame.step_index = next;
                    frame.pending_result = value;
                    frame.awaiting = None;
                    frame.retries = 0;
                }
                StepOutcome::Delegate { dialog, seed } => {
                    debug!(caller = ?frame.dialog, child = ?dialog, ?seed, "Delegating to child dialog");
                    frame.awaiting = Some(Awaiting::Child { dialog });
                    stack.push(DialogFrame::start(dialog, seed));
                }
                StepOutcome::End(result) => {
                    let ended = frame.dialog;
                    stack.pop();
                    match stack.active_mut() {
                        Some(caller) => {
                            debug!(child = ?ended, caller = ?caller.dialog, "Child dialog returned");
                            caller.pending_result = match result {
                                Some(DialogResult::Value(value)) => Some(value),
                                Some(DialogResult::Report(_)) => {
                                    return Err(DialogError::InvalidState(
                                        "report dialog cannot run as a child".to_string(),
                                    ))
                                }
                                None => None,
                            };
                        }
                        None => {
                            let outcome = match result {
                                Some(DialogResult::Report(report)) => DialogOutcome::Submitted(report),
                                _ => DialogOutcome::Declined,
                            };
                            debug!(submitted = outcome.report().is_some(), "Root dialog ended");
                            output.outcome = Some(outcome);
                            return Ok(output);
                        }
                    }
                }
            }
        }
    }
}
