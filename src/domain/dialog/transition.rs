//! What a dialog step decides.

use crate::domain::report::{Report, ReportField, SlotValue};

use super::frame::DialogId;
use super::prompts::{Activity, PromptSpec};

/// Value a dialog hands back to its caller when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// The incident report dialog finished with a submitted report.
    Report(Report),
    /// A child dialog resolved a value for its caller.
    Value(SlotValue),
}

/// The decision taken by one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Ask the user and suspend until the answer arrives.
    Prompt(PromptSpec),
    /// Move straight to `next`, handing it `value`.
    Continue { next: usize, value: Option<SlotValue> },
    /// Start a child dialog and suspend until it ends.
    Delegate { dialog: DialogId, seed: Option<SlotValue> },
    /// Finish this dialog.
    End(Option<DialogResult>),
}

/// A step's decision plus its side effects.
///
/// Steps never mutate the frame themselves; the runner applies `updates` to
/// the frame's report and sends `activities` before acting on `outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTransition {
    pub activities: Vec<Activity>,
    pub updates: Vec<(ReportField, SlotValue)>,
    pub outcome: StepOutcome,
}

impl StepTransition {
    pub fn new(outcome: StepOutcome) -> Self {
        Self {
            activities: Vec::new(),
            updates: Vec::new(),
            outcome,
        }
    }

    pub fn prompt(spec: PromptSpec) -> Self {
        Self::new(StepOutcome::Prompt(spec))
    }

    pub fn continue_to(next: usize, value: Option<SlotValue>) -> Self {
        Self::new(StepOutcome::Continue { next, value })
    }

    pub fn delegate(dialog: DialogId, seed: Option<SlotValue>) -> Self {
        Self::new(StepOutcome::Delegate { dialog, seed })
    }

    pub fn end(result: Option<DialogResult>) -> Self {
        Self::new(StepOutcome::End(result))
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_update(mut self, field: ReportField, value: SlotValue) -> Self {
        self.updates.push((field, value));
        self
    }
}
