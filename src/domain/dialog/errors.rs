//! Error types for the dialog domain

use crate::domain::report::ReportError;

use super::frame::DialogId;
use super::state::ConversationStatus;

/// Errors raised while driving the dialog stack.
///
/// Missing report fields and ambiguous dates are not errors; they are
/// ordinary prompts and delegations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DialogError {
    #[error("No active dialog frame")]
    EmptyStack,

    #[error("Dialog {0:?} is not waiting for user input")]
    NotAwaitingInput(DialogId),

    #[error("Conversation is {0:?} and accepts no more turns")]
    ConversationClosed(ConversationStatus),

    #[error("Step index {index} is out of range for {dialog:?}")]
    StepOutOfRange { dialog: DialogId, index: usize },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Report(#[from] ReportError),
}
