//! Conversation lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle status of a report conversation.
///
/// - `Active`: the dialog stack is running and accepts turns
/// - `Completed`: the root dialog ended, with or without a submitted report
/// - `Cancelled`: the conversation was cancelled from outside and its frames unwound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl ConversationStatus {
    pub fn accepts_turns(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl StateMachine for ConversationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationStatus::*;
        match self {
            Active => vec![Completed, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}
