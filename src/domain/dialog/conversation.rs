//! Persisted conversation state.
//!
//! One record per conversation: the dialog stack plus the lifecycle status.
//! Loaded at the start of a turn and saved at the end of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, StateMachine};
use crate::domain::report::Report;

use super::errors::DialogError;
use super::stack::DialogStack;
use super::state::ConversationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub conversation_id: ConversationId,
    pub locale: String,
    #[serde(default)]
    pub status: ConversationStatus,
    #[serde(default)]
    pub stack: DialogStack,
    /// The submitted report, once the dialog has completed with one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<Report>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(conversation_id: ConversationId, locale: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            conversation_id,
            locale: locale.into(),
            status: ConversationStatus::Active,
            stack: DialogStack::new(),
            submitted: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails unless the conversation still accepts turns.
    pub fn ensure_active(&self) -> Result<(), DialogError> {
        if self.status.accepts_turns() {
            Ok(())
        } else {
            Err(DialogError::ConversationClosed(self.status))
        }
    }

    /// Marks the conversation completed, keeping the report if one was submitted.
    pub fn complete(&mut self, submitted: Option<Report>) -> Result<(), DialogError> {
        self.status = self.transition(ConversationStatus::Completed)?;
        self.submitted = submitted;
        self.touch();
        Ok(())
    }

    /// Marks the conversation cancelled. The caller unwinds the stack.
    pub fn cancel(&mut self) -> Result<(), DialogError> {
        self.status = self.transition(ConversationStatus::Cancelled)?;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Report as collected so far by the root frame.
    pub fn report_in_progress(&self) -> Option<&Report> {
        self.stack.root().map(|frame| &frame.report)
    }

    fn transition(&self, target: ConversationStatus) -> Result<ConversationStatus, DialogError> {
        self.status
            .transition_to(target)
            .map_err(|_| DialogError::ConversationClosed(self.status))
    }
}
