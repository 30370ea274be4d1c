//! GetConversationStateHandler - Query handler for conversation state

use std::sync::Arc;

use crate::domain::dialog::{ConversationState, DialogRunner, PromptSpec};
use crate::domain::foundation::ConversationId;
use crate::ports::{StateStorage, StateStorageError};

/// Query to get a conversation's state
#[derive(Debug, Clone)]
pub struct GetConversationStateQuery {
    pub conversation_id: ConversationId,
}

/// Result of the query
#[derive(Debug, Clone)]
pub struct GetConversationStateResult {
    pub state: ConversationState,
    /// The question the conversation is waiting on, for re-display
    pub pending_prompt: Option<PromptSpec>,
}

/// Error type for the query
#[derive(Debug, Clone)]
pub enum GetConversationStateError {
    /// Conversation not found
    NotFound(ConversationId),
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for GetConversationStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetConversationStateError::NotFound(id) => {
                write!(f, "Conversation not found: {}", id)
            }
            GetConversationStateError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for GetConversationStateError {}

impl From<StateStorageError> for GetConversationStateError {
    fn from(err: StateStorageError) -> Self {
        match err {
            StateStorageError::NotFound(id) => GetConversationStateError::NotFound(id),
            other => GetConversationStateError::Storage(other.to_string()),
        }
    }
}

/// Handler for conversation state queries
pub struct GetConversationStateHandler {
    storage: Arc<dyn StateStorage>,
    runner: Arc<DialogRunner>,
}

impl GetConversationStateHandler {
    pub fn new(storage: Arc<dyn StateStorage>, runner: Arc<DialogRunner>) -> Self {
        Self { storage, runner }
    }

    pub async fn handle(
        &self,
        query: GetConversationStateQuery,
    ) -> Result<GetConversationStateResult, GetConversationStateError> {
        let state = self.storage.load_state(&query.conversation_id).await?;
        let pending_prompt = self.runner.pending_prompt(&state.stack).cloned();

        Ok(GetConversationStateResult { state, pending_prompt })
    }
}
