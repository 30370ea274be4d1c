//! State Storage Port - Interface for persisting conversation state.
//!
//! A conversation's dialog stack is saved after every turn and loaded at the
//! start of the next one, so turns for the same conversation may land on
//! different processes.

use async_trait::async_trait;

use crate::domain::dialog::ConversationState;
use crate::domain::foundation::ConversationId;

/// Errors that can occur during state storage operations
#[derive(Debug, thiserror::Error)]
pub enum StateStorageError {
    #[error("State not found for conversation: {0}")]
    NotFound(ConversationId),

    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading conversation state
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Save conversation state, replacing any earlier save
    ///
    /// # Errors
    /// Returns `StateStorageError` if save fails
    async fn save_state(&self, state: &ConversationState) -> Result<(), StateStorageError>;

    /// Load conversation state
    ///
    /// # Errors
    /// Returns `StateStorageError::NotFound` if no state exists
    async fn load_state(&self, conversation_id: &ConversationId) -> Result<ConversationState, StateStorageError>;

    /// Check if state exists for a conversation
    async fn exists(&self, conversation_id: &ConversationId) -> Result<bool, StateStorageError>;

    /// Delete the state for a conversation. Deleting a missing state is not an error.
    async fn delete(&self, conversation_id: &ConversationId) -> Result<(), StateStorageError>;
}
