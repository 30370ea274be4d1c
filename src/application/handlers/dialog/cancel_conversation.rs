//! CancelConversationHandler - Abandon a report conversation

use std::sync::Arc;
use tracing::info;

use crate::domain::dialog::{ConversationState, DialogError, DialogRunner};
use crate::domain::foundation::ConversationId;
use crate::ports::{StateStorage, StateStorageError};

/// Command to cancel a conversation
#[derive(Debug, Clone)]
pub struct CancelConversationCommand {
    pub conversation_id: ConversationId,
}

/// Result of cancelling a conversation
#[derive(Debug, Clone)]
pub struct CancelConversationResult {
    pub state: ConversationState,
    /// Frames discarded, innermost first
    pub frames_unwound: usize,
}

/// Error type for cancelling conversations
#[derive(Debug, Clone)]
pub enum CancelConversationError {
    /// Conversation not found
    NotFound(ConversationId),
    /// Storage error
    Storage(String),
    /// Conversation already completed or cancelled
    Dialog(DialogError),
}

impl std::fmt::Display for CancelConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelConversationError::NotFound(id) => write!(f, "Conversation not found: {}", id),
            CancelConversationError::Storage(err) => write!(f, "Storage error: {}", err),
            CancelConversationError::Dialog(err) => write!(f, "Dialog error: {}", err),
        }
    }
}

impl std::error::Error for CancelConversationError {}

impl From<DialogError> for CancelConversationError {
    fn from(err: DialogError) -> Self {
        CancelConversationError::Dialog(err)
    }
}

impl From<StateStorageError> for CancelConversationError {
    fn from(err: StateStorageError) -> Self {
        match err {
            StateStorageError::NotFound(id) => CancelConversationError::NotFound(id),
            other => CancelConversationError::Storage(other.to_string()),
        }
    }
}

/// Handler for cancelling conversations
pub struct CancelConversationHandler {
    storage: Arc<dyn StateStorage>,
    runner: Arc<DialogRunner>,
}

impl CancelConversationHandler {
    pub fn new(storage: Arc<dyn StateStorage>, runner: Arc<DialogRunner>) -> Self {
        Self { storage, runner }
    }

    pub async fn handle(
        &self,
        cmd: CancelConversationCommand,
    ) -> Result<CancelConversationResult, CancelConversationError> {
        // 1. Load state
        let mut state = self.storage.load_state(&cmd.conversation_id).await?;

        // 2. Transition status first so a closed conversation is left untouched
        state.cancel()?;
        let frames_unwound = self.runner.cancel(&mut state.stack);

        // 3. Persist state
        self.storage.save_state(&state).await?;

        info!(
            conversation_id = %state.conversation_id,
            frames_unwound,
            "Conversation cancelled"
        );

        Ok(CancelConversationResult { state, frames_unwound })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStateStorage, ScriptedRecognizer};
    use crate::application::handlers::dialog::{
        ProcessTurnCommand, ProcessTurnHandler, StartConversationCommand, StartConversationHandler,
    };
    use crate::domain::dialog::{ConversationStatus, PromptCatalog};
    use crate::domain::report::SlotValue;
    use crate::ports::Recognizer;

    fn test_id() -> ConversationId {
        ConversationId::new("conv-1").unwrap()
    }

    fn runner() -> Arc<DialogRunner> {
        Arc::new(DialogRunner::new(Arc::new(PromptCatalog::builtin())))
    }

    #[tokio::test]
    async fn test_cancel_unwinds_delegated_date_dialog() {
        let storage = Arc::new(InMemoryStateStorage::new());
        let recognizer: Arc<dyn Recognizer> = Arc::new(ScriptedRecognizer::unconfigured());
        let runner = runner();
        StartConversationHandler::new(storage.clone(), recognizer.clone(), runner.clone())
            .handle(StartConversationCommand::new(test_id()))
            .await
            .unwrap();
        ProcessTurnHandler::new(storage.clone(), recognizer, runner.clone())
            .handle(ProcessTurnCommand {
                conversation_id: test_id(),
                input: SlotValue::text("電扶梯故障"),
            })
            .await
            .unwrap();

        let handler = CancelConversationHandler::new(storage.clone(), runner);
        let result = handler
            .handle(CancelConversationCommand { conversation_id: test_id() })
            .await
            .unwrap();

        assert_eq!(result.frames_unwound, 2);
        assert!(result.state.stack.is_empty());
        assert_eq!(result.state.status, ConversationStatus::Cancelled);

        let stored = storage.load_state(&test_id()).await.unwrap();
        assert_eq!(stored.status, ConversationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_twice_fails() {
        let storage = Arc::new(InMemoryStateStorage::new());
        storage.save_state(&ConversationState::new(test_id(), "zh-TW")).await.unwrap();
        let handler = CancelConversationHandler::new(storage, runner());

        handler
            .handle(CancelConversationCommand { conversation_id: test_id() })
            .await
            .unwrap();
        let result = handler
            .handle(CancelConversationCommand { conversation_id: test_id() })
            .await;

        assert!(matches!(
            result,
            Err(CancelConversationError::Dialog(DialogError::ConversationClosed(
                ConversationStatus::Cancelled
            )))
        ));
    }

    #[tokio::test]
    async fn test_cancel_unknown_conversation() {
        let handler = CancelConversationHandler::new(Arc::new(InMemoryStateStorage::new()), runner());
        let result = handler
            .handle(CancelConversationCommand { conversation_id: test_id() })
            .await;
        assert!(matches!(result, Err(CancelConversationError::NotFound(_))));
    }
}
