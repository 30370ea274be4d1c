//! StartConversationHandler - Open a report conversation and ask the first question

use std::sync::Arc;
use tracing::info;

use crate::domain::dialog::{ConversationState, DialogError, DialogRunner, TurnOutput};
use crate::domain::foundation::ConversationId;
use crate::domain::recognition::EntityExtractor;
use crate::domain::report::Report;
use crate::ports::{Recognizer, StateStorage, StateStorageError};

use super::recognition::try_recognize;

/// Command to start a report conversation
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    pub conversation_id: ConversationId,
    /// Locale for prompts; the runner's default locale when absent
    pub locale: Option<String>,
    /// Fields already known by the host
    pub initial_report: Report,
    /// The message that opened the conversation, used for pre-fill
    pub utterance: Option<String>,
}

impl StartConversationCommand {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            locale: None,
            initial_report: Report::default(),
            utterance: None,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.initial_report = report;
        self
    }

    pub fn with_utterance(mut self, utterance: impl Into<String>) -> Self {
        self.utterance = Some(utterance.into());
        self
    }
}

/// Result of starting a conversation
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub state: ConversationState,
    pub output: TurnOutput,
}

/// Error type for starting conversations
#[derive(Debug, Clone)]
pub enum StartConversationError {
    /// Conversation already exists
    AlreadyExists(ConversationId),
    /// Storage error
    Storage(String),
    /// Dialog error
    Dialog(DialogError),
}

impl std::fmt::Display for StartConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartConversationError::AlreadyExists(id) => {
                write!(f, "Conversation already exists: {}", id)
            }
            StartConversationError::Storage(err) => write!(f, "Storage error: {}", err),
            StartConversationError::Dialog(err) => write!(f, "Dialog error: {}", err),
        }
    }
}

impl std::error::Error for StartConversationError {}

impl From<DialogError> for StartConversationError {
    fn from(err: DialogError) -> Self {
        StartConversationError::Dialog(err)
    }
}

impl From<StateStorageError> for StartConversationError {
    fn from(err: StateStorageError) -> Self {
        StartConversationError::Storage(err.to_string())
    }
}

/// Handler for starting report conversations
pub struct StartConversationHandler {
    storage: Arc<dyn StateStorage>,
    recognizer: Arc<dyn Recognizer>,
    runner: Arc<DialogRunner>,
    extractor: EntityExtractor,
}

impl StartConversationHandler {
    pub fn new(storage: Arc<dyn StateStorage>, recognizer: Arc<dyn Recognizer>, runner: Arc<DialogRunner>) -> Self {
        Self {
            storage,
            recognizer,
            runner,
            extractor: EntityExtractor::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: EntityExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, StartConversationError> {
        // 1. Only an active conversation blocks a new report; a closed one is replaced
        match self.storage.load_state(&cmd.conversation_id).await {
            Ok(existing) if existing.status.accepts_turns() => {
                return Err(StartConversationError::AlreadyExists(cmd.conversation_id));
            }
            Ok(existing) => {
                self.storage.delete(&cmd.conversation_id).await?;
                info!(
                    conversation_id = %cmd.conversation_id,
                    previous_status = ?existing.status,
                    "Replacing closed conversation"
                );
            }
            Err(StateStorageError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        // 2. Pre-fill from the opening utterance
        let mut report = cmd.initial_report;
        if let Some(utterance) = cmd.utterance.as_deref() {
            if let Some(result) = try_recognize(self.recognizer.as_ref(), utterance).await {
                self.extractor.prefill(&mut report, &result);
            }
        }

        // 3. Run the dialog up to its first prompt
        let locale = cmd
            .locale
            .unwrap_or_else(|| self.runner.catalog().default_locale().to_string());
        let mut state = ConversationState::new(cmd.conversation_id, locale);
        let output = self.runner.begin(&mut state.stack, report, &state.locale)?;

        // 4. Persist state
        self.storage.save_state(&state).await?;

        info!(
            conversation_id = %state.conversation_id,
            locale = %state.locale,
            "Conversation started"
        );

        Ok(StartConversationResult { state, output })
    }
}
