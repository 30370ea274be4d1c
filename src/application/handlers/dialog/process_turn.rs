//! ProcessTurnHandler - Deliver one user answer to a running conversation

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::dialog::{
    step_at, ConversationState, DialogError, DialogFrame, DialogId, DialogRunner, StepId, TurnOutput,
};
use crate::domain::foundation::ConversationId;
use crate::domain::recognition::{get_date_time, EntityExtractor};
use crate::domain::report::SlotValue;
use crate::ports::{Recognizer, StateStorage, StateStorageError};

use super::recognition::try_recognize;

/// Command carrying one inbound answer
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub conversation_id: ConversationId,
    /// Typed text, or a boolean from a channel with native confirm buttons
    pub input: SlotValue,
}

/// Result of processing a turn
#[derive(Debug, Clone)]
pub struct ProcessTurnResult {
    pub state: ConversationState,
    pub output: TurnOutput,
}

/// Error type for processing turns
#[derive(Debug, Clone)]
pub enum ProcessTurnError {
    /// Conversation not found
    NotFound(ConversationId),
    /// Storage error
    Storage(String),
    /// Dialog error (closed conversation, no outstanding prompt, ...)
    Dialog(DialogError),
}

impl std::fmt::Display for ProcessTurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessTurnError::NotFound(id) => write!(f, "Conversation not found: {}", id),
            ProcessTurnError::Storage(err) => write!(f, "Storage error: {}", err),
            ProcessTurnError::Dialog(err) => write!(f, "Dialog error: {}", err),
        }
    }
}

impl std::error::Error for ProcessTurnError {}

impl From<DialogError> for ProcessTurnError {
    fn from(err: DialogError) -> Self {
        ProcessTurnError::Dialog(err)
    }
}

impl From<StateStorageError> for ProcessTurnError {
    fn from(err: StateStorageError) -> Self {
        match err {
            StateStorageError::NotFound(id) => ProcessTurnError::NotFound(id),
            other => ProcessTurnError::Storage(other.to_string()),
        }
    }
}

/// Handler for inbound turns
pub struct ProcessTurnHandler {
    storage: Arc<dyn StateStorage>,
    recognizer: Arc<dyn Recognizer>,
    runner: Arc<DialogRunner>,
    extractor: EntityExtractor,
}

impl ProcessTurnHandler {
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

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<ProcessTurnResult, ProcessTurnError> {
        // 1. Load state and make sure it still takes turns
        let mut state = self.storage.load_state(&cmd.conversation_id).await?;
        state.ensure_active()?;

        // 2. Let the recognizer enrich the answer where it helps
        let input = self.enrich(&mut state, cmd.input).await;

        // 3. Advance the dialog
        let output = self.runner.resume(&mut state.stack, input, &state.locale)?;

        // 4. Close the conversation when the root dialog ended
        match &output.outcome {
            Some(outcome) => {
                state.complete(outcome.report().cloned())?;
                info!(
                    conversation_id = %state.conversation_id,
                    submitted = state.submitted.is_some(),
                    "Conversation completed"
                );
            }
            None => state.touch(),
        }

        // 5. Persist state
        self.storage.save_state(&state).await?;

        Ok(ProcessTurnResult { state, output })
    }

    /// The welcome answer is the user's own description of the incident, so
    /// it pre-fills the report. Answers to the date resolver are replaced by
    /// the recognizer's date when it finds one.
    async fn enrich(&self, state: &mut ConversationState, input: SlotValue) -> SlotValue {
        let Some(text) = input.as_text().map(str::to_string) else {
            return input;
        };
        let Some(frame) = state.stack.active_mut() else {
            return input;
        };

        if is_welcome_answer(frame) {
            if let Some(result) = try_recognize(self.recognizer.as_ref(), &text).await {
                let filled = self.extractor.prefill(&mut frame.report, &result);
                debug!(?filled, "Pre-filled from welcome answer");
            }
        } else if frame.dialog == DialogId::DateResolver {
            if let Some(date) = try_recognize(self.recognizer.as_ref(), &text)
                .await
                .and_then(|result| get_date_time(&result))
            {
                debug!(%date, "Recognizer resolved date answer");
                return SlotValue::Text(date);
            }
        }

        input
    }
}

fn is_welcome_answer(frame: &DialogFrame) -> bool {
    frame.dialog == DialogId::IncidentReport
        && frame.outstanding_prompt().is_some()
        && step_at(frame.step_index).map(|step| step.id) == Some(StepId::Welcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStateStorage, ScriptedRecognizer};
    use crate::application::handlers::dialog::{StartConversationCommand, StartConversationHandler};
    use crate::domain::dialog::{ConversationStatus, DialogOutcome, PromptCatalog, PromptKey};
    use crate::domain::recognition::RecognizerResult;
    use crate::domain::report::Report;
    use serde_json::json;

    struct Fixture {
        storage: Arc<InMemoryStateStorage>,
        start: StartConversationHandler,
        turn: ProcessTurnHandler,
    }

    fn fixture(recognizer: ScriptedRecognizer) -> Fixture {
        let storage = Arc::new(InMemoryStateStorage::new());
        let recognizer: Arc<dyn Recognizer> = Arc::new(recognizer);
        let runner = Arc::new(DialogRunner::new(Arc::new(PromptCatalog::builtin())));
        Fixture {
            storage: storage.clone(),
            start: StartConversationHandler::new(storage.clone(), recognizer.clone(), runner.clone()),
            turn: ProcessTurnHandler::new(storage, recognizer, runner),
        }
    }

    fn test_id() -> ConversationId {
        ConversationId::new("conv-1").unwrap()
    }

    async fn say(fixture: &Fixture, text: &str) -> ProcessTurnResult {
        fixture
            .turn
            .handle(ProcessTurnCommand {
                conversation_id: test_id(),
                input: SlotValue::text(text),
            })
            .await
            .unwrap()
    }

    fn prompt_key(result: &ProcessTurnResult) -> Option<PromptKey> {
        result.output.prompt.as_ref().map(|p| p.key)
    }

    #[tokio::test]
    async fn test_turn_for_unknown_conversation_fails() {
        let fixture = fixture(ScriptedRecognizer::unconfigured());
        let result = fixture
            .turn
            .handle(ProcessTurnCommand {
                conversation_id: test_id(),
                input: SlotValue::text("hi"),
            })
            .await;
        assert!(matches!(result, Err(ProcessTurnError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_turn_advances_and_persists() {
        let fixture = fixture(ScriptedRecognizer::unconfigured());
        fixture.start.handle(StartConversationCommand::new(test_id())).await.unwrap();

        let result = say(&fixture, "電扶梯故障").await;

        assert_eq!(prompt_key(&result), Some(PromptKey::DateInitial));
        let stored = fixture.storage.load_state(&test_id()).await.unwrap();
        assert_eq!(stored.stack.depth(), 2);
        assert_eq!(stored.report_in_progress().and_then(|r| r.origin.as_deref()), Some("電扶梯故障"));
    }

    #[tokio::test]
    async fn test_welcome_answer_prefills_report() {
        let recognizer = ScriptedRecognizer::new().with_result(
            "台北車站旅客被月台門夾到",
            RecognizerResult::new(
                "",
                json!({
                    "$instance": {
                        "Position": [{ "text": "台北車站" }],
                        "People": [{ "text": "旅客" }]
                    },
                    "datetime": [{ "type": "date", "timex": ["2023-11-15"] }]
                }),
            ),
        );
        let fixture = fixture(recognizer);
        fixture.start.handle(StartConversationCommand::new(test_id())).await.unwrap();

        let result = say(&fixture, "台北車站旅客被月台門夾到").await;

        // date and position are known, so the next question is the accident confirmation
        assert_eq!(prompt_key(&result), Some(PromptKey::Accident));
        let report = result.state.report_in_progress().unwrap();
        assert_eq!(report.people.as_deref(), Some("旅客"));
        assert_eq!(report.origin.as_deref(), Some("台北車站旅客被月台門夾到"));
    }

    #[tokio::test]
    async fn test_recognizer_failure_does_not_fail_turn() {
        let recognizer = ScriptedRecognizer::new().with_failure("電扶梯故障", "connection reset");
        let fixture = fixture(recognizer);
        fixture.start.handle(StartConversationCommand::new(test_id())).await.unwrap();

        let result = say(&fixture, "電扶梯故障").await;

        assert_eq!(prompt_key(&result), Some(PromptKey::DateInitial));
    }

    #[tokio::test]
    async fn test_recognizer_resolves_date_answer() {
        let recognizer = ScriptedRecognizer::new().with_result(
            "上週三",
            RecognizerResult::new("", json!({ "datetime": [{ "type": "date", "timex": ["2023-11-15"] }] })),
        );
        let fixture = fixture(recognizer);
        fixture.start.handle(StartConversationCommand::new(test_id())).await.unwrap();
        say(&fixture, "電扶梯故障").await;

        let result = say(&fixture, "上週三").await;

        assert_eq!(prompt_key(&result), Some(PromptKey::Position));
        assert_eq!(
            result.state.report_in_progress().and_then(|r| r.date.as_deref()),
            Some("2023-11-15")
        );
    }

    #[tokio::test]
    async fn test_completed_conversation_rejects_turns() {
        let fixture = fixture(ScriptedRecognizer::unconfigured());
        let report = Report {
            date: Some("2023-11-15".into()),
            position: Some("OMC".into()),
            people: Some("員工".into()),
            details: Some("測試".into()),
            inform: Some(false),
            ..Default::default()
        };
        fixture
            .start
            .handle(StartConversationCommand::new(test_id()).with_report(report))
            .await
            .unwrap();
        say(&fixture, "電扶梯故障").await;
        say(&fixture, "否").await;
        say(&fixture, "否").await;
        let result = say(&fixture, "是").await;

        assert!(matches!(result.output.outcome, Some(DialogOutcome::Submitted(_))));
        assert_eq!(result.state.status, ConversationStatus::Completed);
        assert!(result.state.submitted.is_some());

        let again = fixture
            .turn
            .handle(ProcessTurnCommand {
                conversation_id: test_id(),
                input: SlotValue::text("hello"),
            })
            .await;
        assert!(matches!(
            again,
            Err(ProcessTurnError::Dialog(DialogError::ConversationClosed(ConversationStatus::Completed)))
        ));
    }
}
