//! Shared setup for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use incident_dialog::adapters::ScriptedRecognizer;
use incident_dialog::application::{
    CancelConversationCommand, CancelConversationHandler, CancelConversationResult, GetConversationStateHandler,
    GetConversationStateQuery, GetConversationStateResult, ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult,
    StartConversationCommand, StartConversationHandler, StartConversationResult,
};
use incident_dialog::domain::dialog::{DialogRunner, PromptCatalog, PromptKey};
use incident_dialog::domain::foundation::ConversationId;
use incident_dialog::domain::report::SlotValue;
use incident_dialog::ports::{Recognizer, StateStorage};

/// "Today" for every conversation under test.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 20).unwrap()
}

pub struct Harness {
    pub conversation_id: ConversationId,
    start: StartConversationHandler,
    turn: ProcessTurnHandler,
    cancel: CancelConversationHandler,
    query: GetConversationStateHandler,
}

impl Harness {
    pub fn new(storage: Arc<dyn StateStorage>, recognizer: ScriptedRecognizer) -> Self {
        let recognizer: Arc<dyn Recognizer> = Arc::new(recognizer);
        let runner = Arc::new(
            DialogRunner::new(Arc::new(PromptCatalog::builtin())).with_reference_date(reference_date()),
        );

        Self {
            conversation_id: ConversationId::new("test-channel:user-1").unwrap(),
            start: StartConversationHandler::new(storage.clone(), recognizer.clone(), runner.clone()),
            turn: ProcessTurnHandler::new(storage.clone(), recognizer, runner.clone()),
            cancel: CancelConversationHandler::new(storage.clone(), runner.clone()),
            query: GetConversationStateHandler::new(storage, runner),
        }
    }

    pub async fn start(&self) -> StartConversationResult {
        self.start_with(StartConversationCommand::new(self.conversation_id.clone()))
            .await
    }

    pub async fn start_with(&self, cmd: StartConversationCommand) -> StartConversationResult {
        self.start.handle(cmd).await.unwrap()
    }

    pub async fn say(&self, text: &str) -> ProcessTurnResult {
        self.send(SlotValue::text(text)).await
    }

    pub async fn send(&self, input: SlotValue) -> ProcessTurnResult {
        self.turn
            .handle(ProcessTurnCommand {
                conversation_id: self.conversation_id.clone(),
                input,
            })
            .await
            .unwrap()
    }

    pub async fn cancel(&self) -> CancelConversationResult {
        self.cancel
            .handle(CancelConversationCommand {
                conversation_id: self.conversation_id.clone(),
            })
            .await
            .unwrap()
    }

    pub async fn state(&self) -> GetConversationStateResult {
        self.query
            .handle(GetConversationStateQuery {
                conversation_id: self.conversation_id.clone(),
            })
            .await
            .unwrap()
    }
}

pub fn prompt_key(result: &ProcessTurnResult) -> Option<PromptKey> {
    result.output.prompt.as_ref().map(|p| p.key)
}
