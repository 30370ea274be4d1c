//! Incident Dialog console host
//!
//! Runs one report conversation over stdin/stdout. Configuration comes from
//! `INCIDENT_DIALOG__*` environment variables (see `config`).
//!
//! Commands: `/cancel` abandons the report, `/state` prints the collected
//! fields, `/quit` exits.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use incident_dialog::adapters::{FileStateStorage, InMemoryStateStorage, LuisConfig, LuisRecognizer};
use incident_dialog::application::{
    CancelConversationCommand, CancelConversationHandler, GetConversationStateHandler, GetConversationStateQuery,
    ProcessTurnCommand, ProcessTurnHandler, StartConversationCommand, StartConversationHandler,
};
use incident_dialog::config::{AppConfig, RecognizerConfig, StorageBackend, StorageConfig};
use incident_dialog::domain::dialog::{Activity, DialogOutcome, DialogRunner, TurnOutput};
use incident_dialog::domain::foundation::ConversationId;
use incident_dialog::domain::report::SlotValue;
use incident_dialog::ports::{Recognizer, StateStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .with_writer(std::io::stderr);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let storage = build_storage(&config.storage);
    let recognizer = build_recognizer(&config.recognizer)?;

    let catalog = config
        .dialog
        .prompt_catalog()?
        .with_default_locale(config.dialog.locale.clone());
    let runner = Arc::new(DialogRunner::new(Arc::new(catalog)));

    let start = StartConversationHandler::new(storage.clone(), recognizer.clone(), runner.clone());
    let turn = ProcessTurnHandler::new(storage.clone(), recognizer, runner.clone());
    let cancel = CancelConversationHandler::new(storage.clone(), runner.clone());
    let query = GetConversationStateHandler::new(storage, runner);

    let conversation_id = ConversationId::generate();
    info!(%conversation_id, "Starting console conversation");

    let started = start
        .handle(StartConversationCommand::new(conversation_id.clone()).with_locale(config.dialog.locale.clone()))
        .await?;
    print_output(&started.output);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/cancel" => {
                let result = cancel
                    .handle(CancelConversationCommand {
                        conversation_id: conversation_id.clone(),
                    })
                    .await?;
                println!("(report cancelled, {} dialog(s) closed)", result.frames_unwound);
                break;
            }
            "/state" => {
                let result = query
                    .handle(GetConversationStateQuery {
                        conversation_id: conversation_id.clone(),
                    })
                    .await?;
                if let Some(report) = result.state.report_in_progress() {
                    print!("{}", serde_yaml::to_string(report)?);
                }
                if let Some(prompt) = result.pending_prompt {
                    println!("{}", prompt.text);
                }
            }
            text => {
                let result = turn
                    .handle(ProcessTurnCommand {
                        conversation_id: conversation_id.clone(),
                        input: SlotValue::text(text),
                    })
                    .await?;
                print_output(&result.output);

                match result.output.outcome {
                    Some(DialogOutcome::Submitted(report)) => {
                        println!("--- submitted ---");
                        print!("{}", serde_yaml::to_string(&report)?);
                        break;
                    }
                    Some(DialogOutcome::Declined) => {
                        println!("(report not submitted)");
                        break;
                    }
                    None => {}
                }
            }
        }
    }

    Ok(())
}

fn build_storage(config: &StorageConfig) -> Arc<dyn StateStorage> {
    match (config.backend, &config.path) {
        (StorageBackend::File, Some(path)) => {
            info!(path = %path.display(), "Using file state storage");
            Arc::new(FileStateStorage::new(path))
        }
        _ => Arc::new(InMemoryStateStorage::new()),
    }
}

/// An unconfigured recognizer is still built; handlers skip it.
fn build_recognizer(config: &RecognizerConfig) -> Result<Arc<dyn Recognizer>, Box<dyn std::error::Error>> {
    if config.is_partial() {
        warn!("Recognizer is partially configured, running without recognition");
    }

    let luis = match (&config.application_id, &config.endpoint_key, &config.endpoint) {
        (Some(app_id), Some(key), Some(endpoint)) if config.is_configured() => {
            LuisConfig::from_secret(app_id.clone(), key.clone(), endpoint.clone())
                .with_slot(config.slot.clone())
                .with_timeout(config.timeout())
        }
        _ => LuisConfig::new("", "", ""),
    };

    Ok(Arc::new(LuisRecognizer::new(luis)?))
}

fn print_output(output: &TurnOutput) {
    for activity in &output.activities {
        match activity {
            Activity::Text { text } => println!("{}", text),
            Activity::Attachment { content, .. } => {
                println!("{}", serde_json::to_string_pretty(content).unwrap_or_default())
            }
        }
    }
    if let Some(prompt) = &output.prompt {
        println!("{}", prompt.text);
    }
}
