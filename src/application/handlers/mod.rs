//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod dialog;

pub use dialog::{
    // Commands
    CancelConversationCommand, CancelConversationError, CancelConversationHandler, CancelConversationResult,
    ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler, ProcessTurnResult,
    StartConversationCommand, StartConversationError, StartConversationHandler, StartConversationResult,
    // Queries
    GetConversationStateError, GetConversationStateHandler, GetConversationStateQuery, GetConversationStateResult,
};
