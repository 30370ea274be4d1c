//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (start, turn, cancel) write state; the query handler reads it.

pub mod handlers;

pub use handlers::{
    CancelConversationCommand, CancelConversationError, CancelConversationHandler, CancelConversationResult,
    GetConversationStateError, GetConversationStateHandler, GetConversationStateQuery, GetConversationStateResult,
    ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler, ProcessTurnResult,
    StartConversationCommand, StartConversationError, StartConversationHandler, StartConversationResult,
};
