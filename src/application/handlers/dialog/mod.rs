//! Dialog handlers - Start, advance, cancel and inspect report conversations.
//!
//! Each turn loads the conversation state, optionally consults the
//! recognizer, hands the input to the dialog runner and saves the state.

mod cancel_conversation;
mod get_conversation_state;
mod process_turn;
mod recognition;
mod start_conversation;

pub use cancel_conversation::{
    CancelConversationCommand, CancelConversationError, CancelConversationHandler, CancelConversationResult,
};
pub use get_conversation_state::{
    GetConversationStateError, GetConversationStateHandler, GetConversationStateQuery, GetConversationStateResult,
};
pub use process_turn::{ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler, ProcessTurnResult};
pub use start_conversation::{
    StartConversationCommand, StartConversationError, StartConversationHandler, StartConversationResult,
};
