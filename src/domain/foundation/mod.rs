//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, error types and the state machine trait
//! used across the dialog domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::ConversationId;
pub use state_machine::StateMachine;
