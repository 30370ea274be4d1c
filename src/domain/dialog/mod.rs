//! Incident report dialog.
//!
//! A waterfall of report steps driven over an explicit, serializable stack of
//! dialog frames. The date step delegates to a nested resolver dialog when the
//! known date is missing or ambiguous.
//!
//! Flow: welcome → date → position → accident → people → people_die →
//! details → end notice → inform → final confirmation.

mod conversation;
mod date_resolver;
mod errors;
mod frame;
mod prompts;
mod runner;
mod sequencer;
mod stack;
mod state;
mod step;
mod transition;

pub use conversation::ConversationState;
pub use date_resolver::DateResolver;
pub use errors::DialogError;
pub use frame::{Awaiting, DialogFrame, DialogId};
pub use prompts::{
    Activity, PromptCatalog, PromptCatalogError, PromptKey, PromptKind, PromptOverrides, PromptSpec,
    ADAPTIVE_CARD_CONTENT_TYPE, DEFAULT_LOCALE,
};
pub use runner::{DialogOutcome, DialogRunner, TurnOutput};
pub use sequencer::StepSequencer;
pub use stack::DialogStack;
pub use state::ConversationStatus;
pub use step::{index_of, step_at, StepDef, StepId, StepKind, INCIDENT_STEPS};
pub use transition::{DialogResult, StepOutcome, StepTransition};
