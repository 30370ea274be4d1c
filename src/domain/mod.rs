//! Domain layer containing the dialog logic and its value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (conversation id, validation errors, state machine trait)
//! - `datetime` - TIMEX parsing, date ambiguity classification and answer normalization
//! - `report` - The incident report and yes/no answer coercion
//! - `recognition` - Recognizer results and entity extraction
//! - `dialog` - Step sequencer, date resolver, dialog stack and conversation state

pub mod datetime;
pub mod dialog;
pub mod foundation;
pub mod recognition;
pub mod report;
