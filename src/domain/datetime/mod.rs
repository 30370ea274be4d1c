//! Date/time handling for collected incident dates.
//!
//! - `timex` - TIMEX parsing and semantic type inference
//! - `ambiguity` - definite vs ambiguous classification
//! - `normalize` - free-text answers to TIMEX

mod ambiguity;
mod normalize;
mod timex;

pub use ambiguity::{classify, is_ambiguous, DateClassification};
pub use normalize::normalize_date_text;
pub use timex::{date_portion, TimexError, TimexExpression, TimexType, PRESENT_REF};
