//! Incident report domain module.
//!
//! The report is the entity the dialog fills in, one field per step.

mod confirmation;
mod report;

pub use confirmation::parse_confirmation;
pub use report::{FieldKind, Report, ReportError, ReportField, SlotValue};
