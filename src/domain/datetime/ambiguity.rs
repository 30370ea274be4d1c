//! Ambiguity classification for date expressions.
//!
//! A date is usable for an incident report only when year, month and day are
//! all known. Anything else (a missing year, a weekday, a month range, a
//! string the TIMEX parser rejects) is ambiguous and must be resolved with
//! the user before the report can move on.

use super::timex::{date_portion, TimexExpression, TimexType};

/// Outcome of classifying a date expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateClassification {
    /// Fully resolved; carries the `YYYY-MM-DD` date portion.
    Definite(String),
    /// Some component is unresolved (or the expression did not parse).
    Ambiguous,
}

impl DateClassification {
    pub fn is_definite(&self) -> bool {
        matches!(self, Self::Definite(_))
    }
}

/// Returns true when the expression does not carry the `definite` tag.
pub fn is_ambiguous(expression: &str) -> bool {
    !TimexExpression::parse(expression)
        .map(|expr| expr.has_type(TimexType::Definite))
        .unwrap_or(false)
}

/// Classifies an expression and, when definite, returns its date portion.
pub fn classify(expression: &str) -> DateClassification {
    if is_ambiguous(expression) {
        DateClassification::Ambiguous
    } else {
        DateClassification::Definite(date_portion(expression.trim()).to_string())
    }
}
