//! Incident report under construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::confirmation::parse_confirmation;

/// A value collected for a report field or passed between dialog steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Bool(bool),
    Text(String),
}

impl SlotValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bool(_) => None,
        }
    }

    /// Boolean view of the value. Text is read through the yes/no vocabulary.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(text) => parse_confirmation(text),
        }
    }

    /// True only for an actual boolean `true`, never for text.
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// The kind of value a report field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
}

/// Canonical report fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    Origin,
    Date,
    Position,
    Accident,
    People,
    PeopleDie,
    Details,
    Inform,
}

impl ReportField {
    pub const ALL: [ReportField; 8] = [
        Self::Origin,
        Self::Date,
        Self::Position,
        Self::Accident,
        Self::People,
        Self::PeopleDie,
        Self::Details,
        Self::Inform,
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Accident | Self::PeopleDie | Self::Inform => FieldKind::Bool,
            _ => FieldKind::Text,
        }
    }

    /// NLU entity name that pre-fills this field.
    ///
    /// `Date` is filled from the `datetime` entity through its own
    /// resolution path, and the two safety confirmations are never pre-filled.
    pub fn entity_key(&self) -> Option<&'static str> {
        match self {
            Self::Origin => Some("From"),
            Self::Position => Some("Position"),
            Self::People => Some("People"),
            Self::Details => Some("Details"),
            Self::Inform => Some("Inform"),
            Self::Date | Self::Accident | Self::PeopleDie => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Date => "date",
            Self::Position => "position",
            Self::Accident => "accident",
            Self::People => "people",
            Self::PeopleDie => "people_die",
            Self::Details => "details",
            Self::Inform => "inform",
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when writing a value into a report field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Field '{field}' expects a yes/no answer, got '{value}'")]
    NotAConfirmation { field: ReportField, value: String },

    #[error("Field '{field}' expects text, got a yes/no answer")]
    NotText { field: ReportField },
}

/// The incident report collected by the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Definite `YYYY-MM-DD` date once resolved; may hold an ambiguous TIMEX before that.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accident: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_die: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inform: Option<bool>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a field as a slot value.
    pub fn get(&self, field: ReportField) -> Option<SlotValue> {
        match field {
            ReportField::Origin => self.origin.clone().map(SlotValue::Text),
            ReportField::Date => self.date.clone().map(SlotValue::Text),
            ReportField::Position => self.position.clone().map(SlotValue::Text),
            ReportField::Accident => self.accident.map(SlotValue::Bool),
            ReportField::People => self.people.clone().map(SlotValue::Text),
            ReportField::PeopleDie => self.people_die.map(SlotValue::Bool),
            ReportField::Details => self.details.clone().map(SlotValue::Text),
            ReportField::Inform => self.inform.map(SlotValue::Bool),
        }
    }

    pub fn is_set(&self, field: ReportField) -> bool {
        match field {
            ReportField::Origin => self.origin.is_some(),
            ReportField::Date => self.date.is_some(),
            ReportField::Position => self.position.is_some(),
            ReportField::Accident => self.accident.is_some(),
            ReportField::People => self.people.is_some(),
            ReportField::PeopleDie => self.people_die.is_some(),
            ReportField::Details => self.details.is_some(),
            ReportField::Inform => self.inform.is_some(),
        }
    }

    /// Writes a field, coercing text into booleans for yes/no fields.
    pub fn set(&mut self, field: ReportField, value: SlotValue) -> Result<(), ReportError> {
        match field.kind() {
            FieldKind::Bool => {
                let flag = value.as_bool().ok_or_else(|| ReportError::NotAConfirmation {
                    field,
                    value: value.to_string(),
                })?;
                match field {
                    ReportField::Accident => self.accident = Some(flag),
                    ReportField::PeopleDie => self.people_die = Some(flag),
                    _ => self.inform = Some(flag),
                }
            }
            FieldKind::Text => {
                let SlotValue::Text(text) = value else {
                    return Err(ReportError::NotText { field });
                };
                match field {
                    ReportField::Origin => self.origin = Some(text),
                    ReportField::Date => self.date = Some(text),
                    ReportField::Position => self.position = Some(text),
                    ReportField::People => self.people = Some(text),
                    _ => self.details = Some(text),
                }
            }
        }
        Ok(())
    }

    /// Writes a field only if it is still unset. Returns true if it wrote.
    pub fn set_if_absent(&mut self, field: ReportField, value: SlotValue) -> Result<bool, ReportError> {
        if self.is_set(field) {
            return Ok(false);
        }
        self.set(field, value)?;
        Ok(true)
    }

    /// Fields that are still unknown.
    pub fn missing_fields(&self) -> Vec<ReportField> {
        ReportField::ALL
            .into_iter()
            .filter(|f| !self.is_set(*f))
            .collect()
    }
}
