//! Entity extraction from recognizer results.
//!
//! Turns the recognizer's nested entity layout into typed optional fields
//! and pre-fills a report with them. Every lookup short-circuits on absence:
//! a missing or oddly shaped entity yields `None`, never a panic or an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::datetime::date_portion;
use crate::domain::report::{parse_confirmation, FieldKind, Report, ReportField, SlotValue};

use super::result::{RecognizerResult, DATETIME_KEY};

/// Qualifier sub-entity used by default for location-like entities.
pub const DEFAULT_QUALIFIER: &str = "Airport";

/// Extraction result for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Raw text of the first match.
    pub value: Option<String>,
    /// Resolved value of the nested qualifier on the same match.
    pub qualifier: Option<String>,
}

impl ExtractedEntity {
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// Extracts canonical fields from recognizer results.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    /// Entity name -> nested qualifier entity name.
    qualifiers: HashMap<String, String>,
}

impl EntityExtractor {
    /// Creates an extractor with the default qualifier table
    /// (`From`, `To` and `Position` carry an `Airport` qualifier).
    pub fn new() -> Self {
        let qualifiers = ["From", "To", "Position"]
            .into_iter()
            .map(|entity| (entity.to_string(), DEFAULT_QUALIFIER.to_string()))
            .collect();
        Self { qualifiers }
    }

    /// Creates an extractor with an explicit qualifier table.
    pub fn with_qualifiers(qualifiers: HashMap<String, String>) -> Self {
        Self { qualifiers }
    }

    /// Registers (or replaces) the qualifier for an entity.
    pub fn with_qualifier(mut self, entity: impl Into<String>, qualifier: impl Into<String>) -> Self {
        self.qualifiers.insert(entity.into(), qualifier.into());
        self
    }

    /// Extracts the first match of `entity` and, if there is one, its qualifier.
    pub fn extract(&self, entity: &str, result: &RecognizerResult) -> ExtractedEntity {
        let value = result
            .instances(entity)
            .and_then(|spans| spans.first())
            .and_then(|span| span.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let qualifier = match (&value, self.qualifiers.get(entity)) {
            (Some(_), Some(qualifier_key)) => first_qualifier(result, entity, qualifier_key),
            _ => None,
        };

        ExtractedEntity { value, qualifier }
    }

    /// Extracts the entity backing a report field. `Date` and the safety
    /// confirmations have no entity and always come back empty.
    pub fn extract_field(&self, field: ReportField, result: &RecognizerResult) -> ExtractedEntity {
        match field.entity_key() {
            Some(key) => self.extract(key, result),
            None => ExtractedEntity::default(),
        }
    }

    /// Fills every still-unset report field the result has a value for.
    ///
    /// Returns the fields that were written. Existing values are never
    /// overwritten, and an `Inform` entity whose text is not a yes/no answer
    /// is ignored.
    pub fn prefill(&self, report: &mut Report, result: &RecognizerResult) -> Vec<ReportField> {
        let mut filled = Vec::new();

        for field in ReportField::ALL {
            if report.is_set(field) {
                continue;
            }

            let candidate = match field {
                ReportField::Date => get_date_time(result).map(SlotValue::Text),
                _ => self.extract_field(field, result).value.and_then(|text| match field.kind() {
                    FieldKind::Text => Some(SlotValue::Text(text)),
                    FieldKind::Bool => parse_confirmation(&text).map(SlotValue::Bool),
                }),
            };

            if let Some(value) = candidate {
                if report.set(field, value).is_ok() {
                    filled.push(field);
                }
            }
        }

        debug!(?filled, "Pre-filled report fields from recognizer result");
        filled
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the date portion of the first `datetime` resolution.
///
/// The recognizer reports dates as TIMEX; only the date matters for the
/// report, so any `T…` time suffix is dropped.
pub fn get_date_time(result: &RecognizerResult) -> Option<String> {
    let timex = result
        .resolutions(DATETIME_KEY)?
        .first()?
        .get("timex")?
        .as_array()?
        .first()?
        .as_str()?;

    let date = date_portion(timex);
    if date.is_empty() {
        return None;
    }
    Some(date.to_string())
}

/// `entities[entity][0][qualifier][0]`, flattening one more level of list
/// (list entities resolve to `[["canonical"]]`).
fn first_qualifier(result: &RecognizerResult, entity: &str, qualifier: &str) -> Option<String> {
    let resolved = result
        .resolutions(entity)?
        .first()?
        .get(qualifier)?
        .as_array()?
        .first()?;

    match resolved {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => values.first()?.as_str().map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(entities: Value) -> RecognizerResult {
        RecognizerResult::new("utterance", entities)
    }

    mod extract {
        use super::*;

        #[test]
        fn returns_first_instance_text_without_qualifier() {
            let r = result(json!({ "$instance": { "From": [{ "text": "Taipei" }] } }));
            assert_eq!(
                EntityExtractor::new().extract("From", &r),
                ExtractedEntity { value: Some("Taipei".into()), qualifier: None }
            );
        }

        #[test]
        fn missing_instance_returns_empty() {
            let r = result(json!({ "$instance": {} }));
            assert_eq!(EntityExtractor::new().extract("From", &r), ExtractedEntity::default());
        }

        #[test]
        fn missing_instance_table_returns_empty() {
            let r = result(json!({}));
            assert!(EntityExtractor::new().extract("From", &r).is_empty());
        }

        #[test]
        fn reads_nested_list_qualifier() {
            let r = result(json!({
                "$instance": { "From": [{ "text": "taipei main" }] },
                "From": [{ "Airport": [["Taipei Main Station"]] }]
            }));
            let extracted = EntityExtractor::new().extract("From", &r);
            assert_eq!(extracted.value.as_deref(), Some("taipei main"));
            assert_eq!(extracted.qualifier.as_deref(), Some("Taipei Main Station"));
        }

        #[test]
        fn reads_flat_qualifier() {
            let r = result(json!({
                "$instance": { "Position": [{ "text": "月台" }] },
                "Position": [{ "Airport": ["Platform 3"] }]
            }));
            let extracted = EntityExtractor::new().extract("Position", &r);
            assert_eq!(extracted.qualifier.as_deref(), Some("Platform 3"));
        }

        #[test]
        fn instance_without_typed_list_does_not_panic() {
            let r = result(json!({ "$instance": { "From": [{ "text": "Taipei" }] } }));
            assert_eq!(EntityExtractor::new().extract("From", &r).qualifier, None);
        }

        #[test]
        fn typed_list_without_instance_is_ignored() {
            let r = result(json!({ "From": [{ "Airport": [["TPE"]] }] }));
            assert_eq!(EntityExtractor::new().extract("From", &r), ExtractedEntity::default());
        }

        #[test]
        fn empty_lists_return_empty() {
            let r = result(json!({ "$instance": { "From": [] }, "From": [] }));
            assert_eq!(EntityExtractor::new().extract("From", &r), ExtractedEntity::default());
        }

        #[test]
        fn entity_without_configured_qualifier_skips_probe() {
            let r = result(json!({
                "$instance": { "People": [{ "text": "旅客" }] },
                "People": [{ "Airport": [["ignored"]] }]
            }));
            assert_eq!(EntityExtractor::new().extract("People", &r).qualifier, None);
        }

        #[test]
        fn custom_qualifier_is_used() {
            let r = result(json!({
                "$instance": { "People": [{ "text": "旅客" }] },
                "People": [{ "Role": [["passenger"]] }]
            }));
            let extractor = EntityExtractor::new().with_qualifier("People", "Role");
            assert_eq!(extractor.extract("People", &r).qualifier.as_deref(), Some("passenger"));
        }

        #[test]
        fn each_field_reads_its_own_entity() {
            let r = result(json!({ "$instance": {
                "Position": [{ "text": "OMC" }],
                "People": [{ "text": "員工" }],
                "Details": [{ "text": "月台門故障" }]
            }}));
            let extractor = EntityExtractor::new();
            assert_eq!(extractor.extract_field(ReportField::Position, &r).value.as_deref(), Some("OMC"));
            assert_eq!(extractor.extract_field(ReportField::People, &r).value.as_deref(), Some("員工"));
            assert_eq!(extractor.extract_field(ReportField::Details, &r).value.as_deref(), Some("月台門故障"));
            assert!(extractor.extract_field(ReportField::Inform, &r).is_empty());
            assert!(extractor.extract_field(ReportField::Accident, &r).is_empty());
        }
    }

    mod date_time {
        use super::*;

        #[test]
        fn drops_time_portion() {
            let r = result(json!({ "datetime": [{ "type": "datetime", "timex": ["2023-11-15T08:00"] }] }));
            assert_eq!(get_date_time(&r).as_deref(), Some("2023-11-15"));
        }

        #[test]
        fn keeps_ambiguous_date() {
            let r = result(json!({ "datetime": [{ "type": "date", "timex": ["XXXX-11-15"] }] }));
            assert_eq!(get_date_time(&r).as_deref(), Some("XXXX-11-15"));
        }

        #[test]
        fn empty_list_returns_none() {
            assert_eq!(get_date_time(&result(json!({ "datetime": [] }))), None);
        }

        #[test]
        fn missing_entity_or_timex_returns_none() {
            assert_eq!(get_date_time(&result(json!({}))), None);
            assert_eq!(get_date_time(&result(json!({ "datetime": [{ "type": "date" }] }))), None);
            assert_eq!(get_date_time(&result(json!({ "datetime": [{ "timex": [] }] }))), None);
        }

        #[test]
        fn time_only_timex_returns_none() {
            let r = result(json!({ "datetime": [{ "type": "time", "timex": ["T08"] }] }));
            assert_eq!(get_date_time(&r), None);
        }
    }

    mod prefill {
        use super::*;

        #[test]
        fn fills_unset_fields() {
            let r = result(json!({
                "$instance": {
                    "From": [{ "text": "我要通報" }],
                    "Position": [{ "text": "台北車站" }],
                    "Inform": [{ "text": "要" }]
                },
                "datetime": [{ "type": "date", "timex": ["2023-11-15"] }]
            }));
            let mut report = Report::new();
            let filled = EntityExtractor::new().prefill(&mut report, &r);

            assert_eq!(
                filled,
                vec![ReportField::Origin, ReportField::Date, ReportField::Position, ReportField::Inform]
            );
            assert_eq!(report.position.as_deref(), Some("台北車站"));
            assert_eq!(report.date.as_deref(), Some("2023-11-15"));
            assert_eq!(report.inform, Some(true));
        }

        #[test]
        fn never_overwrites_existing_values() {
            let r = result(json!({ "$instance": { "Position": [{ "text": "OMC" }] } }));
            let mut report = Report {
                position: Some("總公司".into()),
                ..Default::default()
            };
            let filled = EntityExtractor::new().prefill(&mut report, &r);
            assert!(filled.is_empty());
            assert_eq!(report.position.as_deref(), Some("總公司"));
        }

        #[test]
        fn ignores_non_confirmation_inform_text() {
            let r = result(json!({ "$instance": { "Inform": [{ "text": "hazard 12" }] } }));
            let mut report = Report::new();
            assert!(EntityExtractor::new().prefill(&mut report, &r).is_empty());
            assert_eq!(report.inform, None);
        }

        #[test]
        fn empty_result_fills_nothing() {
            let mut report = Report::new();
            assert!(EntityExtractor::new().prefill(&mut report, &RecognizerResult::default()).is_empty());
            assert_eq!(report, Report::new());
        }
    }
}
