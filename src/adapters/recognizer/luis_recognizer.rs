//! LUIS Recognizer - Implementation of Recognizer for the LUIS v3 prediction API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = LuisConfig::new(app_id, endpoint_key, "https://westus.api.cognitive.microsoft.com")
//!     .with_slot("staging")
//!     .with_timeout(Duration::from_secs(5));
//!
//! let recognizer = LuisRecognizer::new(config)?;
//! ```
//!
//! The v3 response nests everything under `prediction`, and built-in dates
//! arrive as `datetimeV2` with `values[].timex`. Those are rewritten into the
//! flat `datetime: [{type, timex: [...]}]` layout the extractor reads.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::recognition::{IntentScore, RecognizerResult, DATETIME_KEY};
use crate::ports::{Recognizer, RecognizerError};

/// Entity name LUIS v3 uses for built-in dates.
const DATETIME_V2_KEY: &str = "datetimeV2";

/// Header carrying the endpoint key.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Configuration for the LUIS recognizer.
#[derive(Debug, Clone)]
pub struct LuisConfig {
    pub application_id: String,
    endpoint_key: Secret<String>,
    /// Base URL, e.g. `https://westus.api.cognitive.microsoft.com`.
    pub endpoint: String,
    /// Publishing slot (`production` or `staging`).
    pub slot: String,
    pub timeout: Duration,
}

impl LuisConfig {
    pub fn new(
        application_id: impl Into<String>,
        endpoint_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::from_secret(application_id, Secret::new(endpoint_key.into()), endpoint)
    }

    pub fn from_secret(
        application_id: impl Into<String>,
        endpoint_key: Secret<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            endpoint_key,
            endpoint: endpoint.into(),
            slot: "production".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// All three of application id, endpoint key and endpoint are present.
    pub fn is_configured(&self) -> bool {
        !self.application_id.trim().is_empty()
            && !self.endpoint_key.expose_secret().trim().is_empty()
            && !self.endpoint.trim().is_empty()
    }

    fn endpoint_key(&self) -> &str {
        self.endpoint_key.expose_secret()
    }

    /// `{endpoint}/luis/prediction/v3.0/apps/{appId}/slots/{slot}/predict`
    fn prediction_url(&self) -> String {
        format!(
            "{}/luis/prediction/v3.0/apps/{}/slots/{}/predict",
            self.endpoint.trim_end_matches('/'),
            self.application_id,
            self.slot
        )
    }
}

/// LUIS v3 recognizer.
pub struct LuisRecognizer {
    config: LuisConfig,
    client: Client,
}

impl LuisRecognizer {
    pub fn new(config: LuisConfig) -> Result<Self, RecognizerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecognizerError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LuisConfig {
        &self.config
    }
}

#[async_trait]
impl Recognizer for LuisRecognizer {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn recognize(&self, text: &str) -> Result<RecognizerResult, RecognizerError> {
        if !self.is_configured() {
            return Err(RecognizerError::NotConfigured);
        }

        let response = self
            .client
            .post(self.config.prediction_url())
            .query(&[("verbose", "true"), ("show-all-intents", "true")])
            .header(SUBSCRIPTION_KEY_HEADER, self.config.endpoint_key())
            .json(&PredictionRequest { query: text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecognizerError::Network(format!(
                        "Request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    RecognizerError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => RecognizerError::AuthenticationFailed,
                code => RecognizerError::Status {
                    status: code,
                    message: body,
                },
            });
        }

        let body: PredictionResponse = response
            .json()
            .await
            .map_err(|e| RecognizerError::Parse(e.to_string()))?;

        let result = body.into_result(text);
        debug!(top_intent = ?result.top_intent().map(|(name, _)| name.to_string()), "Recognized utterance");
        Ok(result)
    }
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    query: Option<String>,
    prediction: Prediction,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    intents: HashMap<String, IntentScore>,
    #[serde(default)]
    entities: Value,
}

impl PredictionResponse {
    fn into_result(self, text: &str) -> RecognizerResult {
        RecognizerResult {
            text: self.query.unwrap_or_else(|| text.to_string()),
            intents: self.prediction.intents,
            entities: normalize_entities(self.prediction.entities),
        }
    }
}

/// Rewrites `datetimeV2` into the `datetime` layout, leaving everything else
/// untouched.
///
/// `{"datetimeV2": [{"type": "date", "values": [{"timex": "XXXX-11-15"}]}]}`
/// becomes `{"datetime": [{"type": "date", "timex": ["XXXX-11-15"]}]}`.
pub fn normalize_entities(entities: Value) -> Value {
    let Value::Object(mut map) = entities else {
        return entities;
    };

    if let Some(Value::Array(spans)) = map.remove(DATETIME_V2_KEY) {
        let converted: Vec<Value> = spans.iter().map(datetime_entry).collect();
        map.insert(DATETIME_KEY.to_string(), Value::Array(converted));
    }

    if let Some(Value::Object(instances)) = map.get_mut("$instance") {
        if let Some(spans) = instances.remove(DATETIME_V2_KEY) {
            instances.insert(DATETIME_KEY.to_string(), spans);
        }
    }

    Value::Object(map)
}

fn datetime_entry(span: &Value) -> Value {
    let timex: Vec<Value> = span
        .get("values")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("timex").cloned())
                .collect()
        })
        .unwrap_or_default();

    let mut entry = Map::new();
    if let Some(kind) = span.get("type") {
        entry.insert("type".to_string(), kind.clone());
    }
    entry.insert("timex".to_string(), Value::Array(timex));
    Value::Object(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recognition::get_date_time;
    use serde_json::json;

    mod config {
        use super::*;

        #[test]
        fn builder_works() {
            let config = LuisConfig::new("app", "key", "https://luis.example.com/")
                .with_slot("staging")
                .with_timeout(Duration::from_secs(3));

            assert_eq!(config.slot, "staging");
            assert_eq!(config.timeout, Duration::from_secs(3));
            assert_eq!(config.endpoint_key(), "key");
            assert!(config.is_configured());
        }

        #[test]
        fn prediction_url_uses_v3_path() {
            let config = LuisConfig::new("app-123", "key", "https://luis.example.com/");
            assert_eq!(
                config.prediction_url(),
                "https://luis.example.com/luis/prediction/v3.0/apps/app-123/slots/production/predict"
            );
        }

        #[test]
        fn any_blank_credential_means_unconfigured() {
            assert!(!LuisConfig::new("", "key", "https://e").is_configured());
            assert!(!LuisConfig::new("app", " ", "https://e").is_configured());
            assert!(!LuisConfig::new("app", "key", "").is_configured());
        }

        #[test]
        fn debug_output_hides_key() {
            let config = LuisConfig::new("app", "super-secret", "https://e");
            assert!(!format!("{:?}", config).contains("super-secret"));
        }
    }

    mod normalization {
        use super::*;

        #[test]
        fn datetime_v2_becomes_datetime() {
            let entities = normalize_entities(json!({
                "datetimeV2": [
                    { "type": "date", "values": [{ "timex": "XXXX-11-15" }, { "timex": "2023-11-15" }] }
                ],
                "$instance": { "datetimeV2": [{ "text": "11月15日" }] }
            }));

            assert_eq!(
                entities,
                json!({
                    "datetime": [{ "type": "date", "timex": ["XXXX-11-15", "2023-11-15"] }],
                    "$instance": { "datetime": [{ "text": "11月15日" }] }
                })
            );
        }

        #[test]
        fn other_entities_are_untouched() {
            let raw = json!({ "$instance": { "From": [{ "text": "Taipei" }] }, "From": [{}] });
            assert_eq!(normalize_entities(raw.clone()), raw);
        }

        #[test]
        fn non_object_passes_through() {
            assert_eq!(normalize_entities(Value::Null), Value::Null);
        }

        #[test]
        fn response_maps_to_result() {
            let response: PredictionResponse = serde_json::from_value(json!({
                "query": "昨天在台北車站",
                "prediction": {
                    "topIntent": "ReportIncident",
                    "intents": { "ReportIncident": { "score": 0.97 } },
                    "entities": {
                        "datetimeV2": [{ "type": "datetime", "values": [{ "timex": "2023-11-15T08:00" }] }]
                    }
                }
            }))
            .unwrap();

            let result = response.into_result("ignored");
            assert_eq!(result.text, "昨天在台北車站");
            assert_eq!(result.top_intent(), Some(("ReportIncident", 0.97)));
            assert_eq!(get_date_time(&result).as_deref(), Some("2023-11-15"));
        }
    }

    #[tokio::test]
    async fn unconfigured_recognizer_refuses_to_call() {
        let recognizer = LuisRecognizer::new(LuisConfig::new("", "", "")).unwrap();
        assert!(!recognizer.is_configured());
        assert!(matches!(
            recognizer.recognize("hello").await,
            Err(RecognizerError::NotConfigured)
        ));
    }
}
