//! Prompt text and outbound activities.
//!
//! Every user-facing string lives in a [`PromptCatalog`] keyed by prompt key
//! and locale. Built-in tables cover `zh-TW` and `en-US`; a YAML file can
//! override individual strings or add locales.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Locale used when none is requested or the requested one has no entry.
pub const DEFAULT_LOCALE: &str = "zh-TW";

/// MIME type of the welcome card attachment.
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Identifies one user-facing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKey {
    Welcome,
    DateInitial,
    DateRetry,
    Position,
    Accident,
    People,
    PeopleDie,
    Details,
    EndNotice,
    Inform,
    Final,
    ConfirmRetry,
    TextRetry,
}

impl PromptKey {
    pub const ALL: [PromptKey; 13] = [
        Self::Welcome,
        Self::DateInitial,
        Self::DateRetry,
        Self::Position,
        Self::Accident,
        Self::People,
        Self::PeopleDie,
        Self::Details,
        Self::EndNotice,
        Self::Inform,
        Self::Final,
        Self::ConfirmRetry,
        Self::TextRetry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::DateInitial => "date_initial",
            Self::DateRetry => "date_retry",
            Self::Position => "position",
            Self::Accident => "accident",
            Self::People => "people",
            Self::PeopleDie => "people_die",
            Self::Details => "details",
            Self::EndNotice => "end_notice",
            Self::Inform => "inform",
            Self::Final => "final",
            Self::ConfirmRetry => "confirm_retry",
            Self::TextRetry => "text_retry",
        }
    }
}

/// The kind of answer a prompt expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    FreeText,
    Confirm,
}

/// A question put to the user. The next inbound turn answers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub key: PromptKey,
    pub kind: PromptKind,
    pub text: String,
    /// Set when the prompt repeats because the previous answer was unusable.
    #[serde(default)]
    pub retry: bool,
}

/// A message sent to the channel that does not wait for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    Text { text: String },
    Attachment { content_type: String, content: Value },
}

impl Activity {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn adaptive_card(content: Value) -> Self {
        Self::Attachment {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
            content,
        }
    }
}

/// Errors raised while loading prompt overrides.
#[derive(Debug, Error)]
pub enum PromptCatalogError {
    #[error("Failed to read prompt file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse prompt file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Shape of a prompt override file.
///
/// ```yaml
/// default_locale: en-US
/// prompts:
///   en-US:
///     position: "Where did it happen?"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptOverrides {
    #[serde(default)]
    pub default_locale: Option<String>,
    #[serde(default)]
    pub prompts: HashMap<String, HashMap<PromptKey, String>>,
    #[serde(default)]
    pub welcome_card: Option<Value>,
}

static ZH_TW: Lazy<HashMap<PromptKey, String>> = Lazy::new(|| {
    table(&[
        (PromptKey::Welcome, "您好，我是事件通報小幫手。請描述您要通報的事件。"),
        (PromptKey::DateInitial, "請問事件發生日期？"),
        (PromptKey::DateRetry, "請提供完整的年、月、日，例如 2023-11-15。"),
        (PromptKey::Position, "請問發生地點？ 例如：正線上、車廂內、總公司辦公室、OMC、台北車站"),
        (PromptKey::Accident, "是否造成衝撞、出軌、火災?"),
        (PromptKey::People, "請問受影響人員？ 例如：旅客、員工、大眾、承商"),
        (PromptKey::PeopleDie, "請問有無人員當場死亡、或須送醫治療?"),
        (PromptKey::Details, "請簡單描述事件內容"),
        (
            PromptKey::EndNotice,
            "以上事件機器人初判為虛驚事件，已為您通報為虛驚事件，通報單號VSRP202312XXX",
        ),
        (
            PromptKey::Inform,
            "您通報的案件同時有危害風險之虞，經查可能與危害風險編號XXXX有關，請問您要通報危害嗎?",
        ),
        (PromptKey::Final, "請確認是否送出本次通報?"),
        (PromptKey::ConfirmRetry, "請回答「是」或「否」。"),
        (PromptKey::TextRetry, "抱歉，沒有收到內容，請再輸入一次。"),
    ])
});

static EN_US: Lazy<HashMap<PromptKey, String>> = Lazy::new(|| {
    table(&[
        (PromptKey::Welcome, "Hello, I can help you file an incident report. Please describe what happened."),
        (PromptKey::DateInitial, "On what date did the incident happen?"),
        (PromptKey::DateRetry, "Please give the full year, month and day, for example 2023-11-15."),
        (
            PromptKey::Position,
            "Where did it happen? For example: on the main line, in a car, head office, OMC, Taipei Station",
        ),
        (PromptKey::Accident, "Did it involve a collision, derailment or fire?"),
        (
            PromptKey::People,
            "Who was affected? For example: passengers, staff, the public, contractors",
        ),
        (PromptKey::PeopleDie, "Was anyone killed on site or taken to hospital?"),
        (PromptKey::Details, "Please briefly describe the incident."),
        (
            PromptKey::EndNotice,
            "The incident has been assessed as a near miss and filed as such. Report number VSRP202312XXX.",
        ),
        (
            PromptKey::Inform,
            "This case may be related to hazard XXXX. Would you like to report the hazard as well?",
        ),
        (PromptKey::Final, "Submit this report?"),
        (PromptKey::ConfirmRetry, "Please answer yes or no."),
        (PromptKey::TextRetry, "Sorry, I didn't get that. Please try again."),
    ])
});

static WELCOME_CARD: Lazy<Value> = Lazy::new(|| {
    json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.0",
        "body": [
            {
                "type": "TextBlock",
                "size": "Medium",
                "weight": "Bolder",
                "text": "事件通報 Incident Report"
            },
            {
                "type": "TextBlock",
                "wrap": true,
                "text": "請依序回答問題完成通報。Answer the questions to complete your report."
            }
        ]
    })
});

fn table(entries: &[(PromptKey, &str)]) -> HashMap<PromptKey, String> {
    entries
        .iter()
        .map(|(key, text)| (*key, (*text).to_string()))
        .collect()
}

/// Prompt strings by locale.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    default_locale: String,
    texts: HashMap<String, HashMap<PromptKey, String>>,
    welcome_card: Value,
}

impl PromptCatalog {
    /// Built-in `zh-TW` and `en-US` tables with `zh-TW` as the default.
    pub fn builtin() -> Self {
        let mut texts = HashMap::new();
        texts.insert("zh-TW".to_string(), ZH_TW.clone());
        texts.insert("en-US".to_string(), EN_US.clone());
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            texts,
            welcome_card: WELCOME_CARD.clone(),
        }
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Built-in tables with overrides parsed from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PromptCatalogError> {
        let overrides: PromptOverrides = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::builtin();
        catalog.merge(overrides);
        Ok(catalog)
    }

    /// Built-in tables with overrides read from a YAML file.
    pub fn load(path: &Path) -> Result<Self, PromptCatalogError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Applies overrides on top of the current tables. Keys not named in the
    /// overrides keep their current text.
    pub fn merge(&mut self, overrides: PromptOverrides) {
        if let Some(locale) = overrides.default_locale {
            self.default_locale = locale;
        }
        for (locale, entries) in overrides.prompts {
            self.texts.entry(locale).or_default().extend(entries);
        }
        if let Some(card) = overrides.welcome_card {
            self.welcome_card = card;
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.texts.contains_key(locale)
    }

    /// Text for a key, falling back to the default locale and then to the
    /// key name.
    pub fn text(&self, key: PromptKey, locale: &str) -> String {
        self.texts
            .get(locale)
            .and_then(|entries| entries.get(&key))
            .or_else(|| {
                self.texts
                    .get(&self.default_locale)
                    .and_then(|entries| entries.get(&key))
            })
            .cloned()
            .unwrap_or_else(|| key.as_str().to_string())
    }

    pub fn prompt(&self, key: PromptKey, kind: PromptKind, locale: &str) -> PromptSpec {
        PromptSpec {
            key,
            kind,
            text: self.text(key, locale),
            retry: false,
        }
    }

    /// Repeats a prompt after an unusable answer, prefixed with the retry hint
    /// for its kind.
    pub fn retry(&self, key: PromptKey, kind: PromptKind, locale: &str) -> PromptSpec {
        let hint = match kind {
            PromptKind::Confirm => self.text(PromptKey::ConfirmRetry, locale),
            PromptKind::FreeText => self.text(PromptKey::TextRetry, locale),
        };
        PromptSpec {
            key,
            kind,
            text: format!("{} {}", hint, self.text(key, locale)),
            retry: true,
        }
    }

    pub fn notice(&self, key: PromptKey, locale: &str) -> Activity {
        Activity::text(self.text(key, locale))
    }

    pub fn welcome_card(&self) -> Activity {
        Activity::adaptive_card(self.welcome_card.clone())
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_tables_cover_every_key() {
        for key in PromptKey::ALL {
            assert!(ZH_TW.contains_key(&key), "zh-TW missing {}", key.as_str());
            assert!(EN_US.contains_key(&key), "en-US missing {}", key.as_str());
        }
    }

    #[test]
    fn default_locale_is_traditional_chinese() {
        let catalog = PromptCatalog::builtin();
        assert_eq!(catalog.default_locale(), "zh-TW");
        assert_eq!(catalog.text(PromptKey::Details, "zh-TW"), "請簡單描述事件內容");
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let catalog = PromptCatalog::builtin();
        assert_eq!(
            catalog.text(PromptKey::Accident, "fr-FR"),
            catalog.text(PromptKey::Accident, "zh-TW")
        );
    }

    #[test]
    fn english_table_is_used_when_requested() {
        let catalog = PromptCatalog::builtin();
        assert_eq!(catalog.text(PromptKey::Final, "en-US"), "Submit this report?");
    }

    #[test]
    fn retry_prefixes_hint_and_marks_prompt() {
        let catalog = PromptCatalog::builtin();
        let spec = catalog.retry(PromptKey::Accident, PromptKind::Confirm, "en-US");
        assert!(spec.retry);
        assert_eq!(
            spec.text,
            "Please answer yes or no. Did it involve a collision, derailment or fire?"
        );
    }

    #[test]
    fn yaml_overrides_merge_onto_builtin() {
        let yaml = r#"
default_locale: en-US
prompts:
  en-US:
    position: "Which station?"
  ja-JP:
    details: "詳細を入力してください"
"#;
        let catalog = PromptCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.default_locale(), "en-US");
        assert_eq!(catalog.text(PromptKey::Position, "en-US"), "Which station?");
        assert_eq!(catalog.text(PromptKey::People, "en-US"), EN_US[&PromptKey::People]);
        assert!(catalog.has_locale("ja-JP"));
        // ja-JP only overrides details; everything else falls back to en-US
        assert_eq!(catalog.text(PromptKey::Final, "ja-JP"), "Submit this report?");
    }

    #[test]
    fn yaml_override_replaces_welcome_card() {
        let yaml = "welcome_card:\n  type: AdaptiveCard\n  body: []\n";
        let catalog = PromptCatalog::from_yaml_str(yaml).unwrap();
        match catalog.welcome_card() {
            Activity::Attachment { content_type, content } => {
                assert_eq!(content_type, ADAPTIVE_CARD_CONTENT_TYPE);
                assert_eq!(content, json!({"type": "AdaptiveCard", "body": []}));
            }
            other => panic!("expected attachment, got {:?}", other),
        }
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = PromptCatalog::from_yaml_str("prompts: [1, 2").unwrap_err();
        assert!(matches!(err, PromptCatalogError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prompts:\n  zh-TW:\n    final: \"送出?\"").unwrap();
        let catalog = PromptCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.text(PromptKey::Final, "zh-TW"), "送出?");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = PromptCatalog::load(Path::new("/nonexistent/prompts.yaml")).unwrap_err();
        assert!(matches!(err, PromptCatalogError::Io(_)));
    }

    #[test]
    fn activity_serializes_with_type_tag() {
        let value = serde_json::to_value(Activity::text("hi")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hi"}));
    }
}
