//! Yes/no coercion for confirmation answers.
//!
//! Channels without native confirm buttons deliver confirmations as text.

const AFFIRMATIVE: [&str; 13] = [
    "yes", "y", "yeah", "yep", "true", "ok", "okay", "sure", "是", "對", "好", "要", "有",
];

const NEGATIVE: [&str; 11] = [
    "no", "n", "nope", "false", "否", "不", "不是", "不要", "沒有", "無", "没有",
];

/// Interprets a text answer as yes/no. Returns `None` when it is neither.
///
/// Negative phrases are checked first so that `不要` is not read as `要`.
pub fn parse_confirmation(text: &str) -> Option<bool> {
    let normalized = text
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || matches!(c, '。' | '！' | '，'))
        .to_lowercase();

    if normalized.is_empty() {
        return None;
    }
    if NEGATIVE.contains(&normalized.as_str()) {
        return Some(false);
    }
    if AFFIRMATIVE.contains(&normalized.as_str()) {
        return Some(true);
    }
    None
}
