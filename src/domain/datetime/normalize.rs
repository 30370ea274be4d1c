//! Normalization of free-text date answers into TIMEX.
//!
//! Used when no recognizer is configured (or it found no date) so that a
//! typed answer like `2023/11/15` or `11月15日` can still be classified.

use chrono::{Duration, NaiveDate};

use super::timex::TimexExpression;

/// Offsets in days for relative date words. Longer phrases first.
const RELATIVE_DAYS: [(&str, i64); 8] = [
    ("day before yesterday", 2),
    ("前天", 2),
    ("yesterday", 1),
    ("昨天", 1),
    ("昨日", 1),
    ("today", 0),
    ("今天", 0),
    ("今日", 0),
];

/// Offset between the Minguo (ROC) calendar and the Gregorian year.
const ROC_YEAR_OFFSET: u32 = 1911;

/// Converts a user's date answer into a TIMEX string, if it looks like a date.
///
/// Already-valid TIMEX passes through unchanged. A missing year becomes
/// `XXXX` so the classifier will treat it as ambiguous.
pub fn normalize_date_text(text: &str, today: NaiveDate) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if TimexExpression::parse(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }

    let lower = trimmed.to_lowercase();
    if let Some((_, days)) = RELATIVE_DAYS.iter().find(|(word, _)| lower.contains(word)) {
        let date = today - Duration::days(*days);
        return Some(TimexExpression::from_date(date).to_string());
    }

    let ascii: String = trimmed.chars().map(to_ascii_digit).collect();
    let groups = digit_groups(&ascii);
    let roc = ascii.contains("民國") || ascii.contains("民国");

    let (year, month, day) = match groups.as_slice() {
        [y, m, d, ..] if y.len() == 4 => (Some(y.parse().ok()?), m, Some(d)),
        [m, d, y, ..] if y.len() == 4 && m.len() <= 2 => (Some(y.parse().ok()?), m, Some(d)),
        [y, m, d, ..] if y.len() <= 3 && (roc || ascii.contains('年')) => {
            (Some(y.parse::<u32>().ok()? + ROC_YEAR_OFFSET), m, Some(d))
        }
        [y, m] if y.len() == 4 => (Some(y.parse().ok()?), m, None),
        [m, d] if m.len() <= 2 && d.len() <= 2 => (None, m, Some(d)),
        _ => return None,
    };

    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let year = match year {
        Some(y) => format!("{:04}", y),
        None => "XXXX".to_string(),
    };

    match day {
        Some(day) => {
            let day: u32 = day.parse().ok()?;
            if !(1..=31).contains(&day) {
                return None;
            }
            Some(format!("{}-{:02}-{:02}", year, month, day))
        }
        None => Some(format!("{}-{:02}", year, month)),
    }
}

fn to_ascii_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        other => other,
    }
}

fn digit_groups(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, 20).unwrap()
    }

    fn normalize(text: &str) -> Option<String> {
        normalize_date_text(text, today())
    }

    #[test]
    fn passes_timex_through() {
        assert_eq!(normalize("XXXX-11-15").as_deref(), Some("XXXX-11-15"));
        assert_eq!(normalize("2023-11-15").as_deref(), Some("2023-11-15"));
    }

    #[test]
    fn converts_slash_and_dot_dates() {
        assert_eq!(normalize("2023/11/15").as_deref(), Some("2023-11-15"));
        assert_eq!(normalize("2023.1.5").as_deref(), Some("2023-01-05"));
    }

    #[test]
    fn converts_us_style_dates() {
        assert_eq!(normalize("11/15/2023").as_deref(), Some("2023-11-15"));
    }

    #[test]
    fn converts_cjk_dates() {
        assert_eq!(normalize("2023年11月15日").as_deref(), Some("2023-11-15"));
        assert_eq!(normalize("２０２３年１１月１５日").as_deref(), Some("2023-11-15"));
    }

    #[test]
    fn converts_roc_years() {
        assert_eq!(normalize("民國112年11月15日").as_deref(), Some("2023-11-15"));
        assert_eq!(normalize("112年11月15日").as_deref(), Some("2023-11-15"));
    }

    #[test]
    fn missing_year_becomes_placeholder() {
        assert_eq!(normalize("11/15").as_deref(), Some("XXXX-11-15"));
        assert_eq!(normalize("11月15日").as_deref(), Some("XXXX-11-15"));
    }

    #[test]
    fn year_and_month_only_is_month_expression() {
        assert_eq!(normalize("2023/11").as_deref(), Some("2023-11"));
    }

    #[test]
    fn resolves_relative_words() {
        assert_eq!(normalize("today").as_deref(), Some("2023-11-20"));
        assert_eq!(normalize("昨天下午").as_deref(), Some("2023-11-19"));
        assert_eq!(normalize("the day before yesterday").as_deref(), Some("2023-11-18"));
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("不記得了"), None);
        assert_eq!(normalize("2023/13/01"), None);
    }
}
