//! TIMEX expression parsing and type inference.
//!
//! A TIMEX string is the normalized form NLU recognizers emit for date/time
//! mentions. Unknown components are written as `X` placeholders, so
//! `XXXX-11-15` is "15 November, year unknown". Parsing splits the string
//! into its components; [`TimexExpression::types`] then infers the semantic
//! tags the ambiguity classifier works from.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker used by recognizers for "now".
pub const PRESENT_REF: &str = "PRESENT_REF";

/// Errors raised while parsing a TIMEX string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimexError {
    #[error("Empty TIMEX expression")]
    Empty,

    #[error("Invalid TIMEX date segment '{0}'")]
    InvalidDate(String),

    #[error("Invalid TIMEX time segment '{0}'")]
    InvalidTime(String),

    #[error("Invalid TIMEX duration '{0}'")]
    InvalidDuration(String),

    #[error("Invalid TIMEX range '{0}'")]
    InvalidRange(String),
}

/// Semantic tag attached to a parsed TIMEX expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimexType {
    Present,
    Definite,
    Date,
    DateRange,
    Time,
    TimeRange,
    DateTime,
    DateTimeRange,
    Duration,
}

impl TimexType {
    /// Lower-case tag name as used by recognizer tooling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Definite => "definite",
            Self::Date => "date",
            Self::DateRange => "daterange",
            Self::Time => "time",
            Self::TimeRange => "timerange",
            Self::DateTime => "datetime",
            Self::DateTimeRange => "datetimerange",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for TimexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season codes allowed in the month position (`2023-SU`).
const SEASONS: [&str; 4] = ["SP", "SU", "FA", "WI"];

/// Part-of-day codes allowed in the time position (`2023-11-15TMO`).
const PARTS_OF_DAY: [&str; 5] = ["MO", "AF", "EV", "NI", "DT"];

/// A parsed TIMEX expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimexExpression {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day_of_month: Option<u32>,
    pub week_of_year: Option<u32>,
    pub day_of_week: Option<u32>,
    pub weekend: bool,
    pub season: Option<String>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub part_of_day: Option<String>,
    pub duration: Option<String>,
    pub present: bool,
    /// Set for `(start,end,duration)` range expressions.
    pub range: Option<Box<(TimexExpression, TimexExpression)>>,
    /// True when the date segment was present (even if fully unresolved).
    has_date_segment: bool,
    has_day_segment: bool,
}

impl TimexExpression {
    /// Parses a TIMEX string.
    pub fn parse(raw: &str) -> Result<Self, TimexError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TimexError::Empty);
        }

        if raw == PRESENT_REF {
            return Ok(Self {
                present: true,
                ..Default::default()
            });
        }

        if raw.starts_with('(') {
            return Self::parse_range(raw);
        }

        if raw.starts_with('P') {
            validate_duration(raw)?;
            return Ok(Self {
                duration: Some(raw.to_string()),
                ..Default::default()
            });
        }

        let (date_part, time_part) = match raw.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (raw, None),
        };

        let mut expr = Self::default();
        if !date_part.is_empty() {
            expr.parse_date(date_part)?;
        }
        if let Some(time) = time_part {
            expr.parse_time(time)?;
        }
        Ok(expr)
    }

    /// Builds a fully resolved date expression.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day_of_month: Some(date.day()),
            has_date_segment: true,
            has_day_segment: true,
            ..Default::default()
        }
    }

    fn parse_range(raw: &str) -> Result<Self, TimexError> {
        let inner = raw
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| TimexError::InvalidRange(raw.to_string()))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [start, end, duration] = parts.as_slice() else {
            return Err(TimexError::InvalidRange(raw.to_string()));
        };

        let start = Self::parse(start)?;
        let end = Self::parse(end)?;
        validate_duration(duration)?;

        Ok(Self {
            duration: Some((*duration).to_string()),
            range: Some(Box::new((start, end))),
            ..Default::default()
        })
    }

    fn parse_date(&mut self, segment: &str) -> Result<(), TimexError> {
        let invalid = || TimexError::InvalidDate(segment.to_string());
        let parts: Vec<&str> = segment.split('-').collect();
        self.has_date_segment = true;

        let year = parts.first().ok_or_else(invalid)?;
        self.year = parse_placeholder(year, 4).map_err(|_| invalid())?.map(|y| y as i32);

        match parts.get(1) {
            None => {}
            Some(season) if SEASONS.contains(season) => {
                self.season = Some((*season).to_string());
            }
            Some(week) if week.starts_with('W') => {
                let number = &week[1..];
                self.week_of_year = parse_placeholder(number, 2).map_err(|_| invalid())?;
                if let Some(day) = parts.get(2) {
                    if *day == "WE" {
                        self.weekend = true;
                    } else {
                        let day = parse_placeholder(day, 1).map_err(|_| invalid())?;
                        if matches!(day, Some(d) if !(1..=7).contains(&d)) {
                            return Err(invalid());
                        }
                        self.day_of_week = day;
                    }
                }
            }
            Some(month) => {
                let month = parse_placeholder(month, 2).map_err(|_| invalid())?;
                if matches!(month, Some(m) if !(1..=12).contains(&m)) {
                    return Err(invalid());
                }
                self.month = month;

                if let Some(day) = parts.get(2) {
                    self.has_day_segment = true;
                    let day = parse_placeholder(day, 2).map_err(|_| invalid())?;
                    if matches!(day, Some(d) if !(1..=31).contains(&d)) {
                        return Err(invalid());
                    }
                    self.day_of_month = day;
                }
            }
        }

        if parts.len() > 3 {
            return Err(invalid());
        }
        Ok(())
    }

    fn parse_time(&mut self, segment: &str) -> Result<(), TimexError> {
        let invalid = || TimexError::InvalidTime(segment.to_string());

        if PARTS_OF_DAY.contains(&segment) {
            self.part_of_day = Some(segment.to_string());
            return Ok(());
        }

        let parts: Vec<&str> = segment.split(':').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut values = parts
            .iter()
            .map(|p| parse_placeholder(p, 2).map_err(|_| invalid()));
        let hour = values.next().transpose()?.flatten();
        let minute = values.next().transpose()?.flatten();
        let second = values.next().transpose()?.flatten();

        if matches!(hour, Some(h) if h > 24)
            || matches!(minute, Some(m) if m > 59)
            || matches!(second, Some(s) if s > 59)
        {
            return Err(invalid());
        }

        self.hour = hour;
        self.minute = minute;
        self.second = second;
        Ok(())
    }

    /// Returns the calendar date when year, month and day all resolve to a real date.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day_of_month?)
    }

    /// Infers the semantic type tags of this expression.
    pub fn types(&self) -> BTreeSet<TimexType> {
        let mut types = BTreeSet::new();

        if self.present {
            types.insert(TimexType::Present);
        }

        if let Some(range) = &self.range {
            let (start, end) = range.as_ref();
            let (start_types, end_types) = (start.types(), end.types());
            let both = |t: TimexType| start_types.contains(&t) && end_types.contains(&t);
            if both(TimexType::DateTime) {
                types.insert(TimexType::DateTimeRange);
            } else if both(TimexType::Date) {
                types.insert(TimexType::DateRange);
            } else if both(TimexType::Time) {
                types.insert(TimexType::TimeRange);
            }
            types.insert(TimexType::Duration);
            return types;
        }

        if self.duration.is_some() {
            types.insert(TimexType::Duration);
        }

        if self.calendar_date().is_some() {
            types.insert(TimexType::Definite);
        }

        let is_date = (self.month.is_some() && self.day_of_month.is_some())
            || self.day_of_week.is_some();
        if is_date {
            types.insert(TimexType::Date);
        } else if self.has_date_segment {
            types.insert(TimexType::DateRange);
        }

        if self.hour.is_some() {
            types.insert(TimexType::Time);
            if is_date {
                types.insert(TimexType::DateTime);
            }
        } else if self.part_of_day.is_some() {
            types.insert(TimexType::TimeRange);
            if is_date {
                types.insert(TimexType::DateTimeRange);
            }
        }

        types
    }

    /// Returns true if the expression carries the given tag.
    pub fn has_type(&self, ty: TimexType) -> bool {
        self.types().contains(&ty)
    }
}

impl FromStr for TimexExpression {
    type Err = TimexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimexExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.present {
            return f.write_str(PRESENT_REF);
        }
        if let Some(range) = &self.range {
            let (start, end) = range.as_ref();
            return write!(
                f,
                "({},{},{})",
                start,
                end,
                self.duration.as_deref().unwrap_or_default()
            );
        }
        if let Some(duration) = &self.duration {
            return f.write_str(duration);
        }

        if self.has_date_segment {
            write_placeholder(f, self.year.map(|y| y as u32), 4)?;
            if let Some(season) = &self.season {
                write!(f, "-{}", season)?;
            } else if self.week_of_year.is_some() || self.day_of_week.is_some() || self.weekend {
                f.write_str("-W")?;
                write_placeholder(f, self.week_of_year, 2)?;
                if self.weekend {
                    f.write_str("-WE")?;
                } else if self.day_of_week.is_some() {
                    f.write_str("-")?;
                    write_placeholder(f, self.day_of_week, 1)?;
                }
            } else if self.month.is_some() || self.has_day_segment {
                f.write_str("-")?;
                write_placeholder(f, self.month, 2)?;
                if self.has_day_segment {
                    f.write_str("-")?;
                    write_placeholder(f, self.day_of_month, 2)?;
                }
            }
        }

        if let Some(part) = &self.part_of_day {
            write!(f, "T{}", part)?;
        } else if let Some(hour) = self.hour {
            write!(f, "T{:02}", hour)?;
            if let Some(minute) = self.minute {
                write!(f, ":{:02}", minute)?;
                if let Some(second) = self.second {
                    write!(f, ":{:02}", second)?;
                }
            }
        }
        Ok(())
    }
}

/// Returns the date portion of a TIMEX string (the text before the `T` separator).
pub fn date_portion(timex: &str) -> &str {
    timex.split('T').next().unwrap_or(timex)
}

/// Parses a fixed-width numeric component where all-`X` means "unknown".
fn parse_placeholder(segment: &str, width: usize) -> Result<Option<u32>, ()> {
    if segment.len() != width {
        return Err(());
    }
    if segment.chars().all(|c| c == 'X') {
        return Ok(None);
    }
    if !segment.chars().all(|c| c.is_ascii_digit()) {
        return Err(());
    }
    segment.parse::<u32>().map(Some).map_err(|_| ())
}

fn write_placeholder(f: &mut fmt::Formatter<'_>, value: Option<u32>, width: usize) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{:0width$}", v, width = width),
        None => f.write_str(&"X".repeat(width)),
    }
}

fn validate_duration(raw: &str) -> Result<(), TimexError> {
    let invalid = || TimexError::InvalidDuration(raw.to_string());
    let body = raw.strip_prefix('P').ok_or_else(invalid)?;
    if body.is_empty() {
        return Err(invalid());
    }

    let mut in_time = false;
    let mut number = String::new();
    let mut saw_unit = false;
    for c in body.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' => number.push(c),
            'Y' | 'M' | 'W' | 'D' if !in_time && !number.is_empty() => {
                number.clear();
                saw_unit = true;
            }
            'H' | 'M' | 'S' if in_time && !number.is_empty() => {
                number.clear();
                saw_unit = true;
            }
            _ => return Err(invalid()),
        }
    }

    if !number.is_empty() || !saw_unit {
        return Err(invalid());
    }
    Ok(())
}
