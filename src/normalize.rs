//! Date, time and count normalization shared by ingestion and validation.
//!
//! Parsing is expressed as an ordered list of candidate layouts: the first layout that matches
//! wins, and when none match the raw text is kept as a [`Fragment::PassThrough`] rather than
//! raising.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{IngestionError, IngestionResult};

/// Reserved header holding the date of each row.
pub const DATE_COLUMN: &str = "Date";
/// Reserved header holding the time of each row.
pub const TIME_COLUMN: &str = "Time";

/// Value logged in place of a blank count cell before it is coerced to `0`.
pub const BLANK_COUNT_SENTINEL: &str = "-1";

/// Layouts tried when building timestamps at import time.
pub const IMPORT_DATE_LAYOUTS: &[DateLayout] =
    &[DateLayout::MonthDayYear, DateLayout::MonthDayShortYear];

/// Layouts tried when repairing a non-canonical timestamp.
pub const REPAIR_DATE_LAYOUTS: &[DateLayout] = &[
    DateLayout::MonthDayYear,
    DateLayout::MonthDayShortYear,
    DateLayout::DayMonthYear,
    DateLayout::DayMonthShortYear,
    DateLayout::YearMonthDay,
];

/// A slash-separated date layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `01/15/2024`
    MonthDayYear,
    /// `01/15/24`
    MonthDayShortYear,
    /// `15/01/2024`
    DayMonthYear,
    /// `15/01/24`
    DayMonthShortYear,
    /// `2024/01/15`
    YearMonthDay,
}

impl DateLayout {
    fn pattern(self) -> &'static str {
        match self {
            Self::MonthDayYear => "%m/%d/%Y",
            Self::MonthDayShortYear => "%m/%d/%y",
            Self::DayMonthYear => "%d/%m/%Y",
            Self::DayMonthShortYear => "%d/%m/%y",
            Self::YearMonthDay => "%Y/%m/%d",
        }
    }

    /// Position and exact digit count of the year field.
    fn year_field(self) -> (usize, usize) {
        match self {
            Self::MonthDayYear | Self::DayMonthYear => (2, 4),
            Self::MonthDayShortYear | Self::DayMonthShortYear => (2, 2),
            Self::YearMonthDay => (0, 4),
        }
    }

    /// Parse `value` against this layout.
    ///
    /// chrono's `%Y` accepts any digit count, so the year width is checked up front: `1/15/24`
    /// must not match the four-digit layout as year 24.
    pub fn parse(self, value: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = value.split('/').collect();
        if parts.len() != 3 {
            return None;
        }
        let (pos, width) = self.year_field();
        let year = parts[pos];
        if year.len() != width || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(value, self.pattern()).ok()
    }
}

/// Outcome of normalizing one date or time fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// The fragment was recognized and rewritten into canonical form.
    Normalized(String),
    /// No candidate matched; the original text is carried through unchanged.
    PassThrough(String),
}

impl Fragment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Normalized(s) | Self::PassThrough(s) => s,
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, Self::Normalized(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Normalized(s) | Self::PassThrough(s) => s,
        }
    }
}

/// Try `layouts` in order and return the first date that parses.
pub fn parse_date(value: &str, layouts: &[DateLayout]) -> Option<NaiveDate> {
    layouts.iter().find_map(|layout| layout.parse(value))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a time as 24-hour `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Normalize a textual date cell (`01/15/2024`, `1/15/24`) to `YYYY-MM-DD`.
pub fn normalize_date_text(raw: &str) -> Fragment {
    let value = raw.trim();
    match parse_date(value, IMPORT_DATE_LAYOUTS) {
        Some(date) => Fragment::Normalized(format_date(date)),
        None => Fragment::PassThrough(raw.to_owned()),
    }
}

/// Normalize a 12-hour textual time cell (`02:30 PM`) to 24-hour `HH:MM`.
pub fn normalize_time_text(raw: &str) -> Fragment {
    let value = raw.trim();
    match NaiveTime::parse_from_str(value, "%I:%M %p") {
        Ok(time) => Fragment::Normalized(format_time(time)),
        Err(_) => Fragment::PassThrough(raw.to_owned()),
    }
}

/// Join date and time fragments with a single space, whether or not either parsed.
pub fn combine_timestamp(date: &Fragment, time: &Fragment) -> String {
    format!("{} {}", date.as_str(), time.as_str())
}

/// How strictly numeric count cells are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPolicy {
    /// Only integer literals are accepted (delimited text).
    Integer,
    /// Floating point values are accepted and truncated toward zero (spreadsheets, `3.0` -> `3`).
    FloatTolerant,
}

/// Parse a textual count cell. Blank cells yield `0`.
pub fn parse_count_text(
    row: usize,
    column: &str,
    raw: &str,
    policy: CountPolicy,
) -> IngestionResult<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::debug!(
            row,
            column,
            raw = BLANK_COUNT_SENTINEL,
            "blank count cell, storing 0"
        );
        return Ok(0);
    }

    match trimmed.parse::<i64>() {
        Ok(v) => Ok(v),
        Err(e) => match policy {
            CountPolicy::Integer => Err(IngestionError::ParseError {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }),
            CountPolicy::FloatTolerant => match trimmed.parse::<f64>() {
                Ok(f) => count_from_float(row, column, f, policy),
                Err(e) => Err(IngestionError::ParseError {
                    row,
                    column: column.to_owned(),
                    raw: raw.to_owned(),
                    message: e.to_string(),
                }),
            },
        },
    }
}

/// Convert a numeric cell to an integer count.
pub fn count_from_float(
    row: usize,
    column: &str,
    value: f64,
    policy: CountPolicy,
) -> IngestionResult<i64> {
    let err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: value.to_string(),
        message: message.to_owned(),
    };

    if !value.is_finite() {
        return Err(err("expected a finite number"));
    }
    if policy == CountPolicy::Integer && value.fract() != 0.0 {
        return Err(err("expected integer (got non-integer float)"));
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return Err(err("count out of range"));
    }
    Ok(truncated as i64)
}
