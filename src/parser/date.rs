use crate::error::ParseError;
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone,
};

/// Formats that carry their own UTC offset
const OFFSET_FORMATS: &[&str] = &[
    // git's default `log` date format: "Mon Jan 1 12:00:00 2024 +0100"
    "%a %b %e %H:%M:%S %Y %z",
    "%Y-%m-%d %H:%M:%S %z",
];

/// Date/time formats without an offset, read as local time
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
    // Long form, e.g. "Tuesday, January 2, 2024 3:04:05 PM"
    "%A, %B %e, %Y %I:%M:%S %p",
    "%d.%m.%Y %H:%M:%S",
];

/// Date-only formats, read as local midnight
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses the date text of a `Date:` line
///
/// Tries RFC 3339, RFC 2822, the built-in formats above and finally any extra
/// formats from configuration. Values without an offset are interpreted in the
/// local time zone.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    extra_formats: Vec<String>,
}

impl DateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that also tries `extra_formats` (chrono strftime syntax)
    pub fn with_formats(extra_formats: Vec<String>) -> Self {
        Self { extra_formats }
    }

    pub fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>, ParseError> {
        let text = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(dt);
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Ok(dt);
        }

        let builtin = OFFSET_FORMATS
            .iter()
            .chain(NAIVE_DATETIME_FORMATS)
            .chain(NAIVE_DATE_FORMATS)
            .copied();
        let extra = self.extra_formats.iter().map(String::as_str);

        builtin
            .chain(extra)
            .find_map(|format| parse_with_format(text, format))
            .ok_or_else(|| ParseError::InvalidDate(text.to_string()))
    }
}

fn parse_with_format(text: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_str(text, format) {
        return Some(dt);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return to_local(naive);
    }

    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(to_local)
}

fn to_local(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.into()),
        // Skipped by a spring-forward transition: keep the wall-clock value at the
        // offset in effect the day before
        LocalResult::None => {
            let day_before = naive.checked_sub_signed(TimeDelta::days(1))?;
            Local
                .offset_from_utc_datetime(&day_before)
                .from_local_datetime(&naive)
                .single()
        }
    }
}
