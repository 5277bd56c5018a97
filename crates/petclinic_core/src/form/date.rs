//! Birth-date text parsing for pet forms.
//!
//! # Invariants
//! - Exactly one accepted input format: `dd.MM.yyyy`.
//! - Impossible calendar dates are rejected, not clamped.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// chrono pattern for `dd.MM.yyyy`.
pub const BIRTH_DATE_FORMAT: &str = "%d.%m.%Y";

static BIRTH_DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid birth date regex"));

/// Birth-date text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    /// Rejected input, verbatim.
    pub input: String,
    pub reason: String,
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid birth date `{}`: {}", self.input, self.reason)
    }
}

impl Error for DateParseError {}

/// Parses `dd.MM.yyyy` text into a calendar date.
///
/// # Errors
/// - Input not shaped as two-digit day, two-digit month, four-digit year.
/// - Shape ok but no such calendar date (e.g. `31.02.2020`).
pub fn parse_birth_date(text: &str) -> Result<NaiveDate, DateParseError> {
    if !BIRTH_DATE_SHAPE_RE.is_match(text) {
        return Err(DateParseError {
            input: text.to_string(),
            reason: "expected format dd.MM.yyyy".to_string(),
        });
    }

    NaiveDate::parse_from_str(text, BIRTH_DATE_FORMAT).map_err(|err| DateParseError {
        input: text.to_string(),
        reason: err.to_string(),
    })
}

/// Formats a date back into form text.
pub fn format_birth_date(date: NaiveDate) -> String {
    date.format(BIRTH_DATE_FORMAT).to_string()
}
