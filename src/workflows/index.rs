//! Episode index derivation and season labelling for dated episodes.

use chrono::{NaiveDateTime, Timelike};
use tracing::error;

use crate::error::{Error, Result};

/// Every index starts with this digit so it never begins with a bare year.
pub const INDEX_PREFIX: &str = "1";

/// Century added to two-digit years: `YY` always means `20YY`.
pub const TWO_DIGIT_YEAR_CENTURY: i32 = 2000;

const LONG_DATE_DIGITS: usize = 8;
const SHORT_DATE_DIGITS: usize = 6;

/// Builds the episode index from a matched date token.
///
/// Separators are stripped first. A full `YYYYMMDD` date gives `1YYYYMMDD`;
/// a short `YYMMDD` date also gets the minute and second of `modified_at`
/// appended (`1YYMMDDmmss`) so several episodes aired on the same day are
/// unlikely to collide. Any other digit count means a matcher produced a
/// bad token and is reported as [`Error::InvariantViolation`].
pub fn build_index(raw_date: &str, modified_at: &NaiveDateTime) -> Result<String> {
    let digits: String = raw_date.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        LONG_DATE_DIGITS => Ok(format!("{INDEX_PREFIX}{digits}")),
        SHORT_DATE_DIGITS => Ok(format!(
            "{INDEX_PREFIX}{digits}{:02}{:02}",
            modified_at.minute(),
            modified_at.second()
        )),
        n => {
            error!(raw = raw_date, digits = n, "date token reached index builder with bad length");
            Err(Error::InvariantViolation {
                digits: n,
                raw: raw_date.to_string(),
            })
        }
    }
}

/// Expands a captured 2 or 4 digit year.
pub fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    match raw.len() {
        2 => Some(TWO_DIGIT_YEAR_CENTURY + year),
        4 => Some(year),
        _ => None,
    }
}

pub fn season_label(year: i32) -> String {
    format!("Season ({year:04})")
}
