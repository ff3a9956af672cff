use crate::utils::error::DateParseError;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

/// `Jan-02-2013 15:04:05`, hour may be a single digit. ASCII classes only,
/// so lookalike letters and non-Latin digits never start a match.
static POSTED_ON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_]{3}-[0-9]{2}-[0-9]{4} [0-9]?[0-9]:[0-9]{2}:[0-9]{2})")
        .expect("posted-on pattern is valid")
});

pub const POSTED_ON_LAYOUT: &str = "%b-%d-%Y %H:%M:%S";

/// Recovers the first posted-on timestamp in `text`.
///
/// `Ok(None)` means the text holds no timestamp at all, which is a normal
/// outcome. A matching substring that is not a real date (`Foo-31-2013 ...`)
/// is a [`DateParseError`].
pub fn extract(text: &str) -> Result<Option<NaiveDateTime>, DateParseError> {
    let Some(captures) = POSTED_ON.captures(text) else {
        return Ok(None);
    };

    let Some(matched) = captures.get(1).or_else(|| captures.get(0)) else {
        return Ok(None);
    };

    parse_posted_on(matched.as_str()).map(Some)
}

pub fn parse_posted_on(input: &str) -> Result<NaiveDateTime, DateParseError> {
    NaiveDateTime::parse_from_str(input, POSTED_ON_LAYOUT).map_err(|e| DateParseError {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
