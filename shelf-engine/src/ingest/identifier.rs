//! Reader identifier resolution
//!
//! Accepts a bare numeric id or a profile/shelf URL and yields the numeric
//! reader id the feed is keyed on.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::IngestError;

fn url_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:user/show|review/list_rss|review/list)/(\d+)").expect("valid regex")
    })
}

fn any_digits_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Resolve a user-supplied identifier to a numeric reader id
///
/// Resolution order:
/// 1. Bare digits (surrounding whitespace ignored)
/// 2. Digits following `user/show/`, `review/list/` or `review/list_rss/`
/// 3. First run of digits anywhere in the input
pub fn parse_reader_id(input: &str) -> Result<String, IngestError> {
    let trimmed = input.trim();

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Ok(trimmed.to_string());
    }

    if let Some(caps) = url_id_pattern().captures(trimmed) {
        return Ok(caps[1].to_string());
    }

    any_digits_pattern()
        .find(trimmed)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| IngestError::InvalidIdentifier(input.to_string()))
}
