//! Persisted result payloads
//!
//! A payload is the unit the store writes and the API serves: one reader's
//! books and analytics, or one comparison. An optional AI section produced by
//! an external collaborator may be attached before storing; its keys are
//! checked against a fixed list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shelf_common::{Book, EnrichmentStatus, Error, ReaderShelf, Result};

use crate::analytics::AnalyticsResult;
use crate::comparison::ComparisonResult;

/// Sections an AI collaborator may attach to a profile
pub const PROFILE_AI_SECTIONS: [&str; 8] = [
    "psychological",
    "roast",
    "vibe_check",
    "red_green_flags",
    "blind_spots",
    "reading_evolution",
    "recommendations",
    "deep_profile",
];

/// Sections an AI collaborator may attach to a comparison
pub const COMPARISON_AI_SECTIONS: [&str; 2] = ["dynamics", "recommendations"];

/// Check that `ai` is an object whose keys all appear in `allowed`
pub fn validate_ai_sections(ai: &Value, allowed: &[&str]) -> Result<()> {
    let object = ai
        .as_object()
        .ok_or_else(|| Error::InvalidInput("AI section must be a JSON object".to_string()))?;

    let unknown: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !allowed.contains(key))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Unknown AI section(s): {}",
            unknown.join(", ")
        )))
    }
}

/// One reader's stored result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub reader_id: String,
    pub reader_name: Option<String>,
    pub book_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub enrichment_coverage: f64,
    pub enrichment_status: EnrichmentStatus,
    pub books: Vec<Book>,
    pub stats: AnalyticsResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<Value>,
}

impl ProfilePayload {
    pub fn new(shelf: ReaderShelf, stats: AnalyticsResult) -> Self {
        Self {
            enrichment_status: shelf.enrichment_status(),
            book_count: shelf.books.len(),
            reader_id: shelf.reader_id,
            reader_name: shelf.reader_name,
            fetched_at: shelf.fetched_at,
            enrichment_coverage: shelf.enrichment_coverage,
            books: shelf.books,
            stats,
            ai: None,
        }
    }

    /// Rebuild the shelf the payload was computed from
    pub fn to_shelf(&self) -> ReaderShelf {
        ReaderShelf {
            reader_id: self.reader_id.clone(),
            reader_name: self.reader_name.clone(),
            books: self.books.clone(),
            fetched_at: self.fetched_at,
            enrichment_coverage: self.enrichment_coverage,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.reader_id.trim().is_empty() {
            return Err(Error::InvalidInput("Profile payload has no reader_id".to_string()));
        }
        if self.book_count != self.books.len() {
            return Err(Error::InvalidInput(format!(
                "book_count {} does not match {} books",
                self.book_count,
                self.books.len()
            )));
        }
        if let Some(ai) = &self.ai {
            validate_ai_sections(ai, &PROFILE_AI_SECTIONS)?;
        }
        Ok(())
    }
}

/// One reader pair's stored result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPayload {
    pub reader_a: String,
    pub reader_b: String,
    #[serde(default)]
    pub reader_a_name: Option<String>,
    #[serde(default)]
    pub reader_b_name: Option<String>,
    pub comparison: ComparisonResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<Value>,
}

impl ComparisonPayload {
    pub fn new(a: &ReaderShelf, b: &ReaderShelf, comparison: ComparisonResult) -> Self {
        Self {
            reader_a: a.reader_id.clone(),
            reader_b: b.reader_id.clone(),
            reader_a_name: a.reader_name.clone(),
            reader_b_name: b.reader_name.clone(),
            comparison,
            ai: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.reader_a.trim().is_empty() || self.reader_b.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Comparison payload needs both reader ids".to_string(),
            ));
        }
        if let Some(ai) = &self.ai {
            validate_ai_sections(ai, &COMPARISON_AI_SECTIONS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute_stats;
    use crate::testing::{book, shelf, ymd};
    use serde_json::json;

    fn payload() -> ProfilePayload {
        let s = shelf("42", vec![book("Dune").rated(5).avg(4.2).build()]);
        let stats = compute_stats(&s, ymd(2024, 1, 1));
        ProfilePayload::new(s, stats)
    }

    #[test]
    fn test_ai_keys_validated() {
        let ai = json!({"roast": "...", "vibe_check": {}});
        assert!(validate_ai_sections(&ai, &PROFILE_AI_SECTIONS).is_ok());
        assert!(validate_ai_sections(&json!({}), &PROFILE_AI_SECTIONS).is_ok());

        let err = validate_ai_sections(&json!({"roast": 1, "horoscope": 2}), &PROFILE_AI_SECTIONS)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("horoscope")));

        assert!(validate_ai_sections(&json!(["roast"]), &PROFILE_AI_SECTIONS).is_err());
        assert!(validate_ai_sections(&json!({"roast": 1}), &COMPARISON_AI_SECTIONS).is_err());
    }

    #[test]
    fn test_profile_payload_fields() {
        let p = payload();
        assert_eq!(p.book_count, 1);
        assert_eq!(p.enrichment_status, EnrichmentStatus::Complete);
        assert!(p.validate().is_ok());

        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("ai").is_none());
        assert_eq!(json["stats"]["hater_hype"]["label"], "Hype Beast");
    }

    #[test]
    fn test_book_count_mismatch_rejected() {
        let mut p = payload();
        p.book_count = 3;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_to_shelf_round_trips_metadata() {
        let p = payload();
        let s = p.to_shelf();
        assert_eq!(s.reader_id, "42");
        assert_eq!(s.books, p.books);
    }
}
