//! Leaderboard entry types and client-side sorting.

use crate::constants::MAX_NAME_LEN;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    /// ISO country code, or "XX" when geolocation was unavailable.
    #[serde(default = "unknown_code")]
    pub country: String,
    #[serde(default = "unknown_name")]
    pub country_name: String,
    /// RFC 3339 timestamp of submission.
    pub date: String,
}

fn unknown_code() -> String {
    "XX".to_string()
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

impl ScoreEntry {
    /// Readers skip entries that fail validation instead of crashing the
    /// display on malformed stored data.
    pub fn is_valid(&self) -> bool {
        let name_len = self.name.trim().chars().count();
        (1..=MAX_NAME_LEN).contains(&name_len) && !self.country.is_empty()
    }
}

/// Client-side sort orders for the high-scores screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Score descending (the default leaderboard view).
    #[default]
    Score,
    /// Most recent first.
    Date,
    /// Country display name, lexicographic.
    Country,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Score, SortOrder::Date, SortOrder::Country];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Score => "Score",
            SortOrder::Date => "Date",
            SortOrder::Country => "Country",
        }
    }

    pub fn next(self) -> SortOrder {
        match self {
            SortOrder::Score => SortOrder::Date,
            SortOrder::Date => SortOrder::Country,
            SortOrder::Country => SortOrder::Score,
        }
    }

    /// Re-sort a fetched list in place.
    pub fn apply(&self, entries: &mut [ScoreEntry]) {
        match self {
            SortOrder::Score => entries.sort_by(|a, b| b.score.cmp(&a.score)),
            SortOrder::Date => entries.sort_by(|a, b| b.date.cmp(&a.date)),
            SortOrder::Country => {
                entries.sort_by(|a, b| a.country_name.cmp(&b.country_name))
            }
        }
    }
}

/// Validate a player name before any store call: non-empty after trimming,
/// at most `MAX_NAME_LEN` characters.
pub fn validate_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Please enter your name!".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name must be at most {} characters.", MAX_NAME_LEN));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32, country_name: &str, date: &str) -> ScoreEntry {
        ScoreEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score,
            country: "CA".to_string(),
            country_name: country_name.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_validate_name_rules() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("ABCDEFGHIJK").is_err()); // 11 chars
        assert_eq!(validate_name("  Goose  ").unwrap(), "Goose");
        assert_eq!(validate_name("ABCDEFGHIJ").unwrap(), "ABCDEFGHIJ");
    }

    #[test]
    fn test_entry_validity() {
        let mut e = entry("ABC", 42, "Canada", "2026-01-01T00:00:00Z");
        assert!(e.is_valid());
        e.name = String::new();
        assert!(!e.is_valid());
        e.name = "toolongname".to_string();
        assert!(!e.is_valid());
    }

    #[test]
    fn test_sort_by_score_descending() {
        let mut entries = vec![
            entry("A", 5, "Canada", "2026-01-03T00:00:00Z"),
            entry("B", 50, "Brazil", "2026-01-01T00:00:00Z"),
            entry("C", 20, "Austria", "2026-01-02T00:00:00Z"),
        ];
        SortOrder::Score.apply(&mut entries);
        let scores: Vec<u32> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 20, 5]);
    }

    #[test]
    fn test_sort_by_date_recent_first() {
        let mut entries = vec![
            entry("A", 5, "Canada", "2026-01-03T00:00:00Z"),
            entry("B", 50, "Brazil", "2026-01-01T00:00:00Z"),
            entry("C", 20, "Austria", "2026-01-02T00:00:00Z"),
        ];
        SortOrder::Date.apply(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_by_country_name() {
        let mut entries = vec![
            entry("A", 5, "Canada", "2026-01-03T00:00:00Z"),
            entry("B", 50, "Brazil", "2026-01-01T00:00:00Z"),
            entry("C", 20, "Austria", "2026-01-02T00:00:00Z"),
        ];
        SortOrder::Country.apply(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.country_name.as_str()).collect();
        assert_eq!(names, vec!["Austria", "Brazil", "Canada"]);
    }

    #[test]
    fn test_sort_order_cycles() {
        let mut order = SortOrder::Score;
        order = order.next();
        assert_eq!(order, SortOrder::Date);
        order = order.next();
        assert_eq!(order, SortOrder::Country);
        order = order.next();
        assert_eq!(order, SortOrder::Score);
    }

    #[test]
    fn test_missing_country_fields_default() {
        let json = r#"{"name":"ABC","score":7,"date":"2026-01-01T00:00:00Z"}"#;
        let e: ScoreEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.country, "XX");
        assert_eq!(e.country_name, "Unknown");
        assert!(e.is_valid());
    }
}
