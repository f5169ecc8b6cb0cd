//! Leaderboard feature: placement math, submission, and pluggable storage.

pub mod geo;
pub mod store;
pub mod types;

use crate::constants::LEADERBOARD_CAPACITY;
use chrono::Utc;
use self::geo::Location;
use self::store::{ScoreStore, StoreError};
use self::types::{validate_name, ScoreEntry};
use std::sync::Arc;
use uuid::Uuid;

/// Answer to "did this run make the board?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighScoreCheck {
    pub is_high_score: bool,
    /// 1-based rank the score would take.
    pub placement: usize,
}

/// The game's view of the leaderboard, independent of the backend.
///
/// Cheap to clone; clones share the underlying store so calls can run on
/// background threads without stalling the render loop.
#[derive(Clone)]
pub struct HighScoreBoard {
    store: Arc<dyn ScoreStore>,
}

impl HighScoreBoard {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        HighScoreBoard { store }
    }

    /// 1-based rank among stored entries: one plus the count of strictly
    /// greater scores.
    pub fn placement_among(entries: &[ScoreEntry], score: u32) -> usize {
        entries.iter().filter(|e| e.score > score).count() + 1
    }

    /// A score qualifies iff its placement fits within the board capacity.
    pub fn is_high_score(&self, score: u32) -> Result<HighScoreCheck, StoreError> {
        let entries = self.store.fetch()?;
        let placement = Self::placement_among(&entries, score);
        Ok(HighScoreCheck {
            is_high_score: placement <= LEADERBOARD_CAPACITY,
            placement,
        })
    }

    /// Validate the name locally, stamp the entry with the cached location
    /// and the current time, and hand it to the backend. The name error path
    /// never reaches the store.
    pub fn submit_score(
        &self,
        name: &str,
        score: u32,
        location: &Location,
    ) -> Result<bool, SubmitError> {
        let name = validate_name(name).map_err(SubmitError::InvalidName)?;
        let entry = ScoreEntry {
            id: Uuid::new_v4(),
            name,
            score,
            country: location.country.clone(),
            country_name: location.country_name.clone(),
            date: Utc::now().to_rfc3339(),
        };
        self.store.submit(&entry).map_err(SubmitError::Store)
    }

    pub fn fetch(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        self.store.fetch()
    }

    pub fn purge_all(&self) -> Result<bool, StoreError> {
        self.store.purge_all()
    }
}

/// Submission failure: either rejected locally before any store call, or a
/// backend error the player may retry.
#[derive(Debug)]
pub enum SubmitError {
    InvalidName(String),
    Store(StoreError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::InvalidName(msg) => write!(f, "{}", msg),
            SubmitError::Store(e) => write!(f, "Failed to submit: {}. Please try again.", e),
        }
    }
}

impl std::error::Error for SubmitError {}

/// English ordinal for a placement rank ("1st", "2nd", "11th", "23rd").
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, v) if v != 11 => "st",
        (2, v) if v != 12 => "nd",
        (3, v) if v != 13 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> ScoreEntry {
        ScoreEntry {
            id: Uuid::new_v4(),
            name: "P".to_string(),
            score,
            country: "CA".to_string(),
            country_name: "Canada".to_string(),
            date: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_placement_counts_strictly_greater() {
        let entries = vec![entry(50), entry(30), entry(30), entry(10)];
        assert_eq!(HighScoreBoard::placement_among(&entries, 60), 1);
        // Ties share the better rank.
        assert_eq!(HighScoreBoard::placement_among(&entries, 30), 2);
        assert_eq!(HighScoreBoard::placement_among(&entries, 5), 5);
    }

    #[test]
    fn test_placement_on_empty_board() {
        assert_eq!(HighScoreBoard::placement_among(&[], 0), 1);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(42), "42nd");
        assert_eq!(ordinal(103), "103rd");
    }
}
