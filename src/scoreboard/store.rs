//! Pluggable scoreboard backends.
//!
//! The game only ever talks to the `ScoreStore` trait; whether entries live
//! in a local JSON file or behind a remote HTTP service is a construction-time
//! decision.

use crate::constants::LEADERBOARD_CAPACITY;
use crate::scoreboard::types::ScoreEntry;
use crate::utils::persistence;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Failure surfaced by a scoreboard backend. Never fatal to the game loop;
/// the UI shows a transient message and the player may retry.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Http(String),
    Encoding(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage error: {}", e),
            StoreError::Http(e) => write!(f, "network error: {}", e),
            StoreError::Encoding(e) => write!(f, "malformed scoreboard data: {}", e),
        }
    }
}

impl Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Abstract scoreboard service.
///
/// `submit` returns `Ok(false)` when the entry does not place within the
/// leaderboard capacity and was therefore not stored.
pub trait ScoreStore: Send + Sync {
    fn submit(&self, entry: &ScoreEntry) -> Result<bool, StoreError>;
    fn fetch(&self) -> Result<Vec<ScoreEntry>, StoreError>;
    /// Administrative bulk delete. Callers gate this behind an out-of-band
    /// unlock gesture; it is never part of the normal UI flow.
    fn purge_all(&self) -> Result<bool, StoreError>;
}

/// Local backend: one JSON file of entries under the save directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Store under `~/.flappy-goose/highscores.json`.
    pub fn new() -> io::Result<Self> {
        Ok(LocalStore {
            path: persistence::save_path("highscores.json")?,
        })
    }

    /// Store at an explicit path (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        LocalStore { path }
    }

    /// Read all entries, skipping anything malformed rather than failing the
    /// whole read. A missing file is an empty board.
    fn read_entries(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let values: Vec<serde_json::Value> = serde_json::from_str(&json)
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        Ok(values
            .into_iter()
            .filter_map(|v| serde_json::from_value::<ScoreEntry>(v).ok())
            .filter(|e| e.is_valid())
            .collect())
    }

    fn write_entries(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for LocalStore {
    fn submit(&self, entry: &ScoreEntry) -> Result<bool, StoreError> {
        let mut entries = self.read_entries()?;
        let placement = entries.iter().filter(|e| e.score > entry.score).count() + 1;
        if placement > LEADERBOARD_CAPACITY {
            return Ok(false);
        }
        entries.push(entry.clone());
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_CAPACITY);
        self.write_entries(&entries)?;
        Ok(true)
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut entries = self.read_entries()?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(entries)
    }

    fn purge_all(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

/// Remote backend: a JSON REST service with `GET/POST/DELETE {base}/scores`.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    agent: ureq::Agent,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        RemoteStore {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(5))
                .build(),
        }
    }

    fn scores_url(&self) -> String {
        format!("{}/scores", self.base_url)
    }
}

impl ScoreStore for RemoteStore {
    fn submit(&self, entry: &ScoreEntry) -> Result<bool, StoreError> {
        self.agent
            .post(&self.scores_url())
            .send_json(entry)
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(true)
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let values: Vec<serde_json::Value> = self
            .agent
            .get(&self.scores_url())
            .call()
            .map_err(|e| StoreError::Http(e.to_string()))?
            .into_json()
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        let mut entries: Vec<ScoreEntry> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value::<ScoreEntry>(v).ok())
            .filter(|e| e.is_valid())
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(entries)
    }

    fn purge_all(&self) -> Result<bool, StoreError> {
        self.agent
            .delete(&self.scores_url())
            .call()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn temp_store(tag: &str) -> LocalStore {
        let path = std::env::temp_dir().join(format!(
            "flappy-goose-store-test-{}-{}.json",
            tag,
            Uuid::new_v4()
        ));
        LocalStore::with_path(path)
    }

    fn entry(name: &str, score: u32) -> ScoreEntry {
        ScoreEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score,
            country: "CA".to_string(),
            country_name: "Canada".to_string(),
            date: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_fetch_on_missing_file_is_empty() {
        let store = temp_store("missing");
        assert!(store.fetch().unwrap().is_empty());
    }

    #[test]
    fn test_submit_then_fetch_sorted() {
        let store = temp_store("roundtrip");
        store.submit(&entry("A", 10)).unwrap();
        store.submit(&entry("B", 30)).unwrap();
        store.submit(&entry("C", 20)).unwrap();

        let entries = store.fetch().unwrap();
        let scores: Vec<u32> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);

        store.purge_all().unwrap();
    }

    #[test]
    fn test_capacity_trim_keeps_top_fifty() {
        let store = temp_store("capacity");
        for i in 0..(LEADERBOARD_CAPACITY as u32 + 5) {
            store.submit(&entry("P", i + 1)).unwrap();
        }
        let entries = store.fetch().unwrap();
        assert_eq!(entries.len(), LEADERBOARD_CAPACITY);
        // The lowest five were trimmed.
        assert!(entries.iter().all(|e| e.score > 5));

        store.purge_all().unwrap();
    }

    #[test]
    fn test_submit_below_capacity_cutoff_rejected() {
        let store = temp_store("cutoff");
        for i in 0..LEADERBOARD_CAPACITY as u32 {
            store.submit(&entry("P", i + 100)).unwrap();
        }
        // Placement 51: not stored.
        assert!(!store.submit(&entry("Low", 1)).unwrap());
        assert_eq!(store.fetch().unwrap().len(), LEADERBOARD_CAPACITY);

        store.purge_all().unwrap();
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let store = temp_store("malformed");
        let json = r#"[
            {"name":"OK","score":12,"date":"2026-01-01T00:00:00Z"},
            {"name":"","score":5,"date":"2026-01-01T00:00:00Z"},
            {"score":"not-a-number"},
            42
        ]"#;
        fs::write(store.path.clone(), json).unwrap();

        let entries = store.fetch().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "OK");

        store.purge_all().unwrap();
    }

    #[test]
    fn test_purge_is_idempotent() {
        let store = temp_store("purge");
        store.submit(&entry("A", 1)).unwrap();
        assert!(store.purge_all().unwrap());
        assert!(store.purge_all().unwrap());
        assert!(store.fetch().unwrap().is_empty());
    }
}
