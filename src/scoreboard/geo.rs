//! Best-effort geolocation for score entries.
//!
//! An IP-based lookup resolves a country code and display name. Any failure
//! (offline, timeout, malformed response) downgrades to the "unknown"
//! sentinel; a score submission is never blocked on location.

use serde::Deserialize;
use std::time::Duration;

/// Resolved (or fallback) location attached to submitted scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub country_name: String,
}

impl Location {
    /// The sentinel used whenever lookup is unavailable or denied.
    pub fn unknown() -> Self {
        Location {
            country: "XX".to_string(),
            country_name: "Unknown".to_string(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::unknown()
    }
}

#[derive(Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    country: String,
    #[serde(default)]
    country_name: String,
}

const LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Look up the current country. Runs one HTTP round-trip with a short
/// timeout; intended to be called once from a background thread at startup
/// and cached.
pub fn lookup() -> Location {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(3))
        .build();

    let body: Option<IpApiResponse> = agent
        .get(LOOKUP_URL)
        .call()
        .ok()
        .and_then(|r| r.into_json().ok());

    match body {
        Some(body) if !body.country.is_empty() => Location {
            country: body.country,
            country_name: if body.country_name.is_empty() {
                "Unknown".to_string()
            } else {
                body.country_name
            },
        },
        _ => Location::unknown(),
    }
}

/// Unicode flag for a two-letter country code; a globe for the sentinel.
pub fn flag_emoji(country: &str) -> String {
    if country.len() != 2 || country == "XX" {
        return "\u{1F30E}".to_string();
    }
    country
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| {
            char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32))
                .unwrap_or('\u{1F30E}')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let loc = Location::unknown();
        assert_eq!(loc.country, "XX");
        assert_eq!(loc.country_name, "Unknown");
    }

    #[test]
    fn test_flag_for_known_country() {
        // CA -> regional indicators C + A
        assert_eq!(flag_emoji("CA"), "\u{1F1E8}\u{1F1E6}");
    }

    #[test]
    fn test_flag_fallback_for_sentinel() {
        assert_eq!(flag_emoji("XX"), "\u{1F30E}");
        assert_eq!(flag_emoji(""), "\u{1F30E}");
        assert_eq!(flag_emoji("CAN"), "\u{1F30E}");
    }
}
