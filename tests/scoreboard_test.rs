//! Leaderboard round-trips through the local backend.

use flappy_goose::scoreboard::geo::Location;
use flappy_goose::scoreboard::store::{LocalStore, ScoreStore};
use flappy_goose::scoreboard::{HighScoreBoard, SubmitError};
use std::sync::Arc;
use uuid::Uuid;

fn temp_board(tag: &str) -> (HighScoreBoard, Arc<LocalStore>) {
    let path = std::env::temp_dir().join(format!(
        "flappy-goose-board-test-{}-{}.json",
        tag,
        Uuid::new_v4()
    ));
    let store = Arc::new(LocalStore::with_path(path));
    (HighScoreBoard::new(store.clone()), store)
}

#[test]
fn test_first_score_places_first() {
    let (board, store) = temp_board("first");
    let check = board.is_high_score(0).unwrap();
    assert!(check.is_high_score);
    assert_eq!(check.placement, 1);
    store.purge_all().unwrap();
}

#[test]
fn test_submit_round_trip() {
    let (board, store) = temp_board("roundtrip");
    let location = Location {
        country: "CA".to_string(),
        country_name: "Canada".to_string(),
    };

    let check = board.is_high_score(42).unwrap();
    assert!(board.submit_score("ABC", 42, &location).unwrap());

    let entries = board.fetch().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "ABC");
    assert_eq!(entries[0].score, 42);
    assert_eq!(entries[0].country, "CA");
    assert!(!entries[0].date.is_empty());

    // The pre-submission check promised the slot the entry actually took.
    assert_eq!(check.placement, 1);
    assert_eq!(HighScoreBoard::placement_among(&entries, 42), 1);

    store.purge_all().unwrap();
}

#[test]
fn test_placement_respects_existing_scores() {
    let (board, store) = temp_board("placement");
    let location = Location::unknown();
    for (name, score) in [("A", 30), ("B", 20), ("C", 10)] {
        board.submit_score(name, score, &location).unwrap();
    }

    assert_eq!(board.is_high_score(25).unwrap().placement, 2);
    assert_eq!(board.is_high_score(30).unwrap().placement, 2, "tie shares rank");
    assert_eq!(board.is_high_score(5).unwrap().placement, 4);

    store.purge_all().unwrap();
}

#[test]
fn test_invalid_names_never_reach_the_store() {
    let (board, store) = temp_board("names");
    let location = Location::unknown();

    let err = board.submit_score("   ", 10, &location).unwrap_err();
    assert!(matches!(err, SubmitError::InvalidName(_)));
    let err = board.submit_score("ElevenChars", 10, &location).unwrap_err();
    assert!(matches!(err, SubmitError::InvalidName(_)));

    assert!(board.fetch().unwrap().is_empty());
    store.purge_all().unwrap();
}

#[test]
fn test_unknown_location_sentinel_stored() {
    let (board, store) = temp_board("sentinel");
    board.submit_score("Ghost", 7, &Location::unknown()).unwrap();

    let entries = board.fetch().unwrap();
    assert_eq!(entries[0].country, "XX");
    assert_eq!(entries[0].country_name, "Unknown");

    store.purge_all().unwrap();
}

#[test]
fn test_purge_empties_the_board() {
    let (board, store) = temp_board("purge");
    board
        .submit_score("Soon Gone", 99, &Location::unknown())
        .unwrap();
    assert_eq!(board.fetch().unwrap().len(), 1);

    assert!(board.purge_all().unwrap());
    assert!(board.fetch().unwrap().is_empty());

    store.purge_all().unwrap();
}
