//! Profile persistence against a real JSON file.

use football_quiz::{GameMode, GameOutcome, JsonFileStorage, ProfileService};

#[test]
fn test_profile_round_trips_through_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("saves").join("profile.json");

    let mut profile = ProfileService::load(JsonFileStorage::new(&path));
    assert_eq!(profile.profile().player_name(), "Player");
    profile.set_name("  Ada  ").expect("name");
    assert!(profile.update_high_score(GameMode::Bingo, 340).expect("bingo"));
    profile.record_game(GameOutcome::Draw, 15).expect("history");
    profile.record_game(GameOutcome::Win, 70).expect("history");
    assert!(profile.update_high_score(GameMode::TicTacToe, 70).expect("ttt"));
    assert!(!profile.update_high_score(GameMode::TicTacToe, 15).expect("ttt"));

    let raw = std::fs::read_to_string(&path).expect("saved file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["playerName"], "Ada");
    assert_eq!(json["bingo"]["highScore"], 340);
    assert_eq!(json["ticTacToe"]["highScore"], 70);
    assert_eq!(json["ticTacToe"]["history"][1]["result"], "win");

    let reloaded = ProfileService::load(JsonFileStorage::new(&path));
    assert_eq!(reloaded.profile(), profile.profile());
    let stats = reloaded.stats();
    assert_eq!(*stats.total_games(), 2);
    assert_eq!(*stats.draws(), 1);
    assert!((stats.win_rate() - 50.0).abs() < 1e-9);
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profile.json");
    std::fs::write(&path, "{ not json").expect("write");

    let mut profile = ProfileService::load(JsonFileStorage::new(&path));
    assert_eq!(profile.profile().high_score(GameMode::Bingo), 0);

    profile.set_name("Sam").expect("name");
    let reloaded = ProfileService::load(JsonFileStorage::new(&path));
    assert_eq!(reloaded.profile().player_name(), "Sam");
}

#[test]
fn test_reset_keeps_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profile.json");
    let mut profile = ProfileService::load(JsonFileStorage::new(&path));
    profile.set_name("Kim").expect("name");
    profile.record_game(GameOutcome::Loss, 0).expect("history");
    profile.update_high_score(GameMode::Bingo, 90).expect("bingo");

    profile.reset_scores().expect("reset");
    let reloaded = ProfileService::load(JsonFileStorage::new(&path));
    assert_eq!(reloaded.profile().player_name(), "Kim");
    assert_eq!(reloaded.profile().high_score(GameMode::Bingo), 0);
    assert!(reloaded.profile().tic_tac_toe().history().is_empty());
}
