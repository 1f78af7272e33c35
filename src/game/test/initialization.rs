//! Game creation and start-up tests

use super::test_utils::*;
use crate::error::GameError;
use crate::game::player::WordPair;
use crate::game::{Game, GameOptions, GameState, MAX_PLAYERS, MIN_PLAYERS};

#[test]
fn can_create_game() {
    let game = create_test_game(4, 1, 0);
    assert!(matches!(game.state, GameState::Setup));
    assert!(!game.is_started());
    assert_eq!(game.current_round(), 0);
    assert!(!game.is_voting_phase());
    assert!(!game.voting_complete());
    assert_eq!(game.active_card_player(), None);
    assert_eq!(game.current_voter(), None);
    assert!(!game.game_over());
    assert_eq!(game.winner(), None);
    assert!(game.eliminated_players().is_empty());
    assert_eq!(game.topic(), "nature");
}

#[test]
fn start_begins_the_first_clue_round() {
    let mut game = create_test_game(4, 1, 0);
    game.start().unwrap();
    assert!(matches!(game.state, GameState::ClueGiving { .. }));
    assert!(game.is_started());
    assert_eq!(game.current_round(), 1);
    assert_eq!(game.active_card_player(), Some(0));
}

#[test]
fn cannot_start_twice() {
    let mut game = create_started_game(4, 1, 0);
    assert_eq!(game.start(), Err(GameError::InvalidAction));
    assert_eq!(game.current_round(), 1);
}

#[test]
fn actions_before_start_fail() {
    let mut game = create_test_game(4, 1, 0);
    assert_eq!(game.give_clue(0, None), Err(GameError::GameNotStarted));
    assert_eq!(game.skip_clue_giver(), Err(GameError::GameNotStarted));
    assert_eq!(game.cast_vote(0, 1), Err(GameError::GameNotStarted));
    assert_eq!(game.close_voting(), Err(GameError::GameNotStarted));
    assert_eq!(game.end_voting(), Err(GameError::GameNotStarted));
    assert_eq!(game.end_elimination(), Err(GameError::GameNotStarted));
    assert!(game.clues().is_empty());
}

#[test]
fn rejects_duplicate_or_empty_names() {
    let words = WordPair::new("Ocean", "Lake");
    let opts = GameOptions::default();

    let duplicates = ["ALEX", "BOB", "ALEX"].map(String::from);
    let result = Game::new(opts, &duplicates, "nature", &words, 0);
    assert!(matches!(result, Err(GameError::InvalidConfiguration)));

    let blank = ["ALEX", "BOB", " "].map(String::from);
    let result = Game::new(opts, &blank, "nature", &words, 0);
    assert!(matches!(result, Err(GameError::InvalidConfiguration)));
}

#[test]
fn rejects_invalid_undercover_counts() {
    let words = WordPair::new("Ocean", "Lake");
    for undercover_count in [0, 4, 5] {
        let opts = GameOptions { undercover_count };
        let result = Game::new(opts, &names(4), "nature", &words, 0);
        assert!(matches!(result, Err(GameError::InvalidConfiguration)));
    }
}

#[test]
fn words_are_stored_trimmed() {
    let words = WordPair::new(" Ocean ", "Lake\n");
    let game = Game::new(GameOptions::default(), &names(3), "nature", &words, 0).unwrap();
    assert_eq!(game.words(), &WordPair::new("Ocean", "Lake"));
    assert!(game.players().iter().all(|p| p.word == "Ocean" || p.word == "Lake"));
}

#[test]
fn same_seed_deals_the_same_roles() {
    for seed in 0..10 {
        let a = create_test_game(6, 2, seed);
        let b = create_test_game(6, 2, seed);
        assert_eq!(undercover_players(&a), undercover_players(&b));
    }
}

#[test]
fn points_carry_over_by_name() {
    let mut previous = create_test_game(3, 1, 0);
    previous.players[1].points = 3;
    let mut game = create_test_game(4, 1, 1);
    game.carry_points_from(&previous);
    let points: Vec<u32> = game.players().iter().map(|p| p.points).collect();
    assert_eq!(points, vec![0, 3, 0, 0]);
}

#[test]
fn rejects_rosters_outside_the_player_limits() {
    let words = WordPair::new("Ocean", "Lake");
    let opts = GameOptions::default();
    let result = Game::new(opts, &names(MIN_PLAYERS - 1), "nature", &words, 0);
    assert!(matches!(result, Err(GameError::TooFewPlayers)));
    let result = Game::new(opts, &names(MAX_PLAYERS + 1), "nature", &words, 0);
    assert!(matches!(result, Err(GameError::TooManyPlayers)));
    assert!(Game::new(opts, &names(MAX_PLAYERS), "nature", &words, 0).is_ok());
}

#[test]
fn players_can_be_found_by_name() {
    let game = create_test_game(4, 1, 0);
    assert_eq!(game.find_player("Player0"), Ok(0));
    assert_eq!(game.find_player("Player3"), Ok(3));
    assert_eq!(game.find_player("player3"), Err(GameError::PlayerNotFound));
    assert_eq!(game.find_player("Nobody"), Err(GameError::PlayerNotFound));
}

#[test]
fn unknown_players_have_not_won() {
    let game = create_test_game(4, 1, 0);
    assert!(!game.player_has_won(0));
    assert!(!game.player_has_won(99));
}
