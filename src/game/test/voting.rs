//! Vote casting and resolution tests

use super::test_utils::*;
use crate::error::GameError;
use crate::game::player::Role::*;
use crate::game::{GameState, VoteOutcome};

#[test]
fn self_votes_are_always_rejected() {
    let mut game = create_test_game(4, 1, 0);
    assert_eq!(game.cast_vote(1, 1), Err(GameError::InvalidVote));

    game.start().unwrap();
    assert_eq!(game.cast_vote(1, 1), Err(GameError::InvalidVote));

    give_all_clues(&mut game);
    assert_eq!(game.cast_vote(1, 1), Err(GameError::InvalidVote));

    let mut game = create_started_game_with_roles(&[Undercover, Common, Common]);
    let votes = everyone_votes_for(&game, 0);
    play_round(&mut game, &votes);
    assert!(game.game_over());
    assert_eq!(game.cast_vote(1, 1), Err(GameError::InvalidVote));
}

#[test]
fn cannot_vote_during_clue_giving() {
    let mut game = create_started_game(4, 1, 0);
    assert_eq!(game.cast_vote(0, 1), Err(GameError::InvalidAction));
}

#[test]
fn rejects_votes_involving_missing_or_eliminated_players() {
    let mut game = create_started_game_with_roles(&[Common, Common, Undercover, Common, Common]);
    let votes = everyone_votes_for(&game, 1);
    play_round(&mut game, &votes);
    game.end_elimination().unwrap();
    give_all_clues(&mut game);

    assert_eq!(game.cast_vote(0, 1), Err(GameError::InvalidVote));
    assert_eq!(game.cast_vote(1, 0), Err(GameError::InvalidVote));
    assert_eq!(game.cast_vote(0, 7), Err(GameError::InvalidVote));
    assert_eq!(game.cast_vote(7, 0), Err(GameError::InvalidVote));
    assert_eq!(game.vote_counts(), Some(vec![0; 5]));
}

#[test]
fn last_vote_counts() {
    let mut game = create_started_game_with_roles(&[Common, Common, Undercover, Common]);
    give_all_clues(&mut game);
    cast_votes(&mut game, &[(0, 1), (0, 2), (0, 3)]);
    assert_eq!(game.vote_counts(), Some(vec![0, 0, 0, 1]));
    assert_eq!(game.current_voter(), Some(1));
}

#[test]
fn voters_are_prompted_in_roster_order() {
    let mut game = create_started_game(4, 1, 0);
    give_all_clues(&mut game);
    assert_eq!(game.current_voter(), Some(0));
    game.cast_vote(2, 0).unwrap();
    assert_eq!(game.current_voter(), Some(0));
    game.cast_vote(0, 2).unwrap();
    assert_eq!(game.current_voter(), Some(1));
    game.cast_vote(1, 2).unwrap();
    game.cast_vote(3, 2).unwrap();
    assert_eq!(game.current_voter(), None);
    assert!(game.voting_complete());
}

#[test]
fn cannot_resolve_an_incomplete_vote() {
    let mut game = create_started_game(4, 1, 0);
    give_all_clues(&mut game);
    cast_votes(&mut game, &[(0, 1), (1, 2)]);
    assert!(!game.voting_complete());
    assert_eq!(game.end_voting(), Err(GameError::InvalidAction));
    assert!(matches!(game.state, GameState::Voting { .. }));
}

#[test]
fn closing_the_vote_completes_it() {
    let mut game = create_started_game_with_roles(&[Common, Common, Undercover, Common]);
    give_all_clues(&mut game);
    cast_votes(&mut game, &[(0, 2), (1, 2)]);
    game.close_voting().unwrap();
    assert!(game.voting_complete());
    assert_eq!(game.current_voter(), None);
    assert_eq!(game.cast_vote(3, 2), Err(GameError::InvalidAction));

    game.end_voting().unwrap();
    assert_eq!(game.eliminated_players(), &[2]);
}

#[test]
fn resolution_is_deterministic() {
    let votes = [(0, 1), (1, 2), (2, 1), (3, 1), (4, 0)];
    let outcomes: Vec<_> = (0..3)
        .map(|_| {
            let mut game = create_started_game_with_roles(&[Common, Common, Undercover, Common, Common]);
            play_round(&mut game, &votes);
            game.vote_history().last().unwrap().outcome.clone()
        })
        .collect();
    assert!(outcomes.iter().all(|o| *o == VoteOutcome::Eliminated(1)));
}

#[test]
fn a_tie_eliminates_nobody_and_triggers_a_revote() {
    let mut game = create_started_game_with_roles(&[Common, Undercover, Common, Common]);
    play_round(&mut game, &[(0, 1), (2, 1), (1, 0), (3, 0)]);

    assert_eq!(game.vote_history()[0].outcome, VoteOutcome::Tie(vec![0, 1]));
    assert!(game.eliminated_players().is_empty());
    assert!(game.players().iter().all(|p| p.alive()));
    assert!(matches!(game.state, GameState::Elimination { .. }));
    assert!(game.voting_complete());
    assert_eq!(game.current_round(), 1);

    game.end_elimination().unwrap();
    assert!(matches!(game.state, GameState::Voting { .. }));
    assert!(game.is_voting_phase());
    assert!(!game.voting_complete());
    assert_eq!(game.vote_counts(), Some(vec![0; 4]));
    assert_eq!(game.current_round(), 1);
}

#[test]
fn a_three_way_tie_is_reported_in_roster_order() {
    let mut game = create_started_game_with_roles(&[Common, Undercover, Common]);
    play_round(&mut game, &[(0, 2), (1, 0), (2, 1)]);
    assert_eq!(game.vote_history()[0].outcome, VoteOutcome::Tie(vec![0, 1, 2]));
}

#[test]
fn an_empty_closed_vote_is_a_tie() {
    let mut game = create_started_game(3, 1, 0);
    give_all_clues(&mut game);
    game.close_voting().unwrap();
    game.end_voting().unwrap();
    assert_eq!(game.vote_history()[0].outcome, VoteOutcome::Tie(vec![0, 1, 2]));
    assert_eq!(game.vote_history()[0].votes, vec![None; 3]);
}
