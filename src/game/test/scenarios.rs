//! Whole-game scenarios

use super::test_utils::*;
use crate::game::player::Role::*;
use crate::game::player::{Role, WordPair};
use crate::game::{Game, GameOptions, VoteOutcome};

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;

fn ocean_lake_game(seed: u64) -> Game {
    let names = ["A", "B", "C", "D"].map(String::from);
    let words = WordPair::new("Ocean", "Lake");
    let mut game = Game::new(GameOptions { undercover_count: 1 }, &names, "nature", &words, seed).unwrap();
    game.start().unwrap();
    game
}

#[test]
fn four_players_one_round() {
    for seed in 0..20 {
        let mut game = ocean_lake_game(seed);
        let lakes = game.players().iter().filter(|p| p.word == "Lake").count();
        assert_eq!(lakes, 1);

        // Tally: A=1, B=3, C=0, D=0
        play_round(&mut game, &[(A, B), (B, A), (C, B), (D, B)]);
        assert_eq!(game.eliminated_players(), &[B]);

        if game.players()[B].is_undercover() {
            assert!(game.game_over());
            assert_eq!(game.winner(), Some(Role::Common));
            assert_eq!(game.current_round(), 1);
        } else {
            assert!(!game.game_over());
            game.end_elimination().unwrap();
            assert_eq!(game.current_round(), 2);
        }
    }
}

#[test]
fn tied_vote_is_replayed_until_decided() {
    let mut game = create_started_game_with_roles(&[Common, Undercover, Common, Common]);

    // Two votes each for the undercover and a common player
    play_round(&mut game, &[(A, B), (C, B), (B, A), (D, A)]);
    assert_eq!(game.vote_history()[0].outcome, VoteOutcome::Tie(vec![A, B]));
    game.end_elimination().unwrap();
    assert_eq!(game.current_round(), 1);

    // The re-vote needs no new clues
    assert_eq!(game.active_card_player(), None);
    cast_votes(&mut game, &[(A, B), (C, B), (D, B), (B, A)]);
    game.end_voting().unwrap();

    assert!(game.game_over());
    assert_eq!(game.winner(), Some(Common));
    assert_eq!(game.eliminated_players(), &[B]);
    assert_eq!(game.vote_history().len(), 2);
    assert_eq!(game.clues().len(), 4);
}

#[test]
fn five_players_one_undercover_full_game() {
    let mut game = create_started_game_with_roles(&[Common, Common, Common, Common, Undercover]);

    // Two common players are voted out before the undercover is found
    for (round, target) in [(1, 0), (2, 1)] {
        assert_eq!(game.current_round(), round);
        let votes = everyone_votes_for(&game, target);
        play_round(&mut game, &votes);
        game.end_elimination().unwrap();
    }

    assert_eq!(game.current_round(), 3);
    let votes = everyone_votes_for(&game, 4);
    play_round(&mut game, &votes);

    assert!(game.game_over());
    assert_eq!(game.winner(), Some(Common));
    assert_eq!(game.eliminated_players(), &[0, 1, 4]);
    assert_eq!(game.clues().len(), 5 + 4 + 3);
    // Eliminated players give no further clues
    assert!(game
        .clues()
        .iter()
        .all(|c| !(c.player == 0 && c.round > 1) && !(c.player == 1 && c.round > 2)));
}

#[test]
fn random_games_always_finish_with_a_consistent_winner() {
    for seed in 0..50 {
        let mut game = create_started_game(7, 2, seed);
        let undercover = undercover_players(&game);
        // Vote out the remaining players in roster order, undercover last
        let mut targets: Vec<usize> = (0..7).filter(|p| !undercover.contains(p)).collect();
        targets.extend(&undercover);

        for target in targets {
            if game.game_over() {
                break;
            }
            let votes = everyone_votes_for(&game, target);
            play_round(&mut game, &votes);
            if !game.game_over() {
                game.end_elimination().unwrap();
            }
        }

        assert!(game.game_over());
        let winner = game.winner().unwrap();
        assert!(game.players().iter().filter(|p| p.alive()).all(|p| p.role == winner));
        assert_eq!(winner, Undercover);
    }
}

#[test]
fn two_survivors_tie_is_broken_by_a_draw() {
    let mut game = create_started_game_with_roles(&[Undercover, Common, Common]);

    // A common player goes first, leaving one of each side
    play_round(&mut game, &[(A, C), (B, C), (C, A)]);
    assert_eq!(game.eliminated_players(), &[C]);
    game.end_elimination().unwrap();

    // The last two can only vote for each other
    play_round(&mut game, &[(A, B), (B, A)]);
    assert!(game.game_over());
    assert_eq!(game.vote_history().len(), 2);
    let VoteOutcome::Eliminated(out) = &game.vote_history()[1].outcome else {
        panic!("expected the tie to be broken");
    };
    let winner = if *out == A { Common } else { Undercover };
    assert_eq!(game.winner(), Some(winner));
    assert_eq!(game.num_players_alive(), 1);
}

#[test]
fn two_survivors_who_abstain_still_finish() {
    for seed in 0..10 {
        let mut game = create_started_game(3, 1, seed);
        let common: Vec<usize> = (0..3).filter(|p| !game.players()[*p].is_undercover()).collect();
        let votes = everyone_votes_for(&game, common[0]);
        play_round(&mut game, &votes);
        game.end_elimination().unwrap();

        give_all_clues(&mut game);
        game.close_voting().unwrap();
        game.end_voting().unwrap();
        assert!(game.game_over(), "seed {seed}");
    }
}

#[test]
fn final_tie_draw_is_repeatable() {
    let finish = |seed| {
        let mut game = create_started_game(3, 1, seed);
        let undercover = undercover_players(&game)[0];
        let common: Vec<usize> = (0..3).filter(|p| *p != undercover).collect();
        let votes = everyone_votes_for(&game, common[0]);
        play_round(&mut game, &votes);
        game.end_elimination().unwrap();
        play_round(&mut game, &[(undercover, common[1]), (common[1], undercover)]);
        game.winner()
    };
    for seed in 0..10 {
        assert!(finish(seed).is_some());
        assert_eq!(finish(seed), finish(seed));
    }
}
