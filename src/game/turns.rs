use super::player::Player;
use serde::{Deserialize, Serialize};

/// Tracks which players have given their clue during the current round.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct TurnSequencer {
    given: Vec<bool>,
}

impl TurnSequencer {
    /// Creates a new `TurnSequencer` for a round, where no player has given a clue yet.
    pub fn new(num_players: usize) -> Self {
        Self {
            given: vec![false; num_players],
        }
    }

    /// Returns the next player in roster order who is still in the game
    /// and has not given a clue this round, or `None` once every such player has had a turn.
    pub fn next_clue_giver(&self, players: &[Player]) -> Option<usize> {
        players
            .iter()
            .zip(&self.given)
            .position(|(player, given)| player.alive() && !*given)
    }

    /// Marks the player's turn as taken.
    pub fn record(&mut self, player_idx: usize) {
        self.given[player_idx] = true;
    }
}
