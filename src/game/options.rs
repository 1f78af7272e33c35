use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// The fewest players a game can be started with.
pub const MIN_PLAYERS: usize = 3;

/// The most players that can join a single game.
pub const MAX_PLAYERS: usize = 20;

/// Options for customising a game of Undercover.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameOptions {
    /// How many players receive the undercover word.
    pub undercover_count: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self { undercover_count: 1 }
    }
}

impl GameOptions {
    /// Returns a `GameError` if these options cannot be used with the given number of players.
    pub fn validate(&self, num_players: usize) -> Result<(), GameError> {
        if self.undercover_count == 0 || self.undercover_count >= num_players {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(())
    }

    /// The largest undercover count that is valid for the given number of players.
    pub fn max_undercover(num_players: usize) -> usize {
        num_players.saturating_sub(1)
    }
}
