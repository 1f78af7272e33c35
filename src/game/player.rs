use crate::error::GameError;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A game player.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Player {
    pub name: String,
    pub word: String,
    pub role: Role,
    pub eliminated: bool,
    pub points: u32,
}

/// Which of the two words a player was dealt.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Role {
    Common,
    Undercover,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Common => "common",
            Role::Undercover => "undercover",
        })
    }
}

/// A pair of related words: one for the majority, one for the undercover players.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct WordPair {
    pub common: String,
    pub undercover: String,
}

impl WordPair {
    pub fn new(common: impl Into<String>, undercover: impl Into<String>) -> Self {
        Self {
            common: common.into(),
            undercover: undercover.into(),
        }
    }
}

impl Player {
    /// Creates a player who has not been dealt a word yet.
    pub fn new(name: String) -> Self {
        Self {
            name,
            word: String::new(),
            role: Role::Common,
            eliminated: false,
            points: 0,
        }
    }

    pub fn is_undercover(&self) -> bool {
        self.role == Role::Undercover
    }

    pub fn alive(&self) -> bool {
        !self.eliminated
    }
}

/// Deals the words of `pair` to `players`, choosing `undercover_count` distinct players
/// uniformly at random to receive the undercover word.
///
/// Nothing is modified unless the configuration is valid. Calling this again on the same
/// roster overwrites the previous deal.
pub fn assign_words(
    players: &mut [Player],
    pair: &WordPair,
    undercover_count: usize,
    rng: &mut impl Rng,
) -> Result<(), GameError> {
    let common = pair.common.trim();
    let undercover = pair.undercover.trim();
    if common.is_empty() || undercover.is_empty() || common.eq_ignore_ascii_case(undercover) {
        return Err(GameError::InvalidConfiguration);
    }
    if undercover_count == 0 || undercover_count >= players.len() {
        return Err(GameError::InvalidConfiguration);
    }

    let mut chosen = vec![false; players.len()];
    for idx in index::sample(rng, players.len(), undercover_count) {
        chosen[idx] = true;
    }

    for (player, undercover_player) in players.iter_mut().zip(chosen) {
        if undercover_player {
            player.word = undercover.to_string();
            player.role = Role::Undercover;
        } else {
            player.word = common.to_string();
            player.role = Role::Common;
        }
    }
    Ok(())
}
