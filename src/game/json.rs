use super::{Game, GameOptions, GameState, VoteOutcome};
use serde_json::{json, Value};

impl Game {
    /// Gets the full state of the game, as shown to observers.
    pub fn get_state_json(&self) -> Value {
        let counts = self.vote_counts();
        json!({
            "phase": self.get_phase_name(),
            "players": self.get_players_json(counts.as_deref()),
            "interests": self.topic(),
            "commonWord": self.words().common,
            "undercoverWord": self.words().undercover,
            "undercoverCount": self.opts.undercover_count,
            "isGameStarted": self.is_started(),
            "currentRound": self.current_round(),
            "playersRemaining": self.num_players_alive(),
            "isVotingPhase": self.is_voting_phase(),
            "currentVoter": self.current_voter(),
            "votingComplete": self.voting_complete(),
            "activeCardPlayer": self.active_card_player(),
            "gameOver": self.game_over(),
            "winner": self.winner().map(|role| role.to_string()),
            "eliminatedPlayers": self.eliminated_players(),
            "clues": self.get_clues_json(),
            "lastOutcome": self.vote_history().last().map(|record| vote_outcome_json(&record.outcome)),
        })
    }

    /// Gets the state shown before a game has been started.
    pub fn get_lobby_json(players: &[String], undercover_count: usize) -> Value {
        json!({
            "phase": "lobby",
            "players": players
                .iter()
                .enumerate()
                .map(|(id, name)| json!({ "id": id, "name": name }))
                .collect::<Vec<_>>(),
            "undercoverCount": undercover_count,
            "maxUndercover": GameOptions::max_undercover(players.len()),
            "canStart": players.len() >= super::MIN_PLAYERS,
            "isGameStarted": false,
            "currentRound": 0,
            "gameOver": false,
        })
    }

    /// Gets a short summary of a finished game.
    pub fn get_outcome_json(&self) -> Value {
        json!({
            "winner": self.winner().map(|role| role.to_string()),
            "rounds": self.round,
            "commonWord": self.words.common,
            "undercoverWord": self.words.undercover,
            "winners": self
                .players
                .iter()
                .enumerate()
                .filter(|(idx, _)| self.player_has_won(*idx))
                .map(|(_, p)| p.name.clone())
                .collect::<Vec<_>>(),
        })
    }

    fn get_phase_name(&self) -> &'static str {
        match self.state {
            GameState::Setup => "setup",
            GameState::ClueGiving { .. } => "clueGiving",
            GameState::Voting { .. } => "voting",
            GameState::Elimination { .. } => "elimination",
            GameState::GameOver { .. } => "gameOver",
        }
    }

    fn get_players_json(&self, counts: Option<&[usize]>) -> Value {
        self.players
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                json!({
                    "id": idx,
                    "name": player.name,
                    "word": player.word,
                    "isUndercover": player.is_undercover(),
                    "isEliminated": player.eliminated,
                    "votes": counts.map(|c| c[idx]).unwrap_or(0),
                    "points": player.points,
                })
            })
            .collect()
    }

    fn get_clues_json(&self) -> Value {
        self.clues()
            .iter()
            .map(|clue| {
                json!({
                    "round": clue.round,
                    "player": clue.player,
                    "clue": clue.text,
                })
            })
            .collect()
    }
}

fn vote_outcome_json(outcome: &VoteOutcome) -> Value {
    match outcome {
        VoteOutcome::Eliminated(player) => json!({ "type": "eliminated", "player": player }),
        VoteOutcome::Tie(players) => json!({ "type": "tie", "players": players }),
    }
}
