use self::player::assign_words;
pub use self::options::{GameOptions, MAX_PLAYERS, MIN_PLAYERS};
pub use self::player::{Player, Role, WordPair};
use self::turns::TurnSequencer;
pub use self::votes::VoteOutcome;
use self::votes::VoteTally;
use crate::error::GameError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

mod json;
mod options;
mod player;
mod test;
mod turns;
mod votes;

/// Points awarded to every member of the winning side when a game ends.
pub const WIN_POINTS: u32 = 1;

/// A game of Undercover.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Game {
    opts: GameOptions,
    players: Vec<Player>,
    topic: String,
    words: WordPair,
    state: GameState,
    round: usize,
    /// Eliminated players, in the order they were voted out.
    eliminated: Vec<usize>,
    clues: Vec<Clue>,
    vote_history: Vec<VoteRecord>,
    rng: rand_chacha::ChaCha8Rng,
}

/// Represents the current phase in the game loop.
#[derive(Clone, Serialize, Deserialize, Debug)]
enum GameState {
    /// Words are dealt but play has not begun.
    Setup,
    ClueGiving {
        turns: TurnSequencer,
    },
    Voting {
        tally: VoteTally,
    },
    /// The vote has been resolved and the result is on display.
    Elimination {
        tally: VoteTally,
        outcome: VoteOutcome,
    },
    GameOver {
        winner: Role,
    },
}

/// A clue given (or skipped) during the clue-giving phase.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Clue {
    pub round: usize,
    pub player: usize,
    pub text: Option<String>,
}

/// The votes and outcome of a resolved voting phase.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    pub round: usize,
    pub votes: Vec<Option<usize>>,
    pub outcome: VoteOutcome,
}

impl Game {
    /// Creates a new game of Undercover and deals the words.
    /// The game stays in setup until [Game::start] is called.
    pub fn new(
        opts: GameOptions,
        player_names: &[String],
        topic: &str,
        words: &WordPair,
        seed: u64,
    ) -> Result<Self, GameError> {
        let num_players = player_names.len();
        if num_players < MIN_PLAYERS {
            return Err(GameError::TooFewPlayers);
        }
        if num_players > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers);
        }
        opts.validate(num_players)?;
        for (idx, name) in player_names.iter().enumerate() {
            if name.trim().is_empty() || player_names[..idx].contains(name) {
                return Err(GameError::InvalidConfiguration);
            }
        }

        let mut players = player_names
            .iter()
            .map(|name| Player::new(name.clone()))
            .collect::<Vec<_>>();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        assign_words(&mut players, words, opts.undercover_count, &mut rng)?;

        Ok(Game {
            opts,
            words: WordPair::new(words.common.trim(), words.undercover.trim()),
            players,
            topic: topic.to_string(),
            state: GameState::Setup,
            round: 0,
            eliminated: vec![],
            clues: vec![],
            vote_history: vec![],
            rng,
        })
    }

    /// Copies the points of returning players from a previous game, matching players by name.
    pub fn carry_points_from(&mut self, previous: &Game) {
        for player in self.players.iter_mut() {
            if let Some(old) = previous.players.iter().find(|p| p.name == player.name) {
                player.points = old.points;
            }
        }
    }

    /// Looks up a player by their display name.
    pub fn find_player(&self, name: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .ok_or(GameError::PlayerNotFound)
    }

    /// Begins the first round of clue-giving.
    pub fn start(&mut self) -> Result<(), GameError> {
        match self.state {
            GameState::Setup => {}
            GameState::GameOver { .. } => return Err(GameError::GameAlreadyOver),
            _ => return Err(GameError::InvalidAction),
        }
        self.round = 1;
        self.start_clue_giving();
        log::info!(
            "Game started with {} players, {} undercover",
            self.num_players(),
            self.opts.undercover_count
        );
        Ok(())
    }

    /// Gets the player names.
    pub fn player_names(&self) -> impl Iterator<Item = &'_ str> {
        self.players.iter().map(|p| &p.name[..])
    }

    /// Called when the active player has given their clue.
    pub fn give_clue(&mut self, player: usize, clue: Option<String>) -> Result<(), GameError> {
        self.check_in_progress()?;
        self.check_player_index(player)?;
        let GameState::ClueGiving { turns } = &mut self.state else {
            return Err(GameError::InvalidAction);
        };
        if turns.next_clue_giver(&self.players) != Some(player) {
            return Err(GameError::InvalidPlayer);
        }
        turns.record(player);
        let text = clue.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self.clues.push(Clue {
            round: self.round,
            player,
            text,
        });
        self.check_clues_given();
        Ok(())
    }

    /// Passes over the active clue-giver without a clue, returning who was skipped.
    pub fn skip_clue_giver(&mut self) -> Result<usize, GameError> {
        self.check_in_progress()?;
        let GameState::ClueGiving { turns } = &mut self.state else {
            return Err(GameError::InvalidAction);
        };
        let player = turns
            .next_clue_giver(&self.players)
            .ok_or(GameError::InvalidAction)?;
        turns.record(player);
        self.clues.push(Clue {
            round: self.round,
            player,
            text: None,
        });
        self.check_clues_given();
        Ok(player)
    }

    /// Called when a player casts their vote. A later vote from the same player replaces
    /// their earlier one.
    pub fn cast_vote(&mut self, voter: usize, target: usize) -> Result<(), GameError> {
        if voter == target {
            return Err(GameError::InvalidVote);
        }
        self.check_in_progress()?;
        let GameState::Voting { tally } = &mut self.state else {
            return Err(GameError::InvalidAction);
        };
        if tally.is_closed() {
            return Err(GameError::InvalidAction);
        }
        if !tally.is_eligible(voter) || !tally.is_eligible(target) {
            return Err(GameError::InvalidVote);
        }
        tally.vote(voter, target);
        Ok(())
    }

    /// Closes the vote early; players who have not voted abstain.
    pub fn close_voting(&mut self) -> Result<(), GameError> {
        self.check_in_progress()?;
        let GameState::Voting { tally } = &mut self.state else {
            return Err(GameError::InvalidAction);
        };
        tally.close();
        Ok(())
    }

    /// Resolves a completed vote, eliminating the player with the most votes.
    /// A tie eliminates nobody and is followed by a re-vote, unless only two players
    /// remain, in which case one of them is drawn at random.
    pub fn end_voting(&mut self) -> Result<(), GameError> {
        self.check_in_progress()?;
        let GameState::Voting { tally } = &self.state else {
            return Err(GameError::InvalidAction);
        };
        if !tally.is_complete() {
            return Err(GameError::InvalidAction);
        }

        let tally = tally.clone();
        let outcome = self.break_final_tie(tally.resolve());
        self.vote_history.push(VoteRecord {
            round: self.round,
            votes: tally.votes().to_vec(),
            outcome: outcome.clone(),
        });

        if let VoteOutcome::Eliminated(player) = outcome {
            self.eliminate(player);
            if let Some(winner) = self.check_winner() {
                self.end_game(winner);
                return Ok(());
            }
        } else {
            log::info!("Round {} vote was tied", self.round);
        }

        self.state = GameState::Elimination { tally, outcome };
        Ok(())
    }

    /// Moves on from the elimination result: a new round after an elimination,
    /// or a fresh vote in the same round after a tie.
    pub fn end_elimination(&mut self) -> Result<(), GameError> {
        self.check_in_progress()?;
        let GameState::Elimination { outcome, .. } = &self.state else {
            return Err(GameError::InvalidAction);
        };
        if matches!(outcome, VoteOutcome::Tie(_)) {
            self.start_voting();
        } else {
            self.round += 1;
            self.start_clue_giving();
        }
        Ok(())
    }

    /// Returns true once play has begun.
    pub fn is_started(&self) -> bool {
        !matches!(self.state, GameState::Setup)
    }

    /// Returns true if the game is over.
    pub fn game_over(&self) -> bool {
        matches!(self.state, GameState::GameOver { .. })
    }

    /// The side that won, once the game is over.
    pub fn winner(&self) -> Option<Role> {
        match self.state {
            GameState::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Returns whether a particular player has won.
    pub fn player_has_won(&self, player: usize) -> bool {
        self.players
            .get(player)
            .is_some_and(|p| Some(p.role) == self.winner())
    }

    /// The current round; 0 before the game starts.
    pub fn current_round(&self) -> usize {
        self.round
    }

    /// Whether a vote is in progress or its result is on display.
    pub fn is_voting_phase(&self) -> bool {
        matches!(
            self.state,
            GameState::Voting { .. } | GameState::Elimination { .. }
        )
    }

    /// Whether every eligible player has voted, or voting was closed.
    pub fn voting_complete(&self) -> bool {
        match &self.state {
            GameState::Voting { tally } => tally.is_complete(),
            GameState::Elimination { .. } => true,
            _ => false,
        }
    }

    /// The player being prompted to vote next.
    pub fn current_voter(&self) -> Option<usize> {
        match &self.state {
            GameState::Voting { tally } => tally.next_voter(),
            _ => None,
        }
    }

    /// The player whose turn it is to give a clue.
    pub fn active_card_player(&self) -> Option<usize> {
        match &self.state {
            GameState::ClueGiving { turns } => turns.next_clue_giver(&self.players),
            _ => None,
        }
    }

    /// The number of votes each player has received in the current voting phase.
    pub fn vote_counts(&self) -> Option<Vec<usize>> {
        match &self.state {
            GameState::Voting { tally } | GameState::Elimination { tally, .. } => {
                Some(tally.counts())
            }
            _ => None,
        }
    }

    /// Gets the players in roster order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Gets the eliminated players, in elimination order.
    pub fn eliminated_players(&self) -> &[usize] {
        &self.eliminated
    }

    /// Gets every clue given so far.
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// Gets every resolved vote so far.
    pub fn vote_history(&self) -> &[VoteRecord] {
        &self.vote_history
    }

    pub fn options(&self) -> &GameOptions {
        &self.opts
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn words(&self) -> &WordPair {
        &self.words
    }

    /// Gets the number of players in the game.
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Gets the number of players in the game that have not been eliminated.
    pub fn num_players_alive(&self) -> usize {
        self.players.iter().filter(|p| p.alive()).count()
    }

    fn start_clue_giving(&mut self) {
        self.state = GameState::ClueGiving {
            turns: TurnSequencer::new(self.num_players()),
        };
    }

    fn start_voting(&mut self) {
        let eligible = self.players.iter().map(|p| p.alive()).collect();
        self.state = GameState::Voting {
            tally: VoteTally::new(eligible),
        };
    }

    /// Moves on to voting once every remaining player has given a clue.
    fn check_clues_given(&mut self) {
        if let GameState::ClueGiving { turns } = &self.state {
            if turns.next_clue_giver(&self.players).is_none() {
                self.start_voting();
            }
        }
    }

    fn eliminate(&mut self, player: usize) {
        self.players[player].eliminated = true;
        self.eliminated.push(player);
        log::info!(
            "Player {} was eliminated in round {}",
            self.players[player].name,
            self.round
        );
    }

    /// Returns the winning side if everyone left in the game shares the same role.
    fn check_winner(&self) -> Option<Role> {
        let mut alive = self.players.iter().filter(|p| p.alive());
        let role = alive.next()?.role;
        alive.all(|p| p.role == role).then_some(role)
    }

    /// With two players left, each can only vote for the other, so a tie would repeat
    /// forever. Draws the eliminated player from the tied ones instead.
    fn break_final_tie(&mut self, outcome: VoteOutcome) -> VoteOutcome {
        if self.num_players_alive() == 2 {
            if let VoteOutcome::Tie(tied) = &outcome {
                if let Some(&player) = tied.choose(&mut self.rng) {
                    log::info!("Round {} tie broken by draw, player {} is out", self.round, player);
                    return VoteOutcome::Eliminated(player);
                }
            }
        }
        outcome
    }

    fn end_game(&mut self, winner: Role) {
        for player in self.players.iter_mut().filter(|p| p.role == winner) {
            player.points += WIN_POINTS;
        }
        self.state = GameState::GameOver { winner };
        log::info!("Game over after {} rounds, {} players win", self.round, winner);
    }

    /// Fails unless the game has started and is not yet over.
    fn check_in_progress(&self) -> Result<(), GameError> {
        match self.state {
            GameState::Setup => Err(GameError::GameNotStarted),
            GameState::GameOver { .. } => Err(GameError::GameAlreadyOver),
            _ => Ok(()),
        }
    }

    /// Returns `Ok` if the given player index is valid, and an `Err` otherwise.
    fn check_player_index(&self, player: usize) -> Result<(), GameError> {
        if player < self.num_players() {
            Ok(())
        } else {
            Err(GameError::InvalidPlayer)
        }
    }
}
