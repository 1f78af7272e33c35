use crate::{
    error::GameError,
    game::{Game as GameInner, GameOptions},
    session::{lock, SessionHandle, SessionManager},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::watch;

/// A single game client: the device that hosts and drives one session.
pub struct Client<'a> {
    manager: &'a SessionManager,
    session: Option<SessionHandle>,
    game_id: Option<String>,
    updates: Option<watch::Receiver<Value>>,
}

/// An action performed on a game in progress.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameAction {
    StartRound,
    GiveClue { player: usize, clue: Option<String> },
    SkipClue,
    CastVote { voter: usize, target: usize },
    CloseVoting,
    EndVoting,
    EndElimination,
}

impl<'a> Client<'a> {
    /// Creates a new game client.
    pub fn new(manager: &'a SessionManager) -> Self {
        Self {
            manager,
            session: None,
            game_id: None,
            updates: None,
        }
    }

    /// Creates a new game session and joins it, returning its ID.
    pub fn create_game(&mut self, options: GameOptions) -> Result<String, GameError> {
        let session = self.manager.create_game(options);
        let id = lock(&session).id().to_owned();
        self.join_game(&id)?;
        Ok(id)
    }

    /// Joins an existing game.
    pub fn join_game(&mut self, game_id: &str) -> Result<(), GameError> {
        let session = self.manager.find_game(game_id)?;
        self.game_id = Some(game_id.to_string());
        self.updates = Some(lock(&session).subscribe());
        self.session = Some(session);
        Ok(())
    }

    /// Waits until there is an update to the game state, then returns the latest state.
    pub async fn next_state(&mut self) -> Value {
        let Some(updates) = &mut self.updates else {
            return std::future::pending().await;
        };

        if updates.changed().await.is_err() {
            return std::future::pending().await;
        }
        let state = updates.borrow_and_update().clone();

        json!({
            "game_id": self.game_id,
            "state": state
        })
    }

    /// Leaves the game.
    pub fn leave(&mut self) {
        self.game_id = None;
        self.updates = None;
        self.session = None;
    }

    /// Adds a player to the lobby.
    pub fn add_player(&self, name: &str) -> Result<usize, GameError> {
        lock(self.session()?).add_player(name)
    }

    /// Removes a player from the lobby.
    pub fn remove_player(&self, name: &str) -> Result<(), GameError> {
        lock(self.session()?).remove_player(name)
    }

    /// Changes the game options.
    pub fn set_options(&self, options: GameOptions) -> Result<(), GameError> {
        lock(self.session()?).set_options(options)
    }

    /// Generates a word pair for the topic and deals a new game.
    /// The session is not locked while the words are being generated.
    pub async fn start_game(&self, topic: &str) -> Result<(), GameError> {
        let session = self.session()?;
        lock(session).check_can_start()?;
        let words = self.manager.words().generate_pair(topic).await?;
        lock(session).start_game(topic, &words)
    }

    /// Called when the host performs an action on the game.
    pub fn game_action(&self, action: GameAction) -> Result<(), GameError> {
        self.mutate_game(|game| match action {
            GameAction::StartRound => game.start(),
            GameAction::GiveClue { player, clue } => game.give_clue(player, clue),
            GameAction::SkipClue => game.skip_clue_giver().map(|_| ()),
            GameAction::CastVote { voter, target } => game.cast_vote(voter, target),
            GameAction::CloseVoting => game.close_voting(),
            GameAction::EndVoting => game.end_voting(),
            GameAction::EndElimination => game.end_elimination(),
        })
    }

    /// Keeps the game session alive.
    pub fn heartbeat(&self) {
        if let Ok(session) = self.session() {
            lock(session).heartbeat();
        }
    }

    /// Ends the game.
    pub fn end_game(&self) -> Result<(), GameError> {
        lock(self.session()?).end_game()
    }

    fn session(&self) -> Result<&SessionHandle, GameError> {
        self.session.as_ref().ok_or(GameError::GameNotFound)
    }

    /// Performs an action on the game.
    fn mutate_game<F>(&self, mutation: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut GameInner) -> Result<(), GameError>,
    {
        lock(self.session()?).mutate_game(mutation)
    }
}
