use crate::game::{GameOptions, MAX_PLAYERS, MIN_PLAYERS};
use crate::time::iso8601;
use crate::words::WordSource;
use crate::{error::GameError, game::Game as GameInner, game::WordPair};
use dashmap::{mapref::entry::Entry, DashMap};
use rand::{Rng, RngCore};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::watch;

/// Manages all the game sessions running on the server.
pub struct SessionManager {
    sessions: DashMap<String, SessionHandle>,
    words: Arc<dyn WordSource>,
    archive: Archive,
}

/// Summaries of finished games, kept for the lifetime of the process.
type Archive = Arc<Mutex<Vec<GameSummary>>>;

/// A finished game, as listed by the status API.
#[derive(Clone, Serialize, Debug)]
pub struct GameSummary {
    pub game_id: String,
    pub players: Vec<String>,
    pub started: String,
    pub finished: String,
    pub outcome: Value,
}

/// A single game session.
pub struct Session {
    /// The game ID.
    id: String,
    /// The game itself.
    game: Game,
    /// Channel for publishing the game state to observers.
    state: watch::Sender<Value>,
    archive: Archive,
    /// Timestamp of the last time this session was interacted with.
    last_ts: Instant,
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[allow(clippy::large_enum_variant)]
enum Game {
    Lobby {
        options: GameOptions,
        players: Vec<String>,
    },
    Playing {
        /// The game itself.
        game: GameInner,
        /// Timestamp that the game was created.
        started_ts: SystemTime,
        /// Whether this game has been archived.
        archived: bool,
    },
    Over,
}

/// Locks a session. A panic while the lock was held leaves the game state intact,
/// since every game operation either fully applies or is rejected.
pub fn lock(session: &SessionHandle) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionManager {
    pub fn new(words: Arc<dyn WordSource>) -> Self {
        Self {
            sessions: DashMap::new(),
            words,
            archive: Default::default(),
        }
    }

    pub fn create_game(&self, options: GameOptions) -> SessionHandle {
        loop {
            let id = Self::random_id();
            let entry = self.sessions.entry(id);
            if let Entry::Occupied(_) = entry {
                continue;
            }
            let session = Session::new(entry.key().clone(), self.archive.clone(), options);
            let session = Arc::new(Mutex::new(session));
            entry.or_insert(session.clone());
            log::info!("Created game {}", lock(&session).id());
            break session;
        }
    }

    pub fn find_game(&self, game_id: &str) -> Result<SessionHandle, GameError> {
        self.sessions
            .get(game_id)
            .map(|session| session.clone())
            .ok_or(GameError::GameNotFound)
    }

    /// The source used to generate word pairs for new games.
    pub fn words(&self) -> &dyn WordSource {
        self.words.as_ref()
    }

    pub fn num_games(&self) -> usize {
        self.sessions.len()
    }

    /// Gets the summaries of every finished game.
    pub fn past_games(&self) -> Vec<GameSummary> {
        self.archive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Discards sessions that have been idle for longer than `ttl`.
    pub fn purge_games(&self, ttl: Duration) {
        let before = self.sessions.len();
        self.sessions.retain(|game_id, session| {
            let Ok(session) = session.lock() else {
                log::error!("Found poisoned session: {}", game_id);
                return false;
            };
            Instant::now().duration_since(session.last_ts) <= ttl
        });
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            log::info!("Purged {} idle games", purged);
        }
    }

    fn random_id() -> String {
        let mut rng = rand::thread_rng();
        (0..4).map(|_| rng.gen_range('A'..='Z')).collect()
    }
}

impl Session {
    fn new(id: String, archive: Archive, options: GameOptions) -> Self {
        let game = Game::Lobby {
            options,
            players: vec![],
        };
        let mut session = Self {
            id,
            game,
            state: watch::channel(Value::Null).0,
            archive,
            last_ts: Instant::now(),
        };
        session.notify();
        session
    }

    /// Gets the unique game ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a stream of updates carrying the full game state.
    pub fn subscribe(&mut self) -> watch::Receiver<Value> {
        let rx = self.state.subscribe();
        self.notify();
        rx
    }

    /// Adds a player to the lobby, returning their index.
    /// Once a game is under way, only returning players are recognised.
    pub fn add_player(&mut self, name: &str) -> Result<usize, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidConfiguration);
        }
        let players = match &mut self.game {
            Game::Lobby { players, .. } => players,
            Game::Playing { game, .. } => {
                return game
                    .find_player(name)
                    .map_err(|_| GameError::CannotJoinStartedGame)
            }
            Game::Over => return Err(GameError::GameNotFound),
        };
        if let Some(idx) = players.iter().position(|n| n == name) {
            return Ok(idx);
        }
        if players.len() == MAX_PLAYERS {
            return Err(GameError::TooManyPlayers);
        }
        players.push(name.to_string());
        let idx = players.len() - 1;
        self.notify();
        Ok(idx)
    }

    /// Removes a player from the lobby.
    pub fn remove_player(&mut self, name: &str) -> Result<(), GameError> {
        let Game::Lobby { players, .. } = &mut self.game else {
            return Err(self.game.not_in_lobby());
        };
        let idx = players
            .iter()
            .position(|n| n == name)
            .ok_or(GameError::PlayerNotFound)?;
        players.remove(idx);
        self.notify();
        Ok(())
    }

    /// Changes the options of the game about to be played.
    pub fn set_options(&mut self, new_options: GameOptions) -> Result<(), GameError> {
        let Game::Lobby { options, .. } = &mut self.game else {
            return Err(self.game.not_in_lobby());
        };
        if new_options.undercover_count == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        *options = new_options;
        self.notify();
        Ok(())
    }

    /// Checks that a new game could be started right now.
    pub fn check_can_start(&self) -> Result<(), GameError> {
        if !self.game.can_start() {
            return Err(GameError::InvalidAction);
        }
        let num_players = self.game.num_players();
        if num_players < MIN_PLAYERS {
            return Err(GameError::TooFewPlayers);
        }
        self.game.options().validate(num_players)
    }

    /// Starts a new game with the given word pair, replacing any finished game.
    pub fn start_game(&mut self, topic: &str, words: &WordPair) -> Result<(), GameError> {
        self.check_can_start()?;

        self.archive_game();
        let names = self.game.player_names();
        let options = self.game.options();
        let seed = rand::thread_rng().next_u64();
        let mut game = GameInner::new(options, &names, topic, words, seed)?;
        if let Game::Playing { game: previous, .. } = &self.game {
            game.carry_points_from(previous);
        }
        self.game = Game::Playing {
            game,
            started_ts: SystemTime::now(),
            archived: false,
        };
        log::info!("Game {} started with {} players", self.id, names.len());
        self.notify();

        Ok(())
    }

    /// Performs an action on the game.
    pub fn mutate_game<F, T>(&mut self, mutation: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameInner) -> Result<T, GameError>,
    {
        let Some(game) = self.game.game_mut() else {
            return Err(GameError::GameNotStarted);
        };

        let result = mutation(game)?;
        self.archive_game();
        self.notify();

        Ok(result)
    }

    /// Keeps the game session alive.
    pub fn heartbeat(&mut self) {
        self.last_ts = Instant::now();
    }

    /// Ends the game.
    pub fn end_game(&mut self) -> Result<(), GameError> {
        // Check the game is over.
        if !self.game.can_end() {
            return Err(GameError::InvalidAction);
        }

        self.archive_game();
        self.game = Game::Over;
        self.notify();

        Ok(())
    }

    /// Notifies all observers of the new game state.
    fn notify(&mut self) {
        let state = match &self.game {
            Game::Lobby { options, players } => {
                GameInner::get_lobby_json(players, options.undercover_count)
            }
            Game::Playing { game, .. } => game.get_state_json(),
            Game::Over => json!({ "phase": "ended" }),
        };
        self.state.send_replace(state);
        self.last_ts = Instant::now();
    }

    /// Records the game in the archive if it is over and hasn't been archived yet.
    fn archive_game(&mut self) {
        let Game::Playing { game, started_ts, archived } = &mut self.game else {
            return;
        };
        if !game.game_over() || *archived {
            return;
        }
        let summary = GameSummary {
            game_id: self.id.clone(),
            players: game.player_names().map(|s| s.to_string()).collect(),
            started: iso8601(*started_ts),
            finished: iso8601(SystemTime::now()),
            outcome: game.get_outcome_json(),
        };
        self.archive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary);
        *archived = true;
    }
}

impl Game {
    fn num_players(&self) -> usize {
        match self {
            Game::Lobby { players, .. } => players.len(),
            Game::Playing { game, .. } => game.num_players(),
            Game::Over => 0,
        }
    }

    fn player_names(&self) -> Vec<String> {
        match self {
            Game::Lobby { players, .. } => players.clone(),
            Game::Playing { game, .. } => game.player_names().map(|s| s.to_string()).collect(),
            Game::Over => vec![],
        }
    }

    fn options(&self) -> GameOptions {
        match self {
            Game::Lobby { options, .. } => *options,
            Game::Playing { game, .. } => *game.options(),
            Game::Over => GameOptions::default(),
        }
    }

    fn game_mut(&mut self) -> Option<&mut GameInner> {
        match self {
            Game::Lobby { .. } => None,
            Game::Playing { game, .. } => Some(game),
            Game::Over => None,
        }
    }

    fn can_start(&self) -> bool {
        match self {
            Game::Lobby { .. } => true,
            Game::Playing { game, .. } => game.game_over(),
            Game::Over => false,
        }
    }

    fn can_end(&self) -> bool {
        match self {
            Game::Lobby { .. } => false,
            Game::Playing { game, .. } => game.game_over(),
            Game::Over => false,
        }
    }

    /// The error for a lobby-only operation attempted elsewhere.
    fn not_in_lobby(&self) -> GameError {
        match self {
            Game::Lobby { .. } => GameError::InvalidAction,
            Game::Playing { .. } => GameError::CannotJoinStartedGame,
            Game::Over => GameError::GameNotFound,
        }
    }
}
