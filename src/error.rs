use thiserror::Error;

/// The result of attempting to perform an invalid operation on a [Game] or [Session].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid game configuration")]
    InvalidConfiguration,
    #[error("invalid vote")]
    InvalidVote,
    #[error("the game has not started yet")]
    GameNotStarted,
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("could not generate a word pair")]
    GenerationFailed,
    #[error("this action cannot be performed during this phase of the game")]
    InvalidAction,
    #[error("this player cannot perform this action")]
    InvalidPlayer,
    #[error("no player exists with the given name")]
    PlayerNotFound,
    #[error("game does not exist")]
    GameNotFound,
    #[error("too few players in the game")]
    TooFewPlayers,
    #[error("too many players in the game")]
    TooManyPlayers,
    #[error("cannot join a game in progress")]
    CannotJoinStartedGame,
}
