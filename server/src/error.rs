use thiserror::Error;

use crate::data::Coordinate;

pub const MAX_DIMENSION: usize = 30;

/// Size of the guaranteed mine-free opening around the first click.
pub const SAFE_ZONE_CELLS: usize = 9;

/// Rejected board or game construction. Player actions never fail, they are
/// ignored instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("board dimensions must be between 1 and {MAX_DIMENSION}, got {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize },
    #[error("{mines} mines do not fit, at most {max} are allowed")]
    TooManyMines { mines: usize, max: usize },
    #[error("mine location {0} is outside the board")]
    MineOutOfBounds(Coordinate),
    #[error("mines have already been planted")]
    AlreadyPlanted,
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Failures surfaced by the service layer to the HTTP routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("game {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("CUSTOM difficulty requires a customConfig")]
    MissingCustomConfig,
    #[error("game {0} has not been won")]
    NotWon(String),
    #[error("a score was already submitted for game {0}")]
    AlreadySubmitted(String),
    #[error("player name must not be blank")]
    InvalidPlayerName,
}
