use std::{env, str::FromStr, time::Duration};

use minesweeper_common::{
    models::Difficulty,
    protocol::{CustomConfig, NewGameRequest},
};
use tracing::warn;

use crate::error::{SAFE_ZONE_CELLS, ServiceError};

pub const CUSTOM_MIN_DIMENSION: usize = 5;
pub const CUSTOM_MAX_DIMENSION: usize = 30;
pub const CUSTOM_MAX_LIVES: u8 = 3;

/// Runtime knobs, read from the environment with defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub cors_allowed_origins: Vec<String>,
    pub games_per_minute: u32,
    pub cleanup_interval: Duration,
    pub inactive_timeout: Duration,
    pub high_score_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:4200".to_string()],
            games_per_minute: 10,
            cleanup_interval: Duration::from_secs(60),
            inactive_timeout: Duration::from_secs(3600),
            high_score_limit: 10,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, env::var(key).ok(), default)
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, value);
            default
        }),
        None => default,
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_allowed_origins);

        Self {
            cors_allowed_origins,
            games_per_minute: env_or("RATE_LIMIT_GAMES_PER_MINUTE", defaults.games_per_minute),
            cleanup_interval: Duration::from_secs(env_or(
                "CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval.as_secs(),
            )),
            inactive_timeout: Duration::from_secs(env_or(
                "INACTIVE_GAME_TIMEOUT_SECONDS",
                defaults.inactive_timeout.as_secs(),
            )),
            high_score_limit: env_or("HIGH_SCORE_LIMIT", defaults.high_score_limit),
        }
    }
}

/// Board parameters a new game is created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub mines: usize,
    pub lives: u8,
}

impl GameConfig {
    pub const EASY: Self = Self::new(9, 9, 10, 1);
    pub const MEDIUM: Self = Self::new(16, 16, 40, 1);
    pub const HARD: Self = Self::new(16, 30, 99, 0);

    pub const fn new(rows: usize, columns: usize, mines: usize, lives: u8) -> Self {
        Self {
            rows,
            columns,
            mines,
            lives,
        }
    }

    pub fn resolve(request: &NewGameRequest) -> Result<Self, ServiceError> {
        match request.difficulty {
            Difficulty::Easy => Ok(Self::EASY),
            Difficulty::Medium => Ok(Self::MEDIUM),
            Difficulty::Hard => Ok(Self::HARD),
            Difficulty::Custom => request
                .custom_config
                .map(Self::custom)
                .ok_or(ServiceError::MissingCustomConfig),
        }
    }

    /// Clamps user supplied parameters into the supported ranges.
    pub fn custom(config: CustomConfig) -> Self {
        let rows = config.rows.clamp(CUSTOM_MIN_DIMENSION, CUSTOM_MAX_DIMENSION);
        let columns = config.columns.clamp(CUSTOM_MIN_DIMENSION, CUSTOM_MAX_DIMENSION);
        let mines = config.custom_mines.clamp(1, rows * columns - SAFE_ZONE_CELLS);
        let lives = config.custom_lives.min(CUSTOM_MAX_LIVES);
        Self::new(rows, columns, mines, lives)
    }
}
