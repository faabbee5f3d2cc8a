use std::sync::Arc;

use minesweeper_common::{
    models::{Difficulty, GameView, Score},
    protocol::{CoordinateRequest, NewGameRequest},
};
use nanoid::nanoid;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::GameConfig,
    data::Coordinate,
    error::ServiceError,
    logic::{Game, GameStatus},
    scores::ScoreBoard,
    store::{GameStore, Session, SharedSession},
};

const INITIAL_ID_LENGTH: usize = 5;
const ATTEMPTS_PER_LENGTH: usize = 10;

impl From<CoordinateRequest> for Coordinate {
    fn from(value: CoordinateRequest) -> Self {
        Coordinate::new(value.x, value.y)
    }
}

/// Everything the HTTP layer can do with games and scores.
pub struct GameService {
    store: Arc<dyn GameStore>,
    scores: ScoreBoard,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, scores: ScoreBoard) -> Self {
        Self { store, scores }
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    /// Stores the session under a fresh short id, growing the id length
    /// when collisions keep happening.
    fn add_session(&self, mut session: Session) -> String {
        let mut id_length = INITIAL_ID_LENGTH;

        loop {
            for _ in 0..ATTEMPTS_PER_LENGTH {
                let id = nanoid!(id_length);
                match self.store.put(id.clone(), session) {
                    Ok(_) => return id,
                    Err(returned) => {
                        debug!("Game ID collision, trying another: {}", id);
                        session = returned;
                    }
                }
            }

            warn!(
                "Exhausted ID attempts at length {}, increasing to {}",
                id_length,
                id_length + 1
            );
            id_length += 1;
        }
    }

    #[instrument(level = "trace", skip(self), fields(difficulty = %request.difficulty))]
    pub fn create_game(&self, request: &NewGameRequest) -> Result<GameView, ServiceError> {
        let config = GameConfig::resolve(request)?;
        let game = Game::new(config.rows, config.columns, config.mines, config.lives)?;
        let view = game.view("");

        let id = self.add_session(Session::new(game, request.difficulty));
        info!(
            "Created game {}: {}x{} with {} mines and {} lives",
            id, config.rows, config.columns, config.mines, config.lives
        );

        Ok(GameView { id, ..view })
    }

    fn session(&self, id: &str) -> Result<SharedSession, ServiceError> {
        self.store.get(id).ok_or_else(|| {
            debug!("Lookup for unknown game {}", id);
            ServiceError::NotFound(id.to_string())
        })
    }

    pub async fn get(&self, id: &str) -> Result<GameView, ServiceError> {
        let session = self.session(id)?;
        let session = session.lock().await;
        Ok(session.game.view(id))
    }

    async fn act(
        &self,
        id: &str,
        coordinate: CoordinateRequest,
        action: impl FnOnce(&mut Game, Coordinate),
    ) -> Result<GameView, ServiceError> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.touch();
        action(&mut session.game, coordinate.into());
        Ok(session.game.view(id))
    }

    #[instrument(level = "trace", skip(self), fields(x = coordinate.x, y = coordinate.y))]
    pub async fn reveal(&self, id: &str, coordinate: CoordinateRequest) -> Result<GameView, ServiceError> {
        self.act(id, coordinate, Game::reveal).await
    }

    #[instrument(level = "trace", skip(self), fields(x = coordinate.x, y = coordinate.y))]
    pub async fn toggle_mark(&self, id: &str, coordinate: CoordinateRequest) -> Result<GameView, ServiceError> {
        self.act(id, coordinate, Game::toggle_mark).await
    }

    #[instrument(level = "trace", skip(self), fields(x = coordinate.x, y = coordinate.y))]
    pub async fn auto_expand(&self, id: &str, coordinate: CoordinateRequest) -> Result<GameView, ServiceError> {
        self.act(id, coordinate, Game::auto_expand).await
    }

    /// Records the time of a won game, once per game.
    #[instrument(level = "trace", skip(self))]
    pub async fn submit_score(&self, id: &str, player_name: &str) -> Result<Score, ServiceError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(ServiceError::InvalidPlayerName);
        }

        let session = self.session(id)?;
        let mut session = session.lock().await;

        if session.game.status() != GameStatus::Won {
            warn!("Score submitted for game {} which was not won", id);
            return Err(ServiceError::NotWon(id.to_string()));
        }
        if session.score_submitted {
            warn!("Duplicate score submission for game {}", id);
            return Err(ServiceError::AlreadySubmitted(id.to_string()));
        }
        let Some(duration) = session.game.duration() else {
            warn!("Cannot score game {} without timestamps", id);
            return Err(ServiceError::NotWon(id.to_string()));
        };

        let score = Score {
            player_name: player_name.to_string(),
            difficulty: session.difficulty,
            time_seconds: duration.whole_seconds(),
            played_at: session.game.finished_at().unwrap_or_else(OffsetDateTime::now_utc),
        };
        session.score_submitted = true;
        self.scores.record(score.clone());

        Ok(score)
    }

    pub fn top_scores(&self, difficulty: Difficulty) -> Vec<Score> {
        self.scores.top(difficulty)
    }
}
