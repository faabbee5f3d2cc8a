use minesweeper_common::{
    models::{Difficulty, GameView, Score},
    protocol::{CoordinateRequest, NewGameRequest, PingResponse, SubmitScoreRequest},
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Result;

/// HTTP client for the minesweeper server API
pub struct MinesweeperClient {
    client: Client,
    base_url: Url,
}

impl MinesweeperClient {
    /// Create a new client connecting to the specified server URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(format!("Not a usable server URL: {}", base_url).into());
        }
        let client = Client::new();

        Ok(Self { client, base_url })
    }

    /// Build the URL of an API endpoint, `/api` followed by `segments`
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| "Server URL cannot hold a path")?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to {}: {}", action, status).into());
        }
        Ok(response.json().await?)
    }

    pub async fn ping(&self) -> Result<PingResponse> {
        let response = self.client.get(self.endpoint(&["ping"])?).send().await?;
        Self::read(response, "ping server").await
    }

    /// Start a new game and return its initial view
    pub async fn create_game(&self, request: &NewGameRequest) -> Result<GameView> {
        let response = self.client.post(self.endpoint(&[])?).json(request).send().await?;
        let view: GameView = Self::read(response, "create game").await?;
        debug!("Created game {}", view.id);
        Ok(view)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<GameView> {
        let response = self.client.get(self.endpoint(&[game_id])?).send().await?;
        Self::read(response, "fetch game").await
    }

    async fn act(&self, game_id: &str, action: &str, x: i32, y: i32) -> Result<GameView> {
        let response = self
            .client
            .post(self.endpoint(&[game_id, action])?)
            .json(&CoordinateRequest { x, y })
            .send()
            .await?;
        Self::read(response, action).await
    }

    pub async fn reveal(&self, game_id: &str, x: i32, y: i32) -> Result<GameView> {
        self.act(game_id, "reveal", x, y).await
    }

    /// Flag a hidden cell or clear an existing flag
    pub async fn toggle_mark(&self, game_id: &str, x: i32, y: i32) -> Result<GameView> {
        self.act(game_id, "toggle-mark", x, y).await
    }

    /// Reveal the neighbours of a numbered cell once enough of them are flagged
    pub async fn auto_expand(&self, game_id: &str, x: i32, y: i32) -> Result<GameView> {
        self.act(game_id, "auto-expand", x, y).await
    }

    pub async fn submit_score(&self, game_id: &str, player_name: &str) -> Result<Score> {
        let request = SubmitScoreRequest {
            player_name: player_name.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&[game_id, "score"])?)
            .json(&request)
            .send()
            .await?;
        Self::read(response, "submit score").await
    }

    pub async fn top_scores(&self, difficulty: Difficulty) -> Result<Vec<Score>> {
        let response = self
            .client
            .get(self.endpoint(&["scores", difficulty.as_str()])?)
            .send()
            .await?;
        Self::read(response, "fetch scores").await
    }
}
