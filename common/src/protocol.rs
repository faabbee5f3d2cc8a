use serde::{Deserialize, Serialize};

use crate::models::Difficulty;

/// Board parameters for [`Difficulty::Custom`]. The server clamps every
/// field into its supported range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomConfig {
    pub rows: usize,
    pub columns: usize,
    pub custom_mines: usize,
    pub custom_lives: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<CustomConfig>,
}

impl NewGameRequest {
    pub fn preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            custom_config: None,
        }
    }

    pub fn custom(config: CustomConfig) -> Self {
        Self {
            difficulty: Difficulty::Custom,
            custom_config: Some(config),
        }
    }
}

/// Target of a player action. `x` is the row and `y` the column; values
/// outside the board are accepted and ignored by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateRequest {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub player_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}
