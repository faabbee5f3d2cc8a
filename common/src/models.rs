use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// What the player can see of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
    /// A mine the player set off.
    ExplodedMine,
    /// A mine uncovered by the server once the game was lost.
    RevealedMine,
}

/// A cell as serialized to clients. `x` is the row and `y` the column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub visible_state: CellState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacent_mines: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: String,
    pub status: GameStatus,
    pub lives_left: u8,
    pub rows: usize,
    pub columns: usize,
    pub mine_count: usize,
    pub marks_left: i32,
    pub grid: Vec<Vec<CellView>>,
}

impl GameView {
    pub fn cell(&self, x: i32, y: i32) -> Option<&CellView> {
        let row = usize::try_from(x).ok()?;
        let column = usize::try_from(y).ok()?;
        self.grid.get(row)?.get(column)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| cell.visible_state == state)
            .count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Custom];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

/// A finished, won game on the high score list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub time_seconds: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub played_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("EASY".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(
            "nightmare".parse::<Difficulty>().unwrap_err().to_string(),
            "unknown difficulty: nightmare"
        );
    }

    #[test]
    fn adjacent_mines_only_serialized_when_present() {
        let hidden = CellView {
            x: 0,
            y: 1,
            visible_state: CellState::Hidden,
            adjacent_mines: None,
        };
        let json = serde_json::to_value(&hidden).unwrap();
        assert_eq!(json["visibleState"], "HIDDEN");
        assert!(json.get("adjacentMines").is_none());

        let revealed = CellView {
            adjacent_mines: Some(3),
            visible_state: CellState::Revealed,
            ..hidden
        };
        let json = serde_json::to_value(&revealed).unwrap();
        assert_eq!(json["adjacentMines"], 3);
    }

    #[test]
    fn exploded_mine_uses_screaming_case() {
        let json = serde_json::to_string(&CellState::ExplodedMine).unwrap();
        assert_eq!(json, "\"EXPLODED_MINE\"");
    }
}
