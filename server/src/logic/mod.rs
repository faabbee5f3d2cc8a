mod board;
mod game;

pub use board::{Board, ChordOutcome};
pub use game::{Game, GameStatus};

use minesweeper_common::models::{self, CellState, CellView, GameView};

use crate::data::{Coordinate, VisibleState};

impl From<VisibleState> for CellState {
    fn from(value: VisibleState) -> Self {
        match value {
            VisibleState::Hidden => Self::Hidden,
            VisibleState::Flagged => Self::Flagged,
            VisibleState::Revealed => Self::Revealed,
            VisibleState::ExplodedMine => Self::ExplodedMine,
            VisibleState::RevealedMine => Self::RevealedMine,
        }
    }
}

impl From<GameStatus> for models::GameStatus {
    fn from(value: GameStatus) -> Self {
        match value {
            GameStatus::Running => Self::Running,
            GameStatus::Won => Self::Won,
            GameStatus::Lost => Self::Lost,
        }
    }
}

impl Game {
    /// The read-only projection sent to clients. Mine locations stay hidden
    /// unless the cell shows one.
    pub fn view(&self, id: &str) -> GameView {
        let board = self.board();
        let grid = (0..board.rows())
            .map(|row| {
                (0..board.columns())
                    .filter_map(|column| {
                        let coordinate = Coordinate::new(row as i32, column as i32);
                        let cell = board.cell(coordinate)?;
                        Some(CellView {
                            x: coordinate.row,
                            y: coordinate.column,
                            visible_state: cell.state().into(),
                            adjacent_mines: cell.adjacent_mines(),
                        })
                    })
                    .collect()
            })
            .collect();

        GameView {
            id: id.to_string(),
            status: self.status().into(),
            lives_left: self.lives_left(),
            rows: board.rows(),
            columns: board.columns(),
            mine_count: board.mine_count(),
            marks_left: board.marks_left(),
            grid,
        }
    }
}
