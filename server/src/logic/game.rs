use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::{
    data::{Coordinate, PassiveReveal, VisibleState},
    error::{GameError, Result, SAFE_ZONE_CELLS},
    logic::board::{Board, ChordOutcome},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

/// One game: the board plus status, lives and timing. Every player action
/// is a no-op once the game is over or when it targets a cell off the board.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    status: GameStatus,
    lives_left: u8,
    started_at: Option<OffsetDateTime>,
    finished_at: Option<OffsetDateTime>,
    first_move: bool,
}

impl Game {
    /// A fresh game whose mines are planted on the first reveal. The mine
    /// count must leave room for the 3x3 opening.
    pub fn new(rows: usize, columns: usize, mine_count: usize, lives: u8) -> Result<Self> {
        let board = Board::new(rows, columns, mine_count)?;
        let max = (rows * columns).saturating_sub(SAFE_ZONE_CELLS);
        if mine_count > max {
            return Err(GameError::TooManyMines {
                mines: mine_count,
                max,
            });
        }
        Ok(Self::from_board(board, lives))
    }

    /// Wraps an existing board. A board that already holds its mines is
    /// played as is.
    pub fn from_board(board: Board, lives: u8) -> Self {
        Self {
            board,
            status: GameStatus::Running,
            lives_left: lives,
            started_at: None,
            finished_at: None,
            first_move: true,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn lives_left(&self) -> u8 {
        self.lives_left
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<OffsetDateTime> {
        self.finished_at
    }

    /// Time between the first reveal and the end of the game.
    pub fn duration(&self) -> Option<time::Duration> {
        Some(self.finished_at? - self.started_at?)
    }

    fn accepts(&self, action: &str, coordinate: Coordinate) -> bool {
        if self.status != GameStatus::Running {
            debug!("{} at {} ignored, game is {:?}", action, coordinate, self.status);
            return false;
        }
        if self.board.is_out_of_bounds(coordinate) {
            warn!("{} ignored for out-of-bounds coordinate {}", action, coordinate);
            return false;
        }
        true
    }

    pub fn reveal(&mut self, coordinate: Coordinate) {
        if !self.accepts("Reveal", coordinate) {
            return;
        }
        if self.board.state_of(coordinate) != Some(VisibleState::Hidden) {
            return;
        }

        if self.first_move {
            if !self.board.is_planted()
                && let Err(error) = self.board.plant_mines(coordinate, &mut rand::rng())
            {
                warn!("Could not plant mines around {}: {}", coordinate, error);
                return;
            }
            self.started_at = Some(OffsetDateTime::now_utc());
            self.first_move = false;
        }

        if self.board.has_mine(coordinate) {
            self.board.explode(coordinate);
            self.handle_mine_hit(1, coordinate);
        } else {
            self.board.reveal_flood_fill(coordinate);
            self.check_win();
        }
    }

    pub fn toggle_mark(&mut self, coordinate: Coordinate) {
        if !self.accepts("Toggle mark", coordinate) {
            return;
        }

        match self.board.state_of(coordinate) {
            Some(VisibleState::Hidden | VisibleState::Flagged) => {
                self.board.toggle_flag(coordinate);
            }
            state => debug!("Cannot mark {} in state {:?}", coordinate, state),
        }
    }

    pub fn auto_expand(&mut self, coordinate: Coordinate) {
        if !self.accepts("Auto-expand", coordinate) {
            return;
        }

        match self.board.chord(coordinate) {
            ChordOutcome::Rejected => {}
            ChordOutcome::Expanded { mines_hit: 0 } => self.check_win(),
            ChordOutcome::Expanded { mines_hit } => {
                self.handle_mine_hit(mines_hit, coordinate);
                if self.status == GameStatus::Running {
                    self.check_win();
                }
            }
        }
    }

    fn check_win(&mut self) {
        if self.board.won() {
            self.finish(GameStatus::Won);
            info!("Game won, all safe cells revealed");
        }
    }

    /// A hit is survived only while a shield is up and it covers every mine
    /// set off at once. Surviving spends all remaining lives.
    fn handle_mine_hit(&mut self, mines_hit: usize, at: Coordinate) {
        info!(
            "Mine hit at {} (mines_hit={}, lives_left={})",
            at, mines_hit, self.lives_left
        );

        if self.lives_left == 0 || mines_hit > usize::from(self.lives_left) {
            self.finish(GameStatus::Lost);
            info!("Game lost at {}", at);
            return;
        }

        self.lives_left = 0;
        self.board.consume_mark();
        info!("Extra life used, game continues");
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.finished_at = Some(OffsetDateTime::now_utc());

        let policy = match status {
            GameStatus::Won => PassiveReveal::Flag,
            GameStatus::Lost => PassiveReveal::ShowMine,
            GameStatus::Running => return,
        };
        self.board.reveal_remaining(policy);
    }
}
