use minesweeper_common::{
    models::{CellState, CellView, GameStatus, GameView, Score},
    protocol::NewGameRequest,
};
use tracing::info;

use crate::{MinesweeperClient, Result};

/// High-level client that keeps the latest view of a single game.
pub struct MinesweeperGame {
    client: MinesweeperClient,
    view: Option<GameView>,
}

impl MinesweeperGame {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: MinesweeperClient::new(base_url)?,
            view: None,
        })
    }

    pub fn client(&self) -> &MinesweeperClient {
        &self.client
    }

    pub fn view(&self) -> Option<&GameView> {
        self.view.as_ref()
    }

    fn game_id(&self) -> Result<String> {
        self.view
            .as_ref()
            .map(|view| view.id.clone())
            .ok_or_else(|| "No game started".into())
    }

    fn update(&mut self, view: GameView) -> &GameView {
        if let Some(previous) = &self.view
            && previous.status != view.status
        {
            info!("Game {} is now {:?}", view.id, view.status);
        }
        self.view.insert(view)
    }

    pub async fn start(&mut self, request: &NewGameRequest) -> Result<&GameView> {
        let view = self.client.create_game(request).await?;
        info!(
            "Started game {}: {}x{} with {} mines",
            view.id, view.rows, view.columns, view.mine_count
        );
        Ok(self.view.insert(view))
    }

    pub async fn reveal(&mut self, x: i32, y: i32) -> Result<&GameView> {
        let view = self.client.reveal(&self.game_id()?, x, y).await?;
        Ok(self.update(view))
    }

    pub async fn flag(&mut self, x: i32, y: i32) -> Result<&GameView> {
        let view = self.client.toggle_mark(&self.game_id()?, x, y).await?;
        Ok(self.update(view))
    }

    pub async fn chord(&mut self, x: i32, y: i32) -> Result<&GameView> {
        let view = self.client.auto_expand(&self.game_id()?, x, y).await?;
        Ok(self.update(view))
    }

    pub async fn submit_score(&self, player_name: &str) -> Result<Score> {
        self.client.submit_score(&self.game_id()?, player_name).await
    }
}

pub fn glyph(cell: &CellView) -> char {
    match (cell.visible_state, cell.adjacent_mines) {
        (CellState::Hidden, _) => '·',
        (CellState::Flagged, _) => 'F',
        (CellState::ExplodedMine, _) => 'X',
        (CellState::RevealedMine, _) => '*',
        (CellState::Revealed, Some(n @ 1..=8)) => char::from(b'0' + n),
        (CellState::Revealed, _) => ' ',
    }
}

/// Draws the board with row numbers on the right and column numbers below.
pub fn render(view: &GameView) -> String {
    let mut out = format!(
        "{:?}  lives: {}  marks left: {}\n",
        view.status, view.lives_left, view.marks_left
    );

    for (x, row) in view.grid.iter().enumerate() {
        let cells: String = row.iter().map(|cell| format!("{:>2}", glyph(cell))).collect();
        out.push_str(&format!(" {}  {}\n", cells, x));
    }

    let ruler: String = (0..view.columns).map(|y| format!("{:>2}", y % 10)).collect();
    out.push_str(&format!(" {}\n", ruler));

    match view.status {
        GameStatus::Won => out.push_str("You won!\n"),
        GameStatus::Lost => out.push_str("Game over.\n"),
        GameStatus::Running => {}
    }
    out
}
