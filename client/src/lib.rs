//! Minesweeper Client Library
//!
//! A Rust client for the minesweeper REST server.
//!
//! ## Usage
//!
//! `MinesweeperGame` tracks one game and keeps the most recent board view:
//!
//! ```rust,no_run
//! use minesweeper_client::{Difficulty, MinesweeperGame, NewGameRequest, render};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut game = MinesweeperGame::new("http://localhost:8000")?;
//!     game.start(&NewGameRequest::preset(Difficulty::Easy)).await?;
//!
//!     let view = game.reveal(4, 4).await?;
//!     println!("{}", render(view));
//!     Ok(())
//! }
//! ```
//!
//! `MinesweeperClient` maps one call to one endpoint and holds no state.

mod client;
mod game;

pub use client::MinesweeperClient;
pub use game::{MinesweeperGame, glyph, render};

// Re-export common types for convenience
pub use minesweeper_common::{models::*, protocol::*};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
