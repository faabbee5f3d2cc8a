//! Plays a game from the terminal against a running server.
//!
//! Commands: `r x y` reveal, `f x y` flag, `c x y` auto-expand, `q` quit.

use std::io::{self, BufRead, Write};

use minesweeper_client::{Difficulty, GameStatus, MinesweeperGame, NewGameRequest, render};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "http://localhost:8000".to_string());
    let difficulty: Difficulty = args.next().as_deref().unwrap_or("EASY").parse()?;

    let mut game = MinesweeperGame::new(&server)?;
    println!("{}", render(game.start(&NewGameRequest::preset(difficulty)).await?));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (command, x, y) = match parts.as_slice() {
            ["q"] => break,
            [command, x, y] => match (x.parse::<i32>(), y.parse::<i32>()) {
                (Ok(x), Ok(y)) => (*command, x, y),
                _ => {
                    println!("Coordinates must be numbers");
                    continue;
                }
            },
            _ => {
                println!("Usage: r|f|c <row> <column>, or q");
                continue;
            }
        };

        let view = match command {
            "r" => game.reveal(x, y).await?,
            "f" => game.flag(x, y).await?,
            "c" => game.chord(x, y).await?,
            other => {
                println!("Unknown command {}", other);
                continue;
            }
        };
        println!("{}", render(view));
        let status = view.status;

        if status == GameStatus::Won {
            print!("Name for the high score list: ");
            io::stdout().flush()?;
            let mut name = String::new();
            stdin.lock().read_line(&mut name)?;
            let score = game.submit_score(&name).await?;
            println!("Recorded {}s for {}", score.time_seconds, score.player_name);
            break;
        }
        if status == GameStatus::Lost {
            break;
        }
    }

    Ok(())
}
