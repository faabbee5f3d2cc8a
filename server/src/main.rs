use std::error::Error;

use minesweeper_server::{build_rocket, config::ServerConfig};
use tracing::info;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    info!("Starting Minesweeper server");

    let config = ServerConfig::from_env();
    info!(
        "Allowing origins {:?}, {} new games per minute per client, evicting games idle for {}s",
        config.cors_allowed_origins,
        config.games_per_minute,
        config.inactive_timeout.as_secs()
    );

    build_rocket(&config)?.launch().await?;
    Ok(())
}
