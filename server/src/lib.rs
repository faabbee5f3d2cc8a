//! Minesweeper game server: the board engine, an in-memory game registry and
//! the Rocket routes that expose them.

pub mod cleanup;
pub mod config;
pub mod cors;
pub mod data;
pub mod error;
pub mod logic;
pub mod rate_limit;
pub mod routes;
pub mod scores;
pub mod service;
pub mod store;

use std::{sync::Arc, time::Duration};

use rocket::{
    Build, Rocket,
    fairing::{Fairing, Info, Kind},
    routes,
};
use tracing::{info, warn};

use crate::{
    cleanup::start_cleanup_task,
    config::ServerConfig,
    cors::create_cors,
    rate_limit::RateLimiter,
    scores::ScoreBoard,
    service::GameService,
    store::MemoryStore,
};

struct CleanupFairing {
    interval: Duration,
    inactive_timeout: Duration,
}

#[rocket::async_trait]
impl Fairing for CleanupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Cleanup Task",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        if let Some(service) = rocket.state::<GameService>() {
            info!("Starting cleanup task for game management");
            let store = service.store().clone();
            let (interval, inactive_timeout) = (self.interval, self.inactive_timeout);
            tokio::spawn(async move {
                start_cleanup_task(store, interval, inactive_timeout).await;
            });
        } else {
            warn!("Failed to get game service state for cleanup task");
        }
        Ok(rocket)
    }
}

pub fn build_rocket(config: &ServerConfig) -> Result<Rocket<Build>, rocket_cors::Error> {
    let service = GameService::new(
        Arc::new(MemoryStore::new()),
        ScoreBoard::new(config.high_score_limit),
    );
    let rate_limiter = RateLimiter::per_minute(config.games_per_minute);

    let rocket = rocket::build()
        .attach(create_cors(&config.cors_allowed_origins)?)
        .attach(CleanupFairing {
            interval: config.cleanup_interval,
            inactive_timeout: config.inactive_timeout,
        })
        .manage(service)
        .manage(rate_limiter)
        .mount(
            "/",
            routes![
                routes::ping,
                routes::create_game,
                routes::get_game,
                routes::reveal,
                routes::toggle_mark,
                routes::auto_expand,
                routes::submit_score,
                routes::top_scores,
            ],
        );

    Ok(rocket)
}
