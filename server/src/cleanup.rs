use std::{sync::Arc, time::Duration};

use tokio::time;
use tracing::{debug, info};

use crate::store::GameStore;

pub async fn start_cleanup_task(store: Arc<dyn GameStore>, interval: Duration, inactive_timeout: Duration) {
    let mut interval = time::interval(interval.max(Duration::from_secs(1)));

    info!(
        "Started game cleanup task: checking every {}s, inactive timeout: {}s",
        interval.period().as_secs(),
        inactive_timeout.as_secs()
    );

    loop {
        interval.tick().await;
        cleanup_games(store.as_ref(), inactive_timeout);
    }
}

/// Evicts sessions idle for longer than `inactive_timeout`. Sessions that are
/// locked right now are in use and stay.
pub fn cleanup_games(store: &dyn GameStore, inactive_timeout: Duration) -> usize {
    let mut games_to_remove = Vec::new();

    for id in store.ids() {
        let Some(session) = store.get(&id) else {
            continue;
        };
        if let Ok(guard) = session.try_lock()
            && guard.idle_for() > inactive_timeout
        {
            games_to_remove.push(id);
        }
    }

    let removed_count = games_to_remove.len();
    for id in games_to_remove {
        store.remove(&id);
        debug!("Cleaned up game: {}", id);
    }

    if removed_count > 0 {
        info!("Cleaned up {} inactive games", removed_count);
    }
    removed_count
}
