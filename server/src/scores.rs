use dashmap::DashMap;
use minesweeper_common::models::{Difficulty, Score};
use tracing::info;

/// In-memory high score lists, one per difficulty.
pub struct ScoreBoard {
    scores: DashMap<Difficulty, Vec<Score>>,
    limit: usize,
}

impl ScoreBoard {
    pub fn new(limit: usize) -> Self {
        Self {
            scores: DashMap::new(),
            limit,
        }
    }

    pub fn record(&self, score: Score) {
        info!(
            "New {} score: {} in {}s",
            score.difficulty, score.player_name, score.time_seconds
        );
        let mut entry = self.scores.entry(score.difficulty).or_default();
        let position = entry.partition_point(|existing| {
            (existing.time_seconds, existing.played_at) <= (score.time_seconds, score.played_at)
        });
        entry.insert(position, score);
        entry.truncate(self.limit);
    }

    /// Fastest first; equal times keep the earlier game first.
    pub fn top(&self, difficulty: Difficulty) -> Vec<Score> {
        self.scores
            .get(&difficulty)
            .map(|scores| scores.iter().take(self.limit).cloned().collect())
            .unwrap_or_default()
    }
}
