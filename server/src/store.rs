use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::{DashMap, Entry};
use minesweeper_common::models::Difficulty;
use tokio::sync::Mutex;

use crate::logic::Game;

/// A game as kept by the registry, with what the server needs around it.
#[derive(Debug)]
pub struct Session {
    pub game: Game,
    pub difficulty: Difficulty,
    pub score_submitted: bool,
    last_activity: Instant,
}

impl Session {
    pub fn new(game: Game, difficulty: Difficulty) -> Self {
        Self {
            game,
            difficulty,
            score_submitted: false,
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

/// Each session sits behind its own lock so actions on one id are
/// serialized without blocking other ids.
pub type SharedSession = Arc<Mutex<Session>>;

pub trait GameStore: Send + Sync {
    fn get(&self, id: &str) -> Option<SharedSession>;

    /// Stores `session` under `id` unless the id is taken, in which case the
    /// session is handed back.
    fn put(&self, id: String, session: Session) -> Result<SharedSession, Session>;

    fn remove(&self, id: &str) -> Option<SharedSession>;

    fn ids(&self) -> Vec<String>;

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct MemoryStore {
    sessions: DashMap<String, SharedSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    fn put(&self, id: String, session: Session) -> Result<SharedSession, Session> {
        match self.sessions.entry(id) {
            Entry::Occupied(_) => Err(session),
            Entry::Vacant(entry) => {
                let shared = Arc::new(Mutex::new(session));
                entry.insert(shared.clone());
                Ok(shared)
            }
        }
    }

    fn remove(&self, id: &str) -> Option<SharedSession> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
