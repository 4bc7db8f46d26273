//! In-process game store.

use super::{DbError, GameId, GameRecord, GameStore, StoreError};
use crate::games::tictactoe::{GameState, MoveError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct Games {
    last_id: i64,
    records: HashMap<GameId, GameRecord>,
}

/// Keeps games in a shared map guarded by a single mutex.
///
/// Cloning the store shares the same games.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<Mutex<Games>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    /// Number of stored games.
    #[instrument(skip(self))]
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.records.len())
    }

    /// Checks whether the store holds no games.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Games>, StoreError> {
        self.games.lock().map_err(|_| {
            warn!("Game map lock poisoned");
            StoreError::Database(DbError::new("in-memory game store lock poisoned"))
        })
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    fn create(&self) -> Result<GameRecord, StoreError> {
        let mut games = self.lock()?;
        games.last_id += 1;
        let id = GameId::from(games.last_id);
        let record = GameRecord::new(id, chrono::Utc::now().naive_utc(), GameState::new());
        games.records.insert(id, record.clone());
        info!(game_id = %id, "Game created");
        Ok(record)
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<GameRecord, StoreError> {
        let games = self.lock()?;
        games.records.get(&id).cloned().ok_or_else(|| {
            debug!(game_id = %id, "Game not found");
            StoreError::NotFound(id)
        })
    }

    #[instrument(skip(self, state))]
    fn save(&self, id: GameId, state: &GameState) -> Result<(), StoreError> {
        let mut games = self.lock()?;
        let record = games
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        *record = GameRecord::new(id, *record.created_at(), *state);
        debug!(game_id = %id, "Game saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, id: GameId) -> Result<(), StoreError> {
        let mut games = self.lock()?;
        games
            .records
            .remove(&id)
            .map(|_| info!(game_id = %id, "Game deleted"))
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self, transition))]
    fn update(
        &self,
        id: GameId,
        transition: &mut dyn FnMut(&GameState) -> Result<GameState, MoveError>,
    ) -> Result<GameRecord, StoreError> {
        // The guard is held across load, transition and save.
        let mut games = self.lock()?;
        let record = games
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        let next = transition(record.state())?;
        *record = GameRecord::new(id, *record.created_at(), next);
        debug!(game_id = %id, status = ?next.status(), "Game updated");
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_from_one() {
        let store = MemoryStore::new();
        let first = store.create().unwrap();
        let second = store.create().unwrap();
        assert_eq!(first.id().get(), 1);
        assert_eq!(second.id().get(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.create().unwrap();
        store.delete(*first.id()).unwrap();
        let second = store.create().unwrap();
        assert_eq!(second.id().get(), 2);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_clones_share_games() {
        let store = MemoryStore::new();
        let clone = store.clone();
        let record = store.create().unwrap();
        assert_eq!(clone.load(*record.id()).unwrap(), record);
    }

    #[test]
    fn test_concurrent_moves_on_one_game_serialize() {
        let store = MemoryStore::new();
        let id = *store.create().unwrap().id();

        // Every thread races for the same cell; exactly one may win it.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.apply_move(id, 4))
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(store.load(id).unwrap().state().moves_played(), 1);
    }
}
