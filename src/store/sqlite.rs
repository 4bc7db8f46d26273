//! SQLite-backed game store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use super::models::{GameChanges, GameRow};
use super::{DbError, GameId, GameRecord, GameStore, StoreError, schema};
use crate::games::tictactoe::{GameState, MoveError};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer's lock, in milliseconds.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Game store persisted in a SQLite database file.
///
/// Each operation opens its own connection. Moves run inside an
/// immediate transaction, so SQLite's write lock serializes concurrent
/// updates, including ones from other processes.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database_url: String,
}

impl SqliteStore {
    /// Opens the database at `database_url` and applies pending migrations.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database cannot be opened
    /// or migrated.
    #[instrument(skip(database_url), fields(database_url = %database_url.as_ref()))]
    pub fn open(database_url: impl AsRef<str>) -> Result<Self, StoreError> {
        let store = Self {
            database_url: database_url.as_ref().to_string(),
        };
        info!(path = %store.database_url, "Opening SQLite game store");

        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");

        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.database_url, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.database_url).map_err(|e| {
            DbError::new(format!(
                "Failed to connect to '{}': {}",
                self.database_url, e
            ))
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }

    fn find(conn: &mut SqliteConnection, id: GameId) -> Result<GameRecord, StoreError> {
        let row = schema::games::table
            .find(id.get())
            .select(GameRow::as_select())
            .first::<GameRow>(conn)
            .optional()?
            .ok_or(StoreError::NotFound(id))?;
        Ok(row.into_record()?)
    }

    fn write(conn: &mut SqliteConnection, id: GameId, state: &GameState) -> Result<(), StoreError> {
        let updated = diesel::update(schema::games::table.find(id.get()))
            .set(GameChanges::from(state))
            .execute(conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl GameStore for SqliteStore {
    #[instrument(skip(self))]
    fn create(&self) -> Result<GameRecord, StoreError> {
        let mut conn = self.connection()?;

        let row: GameRow = diesel::insert_into(schema::games::table)
            .values(GameChanges::from(&GameState::new()))
            .returning(GameRow::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = row.id(), "Game created");
        Ok(row.into_record()?)
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<GameRecord, StoreError> {
        let mut conn = self.connection()?;
        Self::find(&mut conn, id)
    }

    #[instrument(skip(self, state))]
    fn save(&self, id: GameId, state: &GameState) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        Self::write(&mut conn, id, state)?;
        debug!(game_id = %id, "Game saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, id: GameId) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::games::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(game_id = %id, "Game deleted");
        Ok(())
    }

    #[instrument(skip(self, transition))]
    fn update(
        &self,
        id: GameId,
        transition: &mut dyn FnMut(&GameState) -> Result<GameState, MoveError>,
    ) -> Result<GameRecord, StoreError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| {
            let record = Self::find(conn, id)?;
            let next = transition(record.state())?;
            Self::write(conn, id, &next)?;
            debug!(game_id = %id, status = ?next.status(), "Game updated");
            Ok(GameRecord::new(id, *record.created_at(), next))
        })
    }
}
