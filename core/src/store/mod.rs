//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine calls `GameStore` methods; it never executes SQL directly.

use crate::{
    error::{GameError, GameResult},
    event::CommandLogEntry,
    game::{Country, GameState},
    snapshot::ResourceUpdate,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{types::Type, Connection};

mod command_log;
mod country;
mod game_state;

/// The storage collaborator: country lookup, game-state read/update,
/// command-log append. Keyed by the opaque game id.
pub trait GameStore: Send {
    fn upsert_country(&self, country: &Country) -> GameResult<()>;
    fn country(&self, code: &str) -> GameResult<Option<Country>>;
    fn countries(&self) -> GameResult<Vec<Country>>;

    fn insert_game(&self, game: &GameState) -> GameResult<()>;
    fn game(&self, game_id: &str) -> GameResult<Option<GameState>>;

    /// Apply a partial field set and return the full updated row.
    /// Atomic: either every listed column changes or none does.
    fn update_resources(
        &self,
        game_id: &str,
        update:  &ResourceUpdate,
        now:     DateTime<Utc>,
    ) -> GameResult<GameState>;

    /// Apply `update` and append `entry` in one transaction.
    fn commit_command(
        &self,
        game_id: &str,
        update:  &ResourceUpdate,
        entry:   &CommandLogEntry,
    ) -> GameResult<GameState>;

    fn append_log(&self, entry: &CommandLogEntry) -> GameResult<()>;
    /// All entries for a game, oldest first.
    fn command_log(&self, game_id: &str) -> GameResult<Vec<CommandLogEntry>>;
    fn command_count(&self, game_id: &str) -> GameResult<u64>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Insert or refresh every roster entry.
    pub fn seed_countries(&self, countries: &[Country]) -> GameResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for c in countries {
            country::upsert(&tx, c)?;
        }
        tx.commit()?;
        log::info!("store: seeded {} countries", countries.len());
        Ok(())
    }
}

impl GameStore for SqliteStore {
    fn upsert_country(&self, c: &Country) -> GameResult<()> {
        country::upsert(&self.conn, c)
    }

    fn country(&self, code: &str) -> GameResult<Option<Country>> {
        country::get(&self.conn, code)
    }

    fn countries(&self) -> GameResult<Vec<Country>> {
        country::all(&self.conn)
    }

    fn insert_game(&self, game: &GameState) -> GameResult<()> {
        game_state::insert(&self.conn, game)
    }

    fn game(&self, game_id: &str) -> GameResult<Option<GameState>> {
        game_state::get(&self.conn, game_id)
    }

    fn update_resources(
        &self,
        game_id: &str,
        update:  &ResourceUpdate,
        now:     DateTime<Utc>,
    ) -> GameResult<GameState> {
        let tx = self.conn.unchecked_transaction()?;
        game_state::update(&tx, game_id, update, now)?;
        let updated = game_state::get(&tx, game_id)?
            .ok_or_else(|| GameError::GameNotFound { game_id: game_id.to_string() })?;
        tx.commit()?;
        Ok(updated)
    }

    fn commit_command(
        &self,
        game_id: &str,
        update:  &ResourceUpdate,
        entry:   &CommandLogEntry,
    ) -> GameResult<GameState> {
        let tx = self.conn.unchecked_transaction()?;
        game_state::update(&tx, game_id, update, entry.timestamp)?;
        command_log::append(&tx, entry)?;
        let updated = game_state::get(&tx, game_id)?
            .ok_or_else(|| GameError::GameNotFound { game_id: game_id.to_string() })?;
        tx.commit()?;
        Ok(updated)
    }

    fn append_log(&self, entry: &CommandLogEntry) -> GameResult<()> {
        command_log::append(&self.conn, entry)
    }

    fn command_log(&self, game_id: &str) -> GameResult<Vec<CommandLogEntry>> {
        command_log::for_game(&self.conn, game_id)
    }

    fn command_count(&self, game_id: &str) -> GameResult<u64> {
        command_log::count(&self.conn, game_id)
    }
}

// ── Column codecs ─────────────────────────────────────────────────

pub(crate) fn ts_to_sql(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn ts_from_sql(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn bad_column(idx: usize, what: &str, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("invalid {what}: {raw:?}").into(),
    )
}
