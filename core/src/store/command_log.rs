//! Store functions for the append-only command log.

use super::{bad_column, ts_from_sql, ts_to_sql};
use crate::{
    command::{CommandCategory, CommandStatus},
    error::GameResult,
    event::CommandLogEntry,
};
use rusqlite::{params, types::Type, Connection, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<CommandLogEntry> {
    let timestamp: String = row.get(2)?;
    let category: String = row.get(4)?;
    let status: String = row.get(5)?;
    let delta: String = row.get(7)?;

    Ok(CommandLogEntry {
        id:               row.get(0)?,
        game_id:          row.get(1)?,
        timestamp:        ts_from_sql(2, &timestamp)?,
        command_text:     row.get(3)?,
        category:         CommandCategory::from_code(&category)
            .ok_or_else(|| bad_column(4, "category", &category))?,
        status:           CommandStatus::from_code(&status)
            .ok_or_else(|| bad_column(5, "status", &status))?,
        response_message: row.get(6)?,
        applied_delta:    serde_json::from_str(&delta).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e))
        })?,
    })
}

pub(super) fn append(conn: &Connection, e: &CommandLogEntry) -> GameResult<()> {
    conn.execute(
        "INSERT INTO command_log (
            id, game_id, timestamp, command_text, category, status,
            response_message, applied_delta
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            e.id,
            e.game_id,
            ts_to_sql(e.timestamp),
            e.command_text,
            e.category.code(),
            e.status.code(),
            e.response_message,
            serde_json::to_string(&e.applied_delta)?,
        ],
    )?;
    Ok(())
}

pub(super) fn for_game(conn: &Connection, game_id: &str) -> GameResult<Vec<CommandLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, game_id, timestamp, command_text, category, status,
                response_message, applied_delta
         FROM command_log WHERE game_id = ?1
         ORDER BY timestamp ASC, seq ASC",
    )?;
    let entries = stmt
        .query_map(params![game_id], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub(super) fn count(conn: &Connection, game_id: &str) -> GameResult<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM command_log WHERE game_id = ?1",
        params![game_id],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}
