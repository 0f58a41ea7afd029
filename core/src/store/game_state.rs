//! Store functions for game_state rows.

use super::{bad_column, ts_from_sql, ts_to_sql};
use crate::{
    error::{GameError, GameResult},
    game::{Difficulty, GameState},
    snapshot::{ResourceSnapshot, ResourceUpdate},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<GameState> {
    let difficulty: String = row.get(3)?;
    let last_tp: String = row.get(14)?;
    let created: String = row.get(15)?;
    let updated: String = row.get(16)?;

    Ok(GameState {
        id:           row.get(0)?,
        country_code: row.get(1)?,
        country_name: row.get(2)?,
        difficulty:   Difficulty::from_code(&difficulty)
            .ok_or_else(|| bad_column(3, "difficulty", &difficulty))?,
        year:         row.get(4)?,
        resources: ResourceSnapshot {
            treasury:              row.get(5)?,
            manpower:              row.get(6)?,
            stability:             row.get(7)?,
            tactical_points:       row.get(8)?,
            intelligence_level:    row.get(9)?,
            nuclear_program_stage: row.get(10)?,
            nuclear_warheads:      row.get(11)?,
            at_war:                row.get(12)?,
            war_target:            row.get(13)?,
        },
        last_tp_generation: ts_from_sql(14, &last_tp)?,
        created_at:         ts_from_sql(15, &created)?,
        updated_at:         ts_from_sql(16, &updated)?,
    })
}

pub(super) fn insert(conn: &Connection, g: &GameState) -> GameResult<()> {
    let r = &g.resources;
    conn.execute(
        "INSERT INTO game_state (
            id, country_code, country_name, difficulty, year,
            treasury, manpower, stability, tactical_points, intelligence_level,
            nuclear_program_stage, nuclear_warheads, at_war, war_target,
            last_tp_generation, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            g.id,
            g.country_code,
            g.country_name,
            g.difficulty.code(),
            g.year,
            r.treasury,
            r.manpower,
            r.stability,
            r.tactical_points,
            r.intelligence_level,
            r.nuclear_program_stage,
            r.nuclear_warheads,
            r.at_war,
            r.war_target,
            ts_to_sql(g.last_tp_generation),
            ts_to_sql(g.created_at),
            ts_to_sql(g.updated_at),
        ],
    )?;
    Ok(())
}

pub(super) fn get(conn: &Connection, game_id: &str) -> GameResult<Option<GameState>> {
    let game = conn
        .query_row(
            "SELECT id, country_code, country_name, difficulty, year,
                    treasury, manpower, stability, tactical_points, intelligence_level,
                    nuclear_program_stage, nuclear_warheads, at_war, war_target,
                    last_tp_generation, created_at, updated_at
             FROM game_state WHERE id = ?1",
            params![game_id],
            from_row,
        )
        .optional()?;
    Ok(game)
}

/// Partial update: NULL parameters keep the stored value.
/// `war_target` uses an explicit flag so it can be cleared to NULL.
pub(super) fn update(
    conn:    &Connection,
    game_id: &str,
    u:       &ResourceUpdate,
    now:     DateTime<Utc>,
) -> GameResult<()> {
    let (set_target, target) = match &u.war_target {
        Some(t) => (true, t.clone()),
        None    => (false, None),
    };

    let changed = conn.execute(
        "UPDATE game_state SET
            treasury              = COALESCE(?2, treasury),
            manpower              = COALESCE(?3, manpower),
            stability             = COALESCE(?4, stability),
            tactical_points       = COALESCE(?5, tactical_points),
            intelligence_level    = COALESCE(?6, intelligence_level),
            nuclear_program_stage = COALESCE(?7, nuclear_program_stage),
            nuclear_warheads      = COALESCE(?8, nuclear_warheads),
            at_war                = COALESCE(?9, at_war),
            war_target            = CASE WHEN ?10 THEN ?11 ELSE war_target END,
            last_tp_generation    = COALESCE(?12, last_tp_generation),
            updated_at            = ?13
         WHERE id = ?1",
        params![
            game_id,
            u.treasury,
            u.manpower,
            u.stability,
            u.tactical_points,
            u.intelligence_level,
            u.nuclear_program_stage,
            u.nuclear_warheads,
            u.at_war,
            set_target,
            target,
            u.last_tp_generation.map(ts_to_sql),
            ts_to_sql(now),
        ],
    )?;

    if changed == 0 {
        return Err(GameError::GameNotFound { game_id: game_id.to_string() });
    }
    Ok(())
}
