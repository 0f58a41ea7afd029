//! Store functions for the country roster.

use crate::{error::GameResult, game::Country};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "code, name_ar, name_en, region, base_treasury_1980, base_treasury_2000,
                       base_treasury_2020, base_manpower, base_stability, tech_era";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        code:               row.get(0)?,
        name_ar:            row.get(1)?,
        name_en:            row.get(2)?,
        region:             row.get(3)?,
        base_treasury_1980: row.get(4)?,
        base_treasury_2000: row.get(5)?,
        base_treasury_2020: row.get(6)?,
        base_manpower:      row.get(7)?,
        base_stability:     row.get(8)?,
        tech_era:           row.get(9)?,
    })
}

pub(super) fn upsert(conn: &Connection, c: &Country) -> GameResult<()> {
    conn.execute(
        "INSERT INTO country (
            code, name_ar, name_en, region, base_treasury_1980, base_treasury_2000,
            base_treasury_2020, base_manpower, base_stability, tech_era
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(code) DO UPDATE SET
            name_ar = excluded.name_ar,
            name_en = excluded.name_en,
            region = excluded.region,
            base_treasury_1980 = excluded.base_treasury_1980,
            base_treasury_2000 = excluded.base_treasury_2000,
            base_treasury_2020 = excluded.base_treasury_2020,
            base_manpower = excluded.base_manpower,
            base_stability = excluded.base_stability,
            tech_era = excluded.tech_era",
        params![
            c.code,
            c.name_ar,
            c.name_en,
            c.region,
            c.base_treasury_1980,
            c.base_treasury_2000,
            c.base_treasury_2020,
            c.base_manpower,
            c.base_stability,
            c.tech_era,
        ],
    )?;
    Ok(())
}

pub(super) fn get(conn: &Connection, code: &str) -> GameResult<Option<Country>> {
    let country = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM country WHERE code = ?1"),
            params![code],
            from_row,
        )
        .optional()?;
    Ok(country)
}

/// Whole roster, ordered by Arabic name.
pub(super) fn all(conn: &Connection) -> GameResult<Vec<Country>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM country ORDER BY name_ar ASC"))?;
    let countries = stmt
        .query_map([], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(countries)
}
