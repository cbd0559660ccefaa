//! Intake log model
//!
//! Protein and fluid consumed, timestamped and summed per calendar day.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Protein and fluid consumed at one time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeEntry {
    pub id: i64,
    pub logged_at: String,
    pub protein_g: f64,
    pub fluid_ml: f64,
    pub description: Option<String>,
    pub created_at: String,
}

/// Data for logging intake
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeEntryCreate {
    /// ISO 8601 timestamp, now when omitted
    pub logged_at: Option<String>,
    pub protein_g: f64,
    pub fluid_ml: f64,
    pub description: Option<String>,
}

/// Totals for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeTotals {
    pub protein_g: f64,
    pub fluid_ml: f64,
    pub entries: i64,
}

impl IntakeEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            logged_at: row.get("logged_at")?,
            protein_g: row.get("protein_g")?,
            fluid_ml: row.get("fluid_ml")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Log intake
    pub fn create(conn: &Connection, data: &IntakeEntryCreate) -> DbResult<Self> {
        let logged_at = data
            .logged_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        conn.execute(
            r#"
            INSERT INTO intake_log (logged_at, protein_g, fluid_ml, description)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![logged_at, data.protein_g, data.fluid_ml, data.description],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM intake_log WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries for a date (YYYY-MM-DD), in logged order
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM intake_log WHERE substr(logged_at, 1, 10) = ?1 ORDER BY logged_at, id",
        )?;
        let entries = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Sum protein and fluid for a date (YYYY-MM-DD)
    pub fn daily_totals(conn: &Connection, date: &str) -> DbResult<IntakeTotals> {
        let totals = conn.query_row(
            r#"
            SELECT COALESCE(SUM(protein_g), 0), COALESCE(SUM(fluid_ml), 0), COUNT(*)
            FROM intake_log
            WHERE substr(logged_at, 1, 10) = ?1
            "#,
            [date],
            |row| {
                Ok(IntakeTotals {
                    protein_g: row.get(0)?,
                    fluid_ml: row.get(1)?,
                    entries: row.get(2)?,
                })
            },
        )?;

        Ok(totals)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM intake_log WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
