//! Weight log model
//!
//! Dated body weight measurements, newest first.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A recorded body weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub measured_at: String,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
    pub source: String,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for logging a weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntryCreate {
    /// ISO date, today when omitted
    pub measured_at: Option<String>,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

impl WeightEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            measured_at: row.get("measured_at")?,
            weight_kg: row.get("weight_kg")?,
            bmi: row.get("bmi")?,
            source: row.get("source")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Log a new weight
    pub fn create(conn: &Connection, data: &WeightEntryCreate) -> DbResult<Self> {
        let measured_at = data
            .measured_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
        let source = data.source.clone().unwrap_or_else(|| "manual".to_string());

        conn.execute(
            r#"
            INSERT INTO weight_log (measured_at, weight_kg, bmi, source, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![measured_at, data.weight_kg, data.bmi, source, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weight_log WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List weights, newest measurement first
    pub fn list(conn: &Connection, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let sql = match limit {
            Some(n) => format!(
                "SELECT * FROM weight_log ORDER BY measured_at DESC, id DESC LIMIT {}",
                n
            ),
            None => "SELECT * FROM weight_log ORDER BY measured_at DESC, id DESC".to_string(),
        };

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Most recent measurement
    pub fn latest(conn: &Connection) -> DbResult<Option<Self>> {
        Ok(Self::list(conn, Some(1))?.into_iter().next())
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM weight_log WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
