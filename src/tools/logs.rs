//! Log MCP Tools
//!
//! Tools for the weight and intake logs. The newest weight becomes the
//! profile's current weight; intake is summed per UTC calendar day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::calculators::error::{require_positive, round1};
use crate::calculators::{calculate_bmi, ml_to_fl_oz, parse_iso_date, to_kg, to_ml};
use crate::db::Database;
use crate::models::{
    IntakeEntry, IntakeEntryCreate, PatientProfile, ProfileUpdate, WeightEntry, WeightEntryCreate,
};

/// Resolve an optional ISO date, defaulting to today and refusing future days
pub(crate) fn log_date(
    field: &'static str,
    date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<NaiveDate, String> {
    let today = now.date_naive();
    let date = match date.map(str::trim) {
        None | Some("") => return Ok(today),
        Some(s) => parse_iso_date(field, s).map_err(|e| e.to_string())?,
    };
    if date > today {
        return Err(format!("Invalid {}: {} is in the future", field, date));
    }
    Ok(date)
}

/// Response for log_weight
#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub entry: WeightEntry,
    /// True when this entry is the newest and was copied to the profile
    pub current_weight_updated: bool,
}

pub fn log_weight(
    db: &Database,
    weight: f64,
    unit: Option<&str>,
    measured_at: Option<&str>,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<LogWeightResponse, String> {
    let weight_kg = to_kg(weight, unit.unwrap_or("kg"))
        .and_then(|kg| require_positive("weight", kg))
        .map(round1)
        .map_err(|e| e.to_string())?;
    let date = log_date("measured_at", measured_at, now)?;

    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let height_cm = PatientProfile::get(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .and_then(|p| p.height_cm);
    let bmi = height_cm
        .map(|h| calculate_bmi(weight_kg, h).map(|r| r.bmi))
        .transpose()
        .map_err(|e| e.to_string())?;

    let entry = WeightEntry::create(
        &conn,
        &WeightEntryCreate {
            measured_at: Some(date.to_string()),
            weight_kg,
            bmi,
            source: None,
            notes,
        },
    )
    .map_err(|e| format!("Failed to log weight: {}", e))?;

    let newest = WeightEntry::latest(&conn)
        .map_err(|e| format!("Database error: {}", e))?
        .map(|latest| latest.id == entry.id)
        .unwrap_or(false);

    if newest {
        PatientProfile::set(
            &conn,
            ProfileUpdate {
                current_weight_kg: Some(weight_kg),
                ..Default::default()
            },
        )
        .map_err(|e| format!("Failed to update current weight: {}", e))?;
    }

    tracing::info!(weight_kg, measured_at = %entry.measured_at, newest, "Weight logged");

    Ok(LogWeightResponse {
        entry,
        current_weight_updated: newest,
    })
}

pub fn list_weights(db: &Database, limit: Option<i64>) -> Result<Vec<WeightEntry>, String> {
    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    WeightEntry::list(&conn, limit).map_err(|e| format!("Failed to list weights: {}", e))
}

pub fn delete_weight(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    WeightEntry::delete(&conn, id).map_err(|e| format!("Failed to delete weight: {}", e))
}

pub fn log_intake(
    db: &Database,
    protein_g: Option<f64>,
    fluid: Option<f64>,
    fluid_unit: Option<&str>,
    description: Option<String>,
    date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<IntakeEntry, String> {
    let protein_g = protein_g.unwrap_or(0.0);
    let fluid_ml = to_ml(fluid.unwrap_or(0.0), fluid_unit.unwrap_or("ml"))
        .map(round1)
        .map_err(|e| e.to_string())?;

    if !(protein_g.is_finite() && protein_g >= 0.0) {
        return Err(format!("Invalid protein_g: must not be negative, got {}", protein_g));
    }
    if !(fluid_ml.is_finite() && fluid_ml >= 0.0) {
        return Err(format!("Invalid fluid: must not be negative, got {}", fluid_ml));
    }
    if protein_g == 0.0 && fluid_ml == 0.0 {
        return Err("Nothing to log: give protein_g, fluid or both".to_string());
    }

    // Past days are logged at midnight so they sort before anything logged live
    let day = log_date("date", date, now)?;
    let logged_at = if day == now.date_naive() {
        now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        format!("{}T00:00:00Z", day)
    };

    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let entry = IntakeEntry::create(
        &conn,
        &IntakeEntryCreate {
            logged_at: Some(logged_at),
            protein_g,
            fluid_ml,
            description,
        },
    )
    .map_err(|e| format!("Failed to log intake: {}", e))?;

    tracing::info!(protein_g, fluid_ml, "Intake logged");
    Ok(entry)
}

pub fn delete_intake(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    IntakeEntry::delete(&conn, id).map_err(|e| format!("Failed to delete intake: {}", e))
}

/// Response for get_daily_intake
#[derive(Debug, Serialize)]
pub struct DailyIntakeResponse {
    pub date: String,
    pub protein_g: f64,
    pub fluid_ml: f64,
    pub fluid_oz: f64,
    pub entries: Vec<IntakeEntry>,
}

pub fn daily_intake(
    db: &Database,
    date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DailyIntakeResponse, String> {
    let day = log_date("date", date, now)?.to_string();

    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let totals = IntakeEntry::daily_totals(&conn, &day)
        .map_err(|e| format!("Failed to total intake: {}", e))?;
    let entries = IntakeEntry::list_for_date(&conn, &day)
        .map_err(|e| format!("Failed to list intake: {}", e))?;

    Ok(DailyIntakeResponse {
        date: day,
        protein_g: round1(totals.protein_g),
        fluid_ml: round1(totals.fluid_ml),
        fluid_oz: ml_to_fl_oz(totals.fluid_ml),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn current_weight(db: &Database) -> Option<f64> {
        db.with_conn(|conn| PatientProfile::get(conn))
            .unwrap()
            .and_then(|p| p.current_weight_kg)
    }

    #[test]
    fn test_log_weight_updates_current_weight() {
        let db = setup();
        crate::tools::profile::set_profile(
            &db,
            ProfileUpdate {
                height_cm: Some(165.0),
                current_weight_kg: Some(120.0),
                ..Default::default()
            },
        )
        .unwrap();

        let response = log_weight(&db, 115.0, None, None, None, now()).unwrap();
        assert!(response.current_weight_updated);
        assert_eq!(response.entry.measured_at, "2025-06-15");
        assert_eq!(response.entry.bmi, Some(42.2));
        assert_eq!(current_weight(&db), Some(115.0));
    }

    #[test]
    fn test_backfilled_weight_keeps_current_weight() {
        let db = setup();
        log_weight(&db, 110.0, None, Some("2025-06-14"), None, now()).unwrap();

        let response = log_weight(&db, 118.0, None, Some("2025-06-01"), None, now()).unwrap();
        assert!(!response.current_weight_updated);
        assert_eq!(response.entry.bmi, None);
        assert_eq!(current_weight(&db), Some(110.0));

        let weights = list_weights(&db, None).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].weight_kg, 110.0);
    }

    #[test]
    fn test_log_weight_converts_pounds() {
        let db = setup();
        let response = log_weight(&db, 250.0, Some("lb"), None, None, now()).unwrap();
        assert_eq!(response.entry.weight_kg, 113.4);
    }

    #[test]
    fn test_log_weight_rejects_bad_input() {
        let db = setup();
        assert!(log_weight(&db, -1.0, None, None, None, now()).is_err());
        assert!(log_weight(&db, 100.0, Some("stone"), None, None, now()).is_err());
        let err = log_weight(&db, 100.0, None, Some("2025-07-01"), None, now()).unwrap_err();
        assert!(err.contains("measured_at"));
        assert!(list_weights(&db, None).unwrap().is_empty());
    }

    #[test]
    fn test_daily_intake_sums_todays_entries() {
        let db = setup();
        log_intake(&db, Some(20.0), Some(250.0), None, None, None, now()).unwrap();
        log_intake(&db, Some(25.0), None, None, Some("shake".to_string()), None, now()).unwrap();
        log_intake(&db, None, Some(8.0), Some("fl oz"), None, None, now()).unwrap();
        log_intake(&db, Some(30.0), Some(500.0), None, None, Some("2025-06-14"), now()).unwrap();

        let today = daily_intake(&db, None, now()).unwrap();
        assert_eq!(today.date, "2025-06-15");
        assert_eq!(today.protein_g, 45.0);
        assert_eq!(today.fluid_ml, 486.6);
        assert_eq!(today.entries.len(), 3);

        let yesterday = daily_intake(&db, Some("2025-06-14"), now()).unwrap();
        assert_eq!(yesterday.protein_g, 30.0);
        assert_eq!(yesterday.entries[0].logged_at, "2025-06-14T00:00:00Z");
    }

    #[test]
    fn test_log_intake_requires_an_amount() {
        let db = setup();
        assert!(log_intake(&db, None, None, None, None, None, now()).is_err());
        assert!(log_intake(&db, Some(-5.0), Some(100.0), None, None, None, now()).is_err());
        assert!(log_intake(&db, None, Some(100.0), Some("pint"), None, None, now()).is_err());
    }

    #[test]
    fn test_delete_entries() {
        let db = setup();
        let intake = log_intake(&db, Some(20.0), None, None, None, None, now()).unwrap();
        let weight = log_weight(&db, 100.0, None, None, None, now()).unwrap();

        assert!(delete_intake(&db, intake.id).unwrap());
        assert!(delete_weight(&db, weight.entry.id).unwrap());
        assert!(!delete_weight(&db, weight.entry.id).unwrap());
        assert_eq!(daily_intake(&db, None, now()).unwrap().protein_g, 0.0);
    }
}
