//! Profile MCP Tools
//!
//! Tools for the stored patient profile and the care plan built from it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculators::{build_care_plan, calculate_daily_progress, CarePlan, DailyProgress};
use crate::db::Database;
use crate::models::{IntakeEntry, PatientProfile, ProfileUpdate};

use super::logs::log_date;

const PROFILE_NOT_SET: &str = "Patient profile not set. Please call set_profile first.";

/// Response for get_profile
#[derive(Debug, Serialize)]
pub struct GetProfileResponse {
    pub configured: bool,
    pub profile: Option<PatientProfile>,
}

pub fn set_profile(db: &Database, update: ProfileUpdate) -> Result<PatientProfile, String> {
    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let profile = PatientProfile::set(&conn, update)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    tracing::info!(phase = ?profile.phase, "Patient profile updated");
    Ok(profile)
}

pub fn get_profile(db: &Database) -> Result<GetProfileResponse, String> {
    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let profile = PatientProfile::get(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    Ok(GetProfileResponse {
        configured: profile.is_some(),
        profile,
    })
}

fn load_plan(db: &Database, now: DateTime<Utc>) -> Result<(PatientProfile, CarePlan), String> {
    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let profile = PatientProfile::get(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .ok_or(PROFILE_NOT_SET)?;

    let care_profile = profile
        .to_care_profile()
        .map_err(|e| format!("Stored profile is invalid: {}", e))?;
    let plan = build_care_plan(&care_profile, now)
        .map_err(|e| format!("Failed to build care plan: {}", e))?;

    Ok((profile, plan))
}

pub fn get_care_plan(db: &Database, now: DateTime<Utc>) -> Result<CarePlan, String> {
    load_plan(db, now).map(|(_, plan)| plan)
}

/// Response for calculate_daily_progress
#[derive(Debug, Serialize)]
pub struct DailyProgressResponse {
    pub date: String,
    pub entries: i64,
    #[serde(flatten)]
    pub progress: DailyProgress,
}

/// Compare one day's logged intake against the stored profile's targets
pub fn daily_progress(
    db: &Database,
    date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DailyProgressResponse, String> {
    let day = log_date("date", date, now)?.to_string();
    let (profile, plan) = load_plan(db, now)?;

    let protein = plan
        .protein
        .ok_or("Protein target needs height and current weight in the profile")?;
    let fluid = plan
        .fluid
        .ok_or("Fluid target needs current weight in the profile")?;

    let totals = db
        .with_conn(|conn| IntakeEntry::daily_totals(conn, &day))
        .map_err(|e| format!("Failed to total intake: {}", e))?;

    Ok(DailyProgressResponse {
        date: day,
        entries: totals.entries,
        progress: calculate_daily_progress(
            totals.protein_g,
            totals.fluid_ml,
            &protein,
            &fluid,
            profile.baseline_weight_kg,
            profile.current_weight_kg,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::logs::{log_intake, log_weight};
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

    #[test]
    fn test_care_plan_requires_profile() {
        let db = setup();
        assert_eq!(get_care_plan(&db, now()).unwrap_err(), PROFILE_NOT_SET);
        assert!(!get_profile(&db).unwrap().configured);
    }

    #[test]
    fn test_profile_round_trip_to_care_plan() {
        let db = setup();
        set_profile(
            &db,
            ProfileUpdate {
                height_cm: Some(165.0),
                current_weight_kg: Some(110.0),
                baseline_weight_kg: Some(135.0),
                sex: Some("female".to_string()),
                phase: Some("soft".to_string()),
                surgery_type: Some("bypass".to_string()),
                surgery_date: Some("2025-05-01".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let response = get_profile(&db).unwrap();
        assert!(response.configured);

        let plan = get_care_plan(&db, now()).unwrap();
        assert_eq!(plan.days_since_surgery, Some(46));
        assert_eq!(plan.supplements.as_ref().map(Vec::len), Some(5));
        assert_eq!(plan.weight_lost_kg, Some(25.0));
    }

    #[test]
    fn test_set_profile_reports_invalid_field() {
        let db = setup();
        let err = set_profile(
            &db,
            ProfileUpdate {
                sex: Some("x".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.contains("sex"));
    }

    #[test]
    fn test_daily_progress_uses_profile_targets() {
        let db = setup();
        set_profile(
            &db,
            ProfileUpdate {
                height_cm: Some(180.0),
                current_weight_kg: Some(90.0),
                baseline_weight_kg: Some(130.0),
                sex: Some("male".to_string()),
                phase: Some("regular".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        log_intake(&db, Some(40.0), Some(1200.0), None, None, None, now()).unwrap();
        log_intake(&db, Some(27.5), Some(900.0), None, None, None, now()).unwrap();
        log_intake(&db, Some(50.0), Some(500.0), None, None, Some("2025-06-14"), now()).unwrap();

        let response = daily_progress(&db, None, now()).unwrap();
        assert_eq!(response.date, "2025-06-15");
        assert_eq!(response.entries, 2);
        let progress = response.progress;
        assert_eq!(progress.protein_g, 67.5);
        assert_eq!(progress.protein_target_g, 135);
        assert_eq!(progress.protein_percent, 50.0);
        assert!(progress.fluid_met);
        assert_eq!(progress.weight_lost_kg, 40.0);
        assert_eq!(progress.weight_lost_percent, 30.8);

        let yesterday = daily_progress(&db, Some("2025-06-14"), now()).unwrap();
        assert_eq!(yesterday.progress.protein_g, 50.0);
        assert!(!yesterday.progress.fluid_met);
    }

    #[test]
    fn test_daily_progress_needs_measurements() {
        let db = setup();
        set_profile(
            &db,
            ProfileUpdate {
                phase: Some("pureed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(daily_progress(&db, None, now()).is_err());
    }

    #[test]
    fn test_cleared_phase_falls_back_to_defaults() {
        let db = setup();
        set_profile(
            &db,
            ProfileUpdate {
                height_cm: Some(165.0),
                current_weight_kg: Some(110.0),
                phase: Some("clear_liquid".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let plan = get_care_plan(&db, now()).unwrap();
        assert_eq!(plan.protein.unwrap().method, "Fixed minimum");

        let profile = set_profile(
            &db,
            ProfileUpdate {
                phase: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(profile.phase, None);
        assert_eq!(profile.height_cm, Some(165.0));

        let plan = get_care_plan(&db, now()).unwrap();
        assert_eq!(plan.phase, None);
        assert_eq!(plan.protein.unwrap().method, "Default safe minimum");
        assert_eq!(plan.fluid.unwrap().daily_ml, 1800);
        assert!(plan.notes.iter().any(|n| n.contains("default targets")));
    }

    #[test]
    fn test_logged_weight_flows_into_care_plan() {
        let db = setup();
        set_profile(
            &db,
            ProfileUpdate {
                height_cm: Some(165.0),
                current_weight_kg: Some(120.0),
                baseline_weight_kg: Some(135.0),
                ..Default::default()
            },
        )
        .unwrap();

        log_weight(&db, 108.0, None, None, None, now()).unwrap();
        let plan = get_care_plan(&db, now()).unwrap();
        assert_eq!(plan.weight_lost_kg, Some(27.0));
        assert_eq!(plan.weight_lost_percent, Some(20.0));
    }
}
