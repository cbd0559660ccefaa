//! Calculator MCP Tools
//!
//! Stateless wrappers that accept tool-level inputs (strings, optional units),
//! convert them to typed values and run the calculators.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculators::{
    self, ml_to_fl_oz, parse_iso_date, to_cm, to_kg, ActivityLevel, ActivityType, BmiResult,
    BmrResult, ExerciseEstimate, FluidTarget, IbwResult, Intensity, Phase, PortionGuideline,
    ProteinTarget, Sex, SupplementScheduleItem, SurgeryType, TdeeResult,
};

/// Parse an optional phase; blank counts as unknown
pub fn parse_phase(phase: Option<&str>) -> Result<Option<Phase>, String> {
    match phase.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Phase::parse(s).map(Some).map_err(|e| e.to_string()),
    }
}

fn weight_kg(value: f64, unit: Option<&str>) -> Result<f64, String> {
    to_kg(value, unit.unwrap_or("kg")).map_err(|e| e.to_string())
}

fn height_cm(value: f64, unit: Option<&str>) -> Result<f64, String> {
    to_cm(value, unit.unwrap_or("cm")).map_err(|e| e.to_string())
}

/// Response for calculate_bmi
#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(flatten)]
    pub result: BmiResult,
}

pub fn bmi(
    weight: f64,
    weight_unit: Option<&str>,
    height: f64,
    height_unit: Option<&str>,
) -> Result<BmiResponse, String> {
    let weight_kg = weight_kg(weight, weight_unit)?;
    let height_cm = height_cm(height, height_unit)?;
    let result = calculators::calculate_bmi(weight_kg, height_cm).map_err(|e| e.to_string())?;

    Ok(BmiResponse {
        weight_kg,
        height_cm,
        result,
    })
}

pub fn ideal_body_weight(
    height: f64,
    height_unit: Option<&str>,
    sex: &str,
    current_weight: Option<f64>,
    weight_unit: Option<&str>,
) -> Result<IbwResult, String> {
    let height_cm = height_cm(height, height_unit)?;
    let sex = Sex::parse(sex).map_err(|e| e.to_string())?;
    let current_kg = current_weight
        .map(|w| weight_kg(w, weight_unit))
        .transpose()?;

    calculators::calculate_ideal_body_weight(height_cm, sex, current_kg).map_err(|e| e.to_string())
}

pub fn bmr(
    weight: f64,
    weight_unit: Option<&str>,
    height: f64,
    height_unit: Option<&str>,
    age: u32,
    sex: &str,
) -> Result<BmrResult, String> {
    let weight_kg = weight_kg(weight, weight_unit)?;
    let height_cm = height_cm(height, height_unit)?;
    let sex = Sex::parse(sex).map_err(|e| e.to_string())?;

    calculators::calculate_bmr(weight_kg, height_cm, age, sex).map_err(|e| e.to_string())
}

pub fn tdee(bmr: f64, activity_level: &str) -> Result<TdeeResult, String> {
    let level = ActivityLevel::parse(activity_level).map_err(|e| e.to_string())?;
    calculators::calculate_tdee(bmr, level).map_err(|e| e.to_string())
}

pub fn protein_target(
    current_weight: f64,
    weight_unit: Option<&str>,
    ideal_body_weight_kg: f64,
    phase: Option<&str>,
    meals_per_day: Option<u32>,
) -> Result<ProteinTarget, String> {
    let current_kg = weight_kg(current_weight, weight_unit)?;
    let phase = parse_phase(phase)?;

    calculators::calculate_protein_target(
        current_kg,
        ideal_body_weight_kg,
        phase,
        meals_per_day.unwrap_or(calculators::DEFAULT_MEALS_PER_DAY),
    )
    .map_err(|e| e.to_string())
}

/// Response for calculate_fluid_target
#[derive(Debug, Serialize)]
pub struct FluidTargetResponse {
    #[serde(flatten)]
    pub target: FluidTarget,
    pub daily_fl_oz: f64,
}

pub fn fluid_target(
    current_weight: f64,
    weight_unit: Option<&str>,
    phase: Option<&str>,
    days_since_surgery: Option<u32>,
) -> Result<FluidTargetResponse, String> {
    let current_kg = weight_kg(current_weight, weight_unit)?;
    let phase = parse_phase(phase)?;

    let target = calculators::calculate_fluid_target(current_kg, phase, days_since_surgery)
        .map_err(|e| e.to_string())?;
    let daily_fl_oz = ml_to_fl_oz(target.daily_ml as f64);

    Ok(FluidTargetResponse {
        target,
        daily_fl_oz,
    })
}

pub fn portion_guideline(phase: Option<&str>) -> Result<PortionGuideline, String> {
    let phase = parse_phase(phase)?;
    Ok(calculators::calculate_portion_guideline(phase))
}

/// Response for calculate_supplement_schedule
#[derive(Debug, Serialize)]
pub struct SupplementScheduleResponse {
    pub surgery_type: SurgeryType,
    pub days_since_surgery: u32,
    pub active: Vec<SupplementScheduleItem>,
    /// Catalog entries for this surgery type not yet due
    pub upcoming: Vec<SupplementScheduleItem>,
}

pub fn supplement_schedule(
    surgery_type: &str,
    days_since_surgery: u32,
) -> Result<SupplementScheduleResponse, String> {
    let surgery_type = SurgeryType::parse(surgery_type).map_err(|e| e.to_string())?;

    let active = calculators::calculate_supplement_schedule(surgery_type, days_since_surgery);
    let upcoming = calculators::supplement_catalog(surgery_type)
        .into_iter()
        .filter(|item| item.start_day > days_since_surgery)
        .collect();

    Ok(SupplementScheduleResponse {
        surgery_type,
        days_since_surgery,
        active,
        upcoming,
    })
}

/// Response for calculate_age
#[derive(Debug, Serialize)]
pub struct AgeResponse {
    pub dob: String,
    pub as_of: String,
    pub age: u32,
}

pub fn age(dob: &str, as_of: Option<&str>, now: DateTime<Utc>) -> Result<AgeResponse, String> {
    let dob = parse_iso_date("dob", dob).map_err(|e| e.to_string())?;
    let today = match as_of {
        Some(s) => parse_iso_date("as_of", s).map_err(|e| e.to_string())?,
        None => now.date_naive(),
    };

    let age = calculators::calculate_age(dob, today).map_err(|e| e.to_string())?;

    Ok(AgeResponse {
        dob: dob.to_string(),
        as_of: today.to_string(),
        age,
    })
}

/// Response for days_since_surgery
#[derive(Debug, Serialize)]
pub struct DaysSinceSurgeryResponse {
    pub surgery_date: String,
    pub days_since_surgery: u32,
    pub surgery_in_future: bool,
}

pub fn days_since_surgery(
    surgery_date: &str,
    now: DateTime<Utc>,
) -> Result<DaysSinceSurgeryResponse, String> {
    let date = parse_iso_date("surgery_date", surgery_date).map_err(|e| e.to_string())?;

    Ok(DaysSinceSurgeryResponse {
        surgery_date: date.to_string(),
        days_since_surgery: calculators::days_since_surgery(date, now),
        surgery_in_future: date > now.date_naive(),
    })
}

pub fn exercise_calories(
    activity_type: &str,
    duration_minutes: u32,
    intensity: Option<&str>,
) -> Result<ExerciseEstimate, String> {
    let activity_type = ActivityType::parse(activity_type).map_err(|e| e.to_string())?;
    let intensity = intensity
        .map(Intensity::parse)
        .transpose()
        .map_err(|e| e.to_string())?
        .unwrap_or_default();

    Ok(calculators::estimate_exercise_calories(
        activity_type,
        duration_minutes,
        intensity,
    ))
}
