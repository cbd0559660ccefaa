//! Care plan composition
//!
//! Runs every calculator that the available patient data supports and
//! collects the results into one report. Missing inputs leave the matching
//! section empty and add a note instead of failing the whole plan.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::anthropometric::{calculate_bmi, calculate_ideal_body_weight, BmiResult, IbwResult};
use super::dates::{calculate_age, days_since_surgery};
use super::energy::{calculate_bmr, calculate_tdee, BmrResult, TdeeResult};
use super::error::{round1, CalcResult};
use super::progress::weight_lost_percent;
use super::supplements::{calculate_supplement_schedule, SupplementScheduleItem};
use super::targets::{
    calculate_fluid_target, calculate_portion_guideline, calculate_protein_target, FluidTarget,
    PortionGuideline, ProteinTarget, DEFAULT_MEALS_PER_DAY,
};
use super::types::{ActivityLevel, Phase, Sex, SurgeryType};

/// Typed patient inputs for a care plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareProfile {
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub baseline_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub dob: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub surgery_date: Option<NaiveDate>,
    pub surgery_type: Option<SurgeryType>,
    pub phase: Option<Phase>,
    pub activity_level: Option<ActivityLevel>,
    pub meals_per_day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    pub generated_at: String,
    pub phase: Option<Phase>,
    pub age: Option<u32>,
    pub days_since_surgery: Option<u32>,
    pub bmi: Option<BmiResult>,
    pub ideal_body_weight: Option<IbwResult>,
    pub bmr: Option<BmrResult>,
    pub tdee: Option<TdeeResult>,
    pub protein: Option<ProteinTarget>,
    pub fluid: Option<FluidTarget>,
    pub portion: PortionGuideline,
    pub supplements: Option<Vec<SupplementScheduleItem>>,
    pub weight_lost_kg: Option<f64>,
    pub weight_lost_percent: Option<f64>,
    pub weight_to_goal_kg: Option<f64>,
    pub notes: Vec<String>,
}

/// Build a care plan for `profile` as of `now`
///
/// Errors only when a supplied value is itself invalid (for example a
/// non-positive height or a birth date after `now`).
pub fn build_care_plan(profile: &CareProfile, now: DateTime<Utc>) -> CalcResult<CarePlan> {
    let today = now.date_naive();
    let mut notes = Vec::new();

    let age = profile.dob.map(|dob| calculate_age(dob, today)).transpose()?;

    let days = match profile.surgery_date {
        Some(date) if date > today => {
            notes.push(format!("Surgery scheduled for {}; post-op schedule not started", date));
            None
        }
        Some(date) => Some(days_since_surgery(date, now)),
        None => None,
    };

    let bmi = match (profile.current_weight_kg, profile.height_cm) {
        (Some(weight), Some(height)) => Some(calculate_bmi(weight, height)?),
        _ => {
            notes.push("BMI needs current weight and height".to_string());
            None
        }
    };

    let sex = profile.sex.unwrap_or_else(|| {
        notes.push("Sex not set; female formulas used".to_string());
        Sex::Female
    });

    let ideal_body_weight = profile
        .height_cm
        .map(|height| calculate_ideal_body_weight(height, sex, profile.current_weight_kg))
        .transpose()?;

    let bmr = match (profile.current_weight_kg, profile.height_cm, age) {
        (Some(weight), Some(height), Some(age)) => Some(calculate_bmr(weight, height, age, sex)?),
        _ => {
            notes.push("BMR needs current weight, height and date of birth".to_string());
            None
        }
    };

    let activity_level = profile.activity_level.unwrap_or(ActivityLevel::Sedentary);
    let tdee = bmr
        .as_ref()
        .map(|b| calculate_tdee(b.bmr as f64, activity_level))
        .transpose()?;

    let protein = match (profile.current_weight_kg, &ideal_body_weight) {
        (Some(weight), Some(ibw)) => Some(calculate_protein_target(
            weight,
            ibw.ibw_kg,
            profile.phase,
            profile.meals_per_day.unwrap_or(DEFAULT_MEALS_PER_DAY),
        )?),
        _ => None,
    };

    let fluid = profile
        .current_weight_kg
        .map(|weight| calculate_fluid_target(weight, profile.phase, days))
        .transpose()?;

    if profile.phase.is_none() {
        notes.push("Diet phase not set; default targets used".to_string());
    }

    let supplements = match (profile.surgery_type, days) {
        (Some(surgery_type), Some(days)) => {
            Some(calculate_supplement_schedule(surgery_type, days))
        }
        _ => None,
    };

    let weight_lost_kg = match (profile.baseline_weight_kg, profile.current_weight_kg) {
        (Some(baseline), Some(current)) => Some(round1(baseline - current)),
        _ => None,
    };
    let weight_lost_percent = profile
        .baseline_weight_kg
        .zip(profile.current_weight_kg)
        .and_then(|(baseline, current)| weight_lost_percent(baseline, current));
    let weight_to_goal_kg = match (profile.current_weight_kg, profile.goal_weight_kg) {
        (Some(current), Some(goal)) => Some(round1(current - goal)),
        _ => None,
    };

    tracing::debug!(notes = notes.len(), "Built care plan");

    Ok(CarePlan {
        generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        phase: profile.phase,
        age,
        days_since_surgery: days,
        bmi,
        ideal_body_weight,
        bmr,
        tdee,
        protein,
        fluid,
        portion: calculate_portion_guideline(profile.phase),
        supplements,
        weight_lost_kg,
        weight_lost_percent,
        weight_to_goal_kg,
        notes,
    })
}
