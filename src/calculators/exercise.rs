//! Exercise calorie estimation
//!
//! Flat per-minute burn rates by activity, scaled by perceived intensity.

use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};

/// Logged activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Walking,
    Running,
    Cycling,
    Swimming,
    Yoga,
    StrengthTraining,
    Dancing,
    Stretching,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Walking => "walking",
            ActivityType::Running => "running",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::Yoga => "yoga",
            ActivityType::StrengthTraining => "strength_training",
            ActivityType::Dancing => "dancing",
            ActivityType::Stretching => "stretching",
            ActivityType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "walking" | "walk" => Some(ActivityType::Walking),
            "running" | "run" => Some(ActivityType::Running),
            "cycling" | "bike" => Some(ActivityType::Cycling),
            "swimming" | "swim" => Some(ActivityType::Swimming),
            "yoga" => Some(ActivityType::Yoga),
            "strength_training" | "strength" | "weights" => Some(ActivityType::StrengthTraining),
            "dancing" | "dance" => Some(ActivityType::Dancing),
            "stretching" => Some(ActivityType::Stretching),
            "other" => Some(ActivityType::Other),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> CalcResult<Self> {
        Self::from_str(s).ok_or_else(|| {
            CalcError::invalid("activity_type", format!("unrecognized value '{}'", s))
        })
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Walking => "Walking",
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Swimming => "Swimming",
            ActivityType::Yoga => "Yoga",
            ActivityType::StrengthTraining => "Strength Training",
            ActivityType::Dancing => "Dancing",
            ActivityType::Stretching => "Stretching",
            ActivityType::Other => "Other",
        }
    }

    /// Approximate kcal burned per minute at moderate intensity
    pub fn calories_per_minute(&self) -> f64 {
        match self {
            ActivityType::Walking => 4.0,
            ActivityType::Running => 10.0,
            ActivityType::Cycling => 7.0,
            ActivityType::Swimming => 8.0,
            ActivityType::Yoga => 3.0,
            ActivityType::StrengthTraining => 6.0,
            ActivityType::Dancing => 5.0,
            ActivityType::Stretching => 2.0,
            ActivityType::Other => 4.0,
        }
    }
}

/// Perceived exercise intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    #[default]
    Moderate,
    Vigorous,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Vigorous => "vigorous",
        }
    }

    pub fn parse(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Intensity::Light),
            "moderate" => Ok(Intensity::Moderate),
            "vigorous" => Ok(Intensity::Vigorous),
            _ => Err(CalcError::invalid(
                "intensity",
                format!("unrecognized value '{}' (expected one of: light, moderate, vigorous)", s),
            )),
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Intensity::Light => 0.7,
            Intensity::Moderate => 1.0,
            Intensity::Vigorous => 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEstimate {
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    pub calories_burned: i64,
}

/// Estimate calories: rate x minutes x intensity multiplier, rounded
pub fn estimate_exercise_calories(
    activity_type: ActivityType,
    duration_minutes: u32,
    intensity: Intensity,
) -> ExerciseEstimate {
    let calories = activity_type.calories_per_minute()
        * f64::from(duration_minutes)
        * intensity.multiplier();

    ExerciseEstimate {
        activity_type,
        duration_minutes,
        intensity,
        calories_burned: calories.round() as i64,
    }
}
