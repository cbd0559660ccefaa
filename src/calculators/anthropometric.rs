//! Anthropometric calculators
//!
//! BMI classification and Devine ideal body weight, with the adjusted body
//! weight used for dosing when a patient is well above ideal.

use serde::{Deserialize, Serialize};

use super::error::{require_positive, round1, CalcResult};
use super::types::Sex;

/// BMI weight-status category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    Normal,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obesity Class I")]
    ObesityClassI,
    #[serde(rename = "Obesity Class II")]
    ObesityClassII,
    #[serde(rename = "Obesity Class III")]
    ObesityClassIII,
}

impl BmiCategory {
    /// Classify an unrounded BMI value using half-open bins
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ObesityClassI
        } else if bmi < 40.0 {
            BmiCategory::ObesityClassII
        } else {
            BmiCategory::ObesityClassIII
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObesityClassI => "Obesity Class I",
            BmiCategory::ObesityClassII => "Obesity Class II",
            BmiCategory::ObesityClassIII => "Obesity Class III",
        }
    }

    pub fn health_risk(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Malnutrition risk",
            BmiCategory::Normal => "Low",
            BmiCategory::Overweight => "Moderate",
            BmiCategory::ObesityClassI => "Moderate to High",
            BmiCategory::ObesityClassII => "High",
            BmiCategory::ObesityClassIII => "Very High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
    pub health_risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IbwResult {
    pub ibw_kg: f64,
    pub formula: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_body_weight_kg: Option<f64>,
}

/// Ratio of current weight to IBW above which adjusted body weight applies
pub const ADJUSTED_WEIGHT_THRESHOLD: f64 = 1.25;

/// Body Mass Index: weight / height(m)^2, rounded to one decimal
///
/// The category is taken from the unrounded value, so 24.96 reports a BMI of
/// 25.0 but stays "Normal weight".
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> CalcResult<BmiResult> {
    let weight_kg = require_positive("weight_kg", weight_kg)?;
    let height_m = require_positive("height_cm", height_cm)? / 100.0;

    let bmi = weight_kg / (height_m * height_m);
    let category = BmiCategory::from_bmi(bmi);

    Ok(BmiResult {
        bmi: round1(bmi),
        category,
        health_risk: category.health_risk().to_string(),
    })
}

/// Ideal body weight by the Devine formula
///
/// * male: 50.0 kg + 2.3 kg per inch over 5 ft
/// * female: 45.5 kg + 2.3 kg per inch over 5 ft
///
/// When `current_weight_kg` exceeds 125% of IBW the adjusted body weight
/// `IBW + 0.4 * (current - IBW)` is included as well.
pub fn calculate_ideal_body_weight(
    height_cm: f64,
    sex: Sex,
    current_weight_kg: Option<f64>,
) -> CalcResult<IbwResult> {
    let height_cm = require_positive("height_cm", height_cm)?;
    let current_weight_kg = current_weight_kg
        .map(|w| require_positive("current_weight_kg", w))
        .transpose()?;

    let inches_over_5ft = height_cm / 2.54 - 60.0;
    let base = match sex {
        Sex::Male => 50.0,
        Sex::Female => 45.5,
    };
    let ibw_kg = base + 2.3 * inches_over_5ft;

    let adjusted_body_weight_kg = current_weight_kg
        .filter(|&current| current > ibw_kg * ADJUSTED_WEIGHT_THRESHOLD)
        .map(|current| round1(ibw_kg + 0.4 * (current - ibw_kg)));

    Ok(IbwResult {
        ibw_kg: round1(ibw_kg),
        formula: "Devine".to_string(),
        adjusted_body_weight_kg,
    })
}
