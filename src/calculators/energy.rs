//! Energy expenditure calculators
//!
//! Mifflin-St Jeor BMR and activity-scaled TDEE.

use serde::{Deserialize, Serialize};

use super::error::{require_positive, CalcResult};
use super::types::{ActivityLevel, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmrResult {
    /// kcal/day
    pub bmr: i64,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdeeResult {
    /// kcal/day
    pub tdee: i64,
    pub activity_level: ActivityLevel,
    pub activity_factor: f64,
}

/// Basal Metabolic Rate using Mifflin-St Jeor (1990)
///
/// BMR = 10 x weight_kg + 6.25 x height_cm - 5 x age + s, where s is +5 for
/// men and -161 for women. Rounded to the nearest kcal.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> CalcResult<BmrResult> {
    let weight_kg = require_positive("weight_kg", weight_kg)?;
    let height_cm = require_positive("height_cm", height_cm)?;

    let sex_constant = match sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + sex_constant;

    Ok(BmrResult {
        bmr: bmr.round() as i64,
        formula: "Mifflin-St Jeor".to_string(),
    })
}

/// Total Daily Energy Expenditure: BMR x activity factor, rounded
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> CalcResult<TdeeResult> {
    let bmr = require_positive("bmr", bmr)?;
    let activity_factor = activity_level.factor();

    Ok(TdeeResult {
        tdee: (bmr * activity_factor).round() as i64,
        activity_level,
        activity_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_male() {
        // 800 + 1062.5 - 200 + 5 = 1667.5
        let result = calculate_bmr(80.0, 170.0, 40, Sex::Male).unwrap();
        assert_eq!(result.bmr, 1668);
        assert_eq!(result.formula, "Mifflin-St Jeor");
    }

    #[test]
    fn test_bmr_female() {
        // 1000 + 1000 - 175 - 161 = 1664
        let result = calculate_bmr(100.0, 160.0, 35, Sex::Female).unwrap();
        assert_eq!(result.bmr, 1664);
    }

    #[test]
    fn test_bmr_sex_offset_is_166() {
        let male = calculate_bmr(120.0, 175.0, 50, Sex::Male).unwrap().bmr;
        let female = calculate_bmr(120.0, 175.0, 50, Sex::Female).unwrap().bmr;
        assert_eq!(male - female, 166);
    }

    #[test]
    fn test_bmr_rejects_bad_inputs() {
        assert!(calculate_bmr(0.0, 170.0, 40, Sex::Male).is_err());
        assert!(calculate_bmr(80.0, -1.0, 40, Sex::Male).is_err());
    }

    #[test]
    fn test_tdee_factors() {
        let expected = [
            (ActivityLevel::Sedentary, 2400),
            (ActivityLevel::Light, 2750),
            (ActivityLevel::Moderate, 3100),
            (ActivityLevel::Active, 3450),
            (ActivityLevel::VeryActive, 3800),
        ];
        for (level, tdee) in expected {
            let result = calculate_tdee(2000.0, level).unwrap();
            assert_eq!(result.tdee, tdee, "{:?}", level);
            assert_eq!(result.activity_level, level);
            assert_eq!(result.activity_factor, level.factor());
        }
    }

    #[test]
    fn test_tdee_rounds_to_nearest() {
        // 1668 * 1.375 = 2293.5
        assert_eq!(calculate_tdee(1668.0, ActivityLevel::Light).unwrap().tdee, 2294);
    }

    #[test]
    fn test_tdee_rejects_non_positive_bmr() {
        assert!(calculate_tdee(0.0, ActivityLevel::Moderate).is_err());
    }

    #[test]
    fn test_calculations_are_idempotent() {
        assert_eq!(
            calculate_bmr(97.3, 163.0, 44, Sex::Female),
            calculate_bmr(97.3, 163.0, 44, Sex::Female)
        );
        assert_eq!(
            calculate_tdee(1668.0, ActivityLevel::Moderate),
            calculate_tdee(1668.0, ActivityLevel::Moderate)
        );
    }
}
