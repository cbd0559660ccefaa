//! Phase-driven nutrition targets
//!
//! Daily protein and fluid goals plus per-meal portion guidance for each
//! post-operative diet phase. A phase of `None` means the patient's phase has
//! not been established yet; those callers get a conservative default rather
//! than an error.

use serde::{Deserialize, Serialize};

use super::error::{require_positive, CalcError, CalcResult};
use super::types::Phase;

/// Daily protein floor applied to every phase
pub const PROTEIN_FLOOR_G: f64 = 60.0;
/// Protein goal when no phase is known
pub const DEFAULT_PROTEIN_G: f64 = 80.0;
pub const DEFAULT_MEALS_PER_DAY: u32 = 5;
/// Fluid goal when no phase-specific rule applies
pub const DEFAULT_FLUID_ML: f64 = 1800.0;
/// Fluids are spread across waking hours
pub const WAKING_HOURS: f64 = 16.0;
pub const FLUID_ML_PER_KG: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinTarget {
    pub daily_grams: i64,
    pub per_meal_grams: i64,
    pub method: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidTarget {
    pub daily_ml: i64,
    pub per_hour_ml: i64,
    pub method: String,
    pub restrictions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionGuideline {
    pub max_volume_ml: u32,
    pub recommended_protein_g: u32,
    pub eating_duration: String,
    pub bite_size: String,
    pub chew_count: u32,
}

/// Daily protein target for a diet phase
///
/// | phase | g/day |
/// |---|---|
/// | pre_op | max(60, 1.0 x IBW) |
/// | clear/full liquid | 60 |
/// | pureed, soft | max(60, 1.2 x IBW) |
/// | regular, maintenance | 1.5 x (current weight if under 130% IBW, else IBW) |
/// | unknown | 80 |
///
/// The result is floored at 60 g and rounded; the per-meal figure divides the
/// unrounded daily amount by `meals_per_day`.
pub fn calculate_protein_target(
    current_weight_kg: f64,
    ideal_body_weight_kg: f64,
    phase: Option<Phase>,
    meals_per_day: u32,
) -> CalcResult<ProteinTarget> {
    let current_weight_kg = require_positive("current_weight_kg", current_weight_kg)?;
    let ibw_kg = require_positive("ideal_body_weight_kg", ideal_body_weight_kg)?;
    if meals_per_day == 0 {
        return Err(CalcError::invalid("meals_per_day", "must be at least 1"));
    }

    let (grams, method, rationale) = match phase {
        Some(Phase::PreOp) => (
            PROTEIN_FLOOR_G.max(ibw_kg * 1.0),
            "1.0 g/kg IBW",
            "Support healing, prepare for surgery",
        ),
        Some(Phase::ClearLiquid) | Some(Phase::FullLiquid) => (
            PROTEIN_FLOOR_G,
            "Fixed minimum",
            "Maintain muscle mass during restriction",
        ),
        Some(Phase::Pureed) | Some(Phase::Soft) => (
            PROTEIN_FLOOR_G.max(ibw_kg * 1.2),
            "1.2 g/kg IBW",
            "Support healing, prevent malnutrition",
        ),
        Some(Phase::Regular) | Some(Phase::Maintenance) => {
            let reference_weight = if current_weight_kg < ibw_kg * 1.3 {
                current_weight_kg
            } else {
                ibw_kg
            };
            (
                reference_weight * 1.5,
                "1.5 g/kg body weight",
                "Optimize body composition, maintain muscle",
            )
        }
        None => {
            tracing::debug!("No phase set, using default protein target");
            (DEFAULT_PROTEIN_G, "Default safe minimum", "Conservative estimate")
        }
    };

    let daily = grams.max(PROTEIN_FLOOR_G);

    Ok(ProteinTarget {
        daily_grams: daily.round() as i64,
        per_meal_grams: (daily / f64::from(meals_per_day)).round() as i64,
        method: method.to_string(),
        rationale: rationale.to_string(),
    })
}

/// Daily fluid target for a diet phase
///
/// Starts from 30 ml/kg and clamps per phase. During the first three post-op
/// days of the clear liquid phase the target is a fixed 1000 ml. An unknown
/// day count is treated as past that window.
pub fn calculate_fluid_target(
    current_weight_kg: f64,
    phase: Option<Phase>,
    days_since_surgery: Option<u32>,
) -> CalcResult<FluidTarget> {
    let current_weight_kg = require_positive("current_weight_kg", current_weight_kg)?;
    let base = current_weight_kg * FLUID_ML_PER_KG;

    let (daily, restrictions): (f64, Vec<&str>) = match phase {
        Some(Phase::ClearLiquid) => match days_since_surgery {
            Some(days) if days < 3 => (
                1000.0,
                vec!["Sip only 30-60ml per 15 minutes", "No straws", "Avoid carbonation"],
            ),
            _ => (base.min(1500.0), vec!["No straws", "Small sips"]),
        },
        Some(Phase::FullLiquid) | Some(Phase::Pureed) => (
            base.min(1800.0),
            vec!["Separate fluids from meals (30 min rule)", "No carbonation"],
        ),
        Some(Phase::Soft) | Some(Phase::Regular) | Some(Phase::Maintenance) => (
            base.max(1500.0).min(2000.0),
            vec![
                "Stop drinking 30 min before meals",
                "Resume 30 min after meals",
                "Limit caffeine",
            ],
        ),
        Some(Phase::PreOp) | None => (DEFAULT_FLUID_ML, vec!["Follow phase guidelines"]),
    };

    if phase.is_none() {
        tracing::debug!("No phase set, using default fluid target");
    }

    Ok(FluidTarget {
        daily_ml: daily.round() as i64,
        per_hour_ml: (daily / WAKING_HOURS).round() as i64,
        method: "30 ml/kg with phase adjustments".to_string(),
        restrictions: restrictions.iter().map(|s| s.to_string()).collect(),
    })
}

/// Per-meal portion guidance for a diet phase
pub fn calculate_portion_guideline(phase: Option<Phase>) -> PortionGuideline {
    let (max_volume_ml, recommended_protein_g, eating_duration, bite_size, chew_count) =
        match phase {
            Some(Phase::ClearLiquid) => (60, 10, "15-20 minutes", "Small sips", 0),
            Some(Phase::FullLiquid) => (120, 15, "20-30 minutes", "Small sips", 0),
            Some(Phase::Pureed) => (180, 20, "30 minutes", "Teaspoon size", 20),
            Some(Phase::Soft) => (250, 25, "30-45 minutes", "Dime size", 25),
            Some(Phase::Regular) | Some(Phase::Maintenance) => {
                (350, 30, "30-45 minutes", "Small, mindful bites", 30)
            }
            Some(Phase::PreOp) | None => (200, 20, "30 minutes", "Small", 25),
        };

    PortionGuideline {
        max_volume_ml,
        recommended_protein_g,
        eating_duration: eating_duration.to_string(),
        bite_size: bite_size.to_string(),
        chew_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_phases() -> Vec<Option<Phase>> {
        Phase::ALL.iter().copied().map(Some).chain(std::iter::once(None)).collect()
    }

    #[test]
    fn test_protein_pre_op_uses_ibw() {
        let result = calculate_protein_target(120.0, 70.0, Some(Phase::PreOp), 5).unwrap();
        assert_eq!(result.daily_grams, 70);
        assert_eq!(result.per_meal_grams, 14);
        assert_eq!(result.method, "1.0 g/kg IBW");
        assert_eq!(result.rationale, "Support healing, prepare for surgery");
    }

    #[test]
    fn test_protein_liquid_phases_fixed_minimum() {
        for phase in [Phase::ClearLiquid, Phase::FullLiquid] {
            let result = calculate_protein_target(140.0, 80.0, Some(phase), 5).unwrap();
            assert_eq!(result.daily_grams, 60);
            assert_eq!(result.per_meal_grams, 12);
            assert_eq!(result.method, "Fixed minimum");
            assert_eq!(result.rationale, "Maintain muscle mass during restriction");
        }
    }

    #[test]
    fn test_protein_pureed_and_soft() {
        let result = calculate_protein_target(110.0, 65.0, Some(Phase::Soft), 5).unwrap();
        assert_eq!(result.daily_grams, 78);
        assert_eq!(result.method, "1.2 g/kg IBW");
        assert_eq!(result.rationale, "Support healing, prevent malnutrition");

        // Small IBW falls back to the floor
        let result = calculate_protein_target(60.0, 45.0, Some(Phase::Pureed), 5).unwrap();
        assert_eq!(result.daily_grams, 60);
    }

    #[test]
    fn test_protein_regular_reference_weight() {
        // Under 130% of IBW: current weight is the reference
        let result = calculate_protein_target(80.0, 70.0, Some(Phase::Regular), 5).unwrap();
        assert_eq!(result.daily_grams, 120);
        assert_eq!(result.per_meal_grams, 24);
        assert_eq!(result.method, "1.5 g/kg body weight");
        assert_eq!(result.rationale, "Optimize body composition, maintain muscle");

        // At or above 130% of IBW: IBW is the reference
        let result = calculate_protein_target(130.0, 70.0, Some(Phase::Maintenance), 5).unwrap();
        assert_eq!(result.daily_grams, 105);
        assert_eq!(result.per_meal_grams, 21);
    }

    #[test]
    fn test_protein_default_without_phase() {
        let result = calculate_protein_target(100.0, 60.0, None, 4).unwrap();
        assert_eq!(result.daily_grams, 80);
        assert_eq!(result.per_meal_grams, 20);
        assert_eq!(result.method, "Default safe minimum");
        assert_eq!(result.rationale, "Conservative estimate");
    }

    #[test]
    fn test_protein_floor_holds_for_every_phase() {
        for phase in all_phases() {
            for (current, ibw) in [(35.0, 30.0), (45.0, 40.0), (90.0, 60.0), (200.0, 75.0)] {
                let result = calculate_protein_target(current, ibw, phase, 5).unwrap();
                assert!(result.daily_grams >= 60, "{:?} {} {}", phase, current, ibw);
            }
        }
    }

    #[test]
    fn test_protein_per_meal_divides_unrounded_daily() {
        // 1.2 * 62.4 = 74.88 -> daily 75, per meal 74.88 / 3 = 24.96 -> 25
        let result = calculate_protein_target(100.0, 62.4, Some(Phase::Pureed), 3).unwrap();
        assert_eq!(result.daily_grams, 75);
        assert_eq!(result.per_meal_grams, 25);
    }

    #[test]
    fn test_protein_rejects_zero_meals() {
        assert!(calculate_protein_target(100.0, 60.0, Some(Phase::Soft), 0).is_err());
        assert!(calculate_protein_target(0.0, 60.0, Some(Phase::Soft), 5).is_err());
    }

    #[test]
    fn test_fluid_clear_liquid_early_days() {
        let result = calculate_fluid_target(120.0, Some(Phase::ClearLiquid), Some(1)).unwrap();
        assert_eq!(result.daily_ml, 1000);
        assert_eq!(result.per_hour_ml, 63);
        assert_eq!(
            result.restrictions,
            vec!["Sip only 30-60ml per 15 minutes", "No straws", "Avoid carbonation"]
        );
        assert_eq!(result.method, "30 ml/kg with phase adjustments");
    }

    #[test]
    fn test_fluid_clear_liquid_after_day_three() {
        let result = calculate_fluid_target(120.0, Some(Phase::ClearLiquid), Some(3)).unwrap();
        assert_eq!(result.daily_ml, 1500);
        assert_eq!(result.restrictions, vec!["No straws", "Small sips"]);

        let unknown_day = calculate_fluid_target(45.0, Some(Phase::ClearLiquid), None).unwrap();
        assert_eq!(unknown_day.daily_ml, 1350);
    }

    #[test]
    fn test_fluid_full_liquid_and_pureed_capped() {
        let result = calculate_fluid_target(110.0, Some(Phase::Pureed), Some(20)).unwrap();
        assert_eq!(result.daily_ml, 1800);
        assert_eq!(
            result.restrictions,
            vec!["Separate fluids from meals (30 min rule)", "No carbonation"]
        );

        let result = calculate_fluid_target(50.0, Some(Phase::FullLiquid), Some(10)).unwrap();
        assert_eq!(result.daily_ml, 1500);
    }

    #[test]
    fn test_fluid_solid_phases_clamped() {
        let low = calculate_fluid_target(40.0, Some(Phase::Soft), None).unwrap();
        assert_eq!(low.daily_ml, 1500);
        let mid = calculate_fluid_target(60.0, Some(Phase::Regular), None).unwrap();
        assert_eq!(mid.daily_ml, 1800);
        assert_eq!(mid.per_hour_ml, 113);
        let high = calculate_fluid_target(150.0, Some(Phase::Maintenance), None).unwrap();
        assert_eq!(high.daily_ml, 2000);
        assert_eq!(high.per_hour_ml, 125);
        assert_eq!(high.restrictions.len(), 3);
    }

    #[test]
    fn test_fluid_default_for_pre_op_and_unknown() {
        for phase in [Some(Phase::PreOp), None] {
            let result = calculate_fluid_target(100.0, phase, None).unwrap();
            assert_eq!(result.daily_ml, 1800);
            assert_eq!(result.restrictions, vec!["Follow phase guidelines"]);
        }
    }

    #[test]
    fn test_fluid_below_floor_for_very_low_weight() {
        // 30 ml/kg caps but never raises, so under ~33.3 kg these phases drop below 1000 ml
        let clear = calculate_fluid_target(30.0, Some(Phase::ClearLiquid), Some(5)).unwrap();
        assert_eq!(clear.daily_ml, 900);
        for phase in [Phase::FullLiquid, Phase::Pureed] {
            let result = calculate_fluid_target(30.0, Some(phase), Some(20)).unwrap();
            assert_eq!(result.daily_ml, 900, "{:?}", phase);
        }

        let early = calculate_fluid_target(30.0, Some(Phase::ClearLiquid), Some(1)).unwrap();
        assert_eq!(early.daily_ml, 1000);
        let soft = calculate_fluid_target(30.0, Some(Phase::Soft), None).unwrap();
        assert_eq!(soft.daily_ml, 1500);
    }

    #[test]
    fn test_fluid_within_bounds_for_realistic_weights() {
        for phase in all_phases() {
            for weight in (40..=250).step_by(5).map(f64::from) {
                for days in [None, Some(0), Some(2), Some(30)] {
                    let result = calculate_fluid_target(weight, phase, days).unwrap();
                    assert!(
                        (1000..=2000).contains(&result.daily_ml),
                        "{:?} {} {:?} -> {}",
                        phase,
                        weight,
                        days,
                        result.daily_ml
                    );
                }
            }
        }
    }

    #[test]
    fn test_portion_lookup() {
        let clear = calculate_portion_guideline(Some(Phase::ClearLiquid));
        assert_eq!(clear.max_volume_ml, 60);
        assert_eq!(clear.chew_count, 0);
        assert_eq!(clear.bite_size, "Small sips");

        let soft = calculate_portion_guideline(Some(Phase::Soft));
        assert_eq!(soft.max_volume_ml, 250);
        assert_eq!(soft.recommended_protein_g, 25);
        assert_eq!(soft.eating_duration, "30-45 minutes");
        assert_eq!(soft.bite_size, "Dime size");

        assert_eq!(
            calculate_portion_guideline(Some(Phase::Regular)),
            calculate_portion_guideline(Some(Phase::Maintenance))
        );

        let fallback = calculate_portion_guideline(None);
        assert_eq!(fallback.max_volume_ml, 200);
        assert_eq!(fallback.bite_size, "Small");
        assert_eq!(calculate_portion_guideline(Some(Phase::PreOp)), fallback);
    }

    #[test]
    fn test_portion_volume_grows_through_phases() {
        let volumes: Vec<u32> = [
            Phase::ClearLiquid,
            Phase::FullLiquid,
            Phase::Pureed,
            Phase::Soft,
            Phase::Regular,
        ]
        .iter()
        .map(|p| calculate_portion_guideline(Some(*p)).max_volume_ml)
        .collect();
        assert!(volumes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_targets_are_idempotent() {
        for phase in all_phases() {
            assert_eq!(
                calculate_protein_target(112.4, 61.8, phase, 5),
                calculate_protein_target(112.4, 61.8, phase, 5)
            );
            assert_eq!(
                calculate_fluid_target(112.4, phase, Some(2)),
                calculate_fluid_target(112.4, phase, Some(2))
            );
            assert_eq!(calculate_portion_guideline(phase), calculate_portion_guideline(phase));
        }
    }
}
