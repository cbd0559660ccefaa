//! Daily progress against targets

use serde::{Deserialize, Serialize};

use super::error::round1;
use super::targets::{FluidTarget, ProteinTarget};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub protein_g: f64,
    pub protein_target_g: i64,
    pub protein_percent: f64,
    pub protein_met: bool,
    pub fluid_ml: f64,
    pub fluid_target_ml: i64,
    pub fluid_percent: f64,
    pub fluid_met: bool,
    /// Baseline minus current weight; 0 when either is unknown
    pub weight_lost_kg: f64,
    /// Weight lost as a percent of baseline; 0 when either is unknown
    pub weight_lost_percent: f64,
}

fn percent_of(amount: f64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    round1(amount / target as f64 * 100.0)
}

/// Percent of baseline weight lost so far
pub fn weight_lost_percent(baseline_weight_kg: f64, current_weight_kg: f64) -> Option<f64> {
    if baseline_weight_kg <= 0.0 {
        return None;
    }
    Some(round1((baseline_weight_kg - current_weight_kg) / baseline_weight_kg * 100.0))
}

/// Compare a day's logged protein and fluid against the patient's targets
pub fn calculate_daily_progress(
    protein_g: f64,
    fluid_ml: f64,
    protein_target: &ProteinTarget,
    fluid_target: &FluidTarget,
    baseline_weight_kg: Option<f64>,
    current_weight_kg: Option<f64>,
) -> DailyProgress {
    let protein_g = protein_g.max(0.0);
    let fluid_ml = fluid_ml.max(0.0);

    let (weight_lost_kg, weight_lost_percent) = match (baseline_weight_kg, current_weight_kg) {
        (Some(baseline), Some(current)) => (
            round1(baseline - current),
            weight_lost_percent(baseline, current).unwrap_or(0.0),
        ),
        _ => (0.0, 0.0),
    };

    DailyProgress {
        protein_g,
        protein_target_g: protein_target.daily_grams,
        protein_percent: percent_of(protein_g, protein_target.daily_grams),
        protein_met: protein_g >= protein_target.daily_grams as f64,
        fluid_ml,
        fluid_target_ml: fluid_target.daily_ml,
        fluid_percent: percent_of(fluid_ml, fluid_target.daily_ml),
        fluid_met: fluid_ml >= fluid_target.daily_ml as f64,
        weight_lost_kg,
        weight_lost_percent,
    }
}
