//! Unit conversion for patient measurements
//!
//! Calculators work in kg, cm and ml. Tool callers may supply imperial units,
//! which are normalized here first.

use super::error::{CalcError, CalcResult};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Centimeters per foot
pub const CM_PER_FOOT: f64 = 30.48;
/// Milliliters per fluid ounce (US)
pub const ML_PER_FL_OZ: f64 = 29.5735;

/// Conversion factor to kilograms for a weight unit
pub fn kg_per_unit(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "kg" | "kgs" | "kilogram" | "kilograms" => Some(1.0),
        "lb" | "lbs" | "pound" | "pounds" => Some(KG_PER_LB),
        _ => None,
    }
}

/// Conversion factor to centimeters for a length unit
pub fn cm_per_unit(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "cm" | "centimeter" | "centimeters" => Some(1.0),
        "m" | "meter" | "meters" | "metre" | "metres" => Some(100.0),
        "in" | "inch" | "inches" => Some(CM_PER_INCH),
        "ft" | "foot" | "feet" => Some(CM_PER_FOOT),
        _ => None,
    }
}

/// Conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some(1.0),
        "l" | "liter" | "liters" | "litre" | "litres" => Some(1000.0),
        "oz" | "fl oz" | "fl_oz" | "floz" => Some(ML_PER_FL_OZ),
        "cup" | "cups" => Some(8.0 * ML_PER_FL_OZ),
        _ => None,
    }
}

/// Convert a weight to kilograms
pub fn to_kg(value: f64, unit: &str) -> CalcResult<f64> {
    kg_per_unit(unit)
        .map(|factor| value * factor)
        .ok_or_else(|| CalcError::invalid("weight_unit", format!("unknown unit '{}'", unit)))
}

/// Convert a length to centimeters
pub fn to_cm(value: f64, unit: &str) -> CalcResult<f64> {
    cm_per_unit(unit)
        .map(|factor| value * factor)
        .ok_or_else(|| CalcError::invalid("height_unit", format!("unknown unit '{}'", unit)))
}

/// Convert a volume to milliliters
pub fn to_ml(value: f64, unit: &str) -> CalcResult<f64> {
    ml_per_unit(unit)
        .map(|factor| value * factor)
        .ok_or_else(|| CalcError::invalid("fluid_unit", format!("unknown unit '{}'", unit)))
}

/// Milliliters to US fluid ounces, rounded to one decimal
pub fn ml_to_fl_oz(ml: f64) -> f64 {
    super::error::round1(ml / ML_PER_FL_OZ)
}
