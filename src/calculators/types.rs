//! Closed enumerations for calculator inputs
//!
//! Patient attributes arrive as free-form strings from tools and the profile
//! store. They are parsed here once, so the calculators only branch on known
//! variants.

use serde::{Deserialize, Serialize};

use super::error::{CalcError, CalcResult};

/// Biological sex, used only to select a formula coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> CalcResult<Self> {
        Self::from_str(s).ok_or_else(|| unrecognized("sex", s, "male, female"))
    }
}

/// Activity level for TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> CalcResult<Self> {
        Self::from_str(s).ok_or_else(|| {
            unrecognized("activity_level", s, "sedentary, light, moderate, active, very_active")
        })
    }

    /// TDEE multiplier applied to BMR
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Post-operative diet progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PreOp,
    ClearLiquid,
    FullLiquid,
    Pureed,
    Soft,
    Regular,
    Maintenance,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::PreOp,
        Phase::ClearLiquid,
        Phase::FullLiquid,
        Phase::Pureed,
        Phase::Soft,
        Phase::Regular,
        Phase::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreOp => "pre_op",
            Phase::ClearLiquid => "clear_liquid",
            Phase::FullLiquid => "full_liquid",
            Phase::Pureed => "pureed",
            Phase::Soft => "soft",
            Phase::Regular => "regular",
            Phase::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pre_op" => Some(Phase::PreOp),
            "clear_liquid" => Some(Phase::ClearLiquid),
            "full_liquid" => Some(Phase::FullLiquid),
            "pureed" => Some(Phase::Pureed),
            "soft" => Some(Phase::Soft),
            "regular" => Some(Phase::Regular),
            "maintenance" => Some(Phase::Maintenance),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> CalcResult<Self> {
        Self::from_str(s).ok_or_else(|| {
            unrecognized(
                "phase",
                s,
                "pre_op, clear_liquid, full_liquid, pureed, soft, regular, maintenance",
            )
        })
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::PreOp => "Pre-Op",
            Phase::ClearLiquid => "Clear Liquid",
            Phase::FullLiquid => "Full Liquid",
            Phase::Pureed => "Pureed",
            Phase::Soft => "Soft Foods",
            Phase::Regular => "Regular",
            Phase::Maintenance => "Maintenance",
        }
    }
}

/// Bariatric procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeryType {
    Sleeve,
    Bypass,
    Band,
}

impl SurgeryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurgeryType::Sleeve => "sleeve",
            SurgeryType::Bypass => "bypass",
            SurgeryType::Band => "band",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sleeve" | "vsg" => Some(SurgeryType::Sleeve),
            "bypass" | "rny" | "rygb" => Some(SurgeryType::Bypass),
            "band" | "lap_band" => Some(SurgeryType::Band),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> CalcResult<Self> {
        Self::from_str(s).ok_or_else(|| unrecognized("surgery_type", s, "sleeve, bypass, band"))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SurgeryType::Sleeve => "Sleeve Gastrectomy",
            SurgeryType::Bypass => "Gastric Bypass",
            SurgeryType::Band => "Gastric Band",
        }
    }
}

fn unrecognized(field: &'static str, value: &str, expected: &str) -> CalcError {
    CalcError::invalid(
        field,
        format!("unrecognized value '{}' (expected one of: {})", value, expected),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parse_case_insensitive() {
        assert_eq!(Phase::from_str("CLEAR_LIQUID"), Some(Phase::ClearLiquid));
        assert_eq!(Phase::from_str(" Pre-Op "), Some(Phase::PreOp));
        assert_eq!(Phase::from_str("maintenance"), Some(Phase::Maintenance));
    }

    #[test]
    fn test_phase_round_trips_wire_name() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_str(phase.as_str()), Some(phase));
        }
    }

    #[test]
    fn test_unknown_phase_is_rejected() {
        let err = Phase::parse("liquid").unwrap_err();
        assert!(err.to_string().contains("unrecognized value 'liquid'"));
    }

    #[test]
    fn test_activity_factors() {
        assert_eq!(ActivityLevel::Sedentary.factor(), 1.2);
        assert_eq!(ActivityLevel::Light.factor(), 1.375);
        assert_eq!(ActivityLevel::Moderate.factor(), 1.55);
        assert_eq!(ActivityLevel::Active.factor(), 1.725);
        assert_eq!(ActivityLevel::VeryActive.factor(), 1.9);
        assert_eq!(ActivityLevel::parse("very-active"), Ok(ActivityLevel::VeryActive));
        assert!(ActivityLevel::parse("couch").is_err());
    }

    #[test]
    fn test_sex_and_surgery_type() {
        assert_eq!(Sex::parse("Female"), Ok(Sex::Female));
        assert!(Sex::parse("unknown").is_err());
        assert_eq!(SurgeryType::parse("RYGB"), Ok(SurgeryType::Bypass));
        assert!(SurgeryType::parse("balloon").is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Phase::ClearLiquid).unwrap();
        assert_eq!(json, "\"clear_liquid\"");
        let level: ActivityLevel = serde_json::from_str("\"very_active\"").unwrap();
        assert_eq!(level, ActivityLevel::VeryActive);
    }
}
