//! Bariatric clinical calculators
//!
//! Pure functions over patient measurements: body composition, energy needs,
//! phase-specific nutrition targets, supplement scheduling and date math.
//! Nothing here reads the clock, the database or the network.

pub mod anthropometric;
pub mod care_plan;
pub mod dates;
pub mod energy;
pub mod error;
pub mod exercise;
pub mod progress;
pub mod supplements;
pub mod targets;
pub mod types;
pub mod units;

pub use anthropometric::{
    calculate_bmi, calculate_ideal_body_weight, BmiCategory, BmiResult, IbwResult,
};
pub use care_plan::{build_care_plan, CarePlan, CareProfile};
pub use dates::{calculate_age, days_since_surgery, parse_iso_date};
pub use energy::{calculate_bmr, calculate_tdee, BmrResult, TdeeResult};
pub use error::{CalcError, CalcResult};
pub use exercise::{estimate_exercise_calories, ActivityType, ExerciseEstimate, Intensity};
pub use progress::{calculate_daily_progress, weight_lost_percent, DailyProgress};
pub use supplements::{calculate_supplement_schedule, supplement_catalog, SupplementScheduleItem};
pub use targets::{
    calculate_fluid_target, calculate_portion_guideline, calculate_protein_target, FluidTarget,
    PortionGuideline, ProteinTarget, DEFAULT_MEALS_PER_DAY,
};
pub use types::{ActivityLevel, Phase, Sex, SurgeryType};
pub use units::{ml_to_fl_oz, to_cm, to_kg, to_ml};
