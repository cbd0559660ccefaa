//! BCM MCP Server Implementation
//!
//! Implements the MCP server with all BCM tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::ProfileUpdate;
use crate::tools::calculators;
use crate::tools::logs;
use crate::tools::profile;
use crate::tools::status::StatusTracker;

/// BCM MCP Service
#[derive(Clone)]
pub struct BcmService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<BcmService>,
}

impl BcmService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

fn default_weight_unit() -> String {
    "kg".to_string()
}

fn default_height_unit() -> String {
    "cm".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BmiParams {
    pub weight: f64,
    /// kg or lbs
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    pub height: f64,
    /// cm, m, in or ft
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdealBodyWeightParams {
    pub height: f64,
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
    /// male or female
    pub sex: String,
    /// When given, adjusted body weight is reported if above 125% of IBW
    pub current_weight: Option<f64>,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BmrParams {
    pub weight: f64,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    pub height: f64,
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
    pub age: u32,
    pub sex: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TdeeParams {
    pub bmr: f64,
    /// sedentary, light, moderate, active or very_active
    pub activity_level: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProteinTargetParams {
    pub current_weight: f64,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    pub ideal_body_weight_kg: f64,
    /// Diet phase; omit when unknown
    pub phase: Option<String>,
    pub meals_per_day: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FluidTargetParams {
    pub current_weight: f64,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    pub phase: Option<String>,
    pub days_since_surgery: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PortionGuidelineParams {
    pub phase: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SupplementScheduleParams {
    /// sleeve, bypass or band
    pub surgery_type: String,
    pub days_since_surgery: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AgeParams {
    /// YYYY-MM-DD
    pub dob: String,
    /// Reference date (YYYY-MM-DD), defaults to today
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DaysSinceSurgeryParams {
    /// YYYY-MM-DD
    pub surgery_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExerciseCaloriesParams {
    pub activity_type: String,
    pub duration_minutes: u32,
    /// light, moderate or vigorous
    pub intensity: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyProgressParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

// ============================================================================
// Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub weight: f64,
    /// kg or lbs
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    /// YYYY-MM-DD, defaults to today
    pub measured_at: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWeightsParams {
    /// Most recent entries to return; all when omitted
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogIntakeParams {
    pub protein_g: Option<f64>,
    pub fluid: Option<f64>,
    /// ml, l, fl oz or cup
    pub fluid_unit: Option<String>,
    pub description: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyIntakeParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEntryParams {
    pub id: i64,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub baseline_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    /// YYYY-MM-DD
    pub dob: Option<String>,
    pub sex: Option<String>,
    /// YYYY-MM-DD
    pub surgery_date: Option<String>,
    pub surgery_type: Option<String>,
    pub phase: Option<String>,
    pub activity_level: Option<String>,
    pub meals_per_day: Option<u32>,
    /// Field names to reset to unset; an empty string value does the same
    #[serde(default)]
    pub clear: Vec<String>,
}

impl From<SetProfileParams> for ProfileUpdate {
    fn from(p: SetProfileParams) -> Self {
        ProfileUpdate {
            name: p.name,
            height_cm: p.height_cm,
            current_weight_kg: p.current_weight_kg,
            baseline_weight_kg: p.baseline_weight_kg,
            goal_weight_kg: p.goal_weight_kg,
            dob: p.dob,
            sex: p.sex,
            surgery_date: p.surgery_date,
            surgery_type: p.surgery_type,
            phase: p.phase,
            activity_level: p.activity_level,
            meals_per_day: p.meals_per_day,
            clear: p.clear,
        }
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl BcmService {
    // --- Status ---

    #[tool(description = "Get the current status of the BCM service including build info, database status, and process information")]
    async fn bcm_status(&self) -> Result<CallToolResult, McpError> {
        let configured = profile::get_profile(&self.database)
            .map(|r| r.configured)
            .unwrap_or(false);
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(configured);
        json_result(&status)
    }

    #[tool(description = "Get instructions for using the bariatric care calculators and profile tools. Call this when starting a session or when unsure which phase rules apply.")]
    fn care_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CARE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CARE_INSTRUCTIONS)]))
    }

    // --- Body Composition ---

    #[tool(description = "Calculate body mass index with WHO category and health risk")]
    fn calculate_bmi(&self, Parameters(p): Parameters<BmiParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::bmi(p.weight, Some(p.weight_unit.as_str()), p.height, Some(p.height_unit.as_str()))
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calculate ideal body weight (Devine) and adjusted body weight when current weight exceeds 125% of ideal")]
    fn calculate_ideal_body_weight(&self, Parameters(p): Parameters<IdealBodyWeightParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::ideal_body_weight(p.height, Some(p.height_unit.as_str()), &p.sex, p.current_weight, Some(p.weight_unit.as_str()))
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Energy ---

    #[tool(description = "Calculate basal metabolic rate (Mifflin-St Jeor)")]
    fn calculate_bmr(&self, Parameters(p): Parameters<BmrParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::bmr(p.weight, Some(p.weight_unit.as_str()), p.height, Some(p.height_unit.as_str()), p.age, &p.sex)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calculate total daily energy expenditure from BMR and activity level")]
    fn calculate_tdee(&self, Parameters(p): Parameters<TdeeParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::tdee(p.bmr, &p.activity_level)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Phase Targets ---

    #[tool(description = "Calculate the daily and per-meal protein target for a diet phase. Omit phase when unknown to get the general default.")]
    fn calculate_protein_target(&self, Parameters(p): Parameters<ProteinTargetParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::protein_target(p.current_weight, Some(p.weight_unit.as_str()), p.ideal_body_weight_kg, p.phase.as_deref(), p.meals_per_day)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calculate the daily fluid target and drinking restrictions for a diet phase")]
    fn calculate_fluid_target(&self, Parameters(p): Parameters<FluidTargetParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::fluid_target(p.current_weight, Some(p.weight_unit.as_str()), p.phase.as_deref(), p.days_since_surgery)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get per-meal portion guidance (volume, protein, pace, bite size, chewing) for a diet phase")]
    fn calculate_portion_guideline(&self, Parameters(p): Parameters<PortionGuidelineParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::portion_guideline(p.phase.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List supplements due by the given post-op day for a surgery type, plus those still upcoming")]
    fn calculate_supplement_schedule(&self, Parameters(p): Parameters<SupplementScheduleParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::supplement_schedule(&p.surgery_type, p.days_since_surgery)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Dates ---

    #[tool(description = "Calculate age in whole years from a date of birth")]
    fn calculate_age(&self, Parameters(p): Parameters<AgeParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::age(&p.dob, p.as_of.as_deref(), Utc::now())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calculate the post-op day number for a surgery date")]
    fn days_since_surgery(&self, Parameters(p): Parameters<DaysSinceSurgeryParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::days_since_surgery(&p.surgery_date, Utc::now())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Activity & Progress ---

    #[tool(description = "Estimate calories burned for an activity, duration and intensity")]
    fn estimate_exercise_calories(&self, Parameters(p): Parameters<ExerciseCaloriesParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::exercise_calories(&p.activity_type, p.duration_minutes, p.intensity.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Compare a day's logged protein and fluid intake against the stored profile's targets")]
    fn calculate_daily_progress(&self, Parameters(p): Parameters<DailyProgressParams>) -> Result<CallToolResult, McpError> {
        let result = profile::daily_progress(&self.database, p.date.as_deref(), Utc::now())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Logs ---

    #[tool(description = "Log a body weight. The newest entry becomes the profile's current weight.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        let result = logs::log_weight(&self.database, p.weight, Some(p.weight_unit.as_str()), p.measured_at.as_deref(), p.notes, Utc::now())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List logged weights, newest first")]
    fn list_weights(&self, Parameters(p): Parameters<ListWeightsParams>) -> Result<CallToolResult, McpError> {
        let result = logs::list_weights(&self.database, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a logged weight by ID")]
    fn delete_weight(&self, Parameters(p): Parameters<DeleteEntryParams>) -> Result<CallToolResult, McpError> {
        let deleted = logs::delete_weight(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&serde_json::json!({ "success": deleted, "id": p.id }))
    }

    #[tool(description = "Log protein (grams) and/or fluid consumed")]
    fn log_intake(&self, Parameters(p): Parameters<LogIntakeParams>) -> Result<CallToolResult, McpError> {
        let result = logs::log_intake(&self.database, p.protein_g, p.fluid, p.fluid_unit.as_deref(), p.description, p.date.as_deref(), Utc::now())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a logged intake entry by ID")]
    fn delete_intake(&self, Parameters(p): Parameters<DeleteEntryParams>) -> Result<CallToolResult, McpError> {
        let deleted = logs::delete_intake(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&serde_json::json!({ "success": deleted, "id": p.id }))
    }

    #[tool(description = "Get a day's intake entries with protein and fluid totals")]
    fn get_daily_intake(&self, Parameters(p): Parameters<DailyIntakeParams>) -> Result<CallToolResult, McpError> {
        let result = logs::daily_intake(&self.database, p.date.as_deref(), Utc::now())
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Profile ---

    #[tool(description = "Create or update the patient profile. Only the fields provided are changed; list fields in clear (or send an empty string) to unset them.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::set_profile(&self.database, p.into())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the stored patient profile")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Build a full care plan from the stored profile: BMI, ideal weight, energy needs, phase targets, supplements and weight progress")]
    fn get_care_plan(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_care_plan(&self.database, Utc::now())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for BcmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bcm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Bariatric Care Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bariatric Care Manager (BCM) - Clinical calculations for weight-loss surgery patients. \
                 IMPORTANT: Call care_instructions first for phase rules and workflow. \
                 Body: calculate_bmi, calculate_ideal_body_weight. \
                 Energy: calculate_bmr, calculate_tdee, estimate_exercise_calories. \
                 Phase targets: calculate_protein_target, calculate_fluid_target, calculate_portion_guideline. \
                 Supplements: calculate_supplement_schedule. \
                 Dates: calculate_age, days_since_surgery. \
                 Logs: log_weight, list_weights, delete_weight, log_intake, delete_intake, get_daily_intake. \
                 Profile: set_profile, get_profile, get_care_plan, calculate_daily_progress."
                    .into(),
            ),
        }
    }
}
