//! Patient profile model
//!
//! Single-row record of the measurements and surgery details that feed the
//! care plan. Enum-like columns hold the calculators' wire names.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calculators::{
    parse_iso_date, ActivityLevel, CalcError, CalcResult, CareProfile, Phase, Sex, SurgeryType,
};
use crate::db::{DbError, DbResult};

/// Stored patient profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub baseline_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub dob: Option<String>,
    pub sex: Option<String>,
    pub surgery_date: Option<String>,
    pub surgery_type: Option<String>,
    pub phase: Option<String>,
    pub activity_level: Option<String>,
    pub meals_per_day: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Columns a profile update may set or clear
pub const PROFILE_FIELDS: [&str; 12] = [
    "name",
    "height_cm",
    "current_weight_kg",
    "baseline_weight_kg",
    "goal_weight_kg",
    "dob",
    "sex",
    "surgery_date",
    "surgery_type",
    "phase",
    "activity_level",
    "meals_per_day",
];

/// Fields to change
///
/// `None` leaves the stored value alone. Columns named in `clear`, and text
/// fields sent as an empty string, are reset to NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub baseline_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub dob: Option<String>,
    pub sex: Option<String>,
    pub surgery_date: Option<String>,
    pub surgery_type: Option<String>,
    pub phase: Option<String>,
    pub activity_level: Option<String>,
    pub meals_per_day: Option<u32>,
    #[serde(default)]
    pub clear: Vec<String>,
}

impl ProfileUpdate {
    /// Canonicalize and check every supplied field
    ///
    /// Enum strings are rewritten to their wire names and dates to ISO form,
    /// so the stored row always parses back. Blank text moves to `clear`.
    pub fn normalized(self) -> CalcResult<Self> {
        fn positive(field: &'static str, v: Option<f64>) -> CalcResult<Option<f64>> {
            match v {
                Some(x) if !(x.is_finite() && x > 0.0) => {
                    Err(CalcError::invalid(field, format!("must be a positive number, got {}", x)))
                }
                other => Ok(other),
            }
        }

        let mut clear = Vec::with_capacity(self.clear.len());
        for name in &self.clear {
            let field = PROFILE_FIELDS
                .iter()
                .find(|f| **f == name.trim())
                .ok_or_else(|| CalcError::invalid("clear", format!("unknown field '{}'", name)))?;
            clear.push(field.to_string());
        }

        let mut text = |field: &'static str, v: Option<String>| match v {
            Some(s) if s.trim().is_empty() => {
                clear.push(field.to_string());
                None
            }
            other => other,
        };
        let name = text("name", self.name);
        let dob = text("dob", self.dob);
        let sex = text("sex", self.sex);
        let surgery_date = text("surgery_date", self.surgery_date);
        let surgery_type = text("surgery_type", self.surgery_type);
        let phase = text("phase", self.phase);
        let activity_level = text("activity_level", self.activity_level);

        if self.meals_per_day == Some(0) {
            return Err(CalcError::invalid("meals_per_day", "must be at least 1"));
        }

        let date = |field: &'static str, v: Option<String>| -> CalcResult<Option<String>> {
            v.map(|s| parse_iso_date(field, &s).map(|d| d.to_string())).transpose()
        };

        let update = Self {
            name,
            height_cm: positive("height_cm", self.height_cm)?,
            current_weight_kg: positive("current_weight_kg", self.current_weight_kg)?,
            baseline_weight_kg: positive("baseline_weight_kg", self.baseline_weight_kg)?,
            goal_weight_kg: positive("goal_weight_kg", self.goal_weight_kg)?,
            dob: date("dob", dob)?,
            sex: sex.map(|s| Sex::parse(&s).map(|v| v.as_str().to_string())).transpose()?,
            surgery_date: date("surgery_date", surgery_date)?,
            surgery_type: surgery_type
                .map(|s| SurgeryType::parse(&s).map(|v| v.as_str().to_string()))
                .transpose()?,
            phase: phase.map(|s| Phase::parse(&s).map(|v| v.as_str().to_string())).transpose()?,
            activity_level: activity_level
                .map(|s| ActivityLevel::parse(&s).map(|v| v.as_str().to_string()))
                .transpose()?,
            meals_per_day: self.meals_per_day,
            clear,
        };

        for field in update.set_fields() {
            if update.clear.iter().any(|c| c == field) {
                return Err(CalcError::invalid(field, "cannot be both set and cleared"));
            }
        }

        Ok(update)
    }

    /// Names of the fields carrying a new value
    fn set_fields(&self) -> Vec<&'static str> {
        let present = [
            self.name.is_some(),
            self.height_cm.is_some(),
            self.current_weight_kg.is_some(),
            self.baseline_weight_kg.is_some(),
            self.goal_weight_kg.is_some(),
            self.dob.is_some(),
            self.sex.is_some(),
            self.surgery_date.is_some(),
            self.surgery_type.is_some(),
            self.phase.is_some(),
            self.activity_level.is_some(),
            self.meals_per_day.is_some(),
        ];
        PROFILE_FIELDS
            .iter()
            .zip(present)
            .filter_map(|(field, set)| set.then_some(*field))
            .collect()
    }
}

impl PatientProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            height_cm: row.get("height_cm")?,
            current_weight_kg: row.get("current_weight_kg")?,
            baseline_weight_kg: row.get("baseline_weight_kg")?,
            goal_weight_kg: row.get("goal_weight_kg")?,
            dob: row.get("dob")?,
            sex: row.get("sex")?,
            surgery_date: row.get("surgery_date")?,
            surgery_type: row.get("surgery_type")?,
            phase: row.get("phase")?,
            activity_level: row.get("activity_level")?,
            meals_per_day: row.get("meals_per_day")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile (single row table)
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM patient_profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge a normalized update into this profile
    fn apply(&mut self, u: ProfileUpdate) {
        for field in &u.clear {
            match field.as_str() {
                "name" => self.name = None,
                "height_cm" => self.height_cm = None,
                "current_weight_kg" => self.current_weight_kg = None,
                "baseline_weight_kg" => self.baseline_weight_kg = None,
                "goal_weight_kg" => self.goal_weight_kg = None,
                "dob" => self.dob = None,
                "sex" => self.sex = None,
                "surgery_date" => self.surgery_date = None,
                "surgery_type" => self.surgery_type = None,
                "phase" => self.phase = None,
                "activity_level" => self.activity_level = None,
                "meals_per_day" => self.meals_per_day = None,
                _ => {}
            }
        }

        self.name = u.name.or(self.name.take());
        self.height_cm = u.height_cm.or(self.height_cm.take());
        self.current_weight_kg = u.current_weight_kg.or(self.current_weight_kg.take());
        self.baseline_weight_kg = u.baseline_weight_kg.or(self.baseline_weight_kg.take());
        self.goal_weight_kg = u.goal_weight_kg.or(self.goal_weight_kg.take());
        self.dob = u.dob.or(self.dob.take());
        self.sex = u.sex.or(self.sex.take());
        self.surgery_date = u.surgery_date.or(self.surgery_date.take());
        self.surgery_type = u.surgery_type.or(self.surgery_type.take());
        self.phase = u.phase.or(self.phase.take());
        self.activity_level = u.activity_level.or(self.activity_level.take());
        self.meals_per_day = u.meals_per_day.or(self.meals_per_day.take());
    }

    /// Apply an update, creating the row on first use
    pub fn set(conn: &Connection, update: ProfileUpdate) -> DbResult<Self> {
        let update = update.normalized()?;
        let mut p = Self::get(conn)?.unwrap_or_default();
        p.apply(update);

        conn.execute(
            r#"
            INSERT INTO patient_profile (
                id, name, height_cm, current_weight_kg, baseline_weight_kg, goal_weight_kg,
                dob, sex, surgery_date, surgery_type, phase, activity_level, meals_per_day
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                height_cm = excluded.height_cm,
                current_weight_kg = excluded.current_weight_kg,
                baseline_weight_kg = excluded.baseline_weight_kg,
                goal_weight_kg = excluded.goal_weight_kg,
                dob = excluded.dob,
                sex = excluded.sex,
                surgery_date = excluded.surgery_date,
                surgery_type = excluded.surgery_type,
                phase = excluded.phase,
                activity_level = excluded.activity_level,
                meals_per_day = excluded.meals_per_day,
                updated_at = datetime('now')
            "#,
            params![
                p.name,
                p.height_cm,
                p.current_weight_kg,
                p.baseline_weight_kg,
                p.goal_weight_kg,
                p.dob,
                p.sex,
                p.surgery_date,
                p.surgery_type,
                p.phase,
                p.activity_level,
                p.meals_per_day,
            ],
        )?;

        Self::get(conn)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Parse stored strings into calculator inputs
    pub fn to_care_profile(&self) -> CalcResult<CareProfile> {
        Ok(CareProfile {
            height_cm: self.height_cm,
            current_weight_kg: self.current_weight_kg,
            baseline_weight_kg: self.baseline_weight_kg,
            goal_weight_kg: self.goal_weight_kg,
            dob: self.dob.as_deref().map(|s| parse_iso_date("dob", s)).transpose()?,
            sex: self.sex.as_deref().map(Sex::parse).transpose()?,
            surgery_date: self
                .surgery_date
                .as_deref()
                .map(|s| parse_iso_date("surgery_date", s))
                .transpose()?,
            surgery_type: self.surgery_type.as_deref().map(SurgeryType::parse).transpose()?,
            phase: self.phase.as_deref().map(Phase::parse).transpose()?,
            activity_level: self.activity_level.as_deref().map(ActivityLevel::parse).transpose()?,
            meals_per_day: self.meals_per_day,
        })
    }
}
