//! BCM Status Tool
//!
//! Provides runtime status information about the BCM service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Care guidance for AI assistants using the BCM tools
pub const CARE_INSTRUCTIONS: &str = r#"
# BCM Care Calculation Instructions

This guide explains how to use the Bariatric Care Manager (BCM) tools to
answer nutrition and recovery questions for a weight-loss surgery patient.

## Overview

BCM has three kinds of tools:
1. **Calculators** - Stateless. Pass every input explicitly.
2. **Profile tools** - Read or update the stored patient profile, and build
   a full care plan from it.
3. **Log tools** - Record weights and protein/fluid intake over time.

All calculators accept metric inputs. Weight and height tools also accept a
unit (`kg`/`lbs`, `cm`/`m`/`in`/`ft`) and convert before calculating.

---

## Diet Phases

Phases in order of progression:

| Phase | Wire name | Typical timing |
|-------|-----------|----------------|
| Pre-Op | `pre_op` | Before surgery |
| Clear Liquid | `clear_liquid` | Days 1-2 |
| Full Liquid | `full_liquid` | Week 1-2 |
| Pureed | `pureed` | Weeks 2-4 |
| Soft Food | `soft` | Weeks 4-6 |
| Regular | `regular` | Week 6 onward |
| Maintenance | `maintenance` | Long term |

If the phase is unknown, omit it. Calculators fall back to general defaults
(80 g protein, 1800 ml fluid, 200 ml portions). Never guess a phase.

---

## Protein

- Pre-op: 1.0 g/kg ideal body weight, minimum 60 g
- Clear and full liquid: 60 g
- Pureed and soft: 1.2 g/kg ideal body weight, minimum 60 g
- Regular and maintenance: 1.5 g/kg of current weight, or of ideal body
  weight once current weight exceeds 130% of it

Daily grams are split evenly across meals (default 5).

## Fluid

- Clear liquid, first 3 post-op days: 1000 ml
- Clear liquid after that: 30 ml/kg, at most 1500 ml
- Full liquid and pureed: 30 ml/kg, at most 1800 ml (under about 33 kg this
  falls below 1000 ml)
- Soft, regular and maintenance: 30 ml/kg, clamped to 1500-2000 ml

Fluids are sipped, never gulped, and kept 30 minutes away from meals once
solids start.

## Supplements

`calculate_supplement_schedule` returns only supplements whose start day has
been reached. Vitamin B12 applies to bypass patients only.

---

## Getting the Current Date

`calculate_age` and `days_since_surgery` use the server clock unless a
reference date is given. Prefer passing an explicit `as_of` date when the user
refers to a specific day.

---

## Profile Workflow

1. `get_profile` to see what is stored
2. `set_profile` with only the fields that changed. To unset a field, list
   it in `clear` (for example `["phase"]`) or send an empty string
3. `get_care_plan` to produce a full report

`get_care_plan` notes any section it could not compute and which inputs are
missing. Ask the user for those values rather than assuming them.

## Logging Workflow

- `log_weight` records a dated weight. When it is the newest entry it also
  becomes the profile's current weight, so targets follow the patient.
  Backfilled older weights only add history.
- `log_intake` records protein grams and/or fluid (ml, l, fl oz or cup).
- `get_daily_intake` lists a day's entries with totals.
- `calculate_daily_progress` compares a day's logged totals against the
  profile's targets and reports weight lost in kg and percent of baseline.

Days are UTC calendar days.

---

## Safety Notes

- These calculations support, not replace, the bariatric team's instructions.
- Flag a BMI under 18.5, fluid intake under target for several days, or any
  supplement gap to the user as something to raise with their care team.
"#;

/// Runtime status of the BCM service
#[derive(Debug, Clone, Serialize)]
pub struct BcmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub profile_configured: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, profile_configured: bool) -> BcmStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        BcmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            profile_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
