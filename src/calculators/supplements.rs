//! Post-operative supplement schedule
//!
//! A fixed catalog of bariatric supplements, each with the post-op day on
//! which it becomes due. The active schedule is the catalog filtered by days
//! elapsed, in catalog order.

use serde::{Deserialize, Serialize};

use super::types::SurgeryType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementScheduleItem {
    pub name: String,
    pub dose: String,
    pub frequency: String,
    /// Times of day, "HH:MM"
    pub timing: Vec<String>,
    /// Post-op day on which the supplement becomes due
    pub start_day: u32,
    pub notes: String,
}

struct CatalogEntry {
    name: &'static str,
    dose: &'static str,
    frequency: &'static str,
    timing: &'static [&'static str],
    start_day: u32,
    notes: &'static str,
    bypass_only: bool,
}

const CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        name: "Bariatric Multivitamin",
        dose: "2 chewable tablets",
        frequency: "Daily",
        timing: &["08:00", "20:00"],
        start_day: 1,
        notes: "Take with food when tolerated",
        bypass_only: false,
    },
    CatalogEntry {
        name: "Calcium Citrate",
        dose: "500-600mg",
        frequency: "2-3 times daily",
        timing: &["09:00", "15:00", "21:00"],
        start_day: 14,
        notes: "Take separate from multivitamin (2+ hours apart)",
        bypass_only: false,
    },
    CatalogEntry {
        name: "Vitamin B12",
        dose: "500-1000 mcg sublingual",
        frequency: "Daily",
        timing: &["08:00"],
        start_day: 7,
        notes: "May switch to monthly injection per provider",
        bypass_only: true,
    },
    CatalogEntry {
        name: "Iron (Ferrous Sulfate or Citrate)",
        dose: "45-60mg elemental iron",
        frequency: "Daily",
        timing: &["08:00"],
        start_day: 30,
        notes: "Take with Vitamin C, separate from calcium by 2+ hours",
        bypass_only: false,
    },
    CatalogEntry {
        name: "Vitamin D3",
        dose: "3000 IU",
        frequency: "Daily",
        timing: &["08:00"],
        start_day: 1,
        notes: "Take with calcium for absorption",
        bypass_only: false,
    },
];

impl CatalogEntry {
    fn applies_to(&self, surgery_type: SurgeryType) -> bool {
        !self.bypass_only || surgery_type == SurgeryType::Bypass
    }

    fn to_item(&self) -> SupplementScheduleItem {
        SupplementScheduleItem {
            name: self.name.to_string(),
            dose: self.dose.to_string(),
            frequency: self.frequency.to_string(),
            timing: self.timing.iter().map(|t| t.to_string()).collect(),
            start_day: self.start_day,
            notes: self.notes.to_string(),
        }
    }
}

/// Supplements due for a procedure on a given post-op day
pub fn calculate_supplement_schedule(
    surgery_type: SurgeryType,
    days_since_surgery: u32,
) -> Vec<SupplementScheduleItem> {
    CATALOG
        .iter()
        .filter(|entry| entry.applies_to(surgery_type))
        .filter(|entry| days_since_surgery >= entry.start_day)
        .map(CatalogEntry::to_item)
        .collect()
}

/// Full catalog for a procedure regardless of post-op day
pub fn supplement_catalog(surgery_type: SurgeryType) -> Vec<SupplementScheduleItem> {
    calculate_supplement_schedule(surgery_type, u32::MAX)
}
