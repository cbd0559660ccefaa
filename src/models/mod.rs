//! Data models for BCM
//!
//! Stored records and their database operations.

pub mod intake_entry;
pub mod profile;
pub mod weight_entry;

pub use intake_entry::{IntakeEntry, IntakeEntryCreate, IntakeTotals};
pub use profile::{PatientProfile, ProfileUpdate, PROFILE_FIELDS};
pub use weight_entry::{WeightEntry, WeightEntryCreate};
