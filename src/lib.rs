//! Bariatric Care Manager (BCM) Library
//!
//! Clinical calculations, patient profile storage and weight/intake logs for
//! weight-loss surgery care.

pub mod build_info;
pub mod calculators;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
