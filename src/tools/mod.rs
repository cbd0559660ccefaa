//! BCM Tools module
//!
//! MCP tool implementations for the Bariatric Care Manager.

pub mod calculators;
pub mod logs;
pub mod profile;
pub mod status;
