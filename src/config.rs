//! Runtime configuration
//!
//! Settings come from the environment, with defaults relative to the
//! executable so `cargo run` and installed binaries find the same database.

use std::path::{Path, PathBuf};

/// Overrides the database location
pub const DATABASE_PATH_VAR: &str = "BCM_DATABASE_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        Self::resolve(std::env::var(DATABASE_PATH_VAR).ok(), exe_dir)
    }

    fn resolve(database_path: Option<String>, exe_dir: Option<PathBuf>) -> Self {
        let database_path = match database_path.filter(|s| !s.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path(exe_dir.unwrap_or_else(|| PathBuf::from("."))),
        };

        Self { database_path }
    }

    /// Create the database's parent directory if missing
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        match self.database_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

fn default_database_path(exe_dir: PathBuf) -> PathBuf {
    let mut path = exe_dir;

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(Path::parent) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("bcm.db");
    path
}
