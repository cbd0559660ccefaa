//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
        tracing::info!("Applied schema migration v2");
    }

    Ok(())
}

/// Migration v1: patient profile
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PATIENT PROFILE
        -- Single row (id = 1) feeding the care plan
        -- ============================================
        CREATE TABLE patient_profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            name TEXT,
            height_cm REAL CHECK(height_cm IS NULL OR height_cm > 0),
            current_weight_kg REAL CHECK(current_weight_kg IS NULL OR current_weight_kg > 0),
            baseline_weight_kg REAL CHECK(baseline_weight_kg IS NULL OR baseline_weight_kg > 0),
            goal_weight_kg REAL CHECK(goal_weight_kg IS NULL OR goal_weight_kg > 0),
            dob TEXT,                            -- ISO date: "1980-03-15"
            sex TEXT CHECK(sex IS NULL OR sex IN ('male', 'female')),
            surgery_date TEXT,                   -- ISO date
            surgery_type TEXT CHECK(surgery_type IS NULL OR surgery_type IN ('sleeve', 'bypass', 'band')),
            phase TEXT CHECK(phase IS NULL OR phase IN (
                'pre_op', 'clear_liquid', 'full_liquid', 'pureed', 'soft', 'regular', 'maintenance')),
            activity_level TEXT CHECK(activity_level IS NULL OR activity_level IN (
                'sedentary', 'light', 'moderate', 'active', 'very_active')),
            meals_per_day INTEGER CHECK(meals_per_day IS NULL OR meals_per_day > 0),

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Migration v2: weight and intake logs
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- WEIGHT LOG
        -- The newest entry is mirrored into patient_profile.current_weight_kg
        -- ============================================
        CREATE TABLE weight_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            measured_at TEXT NOT NULL,           -- ISO 8601 date: "2025-06-15"
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            bmi REAL,                            -- at time of entry, when height was known
            source TEXT NOT NULL DEFAULT 'manual',
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_weight_log_measured_at ON weight_log(measured_at);

        -- ============================================
        -- INTAKE LOG
        -- Protein and fluid consumed; summed per calendar day
        -- ============================================
        CREATE TABLE intake_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            logged_at TEXT NOT NULL,             -- ISO 8601
            protein_g REAL NOT NULL DEFAULT 0 CHECK(protein_g >= 0),
            fluid_ml REAL NOT NULL DEFAULT 0 CHECK(fluid_ml >= 0),
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_intake_log_logged_at ON intake_log(logged_at);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_profile_table_rejects_unknown_phase() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO patient_profile (id, phase) VALUES (1, 'liquid')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_log_tables_reject_negative_amounts() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let weight = conn.execute(
            "INSERT INTO weight_log (measured_at, weight_kg) VALUES ('2025-06-15T07:00:00Z', 0)",
            [],
        );
        assert!(weight.is_err());
        let intake = conn.execute(
            "INSERT INTO intake_log (logged_at, fluid_ml) VALUES ('2025-06-15T07:00:00Z', -5)",
            [],
        );
        assert!(intake.is_err());
    }
}
