//! Utility to set the patient profile in the database
//!
//! Usage: set_profile key=value [key=value ...]
//!
//! Keys: name, height_cm, current_weight_kg, baseline_weight_kg,
//! goal_weight_kg, dob, sex, surgery_date, surgery_type, phase,
//! activity_level, meals_per_day
//!
//! An empty value (`phase=`) clears the field.

use bcm::config::Config;
use bcm::models::{PatientProfile, ProfileUpdate, PROFILE_FIELDS};

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", key, value))
}

fn apply_arg(update: &mut ProfileUpdate, arg: &str) -> Result<(), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
    let key = key.trim();
    if value.trim().is_empty() {
        if !PROFILE_FIELDS.iter().any(|f| *f == key) {
            return Err(format!("unknown key '{}'", key));
        }
        update.clear.push(key.to_string());
        return Ok(());
    }
    let text = Some(value.to_string());

    match key {
        "name" => update.name = text,
        "height_cm" => update.height_cm = Some(parse_number(key, value)?),
        "current_weight_kg" => update.current_weight_kg = Some(parse_number(key, value)?),
        "baseline_weight_kg" => update.baseline_weight_kg = Some(parse_number(key, value)?),
        "goal_weight_kg" => update.goal_weight_kg = Some(parse_number(key, value)?),
        "dob" => update.dob = text,
        "sex" => update.sex = text,
        "surgery_date" => update.surgery_date = text,
        "surgery_type" => update.surgery_type = text,
        "phase" => update.phase = text,
        "activity_level" => update.activity_level = text,
        "meals_per_day" => update.meals_per_day = Some(parse_number(key, value)?),
        other => return Err(format!("unknown key '{}'", other)),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: set_profile key=value [key=value ...]");
        std::process::exit(2);
    }

    let mut update = ProfileUpdate::default();
    for arg in &args {
        apply_arg(&mut update, arg)?;
    }

    let config = Config::from_env();
    config.ensure_data_dir()?;
    println!("Database path: {}", config.database_path.display());

    let database = bcm::db::Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        bcm::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    database.with_conn(|conn| {
        let profile = PatientProfile::set(conn, update)?;
        println!("Patient profile set:");
        println!("{}", serde_json::to_string_pretty(&profile).unwrap_or_default());
        Ok(())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_args() {
        let mut update = ProfileUpdate::default();
        apply_arg(&mut update, "height_cm=165.5").unwrap();
        apply_arg(&mut update, "phase=soft").unwrap();
        apply_arg(&mut update, "meals_per_day=6").unwrap();
        assert_eq!(update.height_cm, Some(165.5));
        assert_eq!(update.phase.as_deref(), Some("soft"));
        assert_eq!(update.meals_per_day, Some(6));
    }

    #[test]
    fn test_apply_arg_errors() {
        let mut update = ProfileUpdate::default();
        assert!(apply_arg(&mut update, "height_cm").is_err());
        assert!(apply_arg(&mut update, "height_cm=tall").is_err());
        assert!(apply_arg(&mut update, "shoe_size=10").is_err());
        assert!(apply_arg(&mut update, "shoe_size=").is_err());
    }

    #[test]
    fn test_empty_value_clears_field() {
        let mut update = ProfileUpdate::default();
        apply_arg(&mut update, "goal_weight_kg=").unwrap();
        apply_arg(&mut update, "phase= ").unwrap();
        assert_eq!(update.goal_weight_kg, None);
        assert_eq!(update.clear, vec!["goal_weight_kg", "phase"]);
    }
}
