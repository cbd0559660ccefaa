//! Calculator error types

use thiserror::Error;

/// Errors raised by the clinical calculators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Reject zero, negative, NaN and infinite measurements
pub(crate) fn require_positive(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, format!("must be a positive number, got {}", value)))
    }
}

/// Round to one decimal place, half away from zero
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("weight_kg", 80.0), Ok(80.0));
        assert!(require_positive("weight_kg", 0.0).is_err());
        assert!(require_positive("weight_kg", -1.0).is_err());
        assert!(require_positive("weight_kg", f64::NAN).is_err());
        assert!(require_positive("weight_kg", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = require_positive("height_cm", 0.0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid height_cm: must be a positive number, got 0");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(24.94), 24.9);
        assert_eq!(round1(24.96), 25.0);
        assert_eq!(round1(60.0), 60.0);
    }
}
