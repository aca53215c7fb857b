#![forbid(unsafe_code)]

//! Error types.

use thiserror::Error;

/// Convenience alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A configuration value was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid orientation `{value}`: expected `horizontal` or `vertical`")]
    InvalidOrientation { value: String },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be in {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[cfg(feature = "config")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    #[must_use]
    pub fn invalid_orientation(value: impl Into<String>) -> Self {
        Self::InvalidOrientation {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigError;

    #[test]
    fn orientation_error_names_both_choices() {
        let msg = ConfigError::invalid_orientation("diagonal").to_string();
        assert!(msg.contains("diagonal"));
        assert!(msg.contains("horizontal"));
        assert!(msg.contains("vertical"));
    }

    #[test]
    fn out_of_range_reports_field_and_value() {
        let err = ConfigError::OutOfRange {
            field: "max_angle",
            expected: "[0, 180]",
            value: 200.0,
        };
        assert_eq!(err.to_string(), "max_angle must be in [0, 180], got 200");
    }
}
