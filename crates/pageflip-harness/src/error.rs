use pageflip_core::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid trace at line {line}: {message}")]
    InvalidTrace { line: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidArgument { .. } => 2,
            Self::InvalidTrace { .. } => 3,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid_trace(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidTrace {
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HarnessError;
    use pageflip_core::ConfigError;

    #[test]
    fn invalid_trace_reports_line() {
        let error = HarnessError::invalid_trace(7, "unknown event `tap`");
        assert_eq!(error.exit_code(), 3);
        assert_eq!(
            error.to_string(),
            "invalid trace at line 7: unknown event `tap`"
        );
    }

    #[test]
    fn config_errors_exit_with_usage_code() {
        let error = HarnessError::from(ConfigError::invalid_orientation("diagonal"));
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().starts_with("config error: invalid orientation"));
    }

    #[test]
    fn io_errors_exit_with_one() {
        let error = HarnessError::from(std::io::Error::other("disk gone"));
        assert_eq!(error.exit_code(), 1);
    }
}
