//! Error handling for the trust-scoring engine
//!
//! Three layers, matching how failures are allowed to surface:
//! - [`ConfigError`]: rejected at profile/adapter construction, never at
//!   analysis time.
//! - [`SignalError`]: adapter-local; absorbed into each category's
//!   documented neutral default and never escapes the orchestration.
//! - [`AnalysisError`]: the only error a caller of `analyze` sees. The
//!   top-level operation is all-or-nothing: a complete result or a labeled
//!   failure, never a partial one.

use std::time::Duration;

use thiserror::Error;

use crate::signal::SignalCategory;

/// Fatal configuration problems, caught when a profile or adapter is built.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("profile '{profile}' weights sum to {sum}, expected 1.0")]
    WeightSum { profile: String, sum: f64 },

    #[error("profile '{profile}' has no categories")]
    EmptyProfile { profile: String },

    #[error("profile '{profile}' lists category '{category}' more than once")]
    DuplicateCategory {
        profile: String,
        category: SignalCategory,
    },

    #[error("profile '{profile}' weight {weight} for '{category}' outside [0,1]")]
    InvalidWeight {
        profile: String,
        category: SignalCategory,
        weight: f64,
    },

    #[error("profile '{profile}' risk tier cut points must be strictly descending")]
    TierOrder { profile: String },

    #[error("invalid adapter setting '{name}': {reason}")]
    AdapterSetting { name: String, reason: String },
}

/// Failures local to one signal adapter call.
///
/// These are handled inside the analysis: the affected category degrades to
/// its neutral default and the run continues.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("signal fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed upstream response: {0}")]
    Malformed(String),

    #[error("adapter unavailable: {0}")]
    Unavailable(String),
}

/// Top-level analysis failure, carrying a human-readable reason.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("analysis failed: {reason}")]
    Internal {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    pub fn internal(reason: impl Into<String>) -> Self {
        AnalysisError::Internal {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn internal_with(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AnalysisError::Internal {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias for convenience
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::WeightSum {
            profile: "diligence".to_string(),
            sum: 0.9,
        };
        assert_eq!(
            err.to_string(),
            "profile 'diligence' weights sum to 0.9, expected 1.0"
        );
    }

    #[test]
    fn test_analysis_error_from_config() {
        let err: AnalysisError = ConfigError::EmptyProfile {
            profile: "custom".to_string(),
        }
        .into();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_internal_error_carries_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = AnalysisError::internal_with("aggregation blew up", io);
        match err {
            AnalysisError::Internal { source, .. } => assert!(source.is_some()),
            _ => panic!("expected Internal"),
        }
    }
}
