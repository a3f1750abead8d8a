//! Error types for astromem

use thiserror::Error;

use crate::dynamics::StateField;

/// Astromem error type
#[derive(Debug, Error)]
pub enum AstroError {
    /// Configuration rejected before any computation
    #[error("Invalid config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Memory bank entry that is not exactly ±1
    #[error("Invalid memory pattern entry at ({row}, {col}): {value} is not ±1")]
    InvalidPattern { row: usize, col: usize, value: f64 },

    /// Shape mismatch
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Integration produced a non-finite state
    #[error("Computation failed at step {step}: {field} state is no longer finite")]
    ComputationFailed { step: u64, field: StateField },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl AstroError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AstroError>;
