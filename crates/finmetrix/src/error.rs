//! Error types for finmetrix

use thiserror::Error;

use crate::backend::Backend;

/// Result type for return-metric operations
pub type ReturnsResult<T> = Result<T, ReturnsError>;

/// Error types for return-metric operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReturnsError {
    /// The return sequence has no elements
    #[error("cannot compute with no returns")]
    Empty,

    /// A return is NaN
    #[error("return at index {index} is NaN")]
    NaN { index: usize },

    /// A return is positive or negative infinity
    #[error("return at index {index} is infinite ({value})")]
    Infinite { index: usize, value: f64 },

    /// A return of exactly -1.0 (strict validation only)
    #[error("total loss (-1.0 return) at index {index}; subsequent returns undefined")]
    TotalLoss { index: usize },

    /// A return below -1.0 (strict validation only)
    #[error(
        "return at index {index} is {value:.6}, less than -1.0 \
         (implies leverage or debt, outside TWR scope)"
    )]
    BelowTotalLoss { index: usize, value: f64 },

    /// The requested backend was not compiled into this build
    #[error("backend '{0}' is not available in this build")]
    BackendUnavailable(Backend),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReturnsError {
    /// Index of the offending element, for per-element validation failures
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::NaN { index }
            | Self::Infinite { index, .. }
            | Self::TotalLoss { index }
            | Self::BelowTotalLoss { index, .. } => Some(*index),
            _ => None,
        }
    }
}
