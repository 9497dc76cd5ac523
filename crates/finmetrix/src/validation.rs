//! Input validation for return sequences
//!
//! Every public entry point validates before a kernel runs, so the kernels
//! themselves can stay branch-free.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReturnsError, ReturnsResult};

/// How strictly a return sequence is checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Non-empty and every value finite. A -1.0 return is accepted and
    /// compounds to a total loss.
    #[default]
    Finite,

    /// Additionally rejects total losses (-1.0) and returns below -1.0
    Strict,
}

impl ValidationPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Finite => "finite",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidationPolicy {
    type Err = ReturnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "finite" => Ok(Self::Finite),
            "strict" => Ok(Self::Strict),
            other => Err(ReturnsError::InvalidConfig(format!(
                "unknown validation policy '{other}' (expected 'finite' or 'strict')"
            ))),
        }
    }
}

/// Validate a return sequence under the given policy
///
/// The first offending element wins; its index is carried in the error.
///
/// # Example
/// ```rust
/// use finmetrix::{validate_returns, ReturnsError, ValidationPolicy};
///
/// assert!(validate_returns(&[0.05, -1.0], ValidationPolicy::Finite).is_ok());
/// assert_eq!(
///     validate_returns(&[0.05, -1.0], ValidationPolicy::Strict),
///     Err(ReturnsError::TotalLoss { index: 1 }),
/// );
/// ```
pub fn validate_returns(returns: &[f64], policy: ValidationPolicy) -> ReturnsResult<()> {
    if returns.is_empty() {
        return Err(ReturnsError::Empty);
    }

    for (index, &r) in returns.iter().enumerate() {
        check_value(index, r, policy)?;
    }

    Ok(())
}

fn check_value(index: usize, r: f64, policy: ValidationPolicy) -> ReturnsResult<()> {
    if r.is_nan() {
        return Err(ReturnsError::NaN { index });
    }
    if r.is_infinite() {
        return Err(ReturnsError::Infinite { index, value: r });
    }

    if policy == ValidationPolicy::Strict {
        if r == -1.0 {
            return Err(ReturnsError::TotalLoss { index });
        }
        if r < -1.0 {
            return Err(ReturnsError::BelowTotalLoss { index, value: r });
        }
    }

    Ok(())
}
