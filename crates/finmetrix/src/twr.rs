//! Time-weighted return
//!
//! The TWR of a sequence of periodic returns compounds each period
//! independently: `prod(1 + r_i) - 1`. A -1.0 return drives the running
//! product to zero, so any sequence containing one yields -1.0.

use crate::backend::Backend;
use crate::config::{TwrConfig, DEFAULT_PARALLEL_CHUNK_SIZE, DEFAULT_PARALLEL_THRESHOLD};
use crate::error::ReturnsResult;
use crate::validation::{validate_returns, ValidationPolicy};

/// Compute the time-weighted return of `returns`
///
/// Validates that the sequence is non-empty and finite, then runs the
/// backend picked for its length.
///
/// # Example
/// ```rust
/// use finmetrix::{compute_twr, ReturnsError};
///
/// let r = compute_twr(&[0.05, 0.03, -0.02]).unwrap();
/// assert!((r - 0.05987).abs() < 1e-12);
///
/// assert_eq!(compute_twr(&[0.10, -1.0, 0.20]), Ok(-1.0));
/// assert_eq!(compute_twr(&[]), Err(ReturnsError::Empty));
/// ```
pub fn compute_twr(returns: &[f64]) -> ReturnsResult<f64> {
    validate(returns, ValidationPolicy::Finite)?;
    let backend = Backend::auto(returns.len(), DEFAULT_PARALLEL_THRESHOLD);
    tracing::trace!("TWR over {} returns on {} backend", returns.len(), backend);
    Ok(backend.run(returns, DEFAULT_PARALLEL_CHUNK_SIZE))
}

/// Compute the time-weighted return of any sequence of returns
///
/// The iterator is collected before validation.
///
/// # Example
/// ```rust
/// let r = finmetrix::twr([0.01, 0.02].iter().copied()).unwrap();
/// assert!((r - 0.0302).abs() < 1e-12);
/// ```
pub fn twr<I>(returns: I) -> ReturnsResult<f64>
where
    I: IntoIterator<Item = f64>,
{
    let returns: Vec<f64> = returns.into_iter().collect();
    compute_twr(&returns)
}

/// Compute the time-weighted return on a specific backend
pub fn compute_twr_with(returns: &[f64], backend: Backend) -> ReturnsResult<f64> {
    let backend = backend.ensure_available()?;
    validate(returns, ValidationPolicy::Finite)?;
    tracing::trace!("TWR over {} returns on {} backend (requested)", returns.len(), backend);
    Ok(backend.run(returns, DEFAULT_PARALLEL_CHUNK_SIZE))
}

/// Backend used by automatic selection for ordinary inputs
pub fn active_backend() -> Backend {
    Backend::auto(0, DEFAULT_PARALLEL_THRESHOLD)
}

/// A reusable TWR calculator with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct TwrCalculator {
    config: TwrConfig,
}

impl TwrCalculator {
    /// Create a calculator, rejecting configurations this build cannot honor
    pub fn new(config: TwrConfig) -> ReturnsResult<Self> {
        config.validate()?;
        tracing::debug!(
            "TWR calculator: backend={}, validation={}, parallel_threshold={}",
            config.backend.map_or("auto", |b| b.name()),
            config.validation,
            config.parallel_threshold
        );
        Ok(Self { config })
    }

    /// Create a calculator from `FINMETRIX_*` environment variables
    pub fn from_env() -> ReturnsResult<Self> {
        Self::new(TwrConfig::from_env()?)
    }

    pub fn config(&self) -> &TwrConfig {
        &self.config
    }

    /// Backend a call with `len` returns would run on
    pub fn backend_for(&self, len: usize) -> Backend {
        self.config
            .backend
            .unwrap_or_else(|| Backend::auto(len, self.config.parallel_threshold))
    }

    /// Validate `returns` under the configured policy and compute their TWR
    pub fn calculate(&self, returns: &[f64]) -> ReturnsResult<f64> {
        validate(returns, self.config.validation)?;

        let backend = self.backend_for(returns.len());
        tracing::trace!("TWR over {} returns on {} backend", returns.len(), backend);

        Ok(backend.run(returns, self.config.parallel_chunk_size))
    }
}

fn validate(returns: &[f64], policy: ValidationPolicy) -> ReturnsResult<()> {
    validate_returns(returns, policy).inspect_err(|e| {
        tracing::debug!("rejected return sequence ({} values, {} policy): {}", returns.len(), policy, e);
    })
}
