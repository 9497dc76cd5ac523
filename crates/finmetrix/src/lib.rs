//! finmetrix: explicit finance metrics
//!
//! This crate computes the time-weighted return (TWR) of a sequence of
//! periodic returns:
//!
//! - **Validation**: empty and non-finite input is rejected with a
//!   [`ReturnsError`] instead of producing a misleading number
//! - **Kernels**: a reference fold, a multi-lane accelerated fold and a
//!   chunked parallel fold, all computing `prod(1 + r_i) - 1`
//! - **Backend selection**: kernels are picked at runtime from what the
//!   build provides (cargo features `accelerated` and `parallel`)
//!
//! # Examples
//!
//! ```rust
//! use finmetrix::{compute_twr, TwrCalculator, TwrConfig, ValidationPolicy};
//!
//! # fn main() -> finmetrix::ReturnsResult<()> {
//! let r = compute_twr(&[0.05, 0.03, -0.02])?;
//! assert!((r - 0.05987).abs() < 1e-12);
//!
//! let strict = TwrCalculator::new(TwrConfig::new().with_validation(ValidationPolicy::Strict))?;
//! assert!(strict.calculate(&[0.1, -1.0]).is_err());
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod error;
pub mod kernels;
mod twr;
mod validation;

pub use backend::Backend;
pub use config::{
    TwrConfig, DEFAULT_PARALLEL_CHUNK_SIZE, DEFAULT_PARALLEL_THRESHOLD, ENV_BACKEND,
    ENV_PARALLEL_CHUNK_SIZE, ENV_PARALLEL_THRESHOLD, ENV_VALIDATION,
};
pub use error::{ReturnsError, ReturnsResult};
pub use twr::{active_backend, compute_twr, compute_twr_with, twr, TwrCalculator};
pub use validation::{validate_returns, ValidationPolicy};
