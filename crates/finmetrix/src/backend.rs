//! Kernel backends and runtime selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReturnsError, ReturnsResult};
use crate::kernels;

/// A concrete implementation of the TWR reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Plain sequential fold, always compiled in
    Reference,
    /// Multi-lane fold (feature `accelerated`)
    Accelerated,
    /// Chunked rayon fold (feature `parallel`)
    Parallel,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Reference, Backend::Accelerated, Backend::Parallel];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Accelerated => "accelerated",
            Self::Parallel => "parallel",
        }
    }

    /// Whether this backend was compiled into the current build
    pub fn is_available(&self) -> bool {
        match self {
            Self::Reference => true,
            Self::Accelerated => cfg!(feature = "accelerated"),
            Self::Parallel => cfg!(feature = "parallel"),
        }
    }

    /// All backends compiled into the current build
    pub fn available() -> Vec<Backend> {
        Self::ALL.into_iter().filter(Backend::is_available).collect()
    }

    /// Pick a backend for an input of `len` returns
    ///
    /// Prefers the parallel kernel for inputs of at least `parallel_threshold`
    /// returns, then the accelerated kernel, then the reference fold.
    pub fn auto(len: usize, parallel_threshold: usize) -> Backend {
        if Self::Parallel.is_available() && len >= parallel_threshold {
            Self::Parallel
        } else if Self::Accelerated.is_available() {
            Self::Accelerated
        } else {
            Self::Reference
        }
    }

    /// Fail with [`ReturnsError::BackendUnavailable`] if not compiled in
    pub fn ensure_available(self) -> ReturnsResult<Backend> {
        if self.is_available() {
            Ok(self)
        } else {
            Err(ReturnsError::BackendUnavailable(self))
        }
    }

    /// Run this backend's kernel without validation
    ///
    /// Unavailable backends fall back to the reference fold; use
    /// [`Backend::ensure_available`] when that matters.
    #[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
    pub(crate) fn run(self, returns: &[f64], parallel_chunk_size: usize) -> f64 {
        match self {
            #[cfg(feature = "parallel")]
            Self::Parallel => kernels::parallel(returns, parallel_chunk_size),
            #[cfg(feature = "accelerated")]
            Self::Accelerated => kernels::accelerated(returns),
            _ => kernels::reference(returns),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ReturnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(Self::Reference),
            "accelerated" | "native" => Ok(Self::Accelerated),
            "parallel" => Ok(Self::Parallel),
            other => Err(ReturnsError::InvalidConfig(format!(
                "unknown backend '{other}' (expected 'reference', 'accelerated' or 'parallel')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_always_available() {
        assert!(Backend::Reference.is_available());
        assert!(Backend::available().contains(&Backend::Reference));
        assert_eq!(Backend::Reference.ensure_available(), Ok(Backend::Reference));
    }

    #[test]
    fn test_available_matches_features() {
        assert_eq!(Backend::Accelerated.is_available(), cfg!(feature = "accelerated"));
        assert_eq!(Backend::Parallel.is_available(), cfg!(feature = "parallel"));
    }

    #[cfg(all(feature = "accelerated", feature = "parallel"))]
    #[test]
    fn test_auto_selection_by_length() {
        assert_eq!(Backend::auto(10, 1_000), Backend::Accelerated);
        assert_eq!(Backend::auto(999, 1_000), Backend::Accelerated);
        assert_eq!(Backend::auto(1_000, 1_000), Backend::Parallel);
    }

    #[cfg(not(feature = "accelerated"))]
    #[test]
    fn test_auto_falls_back_to_reference() {
        assert_eq!(Backend::auto(10, 1_000), Backend::Reference);
        assert_eq!(Backend::auto(1_000_000, 1_000), Backend::Reference);
    }

    #[test]
    fn test_parse_and_display() {
        for backend in Backend::ALL {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
        assert_eq!("NATIVE".parse::<Backend>().unwrap(), Backend::Accelerated);
        assert!(matches!(
            "gpu".parse::<Backend>(),
            Err(ReturnsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_every_backend() {
        let returns = [0.05, 0.03, -0.02];
        for backend in Backend::available() {
            let r = backend.run(&returns, 2);
            assert!((r - 0.05987).abs() < 1e-12, "{backend}: {r}");
        }
    }
}
