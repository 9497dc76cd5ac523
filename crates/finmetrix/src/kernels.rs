//! Unchecked TWR kernels
//!
//! Each kernel computes `(prod(1 + r_i)) - 1` over a slice and trusts its
//! input: callers are expected to run [`crate::validate_returns`] first.
//! An empty slice yields `0.0`, which is why the public entry points reject
//! empty input before getting here.

/// Number of independent accumulators in the accelerated fold
pub const LANES: usize = 4;

/// Sequential fold in input order
///
/// # Example
/// ```rust
/// let r = finmetrix::kernels::reference(&[0.05, 0.03]);
/// assert!((r - 0.0815).abs() < 1e-12);
/// ```
pub fn reference(returns: &[f64]) -> f64 {
    growth_sequential(returns) - 1.0
}

/// Multi-lane fold
///
/// Splits the product into [`LANES`] running accumulators so consecutive
/// multiplications do not depend on each other. Lanes are combined in a
/// fixed order, so the result is deterministic, but it may differ from
/// [`reference`] in the last bits.
#[cfg(feature = "accelerated")]
pub fn accelerated(returns: &[f64]) -> f64 {
    growth_lanes(returns) - 1.0
}

/// Chunked data-parallel fold on the rayon pool
///
/// Chunk boundaries depend only on `chunk_size` and the chunk factors are
/// multiplied back together in input order, so the result does not depend
/// on the number of threads. A chunk holding a total loss zeroes the whole
/// product even if another chunk overflowed.
#[cfg(feature = "parallel")]
pub fn parallel(returns: &[f64], chunk_size: usize) -> f64 {
    use rayon::prelude::*;

    let chunk_size = chunk_size.max(1);
    let factors: Vec<f64> = returns
        .par_chunks(chunk_size)
        .map(growth_lanes)
        .collect();

    tracing::trace!(
        "parallel kernel: {} returns in {} chunks of {}",
        returns.len(),
        factors.len(),
        chunk_size
    );

    if factors.contains(&0.0) {
        return -1.0;
    }
    factors.iter().product::<f64>() - 1.0
}

fn growth_sequential(returns: &[f64]) -> f64 {
    let mut acc = 1.0f64;
    for &r in returns {
        acc *= 1.0 + r;
    }
    acc
}

#[cfg(feature = "accelerated")]
fn growth_lanes(returns: &[f64]) -> f64 {
    let mut lanes = [1.0f64; LANES];
    let chunks = returns.chunks_exact(LANES);
    let tail = chunks.remainder();

    for chunk in chunks {
        for (lane, &r) in lanes.iter_mut().zip(chunk) {
            *lane *= 1.0 + r;
        }
    }

    // A zero lane stays zero; combining it with an overflowed lane must not give NaN
    if lanes.contains(&0.0) {
        return 0.0;
    }

    let mut acc = (lanes[0] * lanes[1]) * (lanes[2] * lanes[3]);
    for &r in tail {
        acc *= 1.0 + r;
    }
    acc
}
