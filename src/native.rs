//! Host-native reference kernel.

use crate::error::{HarnessError, Result};

/// Whether `n` products of values up to `max1` and `max2` sum inside `u64`
pub fn accumulator_fits(n: usize, max1: u64, max2: u64) -> bool {
    max1.checked_mul(max2)
        .and_then(|p| p.checked_mul(n as u64))
        .is_some()
}

/// Dot product over the wide mirrors of both vectors.
///
/// Precondition: the sum fits in `u64`, i.e. [`accumulator_fits`] holds for
/// the inputs. [`BenchmarkDataset`] checks this when it is built, so no
/// widening or overflow test runs in here. Debug builds assert it.
///
/// [`BenchmarkDataset`]: crate::dataset::BenchmarkDataset
pub fn dot_product_native(vec1: &[u64], vec2: &[u64]) -> Result<u64> {
    if vec1.len() != vec2.len() {
        return Err(HarnessError::DimensionMismatch {
            expected: vec1.len(),
            actual: vec2.len(),
        });
    }
    debug_assert!(
        accumulator_fits(
            vec1.len(),
            vec1.iter().copied().max().unwrap_or(0),
            vec2.iter().copied().max().unwrap_or(0),
        ),
        "dot product may overflow the u64 accumulator"
    );

    Ok(vec1.iter().zip(vec2).map(|(a, b)| a * b).sum())
}
