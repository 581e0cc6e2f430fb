//! Benchmark input vectors and their host-side wide mirrors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use wasmtime::{AsContext, AsContextMut};

use crate::config::DataSource;
use crate::error::{HarnessError, Result};
use crate::layout::VectorZone;
use crate::memory::SharedBuffer;
use crate::native::accumulator_fits;

/// Seeded generator when `seed` is given, OS entropy otherwise
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Both input vectors, as written to shared memory, plus `u64` copies for the
/// native kernel so it pays no widening cost while timed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkDataset {
    vec1: Vec<u32>,
    vec2: Vec<u32>,
    wide1: Vec<u64>,
    wide2: Vec<u64>,
}

impl BenchmarkDataset {
    /// Fill the vector zones from `source` and derive the dataset from them.
    pub fn populate(
        mut store: impl AsContextMut,
        buffer: &SharedBuffer,
        source: &DataSource,
    ) -> Result<Self> {
        match source {
            DataSource::Random { seed } => {
                let mut rng = rng(*seed);
                Self::populate_random(&mut store, buffer, &mut rng)
            }
            DataSource::Explicit { vec1, vec2 } => {
                Self::populate_explicit(&mut store, buffer, vec1, vec2)
            }
        }
    }

    /// Independent uniform draws in `[0, n)` for every element of both zones
    pub fn populate_random<R: Rng>(
        mut store: impl AsContextMut,
        buffer: &SharedBuffer,
        rng: &mut R,
    ) -> Result<Self> {
        let n = buffer.layout().n();
        let upper = u32::try_from(n).unwrap_or(u32::MAX);
        for zone in [VectorZone::Vec1, VectorZone::Vec2] {
            for index in 0..n {
                buffer.write_narrow(&mut store, zone, index, rng.gen_range(0..upper))?;
            }
        }
        Self::from_buffer(&store, buffer)
    }

    pub fn populate_explicit(
        mut store: impl AsContextMut,
        buffer: &SharedBuffer,
        vec1: &[u32],
        vec2: &[u32],
    ) -> Result<Self> {
        let n = buffer.layout().n();
        for (zone, values) in [(VectorZone::Vec1, vec1), (VectorZone::Vec2, vec2)] {
            if values.len() != n {
                return Err(HarnessError::DimensionMismatch {
                    expected: n,
                    actual: values.len(),
                });
            }
            for (index, value) in values.iter().enumerate() {
                buffer.write_narrow(&mut store, zone, index, *value)?;
            }
        }
        Self::from_buffer(&store, buffer)
    }

    /// Read both zones back through the narrow view and build the mirrors.
    ///
    /// Fails if `n * max(vec1) * max(vec2)` could overflow the accumulator.
    pub fn from_buffer(store: impl AsContext, buffer: &SharedBuffer) -> Result<Self> {
        let vec1 = buffer.read_zone(&store, VectorZone::Vec1);
        let vec2 = buffer.read_zone(&store, VectorZone::Vec2);
        Self::from_vectors(vec1, vec2)
    }

    pub fn from_vectors(vec1: Vec<u32>, vec2: Vec<u32>) -> Result<Self> {
        if vec1.len() != vec2.len() {
            return Err(HarnessError::DimensionMismatch {
                expected: vec1.len(),
                actual: vec2.len(),
            });
        }

        let n = vec1.len();
        let max1 = vec1.iter().copied().max().unwrap_or(0);
        let max2 = vec2.iter().copied().max().unwrap_or(0);
        if !accumulator_fits(n, max1 as u64, max2 as u64) {
            return Err(HarnessError::AccumulatorOverflow { n, max1, max2 });
        }

        debug!(n, max1, max2, "Dataset ready");

        let wide1 = vec1.iter().map(|v| *v as u64).collect();
        let wide2 = vec2.iter().map(|v| *v as u64).collect();
        Ok(Self {
            vec1,
            vec2,
            wide1,
            wide2,
        })
    }

    pub fn len(&self) -> usize {
        self.vec1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec1.is_empty()
    }

    pub fn vec1(&self) -> &[u32] {
        &self.vec1
    }

    pub fn vec2(&self) -> &[u32] {
        &self.vec2
    }

    /// `u64` mirrors used by the native kernel
    pub fn wide(&self) -> (&[u64], &[u64]) {
        (&self.wide1, &self.wide2)
    }
}
