//! Error types for the benchmark harness

use std::path::PathBuf;

use thiserror::Error;

use crate::layout::VectorZone;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Every failure is terminal for the run; nothing here is retried.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Vector length must be non-zero
    #[error("Vector length must be greater than 0")]
    EmptyVector,

    /// Layout does not fit in a 32-bit linear memory
    #[error("Layout for {n} elements at base {base} overflows 32-bit linear memory")]
    LayoutOverflow { n: usize, base: u32 },

    /// Layout base is not aligned to the wide element size
    #[error("Layout base {base} is not aligned to {align} bytes")]
    MisalignedBase { base: u32, align: u32 },

    /// Guest static data reaches into the vector zones
    #[error("Guest heap base {heap_base} overlaps vector zones starting at {layout_base}")]
    LayoutConflict { heap_base: u32, layout_base: u32 },

    /// Narrow element access outside of its zone
    #[error("Index {index} out of bounds for {zone} (length {len})")]
    OutOfBounds {
        zone: VectorZone,
        index: usize,
        len: usize,
    },

    /// Two vectors of different lengths
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The u64 accumulator could overflow for this data
    #[error("Dot product of {n} elements with maxima {max1} and {max2} may overflow u64")]
    AccumulatorOverflow { n: usize, max1: u32, max2: u32 },

    /// Template table entry is inconsistent
    #[error("Log template {index} is invalid: {reason}")]
    InvalidTemplate { index: usize, reason: String },

    /// Guest asked for a template that does not exist
    #[error("Guest requested unknown log template {0}")]
    UnknownTemplate(i32),

    /// Creating the shared linear memory failed
    #[error("Failed to allocate shared memory: {0:#}")]
    Memory(anyhow::Error),

    /// Guest module could not be read from storage
    #[error("Failed to read guest module {}: {source}", .path.display())]
    ModuleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Guest module bytes are not a valid module
    #[error("Failed to compile guest module: {0:#}")]
    ModuleCompile(anyhow::Error),

    /// Imports could not be satisfied
    #[error("Failed to link guest module: {0:#}")]
    Link(anyhow::Error),

    /// Entry point missing or with the wrong signature
    #[error("Guest export `{name}` is missing or mismatched: {cause:#}")]
    Export { name: String, cause: anyhow::Error },

    /// The guest trapped during its call
    #[error("Guest kernel trapped: {0:#}")]
    GuestTrap(anyhow::Error),
}
