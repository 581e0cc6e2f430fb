//! Fixed run parameters.
//!
//! There is no command line or config file: the binary runs
//! [`HarnessConfig::default`]. Tests build their own configurations.

use std::path::PathBuf;

use crate::layout::WASM_PAGE_SIZE;

/// Elements per vector in the shipped run
pub const VEC_LEN: usize = 16384;

/// Bytes below the vector zones left to the guest's shadow stack and statics
pub const GUEST_RESERVED_BYTES: u32 = WASM_PAGE_SIZE as u32;

/// Where `cargo build -p vector-wasm --target wasm32-unknown-unknown --release`
/// leaves the guest module
pub const DEFAULT_GUEST_PATH: &str = "target/wasm32-unknown-unknown/release/vector_wasm.wasm";

pub const REFERENCE_LABEL: &str = "Native";
pub const CANDIDATE_LABEL: &str = "WebAssembly";

/// Where the vector contents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Uniform values in `[0, n)`; seeded runs are reproducible
    Random { seed: Option<u64> },
    /// Fixed contents, both of length `n`
    Explicit { vec1: Vec<u32>, vec2: Vec<u32> },
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub n: usize,
    /// Byte offset of the first vector zone, 8-byte aligned
    pub layout_base: u32,
    pub guest_path: PathBuf,
    pub data: DataSource,
    pub reference_label: String,
    pub candidate_label: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            n: VEC_LEN,
            layout_base: GUEST_RESERVED_BYTES,
            guest_path: PathBuf::from(DEFAULT_GUEST_PATH),
            data: DataSource::Random { seed: None },
            reference_label: REFERENCE_LABEL.to_string(),
            candidate_label: CANDIDATE_LABEL.to_string(),
        }
    }
}
