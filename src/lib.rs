//! Dot product benchmark: a host-native kernel against a WebAssembly kernel
//! that shares one linear memory with the host.
//!
//! Both vectors live in the shared memory at offsets described by a
//! [`LayoutDescriptor`]. The native kernel works on `u64` mirrors of them,
//! the guest reads them in place and writes its `u64` result after them.

pub mod bridge;
pub mod config;
pub mod dataset;
pub mod error;
pub mod guest;
pub mod harness;
pub mod layout;
pub mod memory;
pub mod native;
pub mod report;
pub mod timing;

pub use bridge::{CollectingSink, DebugBridge, LogSink, TracingSink};
pub use config::{DataSource, HarnessConfig};
pub use dataset::BenchmarkDataset;
pub use error::{HarnessError, Result};
pub use guest::{GuestKernel, GuestModule, HostState};
pub use harness::Harness;
pub use layout::{LayoutDescriptor, VectorZone};
pub use memory::SharedBuffer;
/// Callers outside a [`BenchmarkDataset`] must ensure the sum fits in `u64`
pub use native::{accumulator_fits, dot_product_native};
pub use report::{EngineOutcome, Report};
pub use timing::TimingRecord;
