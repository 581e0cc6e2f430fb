//! The run pipeline: populate, time the native kernel, load and time the
//! guest kernel, report.
//!
//! Every step runs to completion before the next starts. Nothing bounds the
//! guest call: a guest that never returns hangs the run.

use std::sync::Arc;

use tracing::{debug, warn};
use wasmtime::{Engine, Store};

use crate::bridge::{DebugBridge, LogSink, TracingSink};
use crate::config::HarnessConfig;
use crate::dataset::BenchmarkDataset;
use crate::error::Result;
use crate::guest::{GuestKernel, GuestModule, HostState};
use crate::layout::LayoutDescriptor;
use crate::memory::SharedBuffer;
use crate::native::dot_product_native;
use crate::report::{EngineOutcome, Report};
use crate::timing::TimingRecord;

pub struct Harness {
    config: HarnessConfig,
    sink: Arc<dyn LogSink>,
}

impl Harness {
    /// Guest log lines go to `tracing`
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: HarnessConfig, sink: Arc<dyn LogSink>) -> Self {
        Self { config, sink }
    }

    pub async fn run(&self) -> Result<Report> {
        let config = &self.config;
        let layout = LayoutDescriptor::new(config.n, config.layout_base)?;
        debug!(?layout, "Computed layout");

        let engine = Engine::default();
        let bridge = DebugBridge::new(self.sink.clone())?;
        let mut store = Store::new(&engine, HostState::new(bridge));
        let buffer = SharedBuffer::allocate(&mut store, layout)?;
        let dataset = BenchmarkDataset::populate(&mut store, &buffer, &config.data)?;

        let (wide1, wide2) = dataset.wide();
        let (native, native_timing) = TimingRecord::measure(|| dot_product_native(wide1, wide2));
        let reference = EngineOutcome {
            label: config.reference_label.clone(),
            result: native?,
            timing: native_timing,
        };
        debug!(result = reference.result, "Native kernel done");

        let module = GuestModule::load(&engine, &config.guest_path).await?;
        let kernel = GuestKernel::link(&mut store, &module, buffer)?;
        let (guest_result, guest_timing) = kernel.invoke(&mut store)?;
        let candidate = EngineOutcome {
            label: config.candidate_label.clone(),
            result: guest_result,
            timing: guest_timing,
        };
        debug!(result = candidate.result, "Guest kernel done");

        let report = Report {
            n: config.n,
            reference,
            candidate,
        };
        if !report.results_match() {
            warn!(
                native = report.reference.result,
                guest = report.candidate.result,
                "Engines disagree on the dot product"
            );
        }
        Ok(report)
    }
}
