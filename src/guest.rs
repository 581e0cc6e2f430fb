//! Loading, linking and invoking the WebAssembly kernel.
//!
//! The protocol has three steps with a strict happens-before order:
//! [`GuestModule::load`] reads and compiles the module (may suspend),
//! [`GuestKernel::link`] instantiates it against the shared memory and the
//! debug bridge, and [`GuestKernel::invoke`] runs the timed call.

use std::path::Path;

use tracing::debug;
use wasmtime::{Caller, Engine, Linker, Module, Store, TypedFunc};

use crate::bridge::DebugBridge;
use crate::error::{HarnessError, Result};
use crate::memory::SharedBuffer;
use crate::timing::TimingRecord;

pub const IMPORT_MODULE: &str = "js";
pub const MEMORY_IMPORT: &str = "shared_mem";
pub const LOG_IMPORT: &str = "console.log";
pub const ENTRY_POINT: &str = "dot_product";

/// Exported by modules linked with wasm-ld; marks the end of guest statics
pub const HEAP_BASE_EXPORT: &str = "__heap_base";

/// `(n, vec1_offset, vec2_offset, result_offset)`
type EntryParams = (i32, i32, i32, i32);

/// Store data visible to host functions
#[derive(Debug)]
pub struct HostState {
    bridge: DebugBridge,
}

impl HostState {
    pub fn new(bridge: DebugBridge) -> Self {
        Self { bridge }
    }
}

/// A compiled, not yet instantiated guest module.
pub struct GuestModule {
    module: Module,
}

impl GuestModule {
    /// Read `path` and compile it. Accepts binary modules and WAT text.
    pub async fn load(engine: &Engine, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| HarnessError::ModuleRead {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read guest module");
        Self::from_bytes(engine, &bytes)
    }

    pub fn from_bytes(engine: &Engine, bytes: &[u8]) -> Result<Self> {
        let module = Module::new(engine, bytes).map_err(HarnessError::ModuleCompile)?;
        Ok(Self { module })
    }
}

/// An instantiated guest with its entry point resolved.
pub struct GuestKernel {
    entry: TypedFunc<EntryParams, ()>,
    buffer: SharedBuffer,
}

impl GuestKernel {
    /// Instantiate `module` with the shared memory and the debug bridge as its
    /// only imports.
    pub fn link(
        store: &mut Store<HostState>,
        module: &GuestModule,
        buffer: SharedBuffer,
    ) -> Result<Self> {
        let mut linker = Linker::new(store.engine());
        linker
            .define(&*store, IMPORT_MODULE, MEMORY_IMPORT, buffer.memory())
            .map_err(HarnessError::Link)?;
        linker
            .func_wrap(
                IMPORT_MODULE,
                LOG_IMPORT,
                |caller: Caller<'_, HostState>, template: i32, a0: i32, a1: i32, a2: i32| {
                    caller
                        .data()
                        .bridge
                        .call(template, [a0, a1, a2])
                        .map_err(anyhow::Error::from)
                },
            )
            .map_err(HarnessError::Link)?;

        let instance = linker
            .instantiate(&mut *store, &module.module)
            .map_err(HarnessError::Link)?;

        let layout_base = buffer.layout().base();
        if let Some(global) = instance.get_global(&mut *store, HEAP_BASE_EXPORT) {
            if let Some(heap_base) = global.get(&mut *store).i32() {
                let heap_base = heap_base as u32;
                if heap_base > layout_base {
                    return Err(HarnessError::LayoutConflict {
                        heap_base,
                        layout_base,
                    });
                }
            }
        }

        let entry = instance
            .get_typed_func::<EntryParams, ()>(&mut *store, ENTRY_POINT)
            .map_err(|cause| HarnessError::Export {
                name: ENTRY_POINT.to_string(),
                cause,
            })?;

        debug!(layout_base, "Linked guest kernel");
        Ok(Self { entry, buffer })
    }

    /// Call the entry point with the layout's offsets and read back the
    /// result. Only the call itself is inside the timed window.
    pub fn invoke(&self, store: &mut Store<HostState>) -> Result<(u64, TimingRecord)> {
        let args = self.buffer.layout().entry_args();
        let (outcome, timing) = TimingRecord::measure(|| self.entry.call(&mut *store, args));
        outcome.map_err(HarnessError::GuestTrap)?;

        Ok((self.buffer.read_wide(&*store), timing))
    }
}
