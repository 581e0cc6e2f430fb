//! Shared linear memory seen by both engines.
//!
//! One wasmtime [`Memory`] backs the whole buffer. The host reads it through a
//! narrow (`u32`) view over the vector zones and a wide (`u64`) view over the
//! result slot. Wasm memory is little endian, so both views decode bytes
//! explicitly instead of reinterpreting pointers.

use tracing::debug;
use wasmtime::{AsContext, AsContextMut, Memory, MemoryType};

use crate::error::{HarnessError, Result};
use crate::layout::{LayoutDescriptor, VectorZone, NARROW_SIZE, WIDE_SIZE};

#[derive(Debug, Clone, Copy)]
pub struct SharedBuffer {
    memory: Memory,
    layout: LayoutDescriptor,
}

impl SharedBuffer {
    /// Allocate a growable memory large enough for every zone of `layout`.
    pub fn allocate(mut store: impl AsContextMut, layout: LayoutDescriptor) -> Result<Self> {
        let pages = layout.pages();
        let ty = MemoryType::new(pages as u32, None);
        let memory = Memory::new(&mut store, ty).map_err(HarnessError::Memory)?;

        debug!(
            pages,
            base = layout.base(),
            end = layout.end(),
            "Allocated shared memory"
        );

        Ok(Self { memory, layout })
    }

    /// Underlying wasmtime memory, handed to the guest as an import
    pub fn memory(&self) -> Memory {
        self.memory
    }

    pub fn layout(&self) -> LayoutDescriptor {
        self.layout
    }

    fn narrow_range(&self, zone: VectorZone, index: usize) -> Result<std::ops::Range<usize>> {
        let len = self.layout.n();
        if index >= len {
            return Err(HarnessError::OutOfBounds { zone, index, len });
        }
        let start = self.layout.zone(zone).offset as usize + index * NARROW_SIZE;
        Ok(start..start + NARROW_SIZE)
    }

    pub fn write_narrow(
        &self,
        mut store: impl AsContextMut,
        zone: VectorZone,
        index: usize,
        value: u32,
    ) -> Result<()> {
        let range = self.narrow_range(zone, index)?;
        self.memory.data_mut(&mut store)[range].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn read_narrow(&self, store: impl AsContext, zone: VectorZone, index: usize) -> Result<u32> {
        let range = self.narrow_range(zone, index)?;
        let mut bytes = [0u8; NARROW_SIZE];
        bytes.copy_from_slice(&self.memory.data(&store)[range]);
        Ok(u32::from_le_bytes(bytes))
    }

    /// Copy a whole vector zone out through the narrow view
    pub fn read_zone(&self, store: impl AsContext, zone: VectorZone) -> Vec<u32> {
        self.memory.data(&store)[self.layout.zone(zone).range()]
            .chunks_exact(NARROW_SIZE)
            .map(|chunk| {
                let mut bytes = [0u8; NARROW_SIZE];
                bytes.copy_from_slice(chunk);
                u32::from_le_bytes(bytes)
            })
            .collect()
    }

    /// Read the accumulator from the result slot.
    ///
    /// Only meaningful after the guest kernel has returned.
    pub fn read_wide(&self, store: impl AsContext) -> u64 {
        let mut bytes = [0u8; WIDE_SIZE];
        bytes.copy_from_slice(&self.memory.data(&store)[self.layout.result().range()]);
        u64::from_le_bytes(bytes)
    }
}
