//! Byte layout of the shared linear memory.
//!
//! The buffer holds three zones in fixed order: `vec1` and `vec2` (N narrow
//! `u32` elements each) followed by one wide `u64` result slot aligned to the
//! wide element size. The layout is computed once and handed by value to
//! everything that needs a zone boundary; the guest receives the same offsets
//! as call arguments.

use std::fmt;

use crate::error::{HarnessError, Result};

/// Size in bytes of a vector element
pub const NARROW_SIZE: usize = std::mem::size_of::<u32>();

/// Size in bytes of the accumulator
pub const WIDE_SIZE: usize = std::mem::size_of::<u64>();

/// WebAssembly page size
pub const WASM_PAGE_SIZE: u64 = 65536;

/// The two zones holding input vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorZone {
    Vec1,
    Vec2,
}

impl fmt::Display for VectorZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorZone::Vec1 => f.write_str("vec1"),
            VectorZone::Vec2 => f.write_str("vec2"),
        }
    }
}

/// A contiguous byte range of linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSpan {
    pub offset: u32,
    pub len: u32,
}

impl ZoneSpan {
    pub fn end(&self) -> u32 {
        self.offset + self.len
    }

    /// Byte range for use when slicing memory
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset as usize..self.end() as usize
    }
}

/// Wide-view index of the result slot, relative to the layout base.
pub fn result_wide_index(n: usize, narrow_size: usize, wide_size: usize) -> usize {
    (2 * n * narrow_size).div_ceil(wide_size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDescriptor {
    n: usize,
    base: u32,
    vec1: ZoneSpan,
    vec2: ZoneSpan,
    result: ZoneSpan,
}

impl LayoutDescriptor {
    /// Lay out two `n`-element vectors and the result slot starting at `base`.
    pub fn new(n: usize, base: u32) -> Result<Self> {
        if n == 0 {
            return Err(HarnessError::EmptyVector);
        }
        if base as usize % WIDE_SIZE != 0 {
            return Err(HarnessError::MisalignedBase {
                base,
                align: WIDE_SIZE as u32,
            });
        }

        let overflow = || HarnessError::LayoutOverflow { n, base };
        let zone_len = n.checked_mul(NARROW_SIZE).ok_or_else(overflow)?;
        let result_rel = zone_len
            .checked_mul(2)
            .map(|bytes| bytes.div_ceil(WIDE_SIZE))
            .and_then(|index| index.checked_mul(WIDE_SIZE))
            .ok_or_else(overflow)?;

        // Everything must be addressable with a u32 (wasm32 pointers)
        let end = (base as u64)
            .checked_add(result_rel as u64)
            .and_then(|v| v.checked_add(WIDE_SIZE as u64))
            .ok_or_else(overflow)?;
        if end > u32::MAX as u64 {
            return Err(overflow());
        }

        let zone_len = zone_len as u32;
        Ok(Self {
            n,
            base,
            vec1: ZoneSpan {
                offset: base,
                len: zone_len,
            },
            vec2: ZoneSpan {
                offset: base + zone_len,
                len: zone_len,
            },
            result: ZoneSpan {
                offset: base + result_rel as u32,
                len: WIDE_SIZE as u32,
            },
        })
    }

    /// Elements per vector
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn zone(&self, zone: VectorZone) -> ZoneSpan {
        match zone {
            VectorZone::Vec1 => self.vec1,
            VectorZone::Vec2 => self.vec2,
        }
    }

    pub fn result(&self) -> ZoneSpan {
        self.result
    }

    /// Index of the result slot in a `u64` view starting at the layout base
    pub fn result_wide_index(&self) -> usize {
        result_wide_index(self.n, NARROW_SIZE, WIDE_SIZE)
    }

    /// One past the last byte used by the layout
    pub fn end(&self) -> u64 {
        self.result.end() as u64
    }

    /// Number of wasm pages needed to hold every zone
    pub fn pages(&self) -> u64 {
        self.end().div_ceil(WASM_PAGE_SIZE)
    }

    /// Arguments for the guest entry point:
    /// `(n, vec1_offset, vec2_offset, result_offset)`.
    ///
    /// With a zero base these are the element count, `0`, the byte length of
    /// one vector and the byte length of both vectors.
    pub fn entry_args(&self) -> (i32, i32, i32, i32) {
        (
            self.n as i32,
            self.vec1.offset as i32,
            self.vec2.offset as i32,
            self.result.offset as i32,
        )
    }
}
