// Rust implementation of the dot product kernel for WASM (Core Module)
//
// Linear memory is imported from the host (`js.shared_mem`), which owns the
// layout. Every zone is located through the offsets passed to `dot_product`,
// so nothing about the layout is compiled in here.
//
// This version uses direct #[no_mangle] exports for compatibility with
// wasmtime's core module API (not Component Model).

#![cfg_attr(target_arch = "wasm32", no_std)]

// Template indices understood by the host's debug bridge.
#[cfg(feature = "trace")]
const MSG_ELEMENT_PRODUCT: i32 = 0;
#[cfg(feature = "trace")]
const MSG_WIDE_RESULT: i32 = 1;
#[cfg(feature = "trace")]
const MSG_ENTRY_ARGS: i32 = 2;

#[cfg(all(target_arch = "wasm32", feature = "trace"))]
#[link(wasm_import_module = "js")]
extern "C" {
    #[link_name = "console.log"]
    fn console_log(template: i32, a0: i32, a1: i32, a2: i32);
}

#[cfg(feature = "trace")]
#[inline]
fn trace(template: i32, a0: i32, a1: i32, a2: i32) {
    #[cfg(target_arch = "wasm32")]
    unsafe {
        console_log(template, a0, a1, a2)
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (template, a0, a1, a2);
}

/// Computes the dot product of two `u32` vectors of length `n` and stores the
/// `u64` result at `result_offset`.
///
/// `vec1_offset`, `vec2_offset` and `result_offset` are byte offsets into the
/// imported memory. They are never zero: the shadow stack occupies the bottom
/// of memory. `result_offset` is 8-byte aligned.
#[no_mangle]
pub extern "C" fn dot_product(n: u32, vec1_offset: u32, vec2_offset: u32, result_offset: u32) {
    #[cfg(feature = "trace")]
    trace(MSG_ENTRY_ARGS, n as i32, vec2_offset as i32, result_offset as i32);

    let len = n as usize;
    let vec1 = vec1_offset as usize as *const u32;
    let vec2 = vec2_offset as usize as *const u32;

    // 4-way unrolling for better auto-vectorization
    let mut sum0: u64 = 0;
    let mut sum1: u64 = 0;
    let mut sum2: u64 = 0;
    let mut sum3: u64 = 0;

    // SAFETY: the host sized memory to hold both zones and the result slot
    unsafe {
        let mut i = 0;
        while i + 3 < len {
            sum0 += product(vec1, vec2, i);
            sum1 += product(vec1, vec2, i + 1);
            sum2 += product(vec1, vec2, i + 2);
            sum3 += product(vec1, vec2, i + 3);
            i += 4;
        }
        while i < len {
            sum0 += product(vec1, vec2, i);
            i += 1;
        }

        let result = sum0 + sum1 + sum2 + sum3;
        *(result_offset as usize as *mut u64) = result;

        #[cfg(feature = "trace")]
        trace(MSG_WIDE_RESULT, (result >> 32) as i32, result as i32, 0);
    }
}

#[inline]
unsafe fn product(vec1: *const u32, vec2: *const u32, i: usize) -> u64 {
    let a = *vec1.add(i) as u64;
    let b = *vec2.add(i) as u64;

    #[cfg(feature = "trace")]
    trace(MSG_ELEMENT_PRODUCT, i as i32, a as i32, b as i32);

    a * b
}

// Panic handler for no_std
#[cfg(target_arch = "wasm32")]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    core::arch::wasm32::unreachable()
}
