//! C ABI for the slotmem handle arena.
//!
//! Exposes arenas to C and other foreign callers through opaque `u64` ids,
//! `repr(C)` handle values and `repr(i32)` status codes. A C header is
//! generated into `include/slotmem.h` at build time.
//!
//! Every exported function catches Rust panics at the boundary and reports
//! them as `SLOTMEM_PANICKED` (or the function's failure value). Unsafe code
//! is confined to pointer dereferences in the exported functions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run `$body` under `catch_unwind`, mapping a panic to `$fallback`
/// (`SlotmemStatus::Panicked` when omitted).
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard!($crate::status::SlotmemStatus::Panicked as i32; $body)
    };
    ($fallback:expr; $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => $fallback,
        }
    };
}

/// Lock a global table, returning `$fallback` from the enclosing closure
/// if the mutex is poisoned (`SlotmemStatus::InternalError` when omitted).
macro_rules! ffi_lock {
    ($mutex:expr) => {
        ffi_lock!($mutex, $crate::status::SlotmemStatus::InternalError as i32)
    };
    ($mutex:expr, $fallback:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $fallback,
        }
    };
}

pub mod arena;
mod handle;
pub mod status;
pub mod types;

pub use arena::{
    slotmem_arena_destroy, slotmem_arena_init, slotmem_handle_create, slotmem_handle_erase,
    slotmem_handle_read, slotmem_handle_valid, slotmem_handle_write, slotmem_print_layout,
    slotmem_status_name,
};
pub use status::SlotmemStatus;
pub use types::{SlotmemHandle, SlotmemTypeDescriptor};
