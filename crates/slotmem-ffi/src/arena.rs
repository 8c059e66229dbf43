//! Arena lifecycle and handle operations over the C ABI.
//!
//! Arenas live in a global [`HandleTable`] behind a mutex and are addressed
//! from C by opaque `u64` ids. Every call locks the table for its whole
//! duration, so calls on any arenas are serialized. Reads copy the slot's
//! bytes out instead of lending a pointer, since a pointer into the table
//! could not be kept valid once the lock is released.

use std::ffi::{c_char, CStr};
use std::sync::Mutex;

use slotmem_arena::{ArenaDescriptor, HandleArena, HandleTypeDescriptor};

use crate::handle::HandleTable;
use crate::status::SlotmemStatus;
use crate::types::{SlotmemHandle, SlotmemTypeDescriptor};

static ARENAS: Mutex<HandleTable<HandleArena>> = Mutex::new(HandleTable::new());

/// Build an arena from `n_types` type descriptors.
///
/// `name` may be null; otherwise it must be a NUL-terminated string. On
/// success the new arena's id is written to `arena_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_arena_init(
    types: *const SlotmemTypeDescriptor,
    n_types: usize,
    name: *const c_char,
    arena_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if arena_out.is_null() || (types.is_null() && n_types > 0) {
            return SlotmemStatus::InvalidArgument as i32;
        }
        let types: &[SlotmemTypeDescriptor] = if n_types == 0 {
            &[]
        } else {
            // SAFETY: types points to n_types descriptors per caller contract.
            unsafe { std::slice::from_raw_parts(types, n_types) }
        };
        let name = if name.is_null() {
            String::new()
        } else {
            // SAFETY: name is NUL-terminated per caller contract.
            unsafe { CStr::from_ptr(name) }
                .to_string_lossy()
                .into_owned()
        };

        let desc = ArenaDescriptor {
            name,
            types: types.iter().map(HandleTypeDescriptor::from).collect(),
        };
        let arena = match HandleArena::new(&desc) {
            Ok(arena) => arena,
            Err(e) => return SlotmemStatus::from(&e) as i32,
        };

        let id = ffi_lock!(ARENAS).insert(arena);
        // SAFETY: arena_out is non-null and valid per caller contract.
        unsafe { *arena_out = id };
        SlotmemStatus::Ok as i32
    })
}

/// Destroy an arena, releasing its storage.
///
/// Destroying an id twice returns `SLOTMEM_ARENA_INVALID`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_arena_destroy(arena: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(ARENAS).remove(arena) {
            Some(_) => SlotmemStatus::Ok as i32,
            None => SlotmemStatus::ArenaInvalid as i32,
        }
    })
}

/// Create a handle of `type_id`.
///
/// Returns the invalid (all-zero) handle on any failure: unknown arena,
/// unknown or reserved type, or an exhausted group.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_handle_create(arena: u64, type_id: u32) -> SlotmemHandle {
    ffi_guard!(SlotmemHandle::INVALID; {
        let mut table = ffi_lock!(ARENAS, SlotmemHandle::INVALID);
        let Some(arena) = table.get_mut(arena) else {
            return SlotmemHandle::INVALID;
        };
        arena
            .create(type_id)
            .map(SlotmemHandle::from)
            .unwrap_or(SlotmemHandle::INVALID)
    })
}

/// Store `size` bytes from `data` in the slot behind `handle`.
///
/// A null `data` or a `size` of 0 is an empty payload, reported as
/// `SLOTMEM_DATA_INVALID` once the handle has been checked.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_handle_write(
    arena: u64,
    handle: SlotmemHandle,
    data: *const u8,
    size: usize,
) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(ARENAS);
        let Some(arena) = table.get_mut(arena) else {
            return SlotmemStatus::ArenaInvalid as i32;
        };
        let bytes: &[u8] = if size == 0 || data.is_null() {
            &[]
        } else {
            // SAFETY: data points to size readable bytes per caller contract.
            unsafe { std::slice::from_raw_parts(data, size) }
        };
        match arena.write(handle.into(), bytes) {
            Ok(()) => SlotmemStatus::Ok as i32,
            Err(e) => SlotmemStatus::from(&e) as i32,
        }
    })
}

/// Copy the bytes stored behind `handle` into `out`.
///
/// The slot's stride is written to `len_out` (if non-null) as soon as the
/// handle resolves, so a caller can pass a null `out` to learn the size.
/// Fails with `SLOTMEM_BUFFER_TOO_SMALL` if `cap` is below the stride.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_handle_read(
    arena: u64,
    handle: SlotmemHandle,
    out: *mut u8,
    cap: usize,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(ARENAS);
        let Some(arena) = table.get(arena) else {
            return SlotmemStatus::ArenaInvalid as i32;
        };
        let bytes = match arena.try_read(handle.into()) {
            Ok(bytes) => bytes,
            Err(e) => return SlotmemStatus::from(&e) as i32,
        };
        if !len_out.is_null() {
            // SAFETY: len_out is non-null and valid per caller contract.
            unsafe { *len_out = bytes.len() };
        }
        if out.is_null() {
            return SlotmemStatus::InvalidArgument as i32;
        }
        if cap < bytes.len() {
            return SlotmemStatus::BufferTooSmall as i32;
        }
        // SAFETY: out points to cap >= bytes.len() writable bytes, and
        // cannot overlap arena storage owned by the table.
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), out, bytes.len()) };
        SlotmemStatus::Ok as i32
    })
}

/// Erase the data behind `handle` and recycle its slot.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_handle_erase(arena: u64, handle: SlotmemHandle) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(ARENAS);
        let Some(arena) = table.get_mut(arena) else {
            return SlotmemStatus::ArenaInvalid as i32;
        };
        match arena.erase(handle.into()) {
            Ok(()) => SlotmemStatus::Ok as i32,
            Err(e) => SlotmemStatus::from(&e) as i32,
        }
    })
}

/// 1 if `handle` names written data at its current generation, else 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_handle_valid(arena: u64, handle: SlotmemHandle) -> u8 {
    ffi_guard!(0; {
        let table = ffi_lock!(ARENAS, 0);
        table
            .get(arena)
            .is_some_and(|arena| arena.is_valid(handle.into())) as u8
    })
}

/// Print the arena's layout to stdout.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_print_layout(arena: u64) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(ARENAS);
        match table.get(arena) {
            Some(arena) => {
                arena.print_layout();
                SlotmemStatus::Ok as i32
            }
            None => SlotmemStatus::ArenaInvalid as i32,
        }
    })
}

/// Static NUL-terminated name of a status code, or null for an unknown
/// code. The string must not be freed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn slotmem_status_name(status: i32) -> *const c_char {
    SlotmemStatus::from_code(status).map_or(std::ptr::null(), |s| s.name().as_ptr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn two_type_arena() -> u64 {
        let types = [
            SlotmemTypeDescriptor {
                type_id: 1,
                capacity: 2,
                stride: 16,
            },
            SlotmemTypeDescriptor {
                type_id: 2,
                capacity: 4,
                stride: 8,
            },
        ];
        let name = CString::new("FFI_ARENA").unwrap();
        let mut id = 0u64;
        assert_eq!(
            slotmem_arena_init(types.as_ptr(), types.len(), name.as_ptr(), &mut id),
            SlotmemStatus::Ok as i32
        );
        assert_ne!(id, 0);
        id
    }

    fn read_all(arena: u64, handle: SlotmemHandle) -> Result<Vec<u8>, i32> {
        let mut buf = [0u8; 64];
        let mut len = 0usize;
        let rc = slotmem_handle_read(arena, handle, buf.as_mut_ptr(), buf.len(), &mut len);
        if rc == SlotmemStatus::Ok as i32 {
            Ok(buf[..len].to_vec())
        } else {
            Err(rc)
        }
    }

    #[test]
    fn lifecycle_through_c_abi() {
        let arena = two_type_arena();
        let h1 = slotmem_handle_create(arena, 1);
        let h2 = slotmem_handle_create(arena, 1);
        assert_ne!(h1, SlotmemHandle::INVALID);
        assert_ne!(h2, SlotmemHandle::INVALID);
        assert_eq!(slotmem_handle_create(arena, 1), SlotmemHandle::INVALID);

        let payload = b"ABCDEFGHIJKLMNOP";
        assert_eq!(
            slotmem_handle_write(arena, h1, payload.as_ptr(), payload.len()),
            SlotmemStatus::Ok as i32
        );
        assert_eq!(slotmem_handle_valid(arena, h1), 1);
        assert_eq!(read_all(arena, h1).unwrap(), payload);

        assert_eq!(slotmem_handle_erase(arena, h1), SlotmemStatus::Ok as i32);
        assert_eq!(slotmem_handle_valid(arena, h1), 0);
        let h4 = slotmem_handle_create(arena, 1);
        assert_eq!(h4.value & 0xFFFF, h1.value & 0xFFFF);
        assert!(h4.value >> 16 > h1.value >> 16);
        assert_eq!(slotmem_handle_valid(arena, h1), 0);

        assert_eq!(slotmem_print_layout(arena), SlotmemStatus::Ok as i32);
        assert_eq!(slotmem_arena_destroy(arena), SlotmemStatus::Ok as i32);
    }

    #[test]
    fn destroyed_arena_is_invalid() {
        let arena = two_type_arena();
        let h = slotmem_handle_create(arena, 2);
        assert_eq!(slotmem_arena_destroy(arena), SlotmemStatus::Ok as i32);
        assert_eq!(
            slotmem_arena_destroy(arena),
            SlotmemStatus::ArenaInvalid as i32
        );
        assert_eq!(
            slotmem_handle_write(arena, h, b"x".as_ptr(), 1),
            SlotmemStatus::ArenaInvalid as i32
        );
        assert_eq!(
            slotmem_handle_erase(arena, h),
            SlotmemStatus::ArenaInvalid as i32
        );
        assert_eq!(read_all(arena, h), Err(SlotmemStatus::ArenaInvalid as i32));
        assert_eq!(slotmem_handle_valid(arena, h), 0);
        assert_eq!(slotmem_handle_create(arena, 2), SlotmemHandle::INVALID);
        assert_eq!(
            slotmem_print_layout(arena),
            SlotmemStatus::ArenaInvalid as i32
        );
    }

    #[test]
    fn write_status_codes() {
        let arena = two_type_arena();
        let h = slotmem_handle_create(arena, 2);
        assert_eq!(
            slotmem_handle_write(arena, SlotmemHandle::INVALID, b"x".as_ptr(), 1),
            SlotmemStatus::HandleInvalid as i32
        );
        assert_eq!(
            slotmem_handle_write(arena, h, std::ptr::null(), 0),
            SlotmemStatus::DataInvalid as i32
        );
        assert_eq!(
            slotmem_handle_write(arena, h, std::ptr::null(), 4),
            SlotmemStatus::DataInvalid as i32
        );
        assert_eq!(
            slotmem_handle_write(arena, SlotmemHandle::INVALID, std::ptr::null(), 4),
            SlotmemStatus::HandleInvalid as i32
        );
        let wrong_group = SlotmemHandle {
            value: h.value,
            type_id: 9,
        };
        assert_eq!(
            slotmem_handle_write(arena, wrong_group, b"x".as_ptr(), 1),
            SlotmemStatus::GroupQueryFailed as i32
        );
        let big = [1u8; 9];
        assert_eq!(
            slotmem_handle_write(arena, h, big.as_ptr(), big.len()),
            SlotmemStatus::DataInvalid as i32
        );
        assert_eq!(
            slotmem_handle_write(arena, h, big.as_ptr(), 8),
            SlotmemStatus::Ok as i32
        );
        assert_eq!(
            slotmem_handle_write(arena, h, big.as_ptr(), 8),
            SlotmemStatus::HandleWriteFailed as i32
        );
        slotmem_arena_destroy(arena);
    }

    #[test]
    fn erase_of_zero_handles_reports_lookup_failures() {
        let arena = two_type_arena();
        assert_eq!(
            slotmem_handle_erase(arena, SlotmemHandle::INVALID),
            SlotmemStatus::GroupQueryFailed as i32
        );
        let slot_zero = SlotmemHandle {
            value: 0,
            type_id: 1,
        };
        assert_eq!(
            slotmem_handle_erase(arena, slot_zero),
            SlotmemStatus::HandleEraseFailed as i32
        );
        slotmem_arena_destroy(arena);
    }

    #[test]
    fn read_reports_size_and_short_buffers() {
        let arena = two_type_arena();
        let h = slotmem_handle_create(arena, 2);
        assert_eq!(read_all(arena, h), Err(SlotmemStatus::HandleReadFailed as i32));
        slotmem_handle_write(arena, h, b"abc".as_ptr(), 3);

        let mut len = 0usize;
        assert_eq!(
            slotmem_handle_read(arena, h, std::ptr::null_mut(), 0, &mut len),
            SlotmemStatus::InvalidArgument as i32
        );
        assert_eq!(len, 8);
        let mut small = [0u8; 4];
        assert_eq!(
            slotmem_handle_read(arena, h, small.as_mut_ptr(), small.len(), std::ptr::null_mut()),
            SlotmemStatus::BufferTooSmall as i32
        );
        assert_eq!(read_all(arena, h).unwrap(), b"abc\0\0\0\0\0");
        slotmem_arena_destroy(arena);
    }

    #[test]
    fn init_rejects_bad_arguments() {
        let mut id = 0u64;
        assert_eq!(
            slotmem_arena_init(std::ptr::null(), 0, std::ptr::null(), &mut id),
            SlotmemStatus::ArenaDescInvalid as i32
        );
        assert_eq!(
            slotmem_arena_init(std::ptr::null(), 3, std::ptr::null(), &mut id),
            SlotmemStatus::InvalidArgument as i32
        );
        let zero_stride = [SlotmemTypeDescriptor {
            type_id: 1,
            capacity: 1,
            stride: 0,
        }];
        assert_eq!(
            slotmem_arena_init(zero_stride.as_ptr(), 1, std::ptr::null(), &mut id),
            SlotmemStatus::ArenaDescInvalid as i32
        );
        assert_eq!(
            slotmem_arena_init(zero_stride.as_ptr(), 1, std::ptr::null(), std::ptr::null_mut()),
            SlotmemStatus::InvalidArgument as i32
        );
        assert_eq!(id, 0);
    }

    #[test]
    #[allow(unsafe_code)]
    fn status_names_resolve() {
        let ptr = slotmem_status_name(SlotmemStatus::GroupExhausted as i32);
        // SAFETY: non-null results point at static NUL-terminated strings.
        let name = unsafe { CStr::from_ptr(ptr) };
        assert_eq!(name.to_str().unwrap(), "SLOTMEM_GROUP_EXHAUSTED");
        assert!(slotmem_status_name(42).is_null());
    }
}
