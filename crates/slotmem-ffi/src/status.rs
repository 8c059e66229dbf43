//! C-compatible status codes.
//!
//! [`SlotmemStatus`] is a `repr(i32)` enum returned by every FFI function
//! that reports a status. `Ok` is 0 and every failure is negative. The
//! numeric values are part of the ABI and never change.

use std::ffi::CStr;

use slotmem_arena::ArenaError;

/// C-compatible status code returned by FFI functions.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotmemStatus {
    /// Success.
    Ok = 0,
    /// The backing storage could not be allocated.
    ArenaAllocFailed = -1,
    /// The arena id is unknown or the arena was destroyed.
    ArenaInvalid = -2,
    /// The arena descriptor was rejected.
    ArenaDescInvalid = -3,
    /// A group could not be initialised.
    GroupCreationFailed = -4,
    /// No group is registered for the handle's type.
    GroupQueryFailed = -5,
    /// Every slot of the group is in use.
    GroupExhausted = -6,
    /// The group's free list is corrupted.
    GroupSlotAllocFailed = -7,
    /// A handle could not be created for the requested type.
    HandleCreationFailed = -8,
    /// The handle does not refer to a readable slot.
    HandleReadFailed = -9,
    /// The handle does not refer to a writable slot.
    HandleWriteFailed = -10,
    /// The handle does not refer to an erasable slot.
    HandleEraseFailed = -11,
    /// The handle is the null handle.
    HandleInvalid = -12,
    /// The payload is empty or larger than the group's stride.
    DataInvalid = -13,
    /// A pointer argument is null or a length is out of range.
    InvalidArgument = -14,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -15,
    /// Internal error (poisoned lock after a prior panic, or a broken
    /// arena invariant).
    InternalError = -16,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl SlotmemStatus {
    const ALL: [Self; 18] = [
        Self::Ok,
        Self::ArenaAllocFailed,
        Self::ArenaInvalid,
        Self::ArenaDescInvalid,
        Self::GroupCreationFailed,
        Self::GroupQueryFailed,
        Self::GroupExhausted,
        Self::GroupSlotAllocFailed,
        Self::HandleCreationFailed,
        Self::HandleReadFailed,
        Self::HandleWriteFailed,
        Self::HandleEraseFailed,
        Self::HandleInvalid,
        Self::DataInvalid,
        Self::InvalidArgument,
        Self::BufferTooSmall,
        Self::InternalError,
        Self::Panicked,
    ];

    /// Decode a raw status code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|status| *status as i32 == code)
    }

    /// Stable, NUL-terminated name of the status, e.g. `SLOTMEM_OK`.
    pub fn name(self) -> &'static CStr {
        match self {
            Self::Ok => c"SLOTMEM_OK",
            Self::ArenaAllocFailed => c"SLOTMEM_ARENA_ALLOC_FAILED",
            Self::ArenaInvalid => c"SLOTMEM_ARENA_INVALID",
            Self::ArenaDescInvalid => c"SLOTMEM_ARENA_DESC_INVALID",
            Self::GroupCreationFailed => c"SLOTMEM_GROUP_CREATION_FAILED",
            Self::GroupQueryFailed => c"SLOTMEM_GROUP_QUERY_FAILED",
            Self::GroupExhausted => c"SLOTMEM_GROUP_EXHAUSTED",
            Self::GroupSlotAllocFailed => c"SLOTMEM_GROUP_SLOT_ALLOC_FAILED",
            Self::HandleCreationFailed => c"SLOTMEM_HANDLE_CREATION_FAILED",
            Self::HandleReadFailed => c"SLOTMEM_HANDLE_READ_FAILED",
            Self::HandleWriteFailed => c"SLOTMEM_HANDLE_WRITE_FAILED",
            Self::HandleEraseFailed => c"SLOTMEM_HANDLE_ERASE_FAILED",
            Self::HandleInvalid => c"SLOTMEM_HANDLE_INVALID",
            Self::DataInvalid => c"SLOTMEM_DATA_INVALID",
            Self::InvalidArgument => c"SLOTMEM_INVALID_ARGUMENT",
            Self::BufferTooSmall => c"SLOTMEM_BUFFER_TOO_SMALL",
            Self::InternalError => c"SLOTMEM_INTERNAL_ERROR",
            Self::Panicked => c"SLOTMEM_PANICKED",
        }
    }
}

impl From<&ArenaError> for SlotmemStatus {
    fn from(e: &ArenaError) -> Self {
        match e {
            ArenaError::DescriptorInvalid { .. } => SlotmemStatus::ArenaDescInvalid,
            ArenaError::AllocFailed { .. } => SlotmemStatus::ArenaAllocFailed,
            ArenaError::ArenaInvalid => SlotmemStatus::ArenaInvalid,
            ArenaError::GroupCreationFailed { .. } => SlotmemStatus::GroupCreationFailed,
            ArenaError::GroupQueryFailed { .. } => SlotmemStatus::GroupQueryFailed,
            ArenaError::GroupExhausted { .. } => SlotmemStatus::GroupExhausted,
            ArenaError::GroupSlotAllocFailed { .. } => SlotmemStatus::GroupSlotAllocFailed,
            ArenaError::HandleCreationFailed { .. } => SlotmemStatus::HandleCreationFailed,
            ArenaError::HandleInvalid => SlotmemStatus::HandleInvalid,
            ArenaError::DataInvalid { .. } => SlotmemStatus::DataInvalid,
            ArenaError::HandleWriteFailed { .. } => SlotmemStatus::HandleWriteFailed,
            ArenaError::HandleReadFailed { .. } => SlotmemStatus::HandleReadFailed,
            ArenaError::HandleEraseFailed { .. } => SlotmemStatus::HandleEraseFailed,
            ArenaError::InvariantViolated { .. } => SlotmemStatus::InternalError,
        }
    }
}
