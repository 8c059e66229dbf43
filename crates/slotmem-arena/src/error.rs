//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use slotmem_core::{ErrorClass, Handle, HandleTypeId};

use crate::slot::SlotStatus;

/// Why a handle was refused at the slot level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotFault {
    /// The decoded index is 0 or past the end of the group's slot table.
    IndexOutOfRange {
        /// Index decoded from the handle.
        index: u16,
        /// Number of slots in the group, including reserved slot 0.
        slot_count: u32,
    },
    /// The slot is not in a state that permits the operation.
    UnexpectedStatus {
        /// The slot's current status.
        found: SlotStatus,
    },
    /// The slot has been recycled since the handle was minted.
    StaleGeneration {
        /// Generation encoded in the handle.
        handle_generation: u16,
        /// Generation currently stored in the slot.
        slot_generation: u16,
    },
}

impl fmt::Display for SlotFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, slot_count } => {
                write!(f, "index {index} outside 1..{slot_count}")
            }
            Self::UnexpectedStatus { found } => write!(f, "slot is {found}"),
            Self::StaleGeneration {
                handle_generation,
                slot_generation,
            } => write!(
                f,
                "stale generation {handle_generation}, slot is at {slot_generation}"
            ),
        }
    }
}

/// Errors that can occur during arena construction and handle operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena descriptor is unusable (no types, zero capacity or
    /// stride, reserved or duplicate type id, capacity above the index
    /// space).
    DescriptorInvalid {
        /// What is wrong with the descriptor.
        reason: String,
    },
    /// The backing storage could not be allocated.
    AllocFailed {
        /// Size of the backing storage that was requested, in bytes.
        /// `usize::MAX` when the size computation itself overflowed.
        requested_bytes: usize,
    },
    /// The arena itself is missing or has been destroyed. Only produced by
    /// foreign surfaces that address arenas indirectly.
    ArenaInvalid,
    /// A group could not be initialised from its type descriptor.
    GroupCreationFailed {
        /// The offending handle type.
        type_id: HandleTypeId,
        /// What is wrong with the type descriptor.
        reason: String,
    },
    /// No group is registered for the handle's type.
    GroupQueryFailed {
        /// The unrecognised handle type.
        type_id: HandleTypeId,
    },
    /// Every slot of the group is in use.
    GroupExhausted {
        /// The exhausted handle type.
        type_id: HandleTypeId,
        /// Configured capacity of the group.
        capacity: u32,
    },
    /// The free list pointed at a slot that is not free. The arena's
    /// bookkeeping is corrupted.
    GroupSlotAllocFailed {
        /// The group whose free list is corrupted.
        type_id: HandleTypeId,
        /// The slot the free list pointed at.
        index: u16,
    },
    /// A handle could not be created for the requested type (reserved
    /// type id, or no group registered for it).
    HandleCreationFailed {
        /// The requested handle type.
        type_id: HandleTypeId,
    },
    /// The handle is the null handle.
    HandleInvalid,
    /// The payload is empty or larger than the group's stride.
    DataInvalid {
        /// Payload length in bytes.
        len: usize,
        /// The group's stride, when the group was resolved.
        stride: Option<u32>,
    },
    /// The handle does not refer to a slot that may be written.
    HandleWriteFailed {
        /// The rejected handle.
        handle: Handle,
        /// Why the slot refused it.
        fault: SlotFault,
    },
    /// The handle does not refer to a written slot.
    HandleReadFailed {
        /// The rejected handle.
        handle: Handle,
        /// Why the slot refused it.
        fault: SlotFault,
    },
    /// The handle does not refer to a written slot that may be erased.
    HandleEraseFailed {
        /// The rejected handle.
        handle: Handle,
        /// Why the slot refused it.
        fault: SlotFault,
    },
    /// An internal invariant does not hold.
    InvariantViolated {
        /// The group in which the violation was found.
        type_id: HandleTypeId,
        /// Description of the violation.
        reason: String,
    },
}

impl ArenaError {
    /// Which part of the error taxonomy this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::DescriptorInvalid { .. } | Self::GroupCreationFailed { .. } => {
                ErrorClass::Configuration
            }
            Self::AllocFailed { .. } => ErrorClass::Allocation,
            Self::GroupExhausted { .. } => ErrorClass::Capacity,
            Self::GroupSlotAllocFailed { .. } | Self::InvariantViolated { .. } => {
                ErrorClass::Internal
            }
            Self::ArenaInvalid
            | Self::GroupQueryFailed { .. }
            | Self::HandleCreationFailed { .. }
            | Self::HandleInvalid
            | Self::DataInvalid { .. }
            | Self::HandleWriteFailed { .. }
            | Self::HandleReadFailed { .. }
            | Self::HandleEraseFailed { .. } => ErrorClass::Protocol,
        }
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DescriptorInvalid { reason } => {
                write!(f, "arena descriptor is invalid: {reason}")
            }
            Self::AllocFailed { requested_bytes } => {
                write!(f, "failed to allocate arena: requested {requested_bytes} bytes")
            }
            Self::ArenaInvalid => write!(f, "arena is invalid"),
            Self::GroupCreationFailed { type_id, reason } => {
                write!(f, "failed to create group for type {type_id}: {reason}")
            }
            Self::GroupQueryFailed { type_id } => {
                write!(f, "no group registered for type {type_id}")
            }
            Self::GroupExhausted { type_id, capacity } => {
                write!(f, "group for type {type_id} exhausted (capacity {capacity})")
            }
            Self::GroupSlotAllocFailed { type_id, index } => {
                write!(
                    f,
                    "free list of type {type_id} points at non-free slot {index}"
                )
            }
            Self::HandleCreationFailed { type_id } => {
                write!(f, "failed to create handle of type {type_id}")
            }
            Self::HandleInvalid => write!(f, "handle is invalid"),
            Self::DataInvalid { len, stride } => match stride {
                Some(stride) => write!(f, "data is invalid: {len} bytes, stride {stride}"),
                None => write!(f, "data is invalid: {len} bytes"),
            },
            Self::HandleWriteFailed { handle, fault } => {
                write!(f, "failed to write {handle}: {fault}")
            }
            Self::HandleReadFailed { handle, fault } => {
                write!(f, "failed to read {handle}: {fault}")
            }
            Self::HandleEraseFailed { handle, fault } => {
                write!(f, "failed to erase {handle}: {fault}")
            }
            Self::InvariantViolated { type_id, reason } => {
                write!(f, "invariant violated in group {type_id}: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
