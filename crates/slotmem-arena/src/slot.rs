//! Per-item slot records.
//!
//! A [`Slot`] tracks the lifecycle of one storable item:
//!
//! ```text
//! Free ──create──► Allocated ──write──► Written ──erase──► Free
//! ```
//!
//! `Invalid` is the permanent state of slot 0 in every group. Slots are
//! `Pod` so that a group's slot table can live inside the arena's single
//! backing buffer next to its data block.
//!
//! The slot carries two link fields whose meaning depends on the status:
//! `next_free` is only meaningful while the slot is `Free`, `handle` only
//! while it is `Allocated` or `Written`. The inactive field is kept at zero
//! and the accessors refuse to expose it.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use slotmem_core::handle::encode;

/// Lifecycle state of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlotStatus {
    /// Reserved slot 0. Never allocated.
    Invalid = 0,
    /// On the free list.
    Free = 1,
    /// Handed out by `create`, not yet written.
    Allocated = 2,
    /// Holds data.
    Written = 3,
}

impl SlotStatus {
    /// Decode a raw status byte. Unknown values decode as `Invalid`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Free,
            2 => Self::Allocated,
            3 => Self::Written,
            _ => Self::Invalid,
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "invalid"),
            Self::Free => write!(f, "free"),
            Self::Allocated => write!(f, "allocated"),
            Self::Written => write!(f, "written"),
        }
    }
}

/// What a slot's link word currently means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotLink {
    /// Reserved slot: no link.
    None,
    /// Free slot: next index on the free list (0 ends the list).
    NextFree(u16),
    /// Slot in use: its own encoded handle.
    Handle(u32),
}

/// One slot record. 12 bytes, 4-byte aligned, no implicit padding.
///
/// An all-zero slot is `Invalid` with generation 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Slot {
    /// Own encoded handle while `Allocated`/`Written`, else 0.
    handle: u32,
    generation: u16,
    /// Next free index while `Free` (0 terminates the list), else 0.
    next_free: u16,
    status: u8,
    _pad: [u8; 3],
}

impl Slot {
    /// Current lifecycle state.
    pub fn status(&self) -> SlotStatus {
        SlotStatus::from_raw(self.status)
    }

    /// Generation of the most recent allocation of this slot.
    pub fn generation(&self) -> u16 {
        self.generation
    }

    /// Next index on the free list, or `None` if this slot is not free.
    ///
    /// `Some(0)` marks the end of the list.
    pub fn next_free(&self) -> Option<u16> {
        match self.status() {
            SlotStatus::Free => Some(self.next_free),
            _ => None,
        }
    }

    /// The handle value cached at allocation, or `None` if the slot is not
    /// in use. The group's generation check is authoritative, not this.
    pub fn cached_handle(&self) -> Option<u32> {
        match self.status() {
            SlotStatus::Allocated | SlotStatus::Written => Some(self.handle),
            _ => None,
        }
    }

    /// The link word, tagged by the current status.
    pub fn link(&self) -> SlotLink {
        match self.status() {
            SlotStatus::Invalid => SlotLink::None,
            SlotStatus::Free => SlotLink::NextFree(self.next_free),
            SlotStatus::Allocated | SlotStatus::Written => SlotLink::Handle(self.handle),
        }
    }

    /// Turn this slot into the reserved slot 0.
    pub(crate) fn reserve(&mut self) {
        *self = Self::zeroed();
        self.status = SlotStatus::Invalid as u8;
    }

    /// Put this slot on the free list in front of `next`.
    ///
    /// The generation is left untouched.
    pub(crate) fn release(&mut self, next: u16) {
        self.handle = 0;
        self.next_free = next;
        self.status = SlotStatus::Free as u8;
    }

    /// Hand this free slot out as `index`, bumping its generation.
    ///
    /// Returns the new generation. Wraps after `u16::MAX`.
    pub(crate) fn occupy(&mut self, index: u16) -> u16 {
        self.generation = self.generation.wrapping_add(1);
        self.next_free = 0;
        self.handle = encode(index, self.generation);
        self.status = SlotStatus::Allocated as u8;
        self.generation
    }

    /// Record that data has been stored in this slot.
    pub(crate) fn mark_written(&mut self) {
        self.status = SlotStatus::Written as u8;
    }
}
