//! The handle arena: fixed groups of generation-checked slots over one
//! backing allocation.
//!
//! [`HandleArena`] is built once from an [`ArenaDescriptor`]. Construction
//! sizes every group up front, performs a single fallible allocation and
//! formats each group's slot table. After that the arena never grows; every
//! operation is O(1) apart from the group lookup, which is a hash probe.
//!
//! # Buffer layout
//!
//! ```text
//! words: Vec<u32>
//! ├── group 0: slot table (capacity+1 × Slot) │ data block ((capacity+1) × stride)
//! ├── group 1: slot table                     │ data block
//! └── ...                                     (descriptor order)
//! ```
//!
//! Groups store word offsets, not pointers, so the arena can be moved or
//! cloned freely.

use indexmap::IndexMap;
use log::{debug, trace, warn};
use slotmem_core::{Handle, HandleTypeId};

use crate::config::ArenaDescriptor;
use crate::error::ArenaError;
use crate::group::{Group, WriteGate};
use crate::layout::{ArenaLayout, GroupLayout};

const WORD_BYTES: usize = std::mem::size_of::<u32>();

/// Fixed-capacity store of typed, generation-checked slots.
///
/// Mutations take `&mut self`; a slice returned by [`read`](Self::read)
/// borrows the arena and so cannot outlive the next mutation.
#[derive(Clone, Debug)]
pub struct HandleArena {
    name: String,
    /// Groups keyed by type id, in descriptor order.
    groups: IndexMap<HandleTypeId, Group>,
    /// The single backing allocation shared by every group.
    words: Vec<u32>,
}

impl HandleArena {
    /// Build an arena from `desc`.
    ///
    /// Fails with [`ArenaError::DescriptorInvalid`] if the descriptor does
    /// not validate, and with [`ArenaError::AllocFailed`] if the backing
    /// buffer size overflows or the allocator refuses it. No partially
    /// built arena is ever returned.
    pub fn new(desc: &ArenaDescriptor) -> Result<Self, ArenaError> {
        desc.validate()?;

        let mut groups = IndexMap::with_capacity(desc.types.len());
        let mut end = 0usize;
        for ty in &desc.types {
            let group = Group::plan(ty, end)?;
            end = group.end_word();
            groups.insert(ty.type_id, group);
        }

        let requested_bytes = end.checked_mul(WORD_BYTES).unwrap_or(usize::MAX);
        let mut words = Vec::new();
        words
            .try_reserve_exact(end)
            .map_err(|_| ArenaError::AllocFailed { requested_bytes })?;
        words.resize(end, 0);

        for group in groups.values_mut() {
            group.format(&mut words);
        }

        debug!(
            "arena '{}': {} groups, {} backing bytes",
            desc.name,
            groups.len(),
            requested_bytes
        );

        Ok(Self {
            name: desc.name.clone(),
            groups,
            words,
        })
    }

    /// Hand out a fresh handle of `type_id`.
    ///
    /// Fails with [`ArenaError::HandleCreationFailed`] for type 0 or an
    /// unregistered type, and with [`ArenaError::GroupExhausted`] when every
    /// slot of the group is in use.
    pub fn create(&mut self, type_id: impl Into<HandleTypeId>) -> Result<Handle, ArenaError> {
        let type_id = type_id.into();
        if type_id.is_reserved() {
            return Err(ArenaError::HandleCreationFailed { type_id });
        }
        let group = self
            .groups
            .get_mut(&type_id)
            .ok_or(ArenaError::HandleCreationFailed { type_id })?;
        match group.alloc(&mut self.words) {
            Ok(handle) => {
                trace!("arena '{}': created {handle}", self.name);
                Ok(handle)
            }
            Err(err @ ArenaError::GroupExhausted { .. }) => {
                warn!("arena '{}': {err}", self.name);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Store `data` in a freshly created slot.
    ///
    /// The slot must be `Allocated`: a second write without erasing and
    /// recreating is refused. `data` must be non-empty and no longer than
    /// the group's stride; bytes of the slot past `data.len()` are left as
    /// they were. The handle's generation must match the slot's, so a stale
    /// handle is refused even when its slot has been recreated and is
    /// `Allocated` again.
    pub fn write(&mut self, handle: Handle, data: &[u8]) -> Result<(), ArenaError> {
        self.store(handle, data, WriteGate::Once)
    }

    /// Like [`write`](Self::write), but also replaces the data of a slot
    /// that has already been written.
    pub fn overwrite(&mut self, handle: Handle, data: &[u8]) -> Result<(), ArenaError> {
        self.store(handle, data, WriteGate::Overwrite)
    }

    fn store(&mut self, handle: Handle, data: &[u8], gate: WriteGate) -> Result<(), ArenaError> {
        if handle.is_null() {
            return Err(ArenaError::HandleInvalid);
        }
        if data.is_empty() {
            return Err(ArenaError::DataInvalid {
                len: 0,
                stride: None,
            });
        }
        let type_id = handle.type_id();
        let group = self
            .groups
            .get_mut(&type_id)
            .ok_or(ArenaError::GroupQueryFailed { type_id })?;
        if data.len() > group.stride() as usize {
            return Err(ArenaError::DataInvalid {
                len: data.len(),
                stride: Some(group.stride()),
            });
        }
        group
            .store(&mut self.words, handle, data, gate)
            .map_err(|fault| ArenaError::HandleWriteFailed { handle, fault })
    }

    /// Borrow the `stride` bytes stored behind `handle`.
    pub fn try_read(&self, handle: Handle) -> Result<&[u8], ArenaError> {
        if handle.is_null() {
            return Err(ArenaError::HandleInvalid);
        }
        self.group(handle.type_id())?
            .load(&self.words, handle)
            .map_err(|fault| ArenaError::HandleReadFailed { handle, fault })
    }

    /// Borrow the bytes behind `handle`, or `None` if it does not name
    /// written data.
    pub fn read(&self, handle: Handle) -> Option<&[u8]> {
        self.try_read(handle).ok()
    }

    /// Zero the data behind a written `handle` and recycle its slot.
    ///
    /// The slot's generation is kept, so the next `create` that reuses it
    /// mints a handle distinct from `handle`. A zero packed value is not
    /// special-cased: it fails the group lookup (type 0) or names reserved
    /// slot 0 and fails with [`ArenaError::HandleEraseFailed`].
    pub fn erase(&mut self, handle: Handle) -> Result<(), ArenaError> {
        let type_id = handle.type_id();
        let group = self
            .groups
            .get_mut(&type_id)
            .ok_or(ArenaError::GroupQueryFailed { type_id })?;
        group
            .release(&mut self.words, handle)
            .map_err(|fault| ArenaError::HandleEraseFailed { handle, fault })?;
        trace!("arena '{}': erased {handle}", self.name);
        Ok(())
    }

    /// Whether `handle` names written data at its current generation.
    pub fn is_valid(&self, handle: Handle) -> bool {
        !handle.is_null()
            && self
                .groups
                .get(&handle.type_id())
                .is_some_and(|group| group.holds(&self.words, handle))
    }

    fn group(&self, type_id: HandleTypeId) -> Result<&Group, ArenaError> {
        self.groups
            .get(&type_id)
            .ok_or(ArenaError::GroupQueryFailed { type_id })
    }

    /// Snapshot of where every group lives in the backing buffer.
    pub fn layout(&self) -> ArenaLayout {
        ArenaLayout {
            name: self.name.clone(),
            base_address: self.words.as_ptr() as usize,
            payload_bytes: self.words.len() * WORD_BYTES,
            groups: self
                .groups
                .values()
                .map(|group| GroupLayout {
                    type_id: group.type_id(),
                    stride: group.stride(),
                    slot_count: group.slot_count(),
                    free_head: group.free_head(),
                    live: group.live(),
                    slot_table: group.slot_bytes(),
                    data_block: group.data_bytes(),
                })
                .collect(),
        }
    }

    /// Print [`layout`](Self::layout) to stdout.
    pub fn print_layout(&self) {
        print!("{}", self.layout());
    }

    /// Arena name from the descriptor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of handle types.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Registered handle types, in descriptor order.
    pub fn type_ids(&self) -> impl Iterator<Item = HandleTypeId> + '_ {
        self.groups.keys().copied()
    }

    /// Memory held by the arena: its own header, one header per group and
    /// the backing buffer.
    pub fn footprint_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.groups.len() * std::mem::size_of::<Group>()
            + self.words.len() * WORD_BYTES
    }

    /// Slots of `type_id` currently allocated or written.
    pub fn live_count(&self, type_id: impl Into<HandleTypeId>) -> Option<u32> {
        self.groups.get(&type_id.into()).map(Group::live)
    }

    /// Slots of `type_id` still available to `create`.
    pub fn free_count(&self, type_id: impl Into<HandleTypeId>) -> Option<u32> {
        self.groups
            .get(&type_id.into())
            .map(|group| group.capacity() - group.live())
    }

    /// Configured capacity of `type_id`.
    pub fn capacity(&self, type_id: impl Into<HandleTypeId>) -> Option<u32> {
        self.groups.get(&type_id.into()).map(Group::capacity)
    }

    /// Bytes per item of `type_id`.
    pub fn stride(&self, type_id: impl Into<HandleTypeId>) -> Option<u32> {
        self.groups.get(&type_id.into()).map(Group::stride)
    }

    /// Check slot tables and free lists of every group.
    ///
    /// Returns the first violation found. Intended for tests and debug
    /// tooling; cost is linear in the total slot count.
    pub fn validate_invariants(&self) -> Result<(), ArenaError> {
        for group in self.groups.values() {
            group
                .check(&self.words)
                .map_err(|reason| ArenaError::InvariantViolated {
                    type_id: group.type_id(),
                    reason,
                })?;
        }
        Ok(())
    }
}
