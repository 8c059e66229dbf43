//! Per-type slot groups.
//!
//! A [`Group`] owns two regions of the arena's backing words: a slot table
//! of `capacity + 1` [`Slot`] records followed by a data block of
//! `(capacity + 1) * stride` bytes. The group itself holds only offsets, so
//! every operation takes the backing words as an argument. That keeps the
//! arena movable and clonable without fixing up internal pointers.

use std::ops::Range;

use slotmem_core::handle::encode;
use slotmem_core::{Handle, HandleTypeId};

use crate::config::{HandleTypeDescriptor, MAX_CAPACITY};
use crate::error::{ArenaError, SlotFault};
use crate::slot::{Slot, SlotStatus};

const WORD_BYTES: usize = std::mem::size_of::<u32>();
const SLOT_WORDS: usize = std::mem::size_of::<Slot>() / WORD_BYTES;

/// Which statuses a store into a slot accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WriteGate {
    /// First write after `create` only.
    Once,
    /// First write or replacement of existing data.
    Overwrite,
}

impl WriteGate {
    fn admits(self, status: SlotStatus) -> bool {
        match self {
            Self::Once => status == SlotStatus::Allocated,
            Self::Overwrite => {
                matches!(status, SlotStatus::Allocated | SlotStatus::Written)
            }
        }
    }
}

/// Slot table and data block for one handle type.
#[derive(Clone, Debug)]
pub(crate) struct Group {
    type_id: HandleTypeId,
    stride: u32,
    slot_count: u32,
    free_head: u16,
    live: u32,
    /// Word range of the slot table within the backing buffer.
    slots: Range<usize>,
    /// Word range of the data block; the last word may carry padding.
    data: Range<usize>,
}

fn overflow() -> ArenaError {
    ArenaError::AllocFailed {
        requested_bytes: usize::MAX,
    }
}

impl Group {
    /// Place a group at `word_offset` without touching storage.
    ///
    /// Rejects zero capacity or stride, and capacities beyond the index
    /// space. Size arithmetic that overflows `usize` is reported as an
    /// allocation failure.
    pub(crate) fn plan(
        desc: &HandleTypeDescriptor,
        word_offset: usize,
    ) -> Result<Self, ArenaError> {
        if desc.capacity == 0 || desc.stride == 0 {
            return Err(ArenaError::GroupCreationFailed {
                type_id: desc.type_id,
                reason: format!(
                    "capacity {} and stride {} must both be positive",
                    desc.capacity, desc.stride
                ),
            });
        }
        if desc.capacity > MAX_CAPACITY {
            return Err(ArenaError::GroupCreationFailed {
                type_id: desc.type_id,
                reason: format!("capacity {} exceeds {MAX_CAPACITY}", desc.capacity),
            });
        }

        let slot_count = desc.slot_count();
        let slot_words = (slot_count as usize)
            .checked_mul(SLOT_WORDS)
            .ok_or_else(overflow)?;
        let data_bytes = (slot_count as usize)
            .checked_mul(desc.stride as usize)
            .ok_or_else(overflow)?;
        let data_words = data_bytes.div_ceil(WORD_BYTES);

        let slots_end = word_offset.checked_add(slot_words).ok_or_else(overflow)?;
        let data_end = slots_end.checked_add(data_words).ok_or_else(overflow)?;

        Ok(Self {
            type_id: desc.type_id,
            stride: desc.stride,
            slot_count,
            free_head: 0,
            live: 0,
            slots: word_offset..slots_end,
            data: slots_end..data_end,
        })
    }

    /// One past the last backing word this group uses.
    pub(crate) fn end_word(&self) -> usize {
        self.data.end
    }

    /// Initialise the slot table: slot 0 reserved, every other slot free
    /// and chained in ascending order.
    pub(crate) fn format(&mut self, words: &mut [u32]) {
        let (slots, data) = self.split_mut(words);
        data.fill(0);
        slots[0].reserve();
        let last = slots.len() - 1;
        for (i, slot) in slots.iter_mut().enumerate().skip(1) {
            *slot = Slot::default();
            let next = if i == last { 0 } else { (i + 1) as u16 };
            slot.release(next);
        }
        self.free_head = 1;
        self.live = 0;
    }

    pub(crate) fn type_id(&self) -> HandleTypeId {
        self.type_id
    }

    pub(crate) fn stride(&self) -> u32 {
        self.stride
    }

    pub(crate) fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.slot_count - 1
    }

    pub(crate) fn free_head(&self) -> u16 {
        self.free_head
    }

    /// Slots currently `Allocated` or `Written`.
    pub(crate) fn live(&self) -> u32 {
        self.live
    }

    /// Byte range of the slot table within the backing buffer.
    pub(crate) fn slot_bytes(&self) -> Range<usize> {
        self.slots.start * WORD_BYTES..self.slots.end * WORD_BYTES
    }

    /// Byte range of the data block (excluding trailing padding).
    pub(crate) fn data_bytes(&self) -> Range<usize> {
        let start = self.data.start * WORD_BYTES;
        start..start + self.data_len()
    }

    fn data_len(&self) -> usize {
        self.slot_count as usize * self.stride as usize
    }

    fn item(&self, index: u16) -> Range<usize> {
        let start = index as usize * self.stride as usize;
        start..start + self.stride as usize
    }

    fn slots<'w>(&self, words: &'w [u32]) -> &'w [Slot] {
        bytemuck::cast_slice(&words[self.slots.clone()])
    }

    fn data<'w>(&self, words: &'w [u32]) -> &'w [u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&words[self.data.clone()]);
        &bytes[..self.data_len()]
    }

    fn split_mut<'w>(&self, words: &'w mut [u32]) -> (&'w mut [Slot], &'w mut [u8]) {
        let len = self.data_len();
        let region = &mut words[self.slots.start..self.data.end];
        let (slots, data) = region.split_at_mut(self.slots.len());
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(data);
        (bytemuck::cast_slice_mut(slots), &mut bytes[..len])
    }

    /// Check index, status and generation of `handle` against `slots`.
    fn resolve(
        &self,
        slots: &[Slot],
        handle: Handle,
        admits: impl Fn(SlotStatus) -> bool,
    ) -> Result<u16, SlotFault> {
        let index = handle.index();
        if index == 0 || index as u32 >= self.slot_count {
            return Err(SlotFault::IndexOutOfRange {
                index,
                slot_count: self.slot_count,
            });
        }
        let slot = &slots[index as usize];
        if !admits(slot.status()) {
            return Err(SlotFault::UnexpectedStatus {
                found: slot.status(),
            });
        }
        if slot.generation() != handle.generation() {
            return Err(SlotFault::StaleGeneration {
                handle_generation: handle.generation(),
                slot_generation: slot.generation(),
            });
        }
        Ok(index)
    }

    /// Pop the free-list head and mint a handle for it.
    pub(crate) fn alloc(&mut self, words: &mut [u32]) -> Result<Handle, ArenaError> {
        if self.free_head == 0 {
            return Err(ArenaError::GroupExhausted {
                type_id: self.type_id,
                capacity: self.capacity(),
            });
        }
        let index = self.free_head;
        let type_id = self.type_id;
        let (slots, _) = self.split_mut(words);
        let slot = &mut slots[index as usize];
        debug_assert_eq!(
            slot.status(),
            SlotStatus::Free,
            "free list of type {type_id} points at a slot in use"
        );
        let Some(next) = slot.next_free() else {
            return Err(ArenaError::GroupSlotAllocFailed { type_id, index });
        };
        let generation = slot.occupy(index);
        self.free_head = next;
        self.live += 1;
        Ok(Handle::new(index, generation, type_id))
    }

    /// Copy `data` into the slot behind `handle`. The caller has already
    /// checked `data.len() <= stride`.
    pub(crate) fn store(
        &mut self,
        words: &mut [u32],
        handle: Handle,
        data: &[u8],
        gate: WriteGate,
    ) -> Result<(), SlotFault> {
        debug_assert!(data.len() <= self.stride as usize);
        let (slots, bytes) = self.split_mut(words);
        let index = self.resolve(slots, handle, |s| gate.admits(s))?;
        let start = self.item(index).start;
        bytes[start..start + data.len()].copy_from_slice(data);
        slots[index as usize].mark_written();
        Ok(())
    }

    /// Borrow the `stride` bytes behind a written `handle`.
    pub(crate) fn load<'w>(
        &self,
        words: &'w [u32],
        handle: Handle,
    ) -> Result<&'w [u8], SlotFault> {
        let index = self.resolve(self.slots(words), handle, |s| s == SlotStatus::Written)?;
        Ok(&self.data(words)[self.item(index)])
    }

    /// Zero the data behind a written `handle` and push its slot on the
    /// free list.
    pub(crate) fn release(&mut self, words: &mut [u32], handle: Handle) -> Result<(), SlotFault> {
        let head = self.free_head;
        let (slots, bytes) = self.split_mut(words);
        let index = self.resolve(slots, handle, |s| s == SlotStatus::Written)?;
        bytes[self.item(index)].fill(0);
        slots[index as usize].release(head);
        self.free_head = index;
        self.live -= 1;
        Ok(())
    }

    /// Whether `handle` names a written slot at the current generation.
    pub(crate) fn holds(&self, words: &[u32], handle: Handle) -> bool {
        self.resolve(self.slots(words), handle, |s| s == SlotStatus::Written)
            .is_ok()
    }

    /// Walk the slot table and free list, reporting the first broken
    /// invariant.
    pub(crate) fn check(&self, words: &[u32]) -> Result<(), String> {
        let slots = self.slots(words);
        if slots[0].status() != SlotStatus::Invalid {
            return Err(format!("slot 0 is {}", slots[0].status()));
        }

        let mut on_list = vec![false; slots.len()];
        let mut cursor = self.free_head;
        let mut listed = 0u32;
        while cursor != 0 {
            let i = cursor as usize;
            if i >= slots.len() {
                return Err(format!("free list reaches index {i} past {}", slots.len()));
            }
            if on_list[i] {
                return Err(format!("free list visits slot {i} twice"));
            }
            on_list[i] = true;
            listed += 1;
            cursor = match slots[i].next_free() {
                Some(next) => next,
                None => {
                    return Err(format!(
                        "free list reaches slot {i}, which is {}",
                        slots[i].status()
                    ));
                }
            };
        }

        let mut in_use = 0u32;
        for (i, slot) in slots.iter().enumerate().skip(1) {
            match slot.status() {
                SlotStatus::Invalid => return Err(format!("slot {i} is invalid")),
                SlotStatus::Free if !on_list[i] => {
                    return Err(format!("slot {i} is free but not on the free list"));
                }
                SlotStatus::Free => {}
                SlotStatus::Allocated | SlotStatus::Written => {
                    in_use += 1;
                    let expected = encode(i as u16, slot.generation());
                    if slot.cached_handle() != Some(expected) {
                        return Err(format!(
                            "slot {i} caches a handle other than {expected:#010x}"
                        ));
                    }
                }
            }
        }

        if in_use != self.live {
            return Err(format!("{in_use} slots in use, counter says {}", self.live));
        }
        if listed + in_use != self.capacity() {
            return Err(format!(
                "{listed} free + {in_use} in use does not cover capacity {}",
                self.capacity()
            ));
        }
        Ok(())
    }
}
