//! Generation-checked handles and the 32-bit packing codec.
//!
//! A [`Handle`] names one slot of one group: the low 16 bits of the packed
//! value are the slot index, the high 16 bits are the generation the slot
//! had when the handle was minted. Handles are plain values; copying one
//! never extends the lifetime of the data it refers to.
//!
//! ```text
//!  31            16 15             0
//! ┌────────────────┬────────────────┐
//! │   generation   │     index      │
//! └────────────────┴────────────────┘
//! ```
//!
//! Index 0 is reserved in every group, so the all-zero packed value is
//! never a live handle. The generation is 16 bits wide and wraps: after
//! 65536 allocations of the same slot, a handle from the first epoch
//! would decode to the same generation again. This is a known limitation
//! of the packed representation.

use std::fmt;

use crate::id::HandleTypeId;

/// Number of low bits holding the slot index.
pub const INDEX_BITS: u32 = 16;

/// Mask selecting the slot index from a packed handle.
pub const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Shift applied to the generation when packing.
pub const GENERATION_SHIFT: u32 = INDEX_BITS;

/// Largest slot index representable in a handle.
pub const MAX_INDEX: u16 = u16::MAX;

/// Pack a slot index and generation into a 32-bit handle value.
pub const fn encode(index: u16, generation: u16) -> u32 {
    ((generation as u32) << GENERATION_SHIFT) | (index as u32 & INDEX_MASK)
}

/// Extract the slot index from a packed handle value.
pub const fn decode_index(packed: u32) -> u16 {
    (packed & INDEX_MASK) as u16
}

/// Extract the generation from a packed handle value.
pub const fn decode_generation(packed: u32) -> u16 {
    (packed >> GENERATION_SHIFT) as u16
}

/// Split a packed handle value into `(index, generation)`.
pub const fn decode(packed: u32) -> (u16, u16) {
    (decode_index(packed), decode_generation(packed))
}

/// Caller-facing reference to one slot of an arena group.
///
/// Carries no ownership. A handle stays the same value forever; whether it
/// still refers to live data is a question only the arena can answer
/// (see `HandleArena::is_valid` in `slotmem-arena`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Handle {
    packed: u32,
    type_id: HandleTypeId,
}

impl Handle {
    /// The all-zero handle. Never valid in any arena.
    pub const INVALID: Self = Self {
        packed: 0,
        type_id: HandleTypeId::INVALID,
    };

    /// Build a handle from its raw parts.
    ///
    /// Arenas mint handles themselves; this is for foreign surfaces (the C
    /// ABI) that carry handles across a boundary as plain integers.
    pub const fn from_raw(packed: u32, type_id: HandleTypeId) -> Self {
        Self { packed, type_id }
    }

    /// Build a handle for `index` at `generation` in group `type_id`.
    pub const fn new(index: u16, generation: u16, type_id: HandleTypeId) -> Self {
        Self {
            packed: encode(index, generation),
            type_id,
        }
    }

    /// The packed `(generation << 16) | index` value.
    pub const fn packed(&self) -> u32 {
        self.packed
    }

    /// The handle type (group) this handle was minted for.
    pub const fn type_id(&self) -> HandleTypeId {
        self.type_id
    }

    /// The slot index.
    pub const fn index(&self) -> u16 {
        decode_index(self.packed)
    }

    /// The slot generation at mint time.
    pub const fn generation(&self) -> u16 {
        decode_generation(self.packed)
    }

    /// Whether the packed value is zero.
    ///
    /// A null handle is rejected up front by every arena operation.
    pub const fn is_null(&self) -> bool {
        self.packed == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle(type={}, idx={}, gen={})",
            self.type_id,
            self.index(),
            self.generation()
        )
    }
}
