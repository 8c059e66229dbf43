//! Reusable arena descriptors and payload types.
//!
//! - [`scenario_descriptor`]: one type, capacity 2, stride 16.
//! - [`user_arena_descriptor`]: a string type and an array type.
//! - [`UserString`] / [`UserArray`]: `Pod` payloads implementing `SlotType`.

use bytemuck::{Pod, Zeroable};
use slotmem_arena::{ArenaDescriptor, HandleTypeDescriptor};
use slotmem_core::{HandleTypeId, SlotType};

/// Type id of the single group in [`scenario_descriptor`].
pub const SCENARIO_TYPE: HandleTypeId = HandleTypeId(1);

/// Type id of [`UserString`].
pub const STRING_TYPE: HandleTypeId = HandleTypeId(1);

/// Type id of [`UserArray`].
pub const ARRAY_TYPE: HandleTypeId = HandleTypeId(2);

/// `{type 1, capacity 2, stride 16}`: small enough to exhaust by hand.
pub fn scenario_descriptor() -> ArenaDescriptor {
    ArenaDescriptor::new("SCENARIO").with_type(HandleTypeDescriptor::new(SCENARIO_TYPE, 2, 16))
}

/// Two groups of `capacity` items each: [`UserString`] then [`UserArray`].
pub fn user_arena_descriptor(capacity: u32) -> ArenaDescriptor {
    ArenaDescriptor::new("USER_ARENA")
        .with_slot_type::<UserString>(capacity)
        .with_slot_type::<UserArray>(capacity)
}

/// Deterministic payload of `len` bytes; different seeds give different
/// bytes.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed) | 1)
        .collect()
}

/// Fixed-capacity string: up to 32 bytes of UTF-8 plus a length.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct UserString {
    pub data: [u8; 32],
    pub length: u64,
}

impl UserString {
    /// Copy `text`, truncated to 32 bytes.
    pub fn new(text: &str) -> Self {
        let mut data = [0u8; 32];
        let len = text.len().min(data.len());
        data[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self {
            data,
            length: len as u64,
        }
    }

    /// The stored text, or `None` if truncation split a character.
    pub fn as_str(&self) -> Option<&str> {
        let len = (self.length as usize).min(self.data.len());
        std::str::from_utf8(&self.data[..len]).ok()
    }
}

impl SlotType for UserString {
    const TYPE_ID: HandleTypeId = STRING_TYPE;
}

/// Ten unsigned 64-bit values.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct UserArray {
    pub values: [u64; 10],
}

impl SlotType for UserArray {
    const TYPE_ID: HandleTypeId = ARRAY_TYPE;
}
