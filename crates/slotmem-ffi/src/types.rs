//! C-compatible value types passed across the boundary.

use slotmem_arena::HandleTypeDescriptor;
use slotmem_core::{Handle, HandleTypeId};

/// A handle as seen from C: the packed `(generation << 16) | index` value
/// and the handle type.
///
/// The all-zero value is the invalid handle returned by failed creates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotmemHandle {
    /// Packed generation and slot index.
    pub value: u32,
    /// Handle type the value was minted for.
    pub type_id: u32,
}

impl SlotmemHandle {
    /// The invalid handle.
    pub const INVALID: Self = Self {
        value: 0,
        type_id: 0,
    };
}

impl From<Handle> for SlotmemHandle {
    fn from(handle: Handle) -> Self {
        Self {
            value: handle.packed(),
            type_id: handle.type_id().0,
        }
    }
}

impl From<SlotmemHandle> for Handle {
    fn from(handle: SlotmemHandle) -> Self {
        Handle::from_raw(handle.value, HandleTypeId(handle.type_id))
    }
}

/// One entry of the type table passed to `slotmem_arena_init`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotmemTypeDescriptor {
    /// Non-zero handle type id.
    pub type_id: u32,
    /// Items that can be live at once.
    pub capacity: u32,
    /// Bytes per item.
    pub stride: u32,
}

impl From<&SlotmemTypeDescriptor> for HandleTypeDescriptor {
    fn from(desc: &SlotmemTypeDescriptor) -> Self {
        HandleTypeDescriptor::new(desc.type_id, desc.capacity, desc.stride)
    }
}
