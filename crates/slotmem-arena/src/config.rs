//! Arena descriptors: the static configuration an arena is built from.

use slotmem_core::handle::MAX_INDEX;
use slotmem_core::{HandleTypeId, SlotType};

use crate::error::ArenaError;

/// Largest per-type capacity. Slot 0 is reserved, so a group with this
/// capacity uses every 16-bit index.
pub const MAX_CAPACITY: u32 = MAX_INDEX as u32;

/// Describes one handle type: how many items it holds and how large each
/// item is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleTypeDescriptor {
    /// Non-zero identifier, unique within the arena.
    pub type_id: HandleTypeId,
    /// Number of items that can be live at once.
    pub capacity: u32,
    /// Bytes reserved per item.
    pub stride: u32,
}

impl HandleTypeDescriptor {
    /// Describe a handle type.
    pub fn new(type_id: impl Into<HandleTypeId>, capacity: u32, stride: u32) -> Self {
        Self {
            type_id: type_id.into(),
            capacity,
            stride,
        }
    }

    /// Describe the group backing a [`SlotType`]; the stride is the size of
    /// `T`.
    pub fn of<T: SlotType>(capacity: u32) -> Self {
        Self::new(T::TYPE_ID, capacity, std::mem::size_of::<T>() as u32)
    }

    /// Number of slots the group needs, including reserved slot 0.
    pub fn slot_count(&self) -> u32 {
        self.capacity.saturating_add(1)
    }

    /// Check this entry in isolation.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.type_id.is_reserved() {
            return Err(ArenaError::DescriptorInvalid {
                reason: "type id 0 is reserved".into(),
            });
        }
        if self.capacity == 0 || self.stride == 0 {
            return Err(ArenaError::DescriptorInvalid {
                reason: format!(
                    "type {} needs capacity > 0 and stride > 0 (got capacity {}, stride {})",
                    self.type_id, self.capacity, self.stride,
                ),
            });
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ArenaError::DescriptorInvalid {
                reason: format!(
                    "type {} capacity {} exceeds the 16-bit index space ({MAX_CAPACITY})",
                    self.type_id, self.capacity,
                ),
            });
        }
        Ok(())
    }
}

/// Immutable description of an arena: a name and an ordered list of
/// handle types.
///
/// Groups are laid out in the order their types appear here.
///
/// ```
/// use slotmem_arena::{ArenaDescriptor, HandleTypeDescriptor};
///
/// let desc = ArenaDescriptor::new("USER_ARENA")
///     .with_type(HandleTypeDescriptor::new(1, 32, 40))
///     .with_type(HandleTypeDescriptor::new(2, 32, 80));
/// assert!(desc.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaDescriptor {
    /// Human-readable name (for diagnostics).
    pub name: String,
    /// Handle types, in layout order.
    pub types: Vec<HandleTypeDescriptor>,
}

impl ArenaDescriptor {
    /// Start a descriptor with no types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Append a handle type.
    pub fn with_type(mut self, desc: HandleTypeDescriptor) -> Self {
        self.types.push(desc);
        self
    }

    /// Append the group backing a [`SlotType`].
    pub fn with_slot_type<T: SlotType>(self, capacity: u32) -> Self {
        self.with_type(HandleTypeDescriptor::of::<T>(capacity))
    }

    /// Check the whole descriptor: at least one type, every entry valid,
    /// no type id used twice.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.types.is_empty() {
            return Err(ArenaError::DescriptorInvalid {
                reason: format!("arena '{}' declares no handle types", self.name),
            });
        }
        for (i, desc) in self.types.iter().enumerate() {
            desc.validate()?;
            if self.types[i + 1..]
                .iter()
                .any(|other| other.type_id == desc.type_id)
            {
                return Err(ArenaError::DescriptorInvalid {
                    reason: format!("type {} declared more than once", desc.type_id),
                });
            }
        }
        Ok(())
    }
}
