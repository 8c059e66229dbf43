//! Statically typed handles over [`HandleArena`].
//!
//! A [`TypedHandle<T>`] can only be produced by [`HandleArena::create_typed`]
//! and only accepted by the `_typed` operations for the same `T`, so a
//! handle to one payload type cannot be passed where another is expected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmem_core::{Handle, SlotType};

use crate::arena::HandleArena;
use crate::error::ArenaError;

/// A [`Handle`] known to refer to a `T`.
pub struct TypedHandle<T> {
    raw: Handle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    /// The untyped handle.
    pub fn raw(&self) -> Handle {
        self.raw
    }
}

impl<T: SlotType> TypedHandle<T> {
    /// Reinterpret `raw` as a handle to `T`.
    ///
    /// Returns `None` if `raw` was minted for a different type id.
    pub fn from_raw(raw: Handle) -> Option<Self> {
        (raw.type_id() == T::TYPE_ID).then_some(Self {
            raw,
            _marker: PhantomData,
        })
    }
}

impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> Hash for TypedHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedHandle")
            .field(&std::any::type_name::<T>())
            .field(&self.raw)
            .finish()
    }
}

impl<T> From<TypedHandle<T>> for Handle {
    fn from(handle: TypedHandle<T>) -> Self {
        handle.raw
    }
}

impl HandleArena {
    /// Create a handle in the group registered for `T`.
    pub fn create_typed<T: SlotType>(&mut self) -> Result<TypedHandle<T>, ArenaError> {
        let raw = self.create(T::TYPE_ID)?;
        Ok(TypedHandle {
            raw,
            _marker: PhantomData,
        })
    }

    /// Store `value` behind a freshly created typed handle.
    pub fn write_typed<T: SlotType>(
        &mut self,
        handle: TypedHandle<T>,
        value: &T,
    ) -> Result<(), ArenaError> {
        self.write(handle.raw, bytemuck::bytes_of(value))
    }

    /// Replace the value behind a typed handle.
    pub fn overwrite_typed<T: SlotType>(
        &mut self,
        handle: TypedHandle<T>,
        value: &T,
    ) -> Result<(), ArenaError> {
        self.overwrite(handle.raw, bytemuck::bytes_of(value))
    }

    /// Copy the value behind a typed handle out of the arena.
    ///
    /// Slot data has no alignment guarantee beyond the stride, so the value
    /// is read unaligned. Returns `None` if the handle is not valid or the
    /// group's stride is smaller than `T`.
    pub fn read_typed<T: SlotType>(&self, handle: TypedHandle<T>) -> Option<T> {
        let bytes = self.read(handle.raw)?;
        bytemuck::try_pod_read_unaligned(bytes.get(..std::mem::size_of::<T>())?).ok()
    }

    /// Erase the value behind a typed handle.
    pub fn erase_typed<T: SlotType>(&mut self, handle: TypedHandle<T>) -> Result<(), ArenaError> {
        self.erase(handle.raw)
    }

    /// Whether a typed handle still names written data.
    pub fn is_valid_typed<T: SlotType>(&self, handle: TypedHandle<T>) -> bool {
        self.is_valid(handle.raw)
    }
}
