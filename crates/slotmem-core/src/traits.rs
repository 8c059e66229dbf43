//! Traits binding Rust types to arena handle types.

use crate::id::HandleTypeId;

/// A plain-old-data type stored in its own arena group.
///
/// Implementors declare which [`HandleTypeId`] their group uses. Typed
/// handles built on this trait cannot be confused across types at compile
/// time, and the arena checks the id again at runtime.
///
/// ```
/// use bytemuck::{Pod, Zeroable};
/// use slotmem_core::{HandleTypeId, SlotType};
///
/// #[repr(C)]
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// struct Particle {
///     pos: [f32; 3],
///     mass: f32,
/// }
///
/// impl SlotType for Particle {
///     const TYPE_ID: HandleTypeId = HandleTypeId(1);
/// }
/// ```
pub trait SlotType: bytemuck::Pod {
    /// Group this type is stored in. Must not be [`HandleTypeId::INVALID`].
    const TYPE_ID: HandleTypeId;
}
