//! slotmem: a fixed-capacity arena of generation-checked, typed handles.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! slotmem sub-crates. For most users, adding `slotmem` as a single
//! dependency is sufficient. The C ABI lives in the separate `slotmem-ffi`
//! crate.
//!
//! # Quick start
//!
//! ```rust
//! use slotmem::prelude::*;
//!
//! #[repr(C)]
//! #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
//! struct Position {
//!     x: f32,
//!     y: f32,
//! }
//!
//! impl SlotType for Position {
//!     const TYPE_ID: HandleTypeId = HandleTypeId(1);
//! }
//!
//! let desc = ArenaDescriptor::new("WORLD").with_slot_type::<Position>(64);
//! let mut arena = HandleArena::new(&desc).unwrap();
//!
//! let h = arena.create_typed::<Position>().unwrap();
//! arena.write_typed(h, &Position { x: 1.0, y: 2.0 }).unwrap();
//! assert_eq!(arena.read_typed(h).map(|p| p.y), Some(2.0));
//!
//! arena.erase_typed(h).unwrap();
//! assert!(!arena.is_valid_typed(h));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slotmem-core` | Handle codec, type ids, error classes, `SlotType` |
//! | [`arena`] | `slotmem-arena` | `HandleArena`, descriptors, layout, byte buffers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handle arena, descriptors and auxiliary buffers (`slotmem-arena`).
///
/// Most users only need [`arena::HandleArena`] and
/// [`arena::ArenaDescriptor`], which are also in the [`prelude`].
pub use slotmem_arena as arena;

/// Handles, identifiers and the error taxonomy (`slotmem-core`).
///
/// [`types::handle`] exposes the raw 32-bit packing functions.
pub use slotmem_core as types;

/// Common imports for typical slotmem usage.
///
/// ```rust
/// use slotmem::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use slotmem_arena::{
        ArenaDescriptor, ArenaError, HandleArena, HandleTypeDescriptor, TypedHandle,
    };

    // Core types and traits
    pub use slotmem_core::{ErrorClass, Handle, HandleTypeId, SlotType};
}
