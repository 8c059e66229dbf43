//! Generation-checked handle arena with fixed per-type slot groups.
//!
//! A [`HandleArena`] is built once from an [`ArenaDescriptor`] listing the
//! handle types it stores, how many items of each type can be live and how
//! many bytes each item takes. All storage is allocated at construction;
//! afterwards items are created, written, read and erased through compact
//! [`Handle`](slotmem_core::Handle) values that carry a slot index and a
//! generation. A handle to an erased item is detected and refused even
//! after its slot has been reused.
//!
//! # Architecture
//!
//! ```text
//! HandleArena
//! ├── words: Vec<u32>            (single backing allocation)
//! └── groups: IndexMap<HandleTypeId, Group>
//!     └── Group: offsets of a Slot table + data block, free-list head
//! ```
//!
//! # Slot lifecycle
//!
//! `Free → create → Allocated → write → Written → erase → Free`. Slot 0 of
//! every group is permanently `Invalid`, so the all-zero handle never
//! resolves.
//!
//! Two standalone buffers complete the crate: [`ByteArena`], a bump
//! allocator, and [`RingBuffer`], a circular byte queue.
//!
//! # Safety
//!
//! No `unsafe`: slot tables are reinterpreted through `bytemuck`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod bump;
pub mod config;
pub mod error;
mod group;
pub mod layout;
pub mod ring;
pub mod slot;
pub mod typed;

// Public re-exports for the primary API surface.
pub use arena::HandleArena;
pub use bump::ByteArena;
pub use config::{ArenaDescriptor, HandleTypeDescriptor, MAX_CAPACITY};
pub use error::{ArenaError, SlotFault};
pub use layout::{ArenaLayout, GroupLayout};
pub use ring::{RingBuffer, RingError};
pub use slot::{Slot, SlotLink, SlotStatus};
pub use typed::TypedHandle;
