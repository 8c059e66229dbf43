//! Core types for the slotmem handle arena.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces every other slotmem crate agrees on: the handle-type identifier,
//! the 32-bit handle codec, the error taxonomy, and the [`SlotType`] trait
//! used by typed handles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod id;
pub mod traits;

pub use error::ErrorClass;
pub use handle::Handle;
pub use id::HandleTypeId;
pub use traits::SlotType;
