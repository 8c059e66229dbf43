//! Test fixtures for slotmem development.
//!
//! Provides ready-made arena descriptors and two `Pod` payload types,
//! [`UserString`] and [`UserArray`], shared by the integration tests,
//! benchmarks and the sandbox example.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    pattern, scenario_descriptor, user_arena_descriptor, UserArray, UserString,
    ARRAY_TYPE, SCENARIO_TYPE, STRING_TYPE,
};
