//! Benchmark profiles for the slotmem handle arena.
//!
//! - [`reference_descriptor`]: three handle types of 1024 items each
//! - [`stress_descriptor`]: one type using the whole 16-bit index space
//! - [`fill`]: create and write every slot of a group
//! - [`churn_order`]: deterministic erase order for free-list benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use slotmem_arena::{ArenaDescriptor, ArenaError, HandleArena, HandleTypeDescriptor, MAX_CAPACITY};
use slotmem_core::{Handle, HandleTypeId};

/// Small, medium and large items, 1024 of each.
pub fn reference_descriptor() -> ArenaDescriptor {
    ArenaDescriptor::new("BENCH_REFERENCE")
        .with_type(HandleTypeDescriptor::new(1, 1024, 16))
        .with_type(HandleTypeDescriptor::new(2, 1024, 64))
        .with_type(HandleTypeDescriptor::new(3, 1024, 256))
}

/// One type at the maximum capacity with 32-byte items.
pub fn stress_descriptor() -> ArenaDescriptor {
    ArenaDescriptor::new("BENCH_STRESS").with_type(HandleTypeDescriptor::new(1, MAX_CAPACITY, 32))
}

/// Create and write handles of `type_id` until the group is exhausted.
///
/// Each payload is `stride` bytes of the slot's position in creation order.
pub fn fill(arena: &mut HandleArena, type_id: HandleTypeId) -> Result<Vec<Handle>, ArenaError> {
    let capacity = arena
        .capacity(type_id)
        .ok_or(ArenaError::GroupQueryFailed { type_id })?;
    let stride = arena
        .stride(type_id)
        .ok_or(ArenaError::GroupQueryFailed { type_id })? as usize;
    let mut handles = Vec::with_capacity(capacity as usize);
    for i in 0..capacity {
        let handle = arena.create(type_id)?;
        arena.write(handle, &vec![i as u8; stride])?;
        handles.push(handle);
    }
    Ok(handles)
}

/// A permutation of `0..len` derived from `seed`.
///
/// Uses a multiplicative step coprime to `len`, so erasing in this order
/// scatters the free list without pulling in a random number generator.
pub fn churn_order(len: usize, seed: u64) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut step = (seed as usize | 1) % len;
    while step == 0 || gcd(step, len) != 1 {
        step += 1;
    }
    let start = (seed as usize) % len;
    (0..len).map(|i| (start + i * step) % len).collect()
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        assert!(reference_descriptor().validate().is_ok());
        assert!(stress_descriptor().validate().is_ok());
    }

    #[test]
    fn fill_exhausts_group() {
        let desc = ArenaDescriptor::new("FILL").with_type(HandleTypeDescriptor::new(1, 8, 4));
        let mut arena = HandleArena::new(&desc).unwrap();
        let handles = fill(&mut arena, HandleTypeId(1)).unwrap();
        assert_eq!(handles.len(), 8);
        assert_eq!(arena.free_count(1), Some(0));
        assert!(handles.iter().all(|&h| arena.is_valid(h)));
        assert!(fill(&mut arena, HandleTypeId(9)).is_err());
    }

    #[test]
    fn churn_order_is_a_permutation() {
        for len in [1usize, 2, 7, 64, 1000] {
            let mut order = churn_order(len, 0xDEAD_BEEF);
            order.sort_unstable();
            assert_eq!(order, (0..len).collect::<Vec<_>>());
        }
        assert!(churn_order(0, 1).is_empty());
    }
}
