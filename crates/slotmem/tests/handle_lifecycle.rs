//! Integration test: the handle lifecycle through the facade.
//!
//! Covers the capacity bound, write/read round trips, the write-size bound,
//! stale-handle rejection after slot reuse, the write-once gate, wrong-type
//! and zero handles, and the two-slot walkthrough from the crate docs.

use slotmem::arena::{SlotFault, SlotStatus};
use slotmem::prelude::*;
use slotmem_test_utils::{pattern, scenario_descriptor, SCENARIO_TYPE};

fn two_type_arena(capacity: u32, stride: u32) -> HandleArena {
    let desc = ArenaDescriptor::new("LIFECYCLE")
        .with_type(HandleTypeDescriptor::new(1, capacity, stride))
        .with_type(HandleTypeDescriptor::new(2, capacity, stride));
    HandleArena::new(&desc).unwrap()
}

// ── Walkthrough ──────────────────────────────────────────────

#[test]
fn two_slot_walkthrough() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();

    let h1 = arena.create(SCENARIO_TYPE).unwrap();
    let h2 = arena.create(SCENARIO_TYPE).unwrap();
    assert_ne!(h1.packed(), h2.packed());
    assert!(matches!(
        arena.create(SCENARIO_TYPE),
        Err(ArenaError::GroupExhausted { capacity: 2, .. })
    ));

    arena.write(h1, b"ABCDEFGHIJKLMNOP").unwrap();
    assert_eq!(arena.read(h1), Some(&b"ABCDEFGHIJKLMNOP"[..]));

    arena.erase(h1).unwrap();
    let h4 = arena.create(SCENARIO_TYPE).unwrap();
    assert_eq!(h4.index(), h1.index());
    assert!(h4.generation() > h1.generation());

    arena.write(h4, b"QRSTUVWXYZ").unwrap();
    assert!(!arena.is_valid(h1));
    assert!(arena.is_valid(h4));
    arena.validate_invariants().unwrap();
}

// ── Capacity ─────────────────────────────────────────────────

#[test]
fn exactly_capacity_creates_succeed() {
    for capacity in [1u32, 3, 17, 64] {
        let mut arena = two_type_arena(capacity, 8);
        for _ in 0..capacity {
            arena.create(1).unwrap();
        }
        let err = arena.create(1).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Capacity);
        assert!(err.class().is_recoverable());
        // The other group is unaffected.
        assert!(arena.create(2).is_ok());
        assert_eq!(arena.free_count(1), Some(0));
    }
}

#[test]
fn erase_makes_room_again() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let a = arena.create(SCENARIO_TYPE).unwrap();
    arena.create(SCENARIO_TYPE).unwrap();
    arena.write(a, b"x").unwrap();
    arena.erase(a).unwrap();
    assert!(arena.create(SCENARIO_TYPE).is_ok());
    assert!(arena.create(SCENARIO_TYPE).is_err());
}

// ── Round trip and size bound ────────────────────────────────

#[test]
fn read_returns_written_prefix() {
    let mut arena = two_type_arena(4, 32);
    for len in [1usize, 7, 31, 32] {
        let h = arena.create(1).unwrap();
        let data = pattern(len, len as u8);
        arena.write(h, &data).unwrap();
        let bytes = arena.read(h).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..len], &data[..]);
        arena.erase(h).unwrap();
    }
}

#[test]
fn erased_slot_is_zeroed_before_reuse() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let h = arena.create(SCENARIO_TYPE).unwrap();
    arena.write(h, &[0xFF; 16]).unwrap();
    arena.erase(h).unwrap();
    let again = arena.create(SCENARIO_TYPE).unwrap();
    arena.write(again, &[1, 2]).unwrap();
    assert_eq!(arena.read(again).unwrap()[..4], [1, 2, 0, 0]);
}

#[test]
fn oversized_write_leaves_slot_allocated() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let h = arena.create(SCENARIO_TYPE).unwrap();
    let err = arena.write(h, &[0; 17]).unwrap_err();
    assert_eq!(
        err,
        ArenaError::DataInvalid {
            len: 17,
            stride: Some(16)
        }
    );
    assert!(!arena.is_valid(h));
    arena.write(h, &[0; 16]).unwrap();
    assert!(arena.is_valid(h));
}

#[test]
fn empty_write_rejected() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let h = arena.create(SCENARIO_TYPE).unwrap();
    assert!(matches!(
        arena.write(h, &[]),
        Err(ArenaError::DataInvalid { len: 0, .. })
    ));
}

// ── Protocol violations ──────────────────────────────────────

#[test]
fn stale_handle_stays_invalid_after_reuse() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let old = arena.create(SCENARIO_TYPE).unwrap();
    arena.write(old, b"old").unwrap();
    arena.erase(old).unwrap();
    assert!(!arena.is_valid(old));

    let new = arena.create(SCENARIO_TYPE).unwrap();
    arena.write(new, b"new").unwrap();
    assert_ne!(old.packed(), new.packed());
    assert!(!arena.is_valid(old));
    assert!(arena.read(old).is_none());
    assert!(matches!(
        arena.try_read(old),
        Err(ArenaError::HandleReadFailed {
            fault: SlotFault::StaleGeneration { .. },
            ..
        })
    ));
    assert!(arena.erase(old).is_err());
    assert_eq!(&arena.read(new).unwrap()[..3], b"new");
}

#[test]
fn second_write_needs_overwrite() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let h = arena.create(SCENARIO_TYPE).unwrap();
    arena.write(h, b"first").unwrap();
    assert!(matches!(
        arena.write(h, b"second"),
        Err(ArenaError::HandleWriteFailed {
            fault: SlotFault::UnexpectedStatus {
                found: SlotStatus::Written
            },
            ..
        })
    ));
    assert_eq!(&arena.read(h).unwrap()[..5], b"first");

    arena.overwrite(h, b"second").unwrap();
    assert_eq!(&arena.read(h).unwrap()[..6], b"second");
}

#[test]
fn read_and_erase_require_written_slot() {
    let mut arena = HandleArena::new(&scenario_descriptor()).unwrap();
    let h = arena.create(SCENARIO_TYPE).unwrap();
    assert!(arena.read(h).is_none());
    assert!(matches!(
        arena.erase(h),
        Err(ArenaError::HandleEraseFailed { .. })
    ));
    assert!(!arena.is_valid(h));
}

#[test]
fn wrong_type_rejected() {
    let mut arena = two_type_arena(4, 8);
    let h = arena.create(1).unwrap();
    arena.write(h, b"one").unwrap();

    let as_two = Handle::from_raw(h.packed(), HandleTypeId(2));
    assert!(!arena.is_valid(as_two));
    assert!(matches!(
        arena.write(as_two, b"two"),
        Err(ArenaError::HandleWriteFailed { .. })
    ));
    assert!(arena.read(as_two).is_none());

    let unknown = Handle::from_raw(h.packed(), HandleTypeId(9));
    assert_eq!(
        arena.try_read(unknown),
        Err(ArenaError::GroupQueryFailed {
            type_id: HandleTypeId(9)
        })
    );
    assert!(matches!(
        arena.create(9),
        Err(ArenaError::HandleCreationFailed { .. })
    ));
    // The real handle is untouched.
    assert!(arena.is_valid(h));
}

#[test]
fn zero_handle_always_invalid() {
    let mut arena = two_type_arena(4, 8);
    let h = arena.create(1).unwrap();
    arena.write(h, b"live").unwrap();

    for zero in [Handle::INVALID, Handle::from_raw(0, HandleTypeId(1))] {
        assert!(zero.is_null());
        assert!(!arena.is_valid(zero));
        assert_eq!(arena.write(zero, b"x"), Err(ArenaError::HandleInvalid));
        assert_eq!(arena.try_read(zero), Err(ArenaError::HandleInvalid));
    }
    // Erase has no null shortcut: type 0 has no group, and index 0 is the
    // reserved slot.
    assert_eq!(
        arena.erase(Handle::INVALID),
        Err(ArenaError::GroupQueryFailed {
            type_id: HandleTypeId(0)
        })
    );
    assert!(matches!(
        arena.erase(Handle::from_raw(0, HandleTypeId(1))),
        Err(ArenaError::HandleEraseFailed {
            fault: SlotFault::IndexOutOfRange { index: 0, .. },
            ..
        })
    ));
    assert!(arena.is_valid(h));
    assert!(matches!(
        arena.create(0),
        Err(ArenaError::HandleCreationFailed { .. })
    ));
}

#[test]
fn out_of_range_index_rejected() {
    let arena = two_type_arena(4, 8);
    let beyond = Handle::new(5, 1, HandleTypeId(1));
    assert!(!arena.is_valid(beyond));
    assert!(matches!(
        arena.try_read(beyond),
        Err(ArenaError::HandleReadFailed {
            fault: SlotFault::IndexOutOfRange { index: 5, .. },
            ..
        })
    ));
}

// ── Construction ─────────────────────────────────────────────

#[test]
fn invalid_descriptors_rejected() {
    let cases = [
        ArenaDescriptor::new("empty"),
        ArenaDescriptor::new("zero type").with_type(HandleTypeDescriptor::new(0, 1, 1)),
        ArenaDescriptor::new("zero capacity").with_type(HandleTypeDescriptor::new(1, 0, 1)),
        ArenaDescriptor::new("zero stride").with_type(HandleTypeDescriptor::new(1, 1, 0)),
        ArenaDescriptor::new("duplicate")
            .with_type(HandleTypeDescriptor::new(1, 1, 1))
            .with_type(HandleTypeDescriptor::new(1, 2, 2)),
    ];
    for desc in &cases {
        let err = HandleArena::new(desc).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Configuration, "{}", desc.name);
        assert!(!err.class().is_recoverable());
    }
}

#[test]
fn layout_lists_groups_in_descriptor_order() {
    let arena = two_type_arena(4, 8);
    let layout = arena.layout();
    assert_eq!(layout.name, "LIFECYCLE");
    let ids: Vec<_> = layout.groups.iter().map(|g| g.type_id).collect();
    assert_eq!(ids, [HandleTypeId(1), HandleTypeId(2)]);
    assert!(layout.groups[0].data_block.end <= layout.groups[1].slot_table.start);
    assert!(layout.to_string().contains("LIFECYCLE"));
}
