//! Walk through the two ways of using a handle arena.
//!
//! Builds an arena of 32 strings and 32 arrays, then stores one of each
//! through raw handles and one of each through typed handles, printing
//! the arena layout between the steps. Set `RUST_LOG=trace` to see every
//! create and erase.

use std::error::Error;

use log::info;
use slotmem_arena::{HandleArena, TypedHandle};
use slotmem_test_utils::{user_arena_descriptor, UserArray, UserString, ARRAY_TYPE, STRING_TYPE};

const HANDLE_LIMIT: u32 = 32;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== slotmem sandbox ===\n");

    let mut arena = HandleArena::new(&user_arena_descriptor(HANDLE_LIMIT))?;
    arena.print_layout();

    // --- Raw handles: bytes in, bytes out ---
    let string = UserString::new("Hello, World!");
    let array = UserArray {
        values: [420, 2, 27, 20, 74, 40, 65, 290, 39, 203],
    };

    let string_handle = arena.create(STRING_TYPE)?;
    let array_handle = arena.create(ARRAY_TYPE)?;
    arena.write(string_handle, bytemuck::bytes_of(&string))?;
    arena.write(array_handle, bytemuck::bytes_of(&array))?;

    // Copy out and let the borrow end here.
    let read_string: UserString = match arena.read(string_handle) {
        Some(bytes) => bytemuck::pod_read_unaligned(bytes),
        None => return Err("string handle went stale".into()),
    };
    let read_array: UserArray = match arena.read(array_handle) {
        Some(bytes) => bytemuck::pod_read_unaligned(bytes),
        None => return Err("array handle went stale".into()),
    };
    println!("Retrieved string: {}", read_string.as_str().unwrap_or("<invalid utf-8>"));
    println!("Retrieved array: {:?}\n", read_array.values);

    arena.print_layout();

    // --- Typed handles: a string handle cannot be passed where an array
    // handle is expected ---
    let safer_string = arena.create_typed::<UserString>()?;
    let safer_array = arena.create_typed::<UserArray>()?;
    arena.write_typed(safer_string, &UserString::new("Hello, Safer World!"))?;
    arena.write_typed(
        safer_array,
        &UserArray {
            values: [543, 6, 278, 40, 94, 42, 17, 222, 58, 305],
        },
    )?;

    print_string(&arena, safer_string);
    print_array(&arena, safer_array);
    println!();

    arena.print_layout();

    // --- Erase: the old handle is refused even after its slot is reused ---
    arena.erase(string_handle)?;
    let reused = arena.create(STRING_TYPE)?;
    info!("reused slot {} for {reused}", reused.index());
    println!(
        "old handle valid: {}, new handle valid before write: {}",
        arena.is_valid(string_handle),
        arena.is_valid(reused)
    );
    arena.validate_invariants()?;

    Ok(())
}

fn print_string(arena: &HandleArena, handle: TypedHandle<UserString>) {
    match arena.read_typed(handle) {
        Some(s) => println!("Retrieved safer string: {}", s.as_str().unwrap_or("<invalid utf-8>")),
        None => println!("Safer string handle is no longer valid"),
    }
}

fn print_array(arena: &HandleArena, handle: TypedHandle<UserArray>) {
    match arena.read_typed(handle) {
        Some(a) => println!("Retrieved safer array: {:?}", a.values),
        None => println!("Safer array handle is no longer valid"),
    }
}
