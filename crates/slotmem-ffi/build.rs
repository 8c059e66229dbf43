//! Generates `include/slotmem.h` from the exported `extern "C"` items.

use std::path::Path;

const HEADER: &str = "slotmem.h";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR for build scripts");
    let root = Path::new(&manifest_dir);

    let config = match cbindgen::Config::from_file(root.join("cbindgen.toml")) {
        Ok(config) => config,
        Err(e) => panic!("slotmem-ffi: cannot load cbindgen.toml: {e}"),
    };
    let bindings = match cbindgen::generate_with_config(root, config) {
        Ok(bindings) => bindings,
        Err(e) => panic!("slotmem-ffi: header generation failed: {e}"),
    };

    let include = root.join("include");
    if let Err(e) = std::fs::create_dir_all(&include) {
        panic!("slotmem-ffi: cannot create {}: {e}", include.display());
    }
    bindings.write_to_file(include.join(HEADER));
}
