//! Regenerates `shimaenaga.h` from the exported functions in `src/lib.rs`.

use std::env;
use std::path::PathBuf;

const HEADER: &str = "shimaenaga.h";

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("SHIMAENAGA_H")
        .with_autogen_warning("/* Generated from shimaenaga-ffi by cbindgen. Do not edit. */")
        .with_no_includes()
        .with_sys_include("stddef.h")
        .with_sys_include("stdint.h")
        .with_cpp_compat(true)
        .with_documentation(true)
        .generate()
        .unwrap_or_else(|e| panic!("cbindgen failed for {}: {}", HEADER, e));

    bindings.write_to_file(crate_dir.join(HEADER));
}
