//! Build script for the line bridge firmware
//!
//! Handles:
//! - Linker scripts for the Cortex-M target (`link.x`, `defmt.x`)
//! - Nothing at all for host builds

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (tests, tooling) need no linker setup
    let target = env::var("TARGET").unwrap_or_default();
    if !target.starts_with("thumb") {
        return;
    }

    // memory.x is provided by embassy-stm32's `memory-x` feature
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
