//! World Kernel: the authoritative voxel grid and its block-edit semantics.
//!
//! # Invariants
//! - Every coordinate access is bounds-checked; no operation can fail.
//! - All state mutations flow through explicit operations and are logged.

pub mod world;

pub use world::{BlockCoord, Face, World, WorldEvent};

pub fn crate_info() -> &'static str {
    concat!("asciicraft-kernel v", env!("CARGO_PKG_VERSION"))
}
