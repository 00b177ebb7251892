//! Player kinematics: discrete gravity, vertical collision, movement and view rotation.
//!
//! # Invariants
//! - The player never mutates the world; it only queries it.
//! - Position stays within the world's clamped bounds; pitch stays within its limit.

mod player;

pub use player::Player;

pub fn crate_info() -> &'static str {
    concat!("asciicraft-player v", env!("CARGO_PKG_VERSION"))
}
