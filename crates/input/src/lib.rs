//! Input boundary: raw key characters mapped to a per-tick snapshot of logical actions.
//!
//! # Invariants
//! - The simulation consumes [`InputState`] snapshots, never raw key events.
//! - A snapshot is pure data; nothing here polls a device.

pub mod action;
mod keymap;

pub use action::{Action, InputState};
pub use keymap::KeyMap;

pub fn crate_info() -> &'static str {
    concat!("asciicraft-input v", env!("CARGO_PKG_VERSION"))
}
