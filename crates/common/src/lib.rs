//! Shared value types and configuration for the asciicraft engine.
//!
//! # Invariants
//! - Every type here is a plain value: no interior state, no I/O.
//! - Direction vectors produced by [`angles_to_vector`] are unit length.

mod config;
mod grid;
mod types;

pub use config::{ConfigError, EngineConfig};
pub use grid::Grid;
pub use types::{BlockId, Vector3, ViewAngles, angles_to_vector};

pub fn crate_info() -> &'static str {
    concat!("asciicraft-common v", env!("CARGO_PKG_VERSION"))
}
