//! Developer Tooling: world inspector, frame timing, frame pacing.
//!
//! # Invariants
//! - Tools only read world state; they never mutate it.

mod inspector;
mod pacing;

pub use inspector::{WorldInspector, WorldSummary};
pub use pacing::{FramePacer, FrameTimer};

pub fn crate_info() -> &'static str {
    concat!("asciicraft-tools v", env!("CARGO_PKG_VERSION"))
}
