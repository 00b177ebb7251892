//! Rendering: per-pixel ray marching of the voxel grid into a character picture.
//!
//! # Invariants
//! - The renderer cannot mutate world truth; it only borrows `&World`.
//! - Each pixel is independent; output is written row-major.
//! - The direction field is rebuilt only when the view angles change.

mod direction;
mod raycast;
mod renderer;

pub use direction::DirectionField;
pub use raycast::{MarchParams, Picture, RayHit, Raycaster, Target, Traversal};
pub use renderer::{AsciiRenderer, RenderView, Renderer, picture_lines};

pub fn crate_info() -> &'static str {
    concat!("asciicraft-render v", env!("CARGO_PKG_VERSION"))
}
