use asciicraft_common::{EngineConfig, Grid, Vector3, ViewAngles};
use asciicraft_kernel::{BlockCoord, World};

use crate::raycast::{Picture, Raycaster};

/// Camera pose for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Eye position in world space.
    pub origin: Vector3,
    pub angles: ViewAngles,
    /// Cell drawn with the highlight identity, if any.
    pub target: Option<BlockCoord>,
}

impl RenderView {
    pub fn new(origin: Vector3, angles: ViewAngles) -> Self {
        Self {
            origin,
            angles,
            target: None,
        }
    }

    pub fn with_target(mut self, target: Option<BlockCoord>) -> Self {
        self.target = target;
        self
    }
}

/// Renderer interface. All renderers implement this trait.
///
/// The renderer reads world state and a view, then produces output. It never
/// mutates the world; world truth is kernel-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and view.
    fn render(&mut self, world: &World, view: &RenderView) -> &Self::Output;
}

/// Character-grid renderer backed by the per-pixel raycaster.
///
/// Owns the picture buffer and refills it in place every frame.
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    raycaster: Raycaster,
    picture: Picture,
}

impl AsciiRenderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            raycaster: Raycaster::new(config),
            picture: Grid::new(config.screen_width, config.screen_height, config.empty_block),
        }
    }

    pub fn raycaster(&self) -> &Raycaster {
        &self.raycaster
    }

    /// The most recently rendered frame.
    pub fn picture(&self) -> &Picture {
        &self.picture
    }
}

impl Renderer for AsciiRenderer {
    type Output = Picture;

    fn render(&mut self, world: &World, view: &RenderView) -> &Picture {
        self.raycaster.render_into(
            view.origin,
            view.angles,
            world,
            view.target,
            &mut self.picture,
        );
        &self.picture
    }
}

/// Picture rows as plain text lines.
pub fn picture_lines(picture: &Picture) -> impl Iterator<Item = String> + '_ {
    picture
        .rows()
        .map(|row| row.iter().map(|id| id.as_char()).collect())
}
