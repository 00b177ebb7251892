use serde::{Deserialize, Serialize};

use crate::BlockId;

/// Errors produced when an [`EngineConfig`] cannot drive the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("world extents must be non-zero, got {x}x{y}x{z}")]
    EmptyWorld { x: usize, y: usize, z: usize },
    #[error("screen must be at least 2x2 pixels, got {width}x{height}")]
    ScreenTooSmall { width: usize, height: usize },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("eye height {eye_height} must lie within (0, {z_blocks})")]
    EyeHeightOutOfRange { eye_height: f64, z_blocks: usize },
    #[error("block identity {0:?} collides with the empty identity")]
    IdentityCollision(BlockId),
}

/// Compiled-in engine constants.
///
/// The defaults reproduce the classic 20×20×10 world viewed through a
/// 900×180 character screen. Every core component reads from this struct; no
/// value is ever mutated after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// World width (x) in blocks.
    pub x_blocks: usize,
    /// World depth (y) in blocks.
    pub y_blocks: usize,
    /// World height (z) in blocks.
    pub z_blocks: usize,
    /// Number of bottom layers filled with ground at world generation.
    pub ground_height: usize,
    /// Eye height above the player's feet.
    pub eye_height: f64,
    /// Vertical field of view, radians.
    pub view_height: f64,
    /// Horizontal field of view, radians.
    pub view_width: f64,
    pub move_speed: f64,
    pub tilt_speed: f64,
    pub pitch_limit: f64,
    /// Fractional distance to an integer under which an axis counts as "on the border".
    pub block_border_size: f64,
    /// Ray stepping epsilon: skips near-zero axes and forces forward progress.
    pub ray_epsilon: f64,
    /// Angle tolerance for reusing the cached direction field.
    pub view_cache_epsilon: f64,
    pub screen_width: usize,
    pub screen_height: usize,
    pub frame_delay_ms: u64,
    pub spawn_x: f64,
    pub spawn_y: f64,
    pub empty_block: BlockId,
    pub ground_block: BlockId,
    pub placed_block: BlockId,
    pub highlight_block: BlockId,
    pub edge_block: BlockId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            x_blocks: 20,
            y_blocks: 20,
            z_blocks: 10,
            ground_height: 4,
            eye_height: 1.5,
            view_height: 0.7,
            view_width: 1.0,
            move_speed: 0.30,
            tilt_speed: 0.1,
            pitch_limit: 1.5,
            block_border_size: 0.05,
            ray_epsilon: 0.01,
            view_cache_epsilon: 1e-6,
            screen_width: 900,
            screen_height: 180,
            frame_delay_ms: 20,
            spawn_x: 10.0,
            spawn_y: 10.0,
            empty_block: BlockId::EMPTY,
            ground_block: BlockId::GROUND,
            placed_block: BlockId::GROUND,
            highlight_block: BlockId::HIGHLIGHT,
            edge_block: BlockId::EDGE,
        }
    }
}

impl EngineConfig {
    /// Same config with a different output resolution.
    pub fn with_screen(mut self, width: usize, height: usize) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Same config with different world extents.
    pub fn with_extents(mut self, x: usize, y: usize, z: usize) -> Self {
        self.x_blocks = x;
        self.y_blocks = y;
        self.z_blocks = z;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_blocks == 0 || self.y_blocks == 0 || self.z_blocks == 0 {
            return Err(ConfigError::EmptyWorld {
                x: self.x_blocks,
                y: self.y_blocks,
                z: self.z_blocks,
            });
        }
        if self.screen_width < 2 || self.screen_height < 2 {
            return Err(ConfigError::ScreenTooSmall {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        for (name, value) in [
            ("view_height", self.view_height),
            ("view_width", self.view_width),
            ("block_border_size", self.block_border_size),
            ("ray_epsilon", self.ray_epsilon),
            ("view_cache_epsilon", self.view_cache_epsilon),
            ("pitch_limit", self.pitch_limit),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.eye_height > 0.0 && self.eye_height < self.z_blocks as f64) {
            return Err(ConfigError::EyeHeightOutOfRange {
                eye_height: self.eye_height,
                z_blocks: self.z_blocks,
            });
        }
        for id in [
            self.ground_block,
            self.placed_block,
            self.highlight_block,
            self.edge_block,
        ] {
            if id == self.empty_block {
                return Err(ConfigError::IdentityCollision(id));
            }
        }
        Ok(())
    }
}
