use asciicraft_common::{BlockId, EngineConfig, Vector3};
use serde::{Deserialize, Serialize};

/// Integer cell coordinate. Signed so that positions just outside the world
/// (e.g. the neighbor across a boundary face) are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockCoord {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Cell containing a continuous position (floor on every axis).
    pub fn containing(pos: Vector3) -> Self {
        Self {
            x: pos.x.floor() as i64,
            y: pos.y.floor() as i64,
            z: pos.z.floor() as i64,
        }
    }

    pub fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// One of the six axis-aligned faces of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    /// All faces in tie-break order: the first face at minimum distance wins.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Unit step to the neighboring cell across this face.
    pub fn offset(self) -> (i64, i64, i64) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Distance from `pos` to this face of `cell`.
    fn distance(self, cell: BlockCoord, pos: Vector3) -> f64 {
        match self {
            Face::PosX => (cell.x as f64 + 1.0 - pos.x).abs(),
            Face::NegX => (pos.x - cell.x as f64).abs(),
            Face::PosY => (cell.y as f64 + 1.0 - pos.y).abs(),
            Face::NegY => (pos.y - cell.y as f64).abs(),
            Face::PosZ => (cell.z as f64 + 1.0 - pos.z).abs(),
            Face::NegZ => (pos.z - cell.z as f64).abs(),
        }
    }
}

/// An event record produced by every mutation to the block grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Bottom layers were filled with the ground identity.
    GroundGenerated { height: usize },
    /// A single cell changed identity through `set`, `place` or `remove`.
    BlockSet {
        coord: BlockCoord,
        old: BlockId,
        new: BlockId,
    },
}

/// The authoritative block grid.
///
/// A dense `[z][y][x]` array of fixed extents. Every access is bounds-checked:
/// out-of-bounds reads return the empty identity and out-of-bounds writes are
/// ignored, so callers may query with coordinates derived from floating-point
/// positions that sit on or just past a boundary.
///
/// All mutation goes through the methods below; the raycaster and the player
/// only ever hold `&World`.
#[derive(Debug, Clone)]
pub struct World {
    x_blocks: usize,
    y_blocks: usize,
    z_blocks: usize,
    empty: BlockId,
    ground: BlockId,
    blocks: Vec<BlockId>,
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create an all-empty world with the configured extents and identities.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            x_blocks: config.x_blocks,
            y_blocks: config.y_blocks,
            z_blocks: config.z_blocks,
            empty: config.empty_block,
            ground: config.ground_block,
            blocks: vec![config.empty_block; config.x_blocks * config.y_blocks * config.z_blocks],
            event_log: Vec::new(),
        }
    }

    /// Create an all-empty world with default identities and the given extents.
    pub fn with_extents(x: usize, y: usize, z: usize) -> Self {
        Self::new(&EngineConfig::default().with_extents(x, y, z))
    }

    /// World extents `(x, y, z)` in blocks.
    pub fn extents(&self) -> (usize, usize, usize) {
        (self.x_blocks, self.y_blocks, self.z_blocks)
    }

    /// Upper bound on ray steps: every step crosses at least one grid plane.
    pub fn max_ray_steps(&self) -> usize {
        self.x_blocks + self.y_blocks + self.z_blocks
    }

    pub fn empty_block(&self) -> BlockId {
        self.empty
    }

    pub fn ground_block(&self) -> BlockId {
        self.ground
    }

    /// True if `(x, y, z)` lies within `[0, extent)` on every axis.
    pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
        (0..self.x_blocks as i64).contains(&x)
            && (0..self.y_blocks as i64).contains(&y)
            && (0..self.z_blocks as i64).contains(&z)
    }

    /// True if a continuous position lies inside the world volume.
    pub fn contains_point(&self, pos: Vector3) -> bool {
        pos.x >= 0.0
            && pos.y >= 0.0
            && pos.z >= 0.0
            && pos.x < self.x_blocks as f64
            && pos.y < self.y_blocks as f64
            && pos.z < self.z_blocks as f64
    }

    fn index(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        self.contains(x, y, z).then(|| {
            (z as usize * self.y_blocks + y as usize) * self.x_blocks + x as usize
        })
    }

    /// Fill layers `[0, min(height, z_blocks))` with the ground identity.
    pub fn generate_ground(&mut self, height: usize) {
        let layers = height.min(self.z_blocks);
        let layer_len = self.x_blocks * self.y_blocks;
        self.blocks[..layers * layer_len].fill(self.ground);
        self.event_log.push(WorldEvent::GroundGenerated { height: layers });
        tracing::debug!(layers, "generated ground");
    }

    /// Block identity at a cell, or empty if out of bounds.
    pub fn get(&self, x: i64, y: i64, z: i64) -> BlockId {
        self.index(x, y, z)
            .map_or(self.empty, |i| self.blocks[i])
    }

    pub fn get_at(&self, coord: BlockCoord) -> BlockId {
        self.get(coord.x, coord.y, coord.z)
    }

    /// Overwrite a cell. No-op if out of bounds.
    pub fn set(&mut self, x: i64, y: i64, z: i64, id: BlockId) {
        self.write(BlockCoord::new(x, y, z), id);
    }

    fn write(&mut self, coord: BlockCoord, id: BlockId) -> bool {
        let Some(i) = self.index(coord.x, coord.y, coord.z) else {
            return false;
        };
        let old = std::mem::replace(&mut self.blocks[i], id);
        self.event_log.push(WorldEvent::BlockSet { coord, old, new: id });
        tracing::debug!(?coord, %old, new = %id, "block set");
        true
    }

    pub fn is_empty(&self, x: i64, y: i64, z: i64) -> bool {
        self.get(x, y, z) == self.empty
    }

    /// Clear a cell. Returns false if out of bounds or already empty.
    pub fn remove(&mut self, x: i64, y: i64, z: i64) -> bool {
        if !self.contains(x, y, z) || self.is_empty(x, y, z) {
            return false;
        }
        self.write(BlockCoord::new(x, y, z), self.empty)
    }

    /// Cell containing `hit` and the face of that cell nearest to it.
    ///
    /// Ties go to the first face in [`Face::ALL`] order.
    pub fn nearest_face(hit: Vector3) -> (BlockCoord, Face) {
        let cell = BlockCoord::containing(hit);
        let mut best = Face::PosX;
        let mut best_dist = best.distance(cell, hit);
        for face in &Face::ALL[1..] {
            let d = face.distance(cell, hit);
            if d < best_dist {
                best = *face;
                best_dist = d;
            }
        }
        (cell, best)
    }

    /// Write `id` into the neighbor across the face nearest to `hit`.
    ///
    /// Returns the written cell, or `None` if that neighbor is out of bounds.
    pub fn place_at(&mut self, hit: Vector3, id: BlockId) -> Option<BlockCoord> {
        let (cell, face) = Self::nearest_face(hit);
        let (dx, dy, dz) = face.offset();
        let target = cell.offset(dx, dy, dz);
        self.write(target, id).then_some(target)
    }

    /// Place a block adjacent to the face nearest to `hit`. Returns whether a write occurred.
    pub fn place(&mut self, hit: Vector3, id: BlockId) -> bool {
        self.place_at(hit, id).is_some()
    }

    /// Number of non-empty cells.
    pub fn count_solid(&self) -> usize {
        self.blocks.iter().filter(|b| **b != self.empty).count()
    }

    /// Every cell with its coordinate, in `z, y, x` storage order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (BlockCoord, BlockId)> + '_ {
        let (xb, yb) = (self.x_blocks, self.y_blocks);
        self.blocks.iter().enumerate().map(move |(i, id)| {
            let x = i % xb;
            let y = (i / xb) % yb;
            let z = i / (xb * yb);
            (BlockCoord::new(x as i64, y as i64, z as i64), *id)
        })
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }
}
