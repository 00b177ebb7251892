use asciicraft_common::{BlockId, EngineConfig, Grid, Vector3, ViewAngles};
use asciicraft_kernel::{BlockCoord, World};

use crate::direction::DirectionField;

/// Step length used when no axis constrains the next boundary.
const UNCONSTRAINED_STEP: f64 = 2.0;

/// Rendered character grid, one identity per pixel, row-major.
pub type Picture = Grid<BlockId>;

/// Outcome of marching one ray through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayHit {
    /// The ray left the world without touching a block.
    Sky,
    /// The ray entered a solid cell away from its edges.
    Block { cell: BlockCoord, id: BlockId },
    /// The ray entered a solid cell within the border threshold of an edge or corner.
    Edge { cell: BlockCoord },
}

impl RayHit {
    pub fn cell(&self) -> Option<BlockCoord> {
        match self {
            RayHit::Sky => None,
            RayHit::Block { cell, .. } | RayHit::Edge { cell } => Some(*cell),
        }
    }
}

/// The block the player is aiming at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub cell: BlockCoord,
    /// Exact position at first contact, inside `cell`.
    pub position: Vector3,
}

/// Iterator over the positions a ray visits, one per grid cell entered.
///
/// Each step advances to the nearest boundary plane plus `epsilon`, so every
/// yielded position lies strictly inside a new cell. The walk ends when the
/// position leaves the world, when the direction cannot advance, or after
/// `x + y + z` steps.
#[derive(Debug, Clone)]
pub struct Traversal<'w> {
    world: &'w World,
    position: Vector3,
    direction: Vector3,
    epsilon: f64,
    steps_left: usize,
    done: bool,
}

impl<'w> Traversal<'w> {
    pub fn new(world: &'w World, origin: Vector3, direction: Vector3, epsilon: f64) -> Self {
        Self {
            world,
            position: origin,
            direction,
            epsilon,
            steps_left: world.max_ray_steps(),
            done: false,
        }
    }

    /// Distance along the ray to the nearest grid boundary, or `None` if no
    /// axis component exceeds epsilon.
    fn step_distance(&self) -> Option<f64> {
        let pos = self.position.to_array();
        let dir = self.direction.to_array();
        let mut best: Option<f64> = None;
        for axis in 0..3 {
            let (c, d) = (pos[axis], dir[axis]);
            let boundary = if d > self.epsilon {
                c.floor() + 1.0
            } else if d < -self.epsilon {
                c.floor()
            } else {
                continue;
            };
            let t = (boundary - c) / d;
            best = Some(best.map_or(t, |b| b.min(t)));
        }
        best.map(|t| t.min(UNCONSTRAINED_STEP))
    }
}

impl Iterator for Traversal<'_> {
    type Item = Vector3;

    fn next(&mut self) -> Option<Vector3> {
        if self.done || !self.world.contains_point(self.position) {
            self.done = true;
            return None;
        }
        let current = self.position;
        match self.step_distance() {
            Some(t) if self.steps_left > 0 => {
                self.position += self.direction * (t + self.epsilon);
                self.steps_left -= 1;
            }
            _ => self.done = true,
        }
        Some(current)
    }
}

/// Constants that govern a single ray march.
#[derive(Debug, Clone, Copy)]
pub struct MarchParams {
    pub epsilon: f64,
    pub border: f64,
    pub empty: BlockId,
    pub edge: BlockId,
    pub highlight: BlockId,
}

impl MarchParams {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            epsilon: config.ray_epsilon,
            border: config.block_border_size,
            empty: config.empty_block,
            edge: config.edge_block,
            highlight: config.highlight_block,
        }
    }

    /// True if `pos` is within the border threshold of an integer on at least two axes.
    pub fn on_block_border(&self, pos: Vector3) -> bool {
        pos.to_array()
            .into_iter()
            .filter(|c| (c - c.round()).abs() < self.border)
            .count()
            >= 2
    }

    fn first_hit(
        &self,
        origin: Vector3,
        direction: Vector3,
        world: &World,
    ) -> Option<(Vector3, BlockCoord, BlockId)> {
        Traversal::new(world, origin, direction, self.epsilon).find_map(|pos| {
            let cell = BlockCoord::containing(pos);
            let id = world.get_at(cell);
            (!world.is_empty(cell.x, cell.y, cell.z)).then_some((pos, cell, id))
        })
    }

    pub fn march(&self, origin: Vector3, direction: Vector3, world: &World) -> RayHit {
        match self.first_hit(origin, direction, world) {
            None => RayHit::Sky,
            Some((pos, cell, _)) if self.on_block_border(pos) => RayHit::Edge { cell },
            Some((_, cell, id)) => RayHit::Block { cell, id },
        }
    }

    pub fn resolve_target(
        &self,
        origin: Vector3,
        direction: Vector3,
        world: &World,
    ) -> Option<Target> {
        self.first_hit(origin, direction, world)
            .map(|(position, cell, _)| Target { cell, position })
    }

    /// Character for a ray result; a block in the `target` cell shows the highlight identity.
    pub fn glyph(&self, hit: RayHit, target: Option<BlockCoord>) -> BlockId {
        match hit {
            RayHit::Sky => self.empty,
            RayHit::Edge { .. } => self.edge,
            RayHit::Block { cell, .. } if Some(cell) == target => self.highlight,
            RayHit::Block { id, .. } => id,
        }
    }
}

/// Per-pixel ray marcher with a cached direction field.
#[derive(Debug, Clone)]
pub struct Raycaster {
    field: DirectionField,
    params: MarchParams,
}

impl Raycaster {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            field: DirectionField::new(config),
            params: MarchParams::new(config),
        }
    }

    pub fn params(&self) -> &MarchParams {
        &self.params
    }

    pub fn direction_field(&self) -> &DirectionField {
        &self.field
    }

    /// Per-pixel directions for `view`, reused from the cache when unchanged.
    pub fn build_direction_field(&mut self, view: ViewAngles) -> &Grid<Vector3> {
        self.field.get_or_rebuild(view)
    }

    /// March one ray and classify what it hits.
    pub fn march(&self, origin: Vector3, direction: Vector3, world: &World) -> RayHit {
        self.params.march(origin, direction, world)
    }

    /// The cell and exact contact point of the first solid block along the ray.
    pub fn resolve_target(
        &self,
        origin: Vector3,
        direction: Vector3,
        world: &World,
    ) -> Option<Target> {
        self.params.resolve_target(origin, direction, world)
    }

    /// Render a fresh picture.
    pub fn render(&mut self, origin: Vector3, view: ViewAngles, world: &World) -> Picture {
        let grid = self.field.grid();
        let mut picture = Grid::new(grid.width(), grid.height(), self.params.empty);
        self.render_into(origin, view, world, None, &mut picture);
        picture
    }

    /// Render into an existing picture, row-major, without reallocating when
    /// its size already matches the screen.
    pub fn render_into(
        &mut self,
        origin: Vector3,
        view: ViewAngles,
        world: &World,
        target: Option<BlockCoord>,
        picture: &mut Picture,
    ) {
        let _span = tracing::info_span!("render_frame").entered();
        let directions = self.field.get_or_rebuild(view);
        let params = &self.params;
        let width = directions.width();
        if picture.width() != width || picture.height() != directions.height() {
            *picture = Grid::new(width, directions.height(), params.empty);
        }
        if width == 0 {
            return;
        }

        let shade = |out: &mut [BlockId], dirs: &[Vector3]| {
            for (pixel, dir) in out.iter_mut().zip(dirs) {
                *pixel = params.glyph(params.march(origin, *dir, world), target);
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            picture
                .as_mut_slice()
                .par_chunks_mut(width)
                .zip(directions.as_slice().par_chunks(width))
                .for_each(|(out, dirs)| shade(out, dirs));
        }
        #[cfg(not(feature = "parallel"))]
        for (out, dirs) in picture
            .as_mut_slice()
            .chunks_mut(width)
            .zip(directions.as_slice().chunks(width))
        {
            shade(out, dirs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default().with_screen(9, 5)
    }

    fn ground_world() -> World {
        let mut w = World::new(&config());
        w.generate_ground(4);
        w
    }

    #[test]
    fn straight_down_hits_ground_immediately() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        let origin = Vector3::new(0.5, 0.5, 3.99);
        let down = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(Traversal::new(&world, origin, down, 0.01).next(), Some(origin));
        assert_eq!(
            params.march(origin, down, &world),
            RayHit::Block {
                cell: BlockCoord::new(0, 0, 3),
                id: BlockId::GROUND
            }
        );
    }

    #[test]
    fn falls_through_air_to_ground() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        let hit = params.march(Vector3::new(5.5, 5.5, 8.5), Vector3::new(0.0, 0.0, -1.0), &world);
        assert_eq!(
            hit,
            RayHit::Block {
                cell: BlockCoord::new(5, 5, 3),
                id: BlockId::GROUND
            }
        );
    }

    #[test]
    fn edge_marker_near_two_integer_axes() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        // Enters cell (5,5,3) near x=5 and z=4 simultaneously.
        let hit = params.march(Vector3::new(5.01, 5.5, 3.99), Vector3::new(0.0, 0.0, -1.0), &world);
        assert_eq!(hit, RayHit::Edge { cell: BlockCoord::new(5, 5, 3) });
        assert_eq!(params.glyph(hit, None), BlockId::EDGE);
    }

    #[test]
    fn border_needs_two_axes() {
        let params = MarchParams::new(&config());
        assert!(!params.on_block_border(Vector3::new(0.5, 0.5, 3.99)));
        assert!(params.on_block_border(Vector3::new(1.02, 0.5, 3.99)));
        assert!(params.on_block_border(Vector3::new(1.02, 2.97, 3.99)));
        assert!(!params.on_block_border(Vector3::new(1.06, 2.5, 3.99)));
    }

    #[test]
    fn upward_ray_is_sky() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        let hit = params.march(Vector3::new(5.5, 5.5, 5.5), Vector3::new(0.0, 0.0, 1.0), &world);
        assert_eq!(hit, RayHit::Sky);
        assert_eq!(params.glyph(hit, None), BlockId::EMPTY);
    }

    #[test]
    fn traversal_terminates_within_extent_sum() {
        let world = World::new(&config());
        let origins = [
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::new(10.0, 10.0, 5.0),
            Vector3::new(19.99, 0.01, 9.99),
        ];
        let dirs = [
            Vector3::new(1.0, 1.0, 1.0).normalize(),
            Vector3::new(-0.3, 0.9, -0.1).normalize(),
            Vector3::new(0.005, 1.0, 0.0).normalize(),
            Vector3::new(-1.0, 0.0, 0.0),
        ];
        for origin in origins {
            for dir in dirs {
                let visited = Traversal::new(&world, origin, dir, 0.01).count();
                assert!(visited <= world.max_ray_steps() + 1, "{origin:?} {dir:?}: {visited}");
                assert_eq!(MarchParams::new(&config()).march(origin, dir, &world), RayHit::Sky);
            }
        }
    }

    #[test]
    fn zero_direction_never_advances() {
        let world = World::new(&config());
        let visited: Vec<_> =
            Traversal::new(&world, Vector3::new(1.5, 1.5, 1.5), Vector3::ZERO, 0.01).collect();
        assert_eq!(visited, vec![Vector3::new(1.5, 1.5, 1.5)]);
        let nan = Vector3::new(f64::NAN, 0.0, 0.0);
        assert_eq!(Traversal::new(&world, Vector3::new(1.5, 1.5, 1.5), nan, 0.01).count(), 1);
    }

    #[test]
    fn origin_outside_world_visits_nothing() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        let origin = Vector3::new(-1.0, 5.0, 5.0);
        assert_eq!(Traversal::new(&world, origin, Vector3::X, 0.01).count(), 0);
        assert_eq!(params.resolve_target(origin, Vector3::X, &world), None);
    }

    #[test]
    fn each_step_enters_a_new_cell() {
        let world = World::new(&config());
        let cells: Vec<_> = Traversal::new(
            &world,
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::new(0.6, 0.8, 0.0),
            0.01,
        )
        .map(BlockCoord::containing)
        .collect();
        for pair in cells.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn resolve_target_returns_cell_and_contact() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        let dir = Vector3::new(1.0, 0.0, -1.0).normalize();
        let target = params
            .resolve_target(Vector3::new(2.5, 2.5, 5.5), dir, &world)
            .unwrap();
        assert_eq!(BlockCoord::containing(target.position), target.cell);
        assert_eq!(target.cell.z, 3);
        assert!(target.position.z < 4.0 && target.position.z > 3.9);
    }

    #[test]
    fn resolve_target_none_when_looking_at_sky() {
        let world = ground_world();
        let params = MarchParams::new(&config());
        assert_eq!(
            params.resolve_target(Vector3::new(2.5, 2.5, 5.5), Vector3::Z, &world),
            None
        );
    }

    #[test]
    fn targeted_block_is_highlighted() {
        let params = MarchParams::new(&config());
        let cell = BlockCoord::new(1, 1, 1);
        let hit = RayHit::Block { cell, id: BlockId::GROUND };
        assert_eq!(params.glyph(hit, Some(cell)), BlockId::HIGHLIGHT);
        assert_eq!(params.glyph(hit, Some(BlockCoord::new(0, 0, 0))), BlockId::GROUND);
        assert_eq!(params.glyph(RayHit::Edge { cell }, Some(cell)), BlockId::EDGE);
    }

    #[test]
    fn render_reuses_direction_field() {
        let world = ground_world();
        let mut rc = Raycaster::new(&config());
        let origin = Vector3::new(10.0, 10.0, 5.5);
        let view = ViewAngles::new(-0.6, 0.0);
        let a = rc.render(origin, view, &world);
        let b = rc.render(origin, view, &world);
        assert_eq!(a, b);
        assert_eq!(rc.direction_field().rebuild_count(), 1);
        rc.render(origin, view.offset(0.0, 0.1), &world);
        assert_eq!(rc.direction_field().rebuild_count(), 2);
    }

    #[test]
    fn every_pixel_matches_its_own_march() {
        let config = EngineConfig::default().with_screen(120, 40);
        let mut world = World::new(&config);
        world.generate_ground(config.ground_height);
        world.set(12, 11, 4, BlockId('#'));
        let mut rc = Raycaster::new(&config);
        let origin = Vector3::new(10.3, 10.6, 5.5);
        let view = ViewAngles::new(-0.4, 0.5);
        let target = Some(BlockCoord::new(12, 11, 4));

        let mut picture = Grid::new(1, 1, BlockId::EMPTY);
        rc.render_into(origin, view, &world, target, &mut picture);
        assert_eq!((picture.width(), picture.height()), (120, 40));

        let params = *rc.params();
        let dirs = rc.direction_field().grid();
        for y in 0..40 {
            for x in 0..120 {
                let dir = *dirs.get(x, y).unwrap();
                let expected = params.glyph(params.march(origin, dir, &world), target);
                assert_eq!(picture.get(x, y), Some(&expected), "pixel ({x}, {y})");
            }
        }
        assert!(picture.as_slice().contains(&BlockId::HIGHLIGHT));
        assert!(picture.as_slice().contains(&BlockId::GROUND));
    }

    #[test]
    fn looking_down_sees_ground_below_horizon_sky_above() {
        let world = ground_world();
        let mut rc = Raycaster::new(&config());
        let picture = rc.render(Vector3::new(10.0, 10.0, 5.5), ViewAngles::default(), &world);
        assert!(picture.row(0).unwrap().iter().all(|c| *c == BlockId::EMPTY));
        assert!(picture.row(4).unwrap().iter().any(|c| *c != BlockId::EMPTY));
    }
}
