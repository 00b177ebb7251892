use asciicraft_common::{EngineConfig, Grid, Vector3, ViewAngles, angles_to_vector};

/// Per-pixel view directions, cached on the view angles they were built from.
///
/// Rebuilding costs a normalize per pixel, so the grid is reused as long as
/// neither pitch nor yaw moved by more than the cache epsilon.
#[derive(Debug, Clone)]
pub struct DirectionField {
    key: Option<ViewAngles>,
    value: Grid<Vector3>,
    view_height: f64,
    view_width: f64,
    epsilon: f64,
    rebuilds: u64,
}

impl DirectionField {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            key: None,
            value: Grid::new(config.screen_width, config.screen_height, Vector3::ZERO),
            view_height: config.view_height,
            view_width: config.view_width,
            epsilon: config.view_cache_epsilon,
            rebuilds: 0,
        }
    }

    /// True if the cached grid was not built for `view`.
    pub fn is_stale(&self, view: ViewAngles) -> bool {
        match self.key {
            Some(key) => !key.approx_eq(&view, self.epsilon),
            None => true,
        }
    }

    /// The direction grid for `view`, rebuilt in place only if stale.
    pub fn get_or_rebuild(&mut self, view: ViewAngles) -> &Grid<Vector3> {
        if self.is_stale(view) {
            self.rebuild(view);
        }
        &self.value
    }

    /// The grid as last built, regardless of staleness.
    pub fn grid(&self) -> &Grid<Vector3> {
        &self.value
    }

    /// View angles the current grid was built from.
    pub fn key(&self) -> Option<ViewAngles> {
        self.key
    }

    /// Number of times the grid has been rebuilt.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    fn rebuild(&mut self, view: ViewAngles) {
        let width = self.value.width();
        let height = self.value.height();
        let basis = FrustumBasis::new(view, self.view_height, self.view_width);
        let x_den = (width.max(2) - 1) as f64;
        let y_den = (height.max(2) - 1) as f64;

        for (py, row) in self.value.rows_mut().enumerate() {
            let v = 1.0 - 2.0 * py as f64 / y_den;
            for (px, cell) in row.iter_mut().enumerate() {
                let u = 1.0 - 2.0 * px as f64 / x_den;
                *cell = basis.direction(u, v);
            }
        }

        self.key = Some(view);
        self.rebuilds += 1;
        tracing::debug!(pitch = view.pitch, yaw = view.yaw, width, height, "rebuilt direction field");
    }
}

/// Screen-plane basis derived from the four frustum edge directions.
///
/// Pixels are interpolated linearly across this plane and then normalized;
/// this is not a perspective-correct projection.
#[derive(Debug, Clone, Copy)]
struct FrustumBasis {
    mid: Vector3,
    mid_to_left: Vector3,
    mid_to_up: Vector3,
}

impl FrustumBasis {
    fn new(view: ViewAngles, view_height: f64, view_width: f64) -> Self {
        let down = angles_to_vector(view.offset(-view_height / 2.0, 0.0));
        let up = angles_to_vector(view.offset(view_height / 2.0, 0.0));
        let left = angles_to_vector(view.offset(0.0, -view_width / 2.0));
        let right = angles_to_vector(view.offset(0.0, view_width / 2.0));

        let mid_vert = (up + down) * 0.5;
        let mid = (left + right) * 0.5;
        Self {
            mid,
            mid_to_left: left - mid,
            mid_to_up: up - mid_vert,
        }
    }

    /// `u` runs 1 (left edge) to -1 (right edge), `v` runs 1 (top) to -1 (bottom).
    fn direction(&self, u: f64, v: f64) -> Vector3 {
        (self.mid + self.mid_to_left * u + self.mid_to_up * v).normalize_or_zero()
    }
}
