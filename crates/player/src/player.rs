use asciicraft_common::{EngineConfig, Vector3, ViewAngles};
use asciicraft_input::{Action, InputState};
use asciicraft_kernel::World;

/// Vertical probe offset used when sampling the cell below or at the feet.
const FOOT_PROBE: f64 = 0.01;

/// Player position, orientation and per-tick kinematics.
///
/// The player reads the world through `&World` only; it never edits blocks.
/// `position` is the eye position, so the feet sit `eye_height` below it.
#[derive(Debug, Clone)]
pub struct Player {
    position: Vector3,
    view: ViewAngles,
    direction: Vector3,
    eye_height: f64,
    move_speed: f64,
    tilt_speed: f64,
    pitch_limit: f64,
    extents: (f64, f64, f64),
}

impl Player {
    /// Spawn at the configured `(x, y)` standing on top of the generated ground.
    pub fn new(config: &EngineConfig) -> Self {
        let z = config.ground_height.min(config.z_blocks) as f64 + config.eye_height;
        Self::at(Vector3::new(config.spawn_x, config.spawn_y, z), config)
    }

    /// Spawn at an explicit eye position, looking along +x.
    pub fn at(position: Vector3, config: &EngineConfig) -> Self {
        let view = ViewAngles::default();
        Self {
            position,
            view,
            direction: view.direction(),
            eye_height: config.eye_height,
            move_speed: config.move_speed,
            tilt_speed: config.tilt_speed,
            pitch_limit: config.pitch_limit,
            extents: (
                config.x_blocks as f64,
                config.y_blocks as f64,
                config.z_blocks as f64,
            ),
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn view(&self) -> ViewAngles {
        self.view
    }

    /// Unit view direction, cached from the last view change.
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Replace the view angles (pitch is clamped) and refresh the cached direction.
    pub fn set_view(&mut self, view: ViewAngles) {
        self.view = view.clamp_pitch(self.pitch_limit);
        self.direction = self.view.direction();
    }

    /// Advance one tick: gravity, collision, movement, then view rotation.
    pub fn update(&mut self, world: &World, input: &InputState) {
        self.apply_gravity(world);
        self.apply_collision(world);
        self.apply_movement(input);
        self.apply_rotation(input);
        tracing::trace!(
            x = self.position.x,
            y = self.position.y,
            z = self.position.z,
            pitch = self.view.pitch,
            yaw = self.view.yaw,
            "player tick"
        );
    }

    fn column(&self) -> (i64, i64) {
        (
            self.position.x.floor() as i64,
            self.position.y.floor() as i64,
        )
    }

    /// Drop one whole block if the cell under the feet is empty.
    pub fn apply_gravity(&mut self, world: &World) {
        let (x, y) = self.column();
        let z_below = (self.position.z - self.eye_height - FOOT_PROBE).floor() as i64;
        if world.contains(x, y, z_below) && world.is_empty(x, y, z_below) {
            self.position.z -= 1.0;
        }
    }

    /// Rise one whole block if the feet are inside solid matter.
    pub fn apply_collision(&mut self, world: &World) {
        let (x, y) = self.column();
        let z_at = (self.position.z - self.eye_height + FOOT_PROBE).floor() as i64;
        if world.contains(x, y, z_at) && !world.is_empty(x, y, z_at) {
            self.position.z += 1.0;
        }
    }

    /// Horizontal movement along the view direction, then clamp to the world.
    ///
    /// Keys accumulate without normalization, so forward plus strafe moves
    /// at full speed on both axes.
    pub fn apply_movement(&mut self, input: &InputState) {
        let speed = self.move_speed;
        let d = self.direction;
        if input.is_active(Action::MoveForward) {
            self.position.x += speed * d.x;
            self.position.y += speed * d.y;
        }
        if input.is_active(Action::MoveBackward) {
            self.position.x -= speed * d.x;
            self.position.y -= speed * d.y;
        }
        if input.is_active(Action::StrafeLeft) {
            self.position.x += speed * d.y;
            self.position.y -= speed * d.x;
        }
        if input.is_active(Action::StrafeRight) {
            self.position.x -= speed * d.y;
            self.position.y += speed * d.x;
        }
        let (xe, ye, ze) = self.extents;
        self.position.x = self.position.x.clamp(0.1, xe - 0.1);
        self.position.y = self.position.y.clamp(0.1, ye - 0.1);
        self.position.z = self.position.z.clamp(self.eye_height, ze - 0.1);
    }

    /// Tilt the view; the cached direction is refreshed only if a look key was active.
    pub fn apply_rotation(&mut self, input: &InputState) {
        let mut rotated = false;
        let mut view = self.view;
        if input.is_active(Action::LookUp) {
            view.pitch += self.tilt_speed;
            rotated = true;
        }
        if input.is_active(Action::LookDown) {
            view.pitch -= self.tilt_speed;
            rotated = true;
        }
        if input.is_active(Action::LookRight) {
            view.yaw += self.tilt_speed;
            rotated = true;
        }
        if input.is_active(Action::LookLeft) {
            view.yaw -= self.tilt_speed;
            rotated = true;
        }
        if rotated {
            self.set_view(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (EngineConfig, World) {
        let config = EngineConfig::default();
        let mut world = World::new(&config);
        world.generate_ground(config.ground_height);
        (config, world)
    }

    fn idle() -> InputState {
        InputState::new()
    }

    #[test]
    fn spawns_on_ground() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        assert_eq!(p.position(), Vector3::new(10.0, 10.0, 5.5));
        p.update(&world, &idle());
        assert_eq!(p.position(), Vector3::new(10.0, 10.0, 5.5));
    }

    #[test]
    fn settles_on_ground_from_one_block_up() {
        let (config, world) = setup();
        let mut p = Player::at(Vector3::new(3.5, 3.5, 6.5), &config);
        p.update(&world, &idle());
        assert_eq!(p.position().z, 5.5);
        for _ in 0..10 {
            p.update(&world, &idle());
            assert_eq!(p.position().z, 5.5);
        }
    }

    #[test]
    fn falls_one_block_per_tick() {
        let (config, world) = setup();
        let mut p = Player::at(Vector3::new(3.5, 3.5, 9.5), &config);
        let mut heights = Vec::new();
        for _ in 0..6 {
            p.update(&world, &idle());
            heights.push(p.position().z);
        }
        assert_eq!(heights, vec![8.5, 7.5, 6.5, 5.5, 5.5, 5.5]);
    }

    #[test]
    fn pushed_out_of_placed_block() {
        let (config, mut world) = setup();
        let mut p = Player::new(&config);
        world.set(10, 10, 4, config.placed_block);
        p.update(&world, &idle());
        assert_eq!(p.position().z, 6.5);
        p.update(&world, &idle());
        assert_eq!(p.position().z, 6.5);
    }

    #[test]
    fn forward_follows_view_direction() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        p.update(&world, &InputState::from_actions([Action::MoveForward]));
        assert!((p.position().x - 10.3).abs() < 1e-12);
        assert!((p.position().y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn strafe_is_perpendicular() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        p.update(&world, &InputState::from_actions([Action::StrafeRight]));
        assert!((p.position().x - 10.0).abs() < 1e-12);
        assert!((p.position().y - 10.3).abs() < 1e-12);
        p.update(&world, &InputState::from_actions([Action::StrafeLeft]));
        assert!((p.position().y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn diagonal_movement_is_not_normalized() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        p.update(
            &world,
            &InputState::from_actions([Action::MoveForward, Action::StrafeRight]),
        );
        let moved = p.position() - Vector3::new(10.0, 10.0, 5.5);
        assert!((moved.length() - 0.3 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn position_stays_clamped() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        let hi = config.x_blocks as f64 - 0.1;
        let top = config.z_blocks as f64 - 0.1;
        let forward = InputState::from_actions([Action::MoveForward, Action::StrafeLeft]);
        for _ in 0..200 {
            p.update(&world, &forward);
            let pos = p.position();
            assert!((0.1..=hi).contains(&pos.x));
            assert!((0.1..=hi).contains(&pos.y));
            assert!((config.eye_height..=top).contains(&pos.z));
        }
        let back = InputState::from_actions([Action::MoveBackward, Action::StrafeRight]);
        for _ in 0..200 {
            p.update(&world, &back);
            let pos = p.position();
            assert!((0.1..=hi).contains(&pos.x));
            assert!((0.1..=hi).contains(&pos.y));
        }
        assert!((p.position().x - 0.1).abs() < 1e-9);
    }

    #[test]
    fn pitch_is_clamped() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        let up = InputState::from_actions([Action::LookUp]);
        for _ in 0..40 {
            p.update(&world, &up);
            assert!(p.view().pitch <= 1.5);
        }
        assert_eq!(p.view().pitch, 1.5);
        let down = InputState::from_actions([Action::LookDown]);
        for _ in 0..40 {
            p.update(&world, &down);
            assert!(p.view().pitch >= -1.5);
        }
        assert_eq!(p.view().pitch, -1.5);
    }

    #[test]
    fn direction_recomputed_only_on_rotation() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        p.update(&world, &InputState::from_actions([Action::LookRight]));
        assert!((p.view().yaw - 0.1).abs() < 1e-12);
        let expected = ViewAngles::new(0.0, 0.1).direction();
        assert!((p.direction() - expected).length() < 1e-12);
        let before = p.direction();
        p.update(&world, &InputState::from_actions([Action::MoveForward]));
        assert_eq!(p.direction(), before);
    }

    #[test]
    fn movement_uses_view_before_rotation() {
        let (config, world) = setup();
        let mut p = Player::new(&config);
        p.update(
            &world,
            &InputState::from_actions([Action::MoveForward, Action::LookLeft]),
        );
        // Movement this tick still used yaw 0.
        assert!((p.position().y - 10.0).abs() < 1e-12);
        assert!((p.view().yaw + 0.1).abs() < 1e-12);
    }
}
