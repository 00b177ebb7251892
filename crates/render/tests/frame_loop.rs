//! World, player and raycaster driven together through the per-frame control flow.

use asciicraft_common::{BlockId, EngineConfig, Vector3};
use asciicraft_input::{Action, InputState};
use asciicraft_kernel::{BlockCoord, World};
use asciicraft_player::Player;
use asciicraft_render::{AsciiRenderer, RenderView, Renderer};

fn setup() -> (EngineConfig, World, Player, AsciiRenderer) {
    let config = EngineConfig::default().with_screen(60, 20);
    let mut world = World::new(&config);
    world.generate_ground(config.ground_height);
    // Off the cell corner so the aimed contact point is not on a side face.
    let player = Player::at(Vector3::new(10.5, 10.5, 5.5), &config);
    let renderer = AsciiRenderer::new(&config);
    (config, world, player, renderer)
}

fn look_down(player: &mut Player, world: &World, ticks: usize) {
    let down = InputState::from_actions([Action::LookDown]);
    for _ in 0..ticks {
        player.update(world, &down);
    }
}

#[test]
fn aim_remove_then_fall_into_hole() {
    let (_config, mut world, mut player, renderer) = setup();
    look_down(&mut player, &world, 20);
    assert_eq!(player.view().pitch, -1.5);

    let target = renderer
        .raycaster()
        .resolve_target(player.position(), player.direction(), &world)
        .expect("ground below the player");
    assert_eq!(target.cell, BlockCoord::new(10, 10, 3));

    assert!(world.remove(target.cell.x, target.cell.y, target.cell.z));
    player.update(&world, &InputState::new());
    assert_eq!(player.position().z, 4.5);
    // Resting on the layer below the removed block.
    for _ in 0..5 {
        player.update(&world, &InputState::new());
    }
    assert_eq!(player.position().z, 4.5);
}

#[test]
fn place_onto_aimed_face_then_stand_on_it() {
    let (config, mut world, mut player, renderer) = setup();
    look_down(&mut player, &world, 20);
    let target = renderer
        .raycaster()
        .resolve_target(player.position(), player.direction(), &world)
        .unwrap();
    let placed = world.place_at(target.position, config.placed_block);
    assert_eq!(placed, Some(BlockCoord::new(10, 10, 4)));

    player.update(&world, &InputState::new());
    assert_eq!(player.position().z, 6.5);
}

#[test]
fn rendered_frame_shows_ground_and_highlight() {
    let (_config, world, mut player, mut renderer) = setup();
    look_down(&mut player, &world, 5);
    let target = renderer
        .raycaster()
        .resolve_target(player.position(), player.direction(), &world)
        .map(|t| t.cell);
    let view = RenderView::new(player.position(), player.view()).with_target(target);
    let picture = renderer.render(&world, &view);
    let cells = picture.as_slice();
    assert!(cells.contains(&BlockId::GROUND));
    assert!(cells.contains(&BlockId::EDGE));
    assert!(cells.contains(&BlockId::HIGHLIGHT));
}

#[test]
fn walking_never_leaves_world() {
    let (config, world, mut player, mut renderer) = setup();
    let input = InputState::from_actions([Action::MoveForward, Action::LookRight]);
    for _ in 0..300 {
        player.update(&world, &input);
        let p = player.position();
        assert!(p.x >= 0.1 && p.x <= config.x_blocks as f64 - 0.1);
        assert!(p.y >= 0.1 && p.y <= config.y_blocks as f64 - 0.1);
        assert_eq!(p.z, 5.5);
    }
    let view = RenderView::new(player.position(), player.view());
    let picture = renderer.render(&world, &view);
    assert_eq!(picture.width(), 60);
    assert!(renderer.raycaster().direction_field().rebuild_count() >= 1);
}
