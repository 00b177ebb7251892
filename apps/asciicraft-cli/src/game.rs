use asciicraft_common::{ConfigError, EngineConfig};
use asciicraft_input::{Action, InputState};
use asciicraft_kernel::{World, WorldEvent};
use asciicraft_player::Player;
use asciicraft_render::{AsciiRenderer, Picture, RenderView, Renderer, Target};

/// What the session loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// One running game: world, player and renderer advanced together each tick.
pub struct Game {
    config: EngineConfig,
    world: World,
    player: Player,
    renderer: AsciiRenderer,
    target: Option<Target>,
    edits: Vec<WorldEvent>,
    ticks: u64,
}

impl Game {
    /// Generate the world and spawn the player on top of the ground.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new(&config);
        world.generate_ground(config.ground_height);
        world.drain_events();
        let player = Player::new(&config);
        let renderer = AsciiRenderer::new(&config);
        Ok(Self {
            config,
            world,
            player,
            renderer,
            target: None,
            edits: Vec::new(),
            ticks: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Block aimed at during the last tick, before that tick's edits.
    pub fn target(&self) -> Option<Target> {
        self.target
    }

    /// Block edits applied by the last tick, in the order they happened.
    pub fn edits(&self) -> &[WorldEvent] {
        &self.edits
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The frame rendered by the last tick.
    pub fn picture(&self) -> &Picture {
        self.renderer.picture()
    }

    /// Advance one frame: player update, aim, edits, render.
    ///
    /// Edits are applied before rendering, never during it. When both edit
    /// actions are active, removal runs first.
    pub fn tick(&mut self, input: &InputState) -> TickOutcome {
        if input.is_active(Action::Quit) {
            return TickOutcome::Quit;
        }
        let _span = tracing::info_span!("tick", n = self.ticks).entered();

        self.player.update(&self.world, input);

        let origin = self.player.position();
        self.target = self
            .renderer
            .raycaster()
            .resolve_target(origin, self.player.direction(), &self.world);

        if let Some(target) = self.target {
            let cell = target.cell;
            if input.is_active(Action::RemoveBlock) {
                self.world.remove(cell.x, cell.y, cell.z);
            }
            if input.is_active(Action::PlaceBlock) {
                self.world.place(target.position, self.config.placed_block);
            }
        }
        self.edits.clear();
        for event in self.world.drain_events() {
            if let WorldEvent::BlockSet { coord, old, new } = &event {
                tracing::debug!(?coord, %old, %new, "world edit");
            }
            self.edits.push(event);
        }

        let view = RenderView::new(origin, self.player.view())
            .with_target(self.target.map(|t| t.cell));
        self.renderer.render(&self.world, &view);
        self.ticks += 1;
        TickOutcome::Continue
    }
}
