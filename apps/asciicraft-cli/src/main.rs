mod game;
mod terminal;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use asciicraft_common::{EngineConfig, Vector3, ViewAngles};
use asciicraft_input::KeyMap;
use asciicraft_kernel::World;
use asciicraft_render::{AsciiRenderer, RenderView, Renderer, picture_lines};
use asciicraft_tools::{FramePacer, FrameTimer, WorldInspector};

use game::{Game, TickOutcome};
use terminal::TerminalSession;

#[derive(Parser)]
#[command(name = "asciicraft", about = "Block world rendered as ASCII in the terminal")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Screen width in characters
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Screen height in characters
    #[arg(long, global = true)]
    height: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively; each stdin line is one tick's keys
    Play {
        /// Frame delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Render a single frame from a fixed camera
    Frame {
        #[arg(long, default_value = "10.5")]
        x: f64,
        #[arg(long, default_value = "10.5")]
        y: f64,
        #[arg(long, default_value = "5.5")]
        z: f64,
        #[arg(long, default_value = "-0.3", allow_hyphen_values = true)]
        pitch: f64,
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        yaw: f64,
    },
    /// Run a scripted session and print the final frame
    Demo {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "40")]
        ticks: u64,
        /// Comma-separated key batches, repeated until the ticks run out
        #[arg(short, long, default_value = "s,s,s,i,i,x,a,a, ")]
        script: String,
    },
    /// Print the default engine config as JSON
    Config,
    /// Print crate versions
    Info,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut config = EngineConfig::default();
    if cli.width.is_some() || cli.height.is_some() {
        let width = cli.width.unwrap_or(config.screen_width);
        let height = cli.height.unwrap_or(config.screen_height);
        config = config.with_screen(width, height);
    }

    match cli.command.unwrap_or(Commands::Play { delay_ms: None }) {
        Commands::Play { delay_ms } => {
            if let Some(ms) = delay_ms {
                config.frame_delay_ms = ms;
            }
            play(config)?;
        }
        Commands::Frame {
            x,
            y,
            z,
            pitch,
            yaw,
        } => {
            config.validate().context("invalid engine config")?;
            let mut world = World::new(&config);
            world.generate_ground(config.ground_height);
            let mut renderer = AsciiRenderer::new(&config);
            let view = RenderView::new(
                Vector3::new(x, y, z),
                ViewAngles::new(pitch, yaw).clamp_pitch(config.pitch_limit),
            );
            let mut out = io::stdout().lock();
            for line in picture_lines(renderer.render(&world, &view)) {
                writeln!(out, "{line}")?;
            }
        }
        Commands::Demo { ticks, script } => demo(config, ticks, &script)?,
        Commands::Config => {
            let json = serde_json::to_string_pretty(&config).context("serialize config")?;
            println!("{json}");
        }
        Commands::Info => {
            println!("asciicraft v{}", env!("CARGO_PKG_VERSION"));
            for (name, info) in crate_versions() {
                println!("{name}: {info}");
            }
            println!(
                "world: {}x{}x{}, screen: {}x{}",
                config.x_blocks,
                config.y_blocks,
                config.z_blocks,
                config.screen_width,
                config.screen_height
            );
            println!(
                "render: {}",
                if cfg!(feature = "parallel") {
                    "parallel rows"
                } else {
                    "sequential"
                }
            );
        }
    }

    Ok(())
}

fn crate_versions() -> [(&'static str, &'static str); 6] {
    [
        ("common", asciicraft_common::crate_info()),
        ("kernel", asciicraft_kernel::crate_info()),
        ("input", asciicraft_input::crate_info()),
        ("player", asciicraft_player::crate_info()),
        ("render", asciicraft_render::crate_info()),
        ("tools", asciicraft_tools::crate_info()),
    ]
}

/// Forward stdin lines to the game loop so polling never blocks a frame.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn play(config: EngineConfig) -> anyhow::Result<()> {
    let highlight = config.highlight_block;
    let pacer = FramePacer::from_millis(config.frame_delay_ms);
    let mut game = Game::new(config).context("invalid engine config")?;
    let keymap = KeyMap::default();
    let mut timer = FrameTimer::new(60, pacer.target());
    let keys = spawn_stdin_reader();
    let mut stdin_closed = false;

    tracing::info!("session started");
    let mut session = TerminalSession::acquire(io::stdout().lock(), highlight)
        .context("failed to set up terminal")?;

    loop {
        let frame_start = Instant::now();

        let mut pending = String::new();
        loop {
            match keys.try_recv() {
                Ok(line) => pending.push_str(&line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stdin_closed = true;
                    break;
                }
            }
        }
        if stdin_closed && pending.is_empty() {
            tracing::info!("input closed");
            break;
        }

        let input = keymap.snapshot(pending.chars());
        if game.tick(&input) == TickOutcome::Quit {
            break;
        }

        session.draw(game.picture())?;
        let pos = game.player().position();
        let aim = match game.target() {
            Some(t) => format!("({}, {}, {})", t.cell.x, t.cell.y, t.cell.z),
            None => "none".to_string(),
        };
        session.status(&format!(
            "pos ({:.2}, {:.2}, {:.2})  target {aim}  frame {:.1?}  late {}",
            pos.x,
            pos.y,
            pos.z,
            timer.average(),
            timer.overruns()
        ))?;

        timer.record(pacer.pace(frame_start));
    }

    drop(session);
    tracing::info!(
        ticks = game.ticks(),
        late_frames = timer.overruns(),
        avg = ?timer.average(),
        max = ?timer.max(),
        "session ended"
    );
    Ok(())
}

fn demo(config: EngineConfig, ticks: u64, script: &str) -> anyhow::Result<()> {
    let mut game = Game::new(config).context("invalid engine config")?;
    let keymap = KeyMap::default();
    let batches: Vec<&str> = script.split(',').collect();
    let mut edits = 0;

    for n in 0..ticks {
        let batch = batches[n as usize % batches.len()];
        if game.tick(&keymap.snapshot(batch.chars())) == TickOutcome::Quit {
            break;
        }
        edits += game.edits().len();
    }

    let mut out = io::stdout().lock();
    for line in picture_lines(game.picture()) {
        writeln!(out, "{line}")?;
    }
    let pos = game.player().position();
    writeln!(
        out,
        "ticks={} edits={edits} pos=({:.2}, {:.2}, {:.2})",
        game.ticks(),
        pos.x,
        pos.y,
        pos.z
    )?;
    writeln!(out, "{}", WorldInspector::summary(game.world()))?;
    Ok(())
}
