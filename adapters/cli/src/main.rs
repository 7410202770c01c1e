#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Pixel Plane experience.

mod shell;

use std::{
    process::ExitCode,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use pixel_plane_core::WINDOW_TITLE;
use pixel_plane_rendering::{PixelSprite, Presentation, RenderingBackend, Soundtrack};
use pixel_plane_rendering_macroquad::MacroquadBackend;

use crate::shell::GameShell;

/// Command-line arguments for launching Pixel Plane.
#[derive(Debug, Parser)]
#[command(name = "pixel-plane", about = "Fly the pixel plane and shoot down the invaders.")]
struct CliArgs {
    /// Seed for stars and enemy spawns; derived from the clock when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,
    /// Logs frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Starts without sound.
    #[arg(long)]
    mute: bool,
}

/// Everything the game needs that is decided once at startup.
#[derive(Debug)]
struct GameContext {
    seed: u64,
    vsync: bool,
    show_fps: bool,
    soundtrack: Option<Soundtrack>,
}

impl GameContext {
    fn from_args(args: CliArgs) -> Result<Self> {
        let seed = match args.seed {
            Some(seed) => seed,
            None => clock_seed()?,
        };
        let soundtrack = if args.mute {
            None
        } else {
            Some(Soundtrack::synthesized().context("failed to synthesize the soundtrack")?)
        };

        Ok(Self {
            seed,
            vsync: args.vsync,
            show_fps: args.show_fps,
            soundtrack,
        })
    }
}

fn clock_seed() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the Unix epoch")?;
    Ok(elapsed.as_nanos() as u64)
}

/// Entry point for the Pixel Plane command-line interface.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let context = GameContext::from_args(args)?;
    info!("starting with seed {}", context.seed);

    let player_sprite = PixelSprite::plane().context("failed to parse the player sprite")?;
    let mut shell = GameShell::new(context.seed);
    let presentation = Presentation::new(
        WINDOW_TITLE,
        shell.initial_scene(),
        player_sprite,
        context.soundtrack,
    );

    MacroquadBackend::new()
        .with_vsync(context.vsync)
        .with_show_fps(context.show_fps)
        .run(presentation, move |frame_dt, input, scene| {
            shell.advance(frame_dt, input, scene);
        })
}
