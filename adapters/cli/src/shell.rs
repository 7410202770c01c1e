//! Bridges the frame-driven rendering loop and the tick-driven simulation.

use std::{mem, time::Duration};

use log::debug;
use pixel_plane_core::{tuning, Event, Point2D, StarLayer};
use pixel_plane_rendering::{FrameInput, PlayerPresentation, Scene, SoundCue, WorldFrame};
use pixel_plane_system_controls::ControlInput;
use pixel_plane_system_simulation::Simulation;
use pixel_plane_world::{query, World};

/// Most ticks run to catch up within a single frame.
const MAX_CATCH_UP_TICKS: u32 = 4;

fn tick_duration() -> Duration {
    Duration::from_secs(1) / tuning::TICKS_PER_SECOND
}

/// Owns the world and advances it at a fixed rate from variable frame times.
#[derive(Debug)]
pub(crate) struct GameShell {
    world: World,
    simulation: Simulation,
    accumulator: Duration,
    latched: ControlInput,
    events: Vec<Event>,
}

impl GameShell {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            world: World::new(seed),
            simulation: Simulation::new(seed),
            accumulator: Duration::ZERO,
            latched: ControlInput::default(),
            events: Vec::new(),
        }
    }

    /// Scene describing the world before the first frame.
    pub(crate) fn initial_scene(&self) -> Scene {
        let player = query::player(&self.world);
        let mut scene = Scene::new(
            query::phase(&self.world),
            PlayerPresentation::from_snapshot(&player),
        );
        self.populate(&mut scene);
        scene
    }

    /// Consumes one rendered frame, running as many ticks as have elapsed.
    pub(crate) fn advance(&mut self, frame_dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.latched.merge(control_input(input));
        self.accumulator += frame_dt;

        let tick = tick_duration();
        let mut ticks = 0;
        while self.accumulator >= tick && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= tick;
            ticks += 1;

            let held = self.latched.held;
            let sample = mem::take(&mut self.latched);
            self.latched.held = held;
            self.simulation
                .step(&mut self.world, &sample, &mut self.events);
        }

        if self.accumulator >= tick {
            debug!(
                "dropping {:?} of simulation time after {} catch-up ticks",
                self.accumulator, ticks
            );
            self.accumulator = Duration::ZERO;
        }

        scene
            .sound_cues
            .extend(self.events.drain(..).filter_map(|event| SoundCue::from_event(&event)));
        self.populate(scene);
    }

    fn populate(&self, scene: &mut Scene) {
        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);
        let projectiles = query::projectile_view(&self.world);
        scene.refresh(&WorldFrame {
            phase: query::phase(&self.world),
            player: &player,
            enemies: &enemies,
            projectiles: &projectiles,
            front_stars: query::stars(&self.world, StarLayer::Front),
            back_stars: query::stars(&self.world, StarLayer::Back),
        });
    }
}

fn control_input(input: FrameInput) -> ControlInput {
    ControlInput {
        held: input.held,
        fire_pressed: input.fire_pressed,
        touches: input
            .touches
            .into_iter()
            .map(|touch| Point2D::new(touch.x, touch.y))
            .collect(),
    }
}
