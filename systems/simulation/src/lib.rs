#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order simulation step that drives the world for one tick.
//!
//! A tick runs, in order: player input, the clock (stars and projectiles),
//! spawning, enemy advance, the player contact test, the fade pass and the
//! projectile hit pass. The enemy stages only run while a run is in progress,
//! and a player contact ends the tick early.

use log::trace;
use pixel_plane_core::{tuning, Command, Event};
use pixel_plane_system_collision::Collision;
use pixel_plane_system_controls::{ControlInput, Controls};
use pixel_plane_system_spawning::{self as spawning, Spawning};
use pixel_plane_world::{self as world, query, World};

const SPAWN_STREAM: u64 = 0x5350_4157_4e5f_5253;

/// Owns the pure systems and the scratch buffers shared between ticks.
#[derive(Debug)]
pub struct Simulation {
    controls: Controls,
    spawning: Spawning,
    collision: Collision,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation whose spawn stream is derived from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            controls: Controls::new(),
            spawning: Spawning::new(spawning::Config::new(
                tuning::SPAWN_PERIOD_TICKS,
                seed ^ SPAWN_STREAM,
            )),
            collision: Collision::new(),
            commands: Vec::new(),
        }
    }

    /// Advances the world by exactly one tick, appending every emitted event.
    pub fn step(&mut self, world: &mut World, input: &ControlInput, out_events: &mut Vec<Event>) {
        self.controls.handle(
            input,
            query::phase(world),
            &query::player(world),
            &mut self.commands,
        );
        self.flush(world, out_events);

        let tick_start = out_events.len();
        world::apply(world, Command::Tick, out_events);

        if !query::phase(world).is_running() {
            return;
        }

        self.spawning.handle(
            &out_events[tick_start..],
            query::phase(world),
            query::enemy_count(world),
            &mut self.commands,
        );
        self.flush(world, out_events);

        world::apply(world, Command::AdvanceEnemies, out_events);

        let contact = self.collision.handle_contact(
            &query::player(world),
            &query::enemy_view(world),
            &mut self.commands,
        );
        self.flush(world, out_events);
        if contact {
            trace!("tick {} ended by player contact", query::tick_index(world));
            return;
        }

        world::apply(world, Command::FadeEnemies, out_events);

        self.collision.handle_hits(
            &query::enemy_view(world),
            &query::projectile_view(world),
            &mut self.commands,
        );
        self.flush(world, out_events);
    }

    fn flush(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(world, command, out_events);
        }
    }
}
