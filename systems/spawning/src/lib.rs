#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use log::trace;
use pixel_plane_core::{tuning, Command, Event, GamePhase};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    period_ticks: u64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(period_ticks: u64, rng_seed: u64) -> Self {
        Self {
            period_ticks,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(tuning::SPAWN_PERIOD_TICKS, 0)
    }
}

/// Pure system that emits enemy spawn batches while a run is in progress.
#[derive(Debug)]
pub struct Spawning {
    period_ticks: u64,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            period_ticks: config.period_ticks,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the current enemy count to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        enemy_count: usize,
        out: &mut Vec<Command>,
    ) {
        if !phase.is_running() || self.period_ticks == 0 {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { tick } = event {
                if tick % self.period_ticks == 0 {
                    let requested = self.rng.gen_range(1..=tuning::SPAWN_BATCH_MAX);
                    self.spawn_batch(requested, enemy_count, out);
                }
            }
        }
    }

    /// Emits up to `requested` spawns, stopping once the enemy cap would be reached.
    pub fn spawn_batch(&mut self, requested: usize, enemy_count: usize, out: &mut Vec<Command>) {
        let room = tuning::ENEMY_CAP.saturating_sub(enemy_count);
        let granted = requested.min(room);
        if granted < requested {
            trace!("spawn batch capped: {granted} of {requested}");
        }
        let low = tuning::ENEMY_SPAWN_MARGIN as u32;
        let high = (tuning::CANVAS_WIDTH - tuning::ENEMY_SPAWN_MARGIN) as u32;
        for _ in 0..granted {
            let x = self.rng.gen_range(low..high) as f32;
            out.push(Command::SpawnEnemy { x });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_xs(commands: &[Command]) -> Vec<f32> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnEnemy { x } => Some(*x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn spawn_positions_stay_inside_the_margin() {
        let mut spawning = Spawning::new(Config::new(tuning::SPAWN_PERIOD_TICKS, 17));
        let mut commands = Vec::new();
        for _ in 0..200 {
            spawning.spawn_batch(1, 0, &mut commands);
        }
        for x in spawn_xs(&commands) {
            assert!((100.0..580.0).contains(&x), "x={x} outside spawn band");
            assert_eq!(x.fract(), 0.0);
        }
    }

    #[test]
    fn full_field_spawns_nothing() {
        let mut spawning = Spawning::new(Config::default());
        let mut commands = Vec::new();
        spawning.spawn_batch(2, tuning::ENEMY_CAP, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn zero_period_disables_spawning() {
        let mut spawning = Spawning::new(Config::new(0, 1));
        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced { tick: 90 }],
            GamePhase::Running,
            0,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
