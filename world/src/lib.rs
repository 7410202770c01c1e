#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Pixel Plane.
//!
//! The world is the entity store of the game: it owns the player, the enemy
//! and projectile arenas and the starfield, and mutates them exclusively
//! through [`apply`]. Identifiers are never reused, so removal during a tick
//! can neither skip nor revisit a neighbouring entity.

mod enemies;
mod projectiles;
mod starfield;

use log::{debug, info, trace};
use pixel_plane_core::{tuning, Command, Event, GamePhase, Heading, Point2D};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use self::{
    enemies::{EnemyRegistry, EnemyState},
    projectiles::ProjectileRegistry,
    starfield::Starfield,
};

#[derive(Clone, Debug)]
struct Player {
    position: Point2D,
    speed: i32,
    half_width: i32,
    half_height: i32,
    scale: i32,
    score: u32,
    firing: bool,
}

impl Player {
    fn at_start() -> Self {
        Self {
            position: Point2D::new(tuning::PLAYER_START_X, tuning::PLAYER_START_Y),
            speed: tuning::PLAYER_SPEED,
            half_width: tuning::PLAYER_HALF_WIDTH,
            half_height: tuning::PLAYER_HALF_HEIGHT,
            scale: tuning::PLAYER_SCALE,
            score: 0,
            firing: false,
        }
    }

    /// Reports whether the bounding box centred on `position` fits the canvas.
    fn fits(&self, position: Point2D) -> bool {
        let half_width = self.half_width as f32;
        let half_height = self.half_height as f32;
        position.x - half_width >= 0.0
            && position.x + half_width <= tuning::CANVAS_WIDTH
            && position.y - half_height >= 0.0
            && position.y + half_height <= tuning::CANVAS_HEIGHT
    }

    /// Resolves a sequence of steps, discarding all of them if any leaves the canvas.
    fn plan_move<I>(&self, steps: I) -> Option<Point2D>
    where
        I: IntoIterator<Item = (Heading, i32)>,
    {
        let mut candidate = self.position;
        for (heading, distance) in steps {
            let (dx, dy) = heading.offset();
            candidate.x += (dx * distance) as f32;
            candidate.y += (dy * distance) as f32;
            if !self.fits(candidate) {
                return None;
            }
        }
        Some(candidate)
    }
}

/// Represents the authoritative Pixel Plane world state.
#[derive(Debug)]
pub struct World {
    phase: GamePhase,
    tick_index: u64,
    player: Player,
    enemies: EnemyRegistry,
    projectiles: ProjectileRegistry,
    stars: Starfield,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world on the start screen, seeding its starfield from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stars = Starfield::scatter(&mut rng);
        Self {
            phase: GamePhase::NotStarted,
            tick_index: 0,
            player: Player::at_start(),
            enemies: EnemyRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            stars,
            rng,
        }
    }

    fn move_player<I>(&mut self, steps: I, out_events: &mut Vec<Event>)
    where
        I: IntoIterator<Item = (Heading, i32)>,
    {
        let from = self.player.position;
        match self.player.plan_move(steps) {
            Some(to) => {
                self.player.position = to;
                out_events.push(Event::PlayerMoved { from, to });
            }
            None => {
                trace!("move rejected at ({}, {})", from.x, from.y);
                out_events.push(Event::PlayerMoveRejected { position: from });
            }
        }
    }

    fn advance_clock(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.stars.advance(&mut self.rng);

        let speed = (self.player.speed + 1) as f32;
        for projectile in self.projectiles.advance(speed) {
            out_events.push(Event::ProjectileExpired { projectile });
        }
        for projectile in self.projectiles.trim_to(tuning::PROJECTILE_CAP) {
            out_events.push(Event::ProjectileDropped { projectile });
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.position.y += tuning::ENEMY_SPEED;
        }
        let escaped = self
            .enemies
            .remove_where(|enemy| enemy.position.y > tuning::CANVAS_HEIGHT);
        for enemy in escaped {
            trace!("enemy {} escaped", enemy.get());
            out_events.push(Event::EnemyEscaped { enemy });
        }
    }

    fn fade_enemies(&mut self, out_events: &mut Vec<Event>) {
        for (_, enemy) in self.enemies.iter_mut() {
            if enemy.dying {
                enemy.fade.step();
            }
        }
        let spent = self
            .enemies
            .remove_where(|enemy| enemy.dying && enemy.fade.is_spent());
        for enemy in spent {
            self.player.score = self.player.score.saturating_add(1);
            debug!("enemy {} destroyed, score {}", enemy.get(), self.player.score);
            out_events.push(Event::EnemyDestroyed {
                enemy,
                score: self.player.score,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Enemy commands are ignored unless a run is in progress.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance_clock(out_events),
        Command::MovePlayer { directions } => {
            if directions.is_empty() {
                return;
            }
            let speed = world.player.speed;
            world.move_player(directions.iter().map(|heading| (heading, speed)), out_events);
        }
        Command::NudgePlayer { heading } => {
            let distance = world.player.speed * tuning::NUDGE_MULTIPLIER;
            world.move_player([(heading, distance)], out_events);
        }
        Command::FireProjectile => {
            world.player.firing = true;
            let origin = world.player.position;
            let projectile = world.projectiles.launch(origin);
            out_events.push(Event::ProjectileFired { projectile, origin });
        }
        Command::StartRun => {
            if world.phase.is_running() {
                return;
            }
            world.phase = GamePhase::Running;
            world.player.score = 0;
            info!("run started");
            out_events.push(Event::RunStarted);
        }
        Command::SpawnEnemy { x } => {
            if !world.phase.is_running() {
                return;
            }
            if world.enemies.len() >= tuning::ENEMY_CAP {
                out_events.push(Event::EnemySpawnSuppressed { x });
                return;
            }
            let position = Point2D::new(x, tuning::ENEMY_SPAWN_Y);
            let enemy = world.enemies.insert(EnemyState::spawned_at(position));
            debug!("enemy {} spawned at x={x}", enemy.get());
            out_events.push(Event::EnemySpawned { enemy, position });
        }
        Command::AdvanceEnemies => {
            if world.phase.is_running() {
                world.advance_enemies(out_events);
            }
        }
        Command::FadeEnemies => {
            if world.phase.is_running() {
                world.fade_enemies(out_events);
            }
        }
        Command::HitEnemy { enemy, projectile } => {
            if !world.phase.is_running() {
                return;
            }
            let Some(state) = world.enemies.get_mut(enemy) else {
                return;
            };
            if state.dying || !world.projectiles.remove(projectile) {
                return;
            }
            let _ = state.strike();
            out_events.push(Event::EnemyHit { enemy, projectile });
        }
        Command::DestroyPlayer { enemy } => {
            if !world.phase.is_running() || !world.enemies.contains(enemy) {
                return;
            }
            world.enemies.clear();
            world.phase = GamePhase::GameOver;
            let final_score = world.player.score;
            info!("player destroyed, final score {final_score}");
            out_events.push(Event::PlayerDestroyed { enemy, final_score });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use pixel_plane_core::{
        EnemyView, GamePhase, PlayerSnapshot, Point2D, ProjectileView, StarLayer,
    };

    /// Reports the current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Index of the most recent tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            speed: player.speed,
            half_width: player.half_width,
            half_height: player.half_height,
            scale: player.scale,
            score: player.score,
            firing: player.firing,
        }
    }

    /// Number of enemies currently on the canvas.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of every enemy in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Captures a read-only view of every live projectile, oldest first.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.projectiles.snapshots())
    }

    /// Positions of the stars in the requested layer.
    #[must_use]
    pub fn stars(world: &World, layer: StarLayer) -> &[Point2D] {
        world.stars.layer(layer)
    }
}

/// Direct state manipulation used to stage scenarios in tests.
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding {
    use super::{EnemyState, World};
    use pixel_plane_core::{EnemyId, GamePhase, Point2D};

    /// Teleports the player without bounds checks.
    pub fn place_player(world: &mut World, position: Point2D) {
        world.player.position = position;
    }

    /// Inserts a fresh enemy at the provided position, bypassing the spawn cap.
    pub fn insert_enemy(world: &mut World, position: Point2D) -> EnemyId {
        world.enemies.insert(EnemyState::spawned_at(position))
    }

    /// Forces the lifecycle phase.
    pub fn set_phase(world: &mut World, phase: GamePhase) {
        world.phase = phase;
    }

    /// Overrides the player's score.
    pub fn set_score(world: &mut World, score: u32) {
        world.player.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_plane_core::{EnemyId, HeldDirections, ProjectileId};

    fn running_world() -> World {
        let mut world = World::new(1);
        scaffolding::set_phase(&mut world, GamePhase::Running);
        world
    }

    fn right() -> HeldDirections {
        HeldDirections {
            right: true,
            ..HeldDirections::default()
        }
    }

    #[test]
    fn new_world_waits_on_the_start_screen() {
        let world = World::new(3);
        let player = query::player(&world);
        assert_eq!(query::phase(&world), GamePhase::NotStarted);
        assert_eq!(player.position, Point2D::new(340.0, 384.0));
        assert_eq!(player.score, 0);
        assert!(!player.firing);
    }

    #[test]
    fn move_to_the_exact_bound_is_accepted() {
        let mut world = World::new(1);
        scaffolding::place_player(&mut world, Point2D::new(662.0, 200.0));
        let mut events = Vec::new();

        apply(&mut world, Command::MovePlayer { directions: right() }, &mut events);

        assert_eq!(query::player(&world).position.x, 668.0);
    }

    #[test]
    fn move_past_the_bound_is_rejected_not_clamped() {
        let mut world = World::new(1);
        scaffolding::place_player(&mut world, Point2D::new(668.0, 200.0));
        let mut events = Vec::new();

        apply(&mut world, Command::MovePlayer { directions: right() }, &mut events);

        assert_eq!(query::player(&world).position.x, 668.0);
        assert_eq!(
            events,
            vec![Event::PlayerMoveRejected {
                position: Point2D::new(668.0, 200.0)
            }]
        );
    }

    #[test]
    fn rejected_direction_discards_the_whole_move() {
        let mut world = World::new(1);
        scaffolding::place_player(&mut world, Point2D::new(668.0, 200.0));
        let mut events = Vec::new();
        let directions = HeldDirections {
            up: true,
            right: true,
            ..HeldDirections::default()
        };

        apply(&mut world, Command::MovePlayer { directions }, &mut events);

        assert_eq!(query::player(&world).position, Point2D::new(668.0, 200.0));
    }

    #[test]
    fn nudge_respects_the_canvas_bounds() {
        let mut world = World::new(1);
        scaffolding::place_player(&mut world, Point2D::new(20.0, 200.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::NudgePlayer {
                heading: Heading::Left,
            },
            &mut events,
        );
        assert_eq!(query::player(&world).position.x, 20.0);

        apply(
            &mut world,
            Command::NudgePlayer {
                heading: Heading::Right,
            },
            &mut events,
        );
        assert_eq!(query::player(&world).position.x, 50.0);
    }

    #[test]
    fn firing_marks_the_player_and_launches_from_its_position() {
        let mut world = World::new(1);
        let mut events = Vec::new();

        apply(&mut world, Command::FireProjectile, &mut events);

        assert!(query::player(&world).firing);
        assert_eq!(
            events,
            vec![Event::ProjectileFired {
                projectile: ProjectileId::new(0),
                origin: Point2D::new(340.0, 384.0),
            }]
        );
    }

    #[test]
    fn tick_keeps_at_most_ten_projectiles() {
        let mut world = World::new(1);
        let mut events = Vec::new();
        for _ in 0..12 {
            apply(&mut world, Command::FireProjectile, &mut events);
        }
        events.clear();

        apply(&mut world, Command::Tick, &mut events);

        let view = query::projectile_view(&world);
        assert_eq!(view.len(), tuning::PROJECTILE_CAP);
        assert_eq!(view.iter().next().map(|p| p.id), Some(ProjectileId::new(2)));
        let dropped = events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileDropped { .. }))
            .count();
        assert_eq!(dropped, 2);
    }

    #[test]
    fn spawn_is_ignored_before_the_run_starts() {
        let mut world = World::new(1);
        let mut events = Vec::new();

        apply(&mut world, Command::SpawnEnemy { x: 200.0 }, &mut events);

        assert_eq!(query::enemy_count(&world), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn spawn_beyond_the_cap_is_suppressed() {
        let mut world = running_world();
        let mut events = Vec::new();
        for index in 0..tuning::ENEMY_CAP {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    x: 100.0 + index as f32,
                },
                &mut events,
            );
        }
        events.clear();

        apply(&mut world, Command::SpawnEnemy { x: 300.0 }, &mut events);

        assert_eq!(query::enemy_count(&world), tuning::ENEMY_CAP);
        assert_eq!(events, vec![Event::EnemySpawnSuppressed { x: 300.0 }]);
    }

    #[test]
    fn escaped_enemies_are_removed_without_credit() {
        let mut world = running_world();
        let escaping = scaffolding::insert_enemy(&mut world, Point2D::new(200.0, 480.0));
        let staying = scaffolding::insert_enemy(&mut world, Point2D::new(300.0, 479.0));
        let mut events = Vec::new();

        apply(&mut world, Command::AdvanceEnemies, &mut events);

        assert_eq!(events, vec![Event::EnemyEscaped { enemy: escaping }]);
        let remaining: Vec<EnemyId> = query::enemy_view(&world).iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![staying]);
        assert_eq!(query::player(&world).score, 0);
    }

    #[test]
    fn second_hit_on_a_dying_enemy_has_no_effect() {
        let mut world = running_world();
        let enemy = scaffolding::insert_enemy(&mut world, Point2D::new(200.0, 100.0));
        let mut events = Vec::new();
        apply(&mut world, Command::FireProjectile, &mut events);
        apply(&mut world, Command::FireProjectile, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::HitEnemy {
                enemy,
                projectile: ProjectileId::new(0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::HitEnemy {
                enemy,
                projectile: ProjectileId::new(1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::EnemyHit {
                enemy,
                projectile: ProjectileId::new(0)
            }]
        );
        assert_eq!(query::projectile_view(&world).len(), 1);
        let snapshot = query::enemy_view(&world).into_vec()[0];
        assert!(snapshot.dying);
        assert_eq!(snapshot.health, 0);
    }

    #[test]
    fn fading_enemy_is_credited_once() {
        let mut world = running_world();
        let enemy = scaffolding::insert_enemy(&mut world, Point2D::new(200.0, 100.0));
        let mut events = Vec::new();
        apply(&mut world, Command::FireProjectile, &mut events);
        apply(
            &mut world,
            Command::HitEnemy {
                enemy,
                projectile: ProjectileId::new(0),
            },
            &mut events,
        );
        events.clear();

        for _ in 0..tuning::FADE_TICKS {
            apply(&mut world, Command::FadeEnemies, &mut events);
        }
        apply(&mut world, Command::FadeEnemies, &mut events);

        assert_eq!(events, vec![Event::EnemyDestroyed { enemy, score: 1 }]);
        assert_eq!(query::enemy_count(&world), 0);
    }

    #[test]
    fn destroying_the_player_clears_enemies_and_ends_the_run() {
        let mut world = running_world();
        scaffolding::set_score(&mut world, 7);
        let enemy = scaffolding::insert_enemy(&mut world, Point2D::new(140.0, 384.0));
        let _ = scaffolding::insert_enemy(&mut world, Point2D::new(400.0, 30.0));
        let mut events = Vec::new();

        apply(&mut world, Command::DestroyPlayer { enemy }, &mut events);

        assert_eq!(query::phase(&world), GamePhase::GameOver);
        assert_eq!(query::enemy_count(&world), 0);
        assert_eq!(
            events,
            vec![Event::PlayerDestroyed {
                enemy,
                final_score: 7
            }]
        );
    }

    #[test]
    fn starting_a_run_resets_the_score() {
        let mut world = World::new(1);
        scaffolding::set_phase(&mut world, GamePhase::GameOver);
        scaffolding::set_score(&mut world, 12);
        let mut events = Vec::new();

        apply(&mut world, Command::StartRun, &mut events);
        apply(&mut world, Command::StartRun, &mut events);

        assert_eq!(query::phase(&world), GamePhase::Running);
        assert_eq!(query::player(&world).score, 0);
        assert_eq!(events, vec![Event::RunStarted]);
    }
}
