//! Compile-time gameplay constants.
//!
//! Every value here is fixed for the lifetime of the game; adapters expose no
//! way to override them.

/// Width of the logical canvas in world units.
pub const CANVAS_WIDTH: f32 = 680.0;
/// Height of the logical canvas in world units.
pub const CANVAS_HEIGHT: f32 = 480.0;
/// Number of simulation ticks executed per second of wall-clock time.
pub const TICKS_PER_SECOND: u32 = 30;

/// Distance the player travels per tick while a direction is held.
pub const PLAYER_SPEED: i32 = 6;
/// Horizontal half-extent of the player's bounding box.
pub const PLAYER_HALF_WIDTH: i32 = 12;
/// Vertical half-extent of the player's bounding box.
pub const PLAYER_HALF_HEIGHT: i32 = 16;
/// Scale factor applied to the player sprite when drawn.
pub const PLAYER_SCALE: i32 = 4;
/// Horizontal spawn position of the player.
pub const PLAYER_START_X: f32 = CANVAS_WIDTH / 2.0;
/// Vertical spawn position of the player.
pub const PLAYER_START_Y: f32 = CANVAS_HEIGHT * 0.8;
/// Multiplier applied to the player speed for a touch nudge.
pub const NUDGE_MULTIPLIER: i32 = 5;
/// Maximum per-axis distance between a touch and the player that counts as a fire tap.
pub const TOUCH_FIRE_RANGE: f32 = 100.0;

/// Fall speed of the front star layer per tick.
pub const FRONT_STAR_SPEED: f32 = 3.0;
/// Fall speed of the back star layer per tick.
pub const BACK_STAR_SPEED: f32 = 1.0;
/// Lattice spacing used when seeding the front star layer.
pub const FRONT_STAR_SPACING: usize = 30;
/// One in this many front lattice points receives a star.
pub const FRONT_STAR_ODDS: u32 = 20;
/// Lattice spacing used when seeding the back star layer.
pub const BACK_STAR_SPACING: usize = 100;
/// One in this many back lattice points receives a star.
pub const BACK_STAR_ODDS: u32 = 10;

/// Maximum number of projectiles retained after the per-tick trim.
pub const PROJECTILE_CAP: usize = 10;

/// Number of ticks between spawn attempts.
pub const SPAWN_PERIOD_TICKS: u64 = 90;
/// Largest batch drawn on a spawn tick; batches are drawn from `1..=SPAWN_BATCH_MAX`.
pub const SPAWN_BATCH_MAX: usize = 2;
/// Enemy count above which the spawn policy stops creating enemies.
pub const ENEMY_CAP: usize = 5;
/// Distance kept between spawned enemies and the canvas side edges.
pub const ENEMY_SPAWN_MARGIN: f32 = 100.0;
/// Vertical position of freshly spawned enemies.
pub const ENEMY_SPAWN_Y: f32 = -50.0;
/// Distance an enemy descends per tick.
pub const ENEMY_SPEED: f32 = 1.0;
/// Health assigned to freshly spawned enemies.
pub const ENEMY_FULL_HEALTH: u8 = 100;

/// Vertical distance below which the player and an enemy overlap.
pub const CONTACT_VERTICAL_RANGE: f32 = 10.0;
/// Horizontal reach when the player is to the right of an enemy.
pub const CONTACT_TRAILING_RANGE: f32 = 50.0;
/// Horizontal reach when the player is to the left of an enemy.
pub const CONTACT_LEADING_RANGE: f32 = 20.0;
/// Half-size of the square a projectile must enter to hit an enemy.
pub const PROJECTILE_HIT_RANGE: f32 = 24.0;

/// Opacity removed from a dying enemy on every tick.
pub const FADE_STEP: f32 = 0.05;
/// Number of ticks a dying enemy takes to fade out completely.
pub const FADE_TICKS: u8 = 20;

/// Distance a projectile climbs per tick.
#[must_use]
pub const fn projectile_speed() -> f32 {
    (PLAYER_SPEED + 1) as f32
}
