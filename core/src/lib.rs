#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pixel Plane engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation to react to. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod tuning;

use serde::{Deserialize, Serialize};

/// Title shown by the host window.
pub const WINDOW_TITLE: &str = "My Pixel Plane Game";

/// Lifecycle phase of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen shown before the first run.
    NotStarted,
    /// Enemies spawn, advance and collide.
    Running,
    /// The player was destroyed; the final score is on display.
    GameOver,
}

impl GamePhase {
    /// Reports whether enemy simulation is active in this phase.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Movement toward decreasing Y.
    Up,
    /// Movement toward increasing Y.
    Down,
    /// Movement toward decreasing X.
    Left,
    /// Movement toward increasing X.
    Right,
}

impl Heading {
    /// Unit offset of the heading expressed as `(dx, dy)`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Set of directions held during a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldDirections {
    /// Whether upward movement is held.
    pub up: bool,
    /// Whether downward movement is held.
    pub down: bool,
    /// Whether leftward movement is held.
    pub left: bool,
    /// Whether rightward movement is held.
    pub right: bool,
}

impl HeldDirections {
    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Held headings in application order: up, down, left, right.
    pub fn iter(&self) -> impl Iterator<Item = Heading> {
        [
            (self.up, Heading::Up),
            (self.down, Heading::Down),
            (self.left, Heading::Left),
            (self.right, Heading::Right),
        ]
        .into_iter()
        .filter_map(|(held, heading)| held.then_some(heading))
    }
}

/// Position on the logical canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Point2D {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Stable identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Stable identifier assigned to a projectile. Larger values are younger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Star layer used for the parallax background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarLayer {
    /// Fast, near layer.
    Front,
    /// Slow, distant layer.
    Back,
}

impl StarLayer {
    /// Distance the layer falls per tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Front => tuning::FRONT_STAR_SPEED,
            Self::Back => tuning::BACK_STAR_SPEED,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the clock, the starfield and every projectile by one tick.
    Tick,
    /// Moves the player along every held direction, or not at all.
    MovePlayer {
        /// Directions held for this tick.
        directions: HeldDirections,
    },
    /// Pushes the player sideways by a multiple of its speed.
    NudgePlayer {
        /// Direction of the nudge.
        heading: Heading,
    },
    /// Launches a projectile from the player's position.
    FireProjectile,
    /// Begins a new run, resetting the score.
    StartRun,
    /// Requests creation of an enemy at the top of the canvas.
    SpawnEnemy {
        /// Horizontal spawn coordinate.
        x: f32,
    },
    /// Moves every enemy down and removes those that left the canvas.
    AdvanceEnemies,
    /// Fades enemies that were already dying and removes spent ones.
    FadeEnemies,
    /// Registers a projectile hit on an enemy.
    HitEnemy {
        /// Enemy struck by the projectile.
        enemy: EnemyId,
        /// Projectile consumed by the hit.
        projectile: ProjectileId,
    },
    /// Ends the run after the player touched an enemy.
    DestroyPlayer {
        /// Enemy that touched the player.
        enemy: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just began.
        tick: u64,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Point2D,
        /// Position after the move.
        to: Point2D,
    },
    /// Reports that a move would have left the canvas and was discarded.
    PlayerMoveRejected {
        /// Position the player kept.
        position: Point2D,
    },
    /// Confirms that a projectile was launched.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Launch position.
        origin: Point2D,
    },
    /// Reports that a projectile left the top of the canvas.
    ProjectileExpired {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Reports that a projectile was dropped to honour the projectile cap.
    ProjectileDropped {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Announces the start of a run.
    RunStarted,
    /// Confirms that an enemy entered the canvas.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Spawn position.
        position: Point2D,
    },
    /// Reports that a spawn request was discarded because of the enemy cap.
    EnemySpawnSuppressed {
        /// Horizontal coordinate of the discarded request.
        x: f32,
    },
    /// Reports that an enemy left the bottom of the canvas unharmed.
    EnemyEscaped {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Confirms that a projectile struck an enemy, which begins to fade.
    EnemyHit {
        /// Identifier of the struck enemy.
        enemy: EnemyId,
        /// Identifier of the consumed projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a dying enemy faded out and was credited to the player.
    EnemyDestroyed {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Player score after the credit.
        score: u32,
    },
    /// Announces that the player was destroyed and the run ended.
    PlayerDestroyed {
        /// Enemy that touched the player.
        enemy: EnemyId,
        /// Score achieved during the run.
        final_score: u32,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position of the craft's centre.
    pub position: Point2D,
    /// Distance travelled per tick.
    pub speed: i32,
    /// Horizontal half-extent of the bounding box.
    pub half_width: i32,
    /// Vertical half-extent of the bounding box.
    pub half_height: i32,
    /// Scale factor applied to the sprite.
    pub scale: i32,
    /// Score accumulated during the current run.
    pub score: u32,
    /// Whether the player has fired at least once.
    pub firing: bool,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position of the enemy's centre.
    pub position: Point2D,
    /// Remaining health, forced to zero by a hit.
    pub health: u8,
    /// Whether the enemy was hit and is fading out.
    pub dying: bool,
    /// Opacity in the range 0.0..=1.0.
    pub fade: f32,
}

/// Read-only snapshot describing all enemies on the canvas.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current position of the projectile.
    pub position: Point2D,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectiles from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, EnemyId, Event, HeldDirections, Heading, Point2D, ProjectileId};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn held_directions_iterate_in_application_order() {
        let held = HeldDirections {
            up: false,
            down: true,
            left: true,
            right: true,
        };
        let order: Vec<Heading> = held.iter().collect();
        assert_eq!(order, vec![Heading::Down, Heading::Left, Heading::Right]);
        assert!(!held.is_empty());
        assert!(HeldDirections::default().is_empty());
    }

    #[test]
    fn heading_offsets_are_unit_vectors() {
        for heading in [Heading::Up, Heading::Down, Heading::Left, Heading::Right] {
            let (dx, dy) = heading.offset();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn hit_command_round_trips_through_bincode() {
        assert_round_trip(&Command::HitEnemy {
            enemy: EnemyId::new(3),
            projectile: ProjectileId::new(11),
        });
    }

    #[test]
    fn player_destroyed_event_round_trips_through_bincode() {
        assert_round_trip(&Event::PlayerDestroyed {
            enemy: EnemyId::new(1),
            final_score: 42,
        });
        assert_round_trip(&Event::PlayerMoved {
            from: Point2D::new(1.0, 2.0),
            to: Point2D::new(7.0, 2.0),
        });
    }
}
