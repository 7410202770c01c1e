#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates sampled player input into world commands.

use pixel_plane_core::{tuning, Command, GamePhase, Heading, HeldDirections, PlayerSnapshot, Point2D};

/// Input sampled for a single tick, already mapped into canvas coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlInput {
    /// Directions held down during the tick.
    pub held: HeldDirections,
    /// Whether the fire key went down since the previous tick.
    pub fire_pressed: bool,
    /// Touches that began since the previous tick.
    pub touches: Vec<Point2D>,
}

impl ControlInput {
    /// Folds a later sample into this one, keeping edge-triggered inputs.
    ///
    /// Held directions always reflect the most recent sample.
    pub fn merge(&mut self, later: ControlInput) {
        self.held = later.held;
        self.fire_pressed |= later.fire_pressed;
        self.touches.extend(later.touches);
    }
}

/// Pure system that maps [`ControlInput`] onto player commands.
#[derive(Debug, Default)]
pub struct Controls;

impl Controls {
    /// Creates a new controls system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits movement, nudge and fire commands in that order.
    ///
    /// A fire intent outside a run first emits [`Command::StartRun`].
    pub fn handle(
        &mut self,
        input: &ControlInput,
        phase: GamePhase,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        if !input.held.is_empty() {
            out.push(Command::MovePlayer {
                directions: input.held,
            });
        }

        let mut phase = phase;
        for touch in &input.touches {
            if touch_targets_player(*touch, player) {
                fire(&mut phase, out);
            } else {
                out.push(Command::NudgePlayer {
                    heading: nudge_heading(*touch),
                });
            }
        }

        if input.fire_pressed {
            fire(&mut phase, out);
        }
    }
}

fn fire(phase: &mut GamePhase, out: &mut Vec<Command>) {
    if !phase.is_running() {
        out.push(Command::StartRun);
        *phase = GamePhase::Running;
    }
    out.push(Command::FireProjectile);
}

fn touch_targets_player(touch: Point2D, player: &PlayerSnapshot) -> bool {
    (touch.x - player.position.x).abs() < tuning::TOUCH_FIRE_RANGE
        && (touch.y - player.position.y).abs() < tuning::TOUCH_FIRE_RANGE
}

fn nudge_heading(touch: Point2D) -> Heading {
    if touch.x < tuning::CANVAS_WIDTH / 2.0 {
        Heading::Left
    } else {
        Heading::Right
    }
}
