#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Proximity tests between the player, enemies and projectiles.
//!
//! Both passes are axis-aligned range checks on entity centres. The player
//! box is deliberately lopsided: an enemy trailing the player to the left is
//! caught from further away than one leading it to the right.

use std::collections::BTreeSet;

use log::trace;
use pixel_plane_core::{
    tuning, Command, EnemySnapshot, EnemyView, PlayerSnapshot, ProjectileId, ProjectileView,
};

/// Pure system that converts overlaps into hit and destruction commands.
#[derive(Debug, Default)]
pub struct Collision {
    consumed: BTreeSet<ProjectileId>,
}

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a [`Command::DestroyPlayer`] for the first enemy touching the player.
    ///
    /// Dying enemies still count. Returns `true` when a contact was found so the
    /// caller can skip the remaining passes of the tick.
    pub fn handle_contact(
        &mut self,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) -> bool {
        match enemies.iter().find(|enemy| touches_player(player, enemy)) {
            Some(enemy) => {
                trace!("enemy {} touched the player", enemy.id.get());
                out.push(Command::DestroyPlayer { enemy: enemy.id });
                true
            }
            None => false,
        }
    }

    /// Emits at most one [`Command::HitEnemy`] per live enemy.
    ///
    /// Enemies and projectiles are both visited newest first; a projectile is
    /// consumed by the first enemy it reaches.
    pub fn handle_hits(
        &mut self,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        out: &mut Vec<Command>,
    ) {
        self.consumed.clear();
        for enemy in enemies.iter().rev().filter(|enemy| !enemy.dying) {
            let struck = projectiles.iter().rev().find(|projectile| {
                !self.consumed.contains(&projectile.id)
                    && within_hit_range(enemy, projectile.position.x, projectile.position.y)
            });
            if let Some(projectile) = struck {
                let _ = self.consumed.insert(projectile.id);
                out.push(Command::HitEnemy {
                    enemy: enemy.id,
                    projectile: projectile.id,
                });
            }
        }
    }
}

/// Reports whether the enemy overlaps the player's contact box.
#[must_use]
pub fn touches_player(player: &PlayerSnapshot, enemy: &EnemySnapshot) -> bool {
    let dx = player.position.x - enemy.position.x;
    let dy = (player.position.y - enemy.position.y).abs();
    if dy >= tuning::CONTACT_VERTICAL_RANGE {
        return false;
    }
    (dx > 0.0 && dx < tuning::CONTACT_TRAILING_RANGE)
        || (dx < 0.0 && -dx < tuning::CONTACT_LEADING_RANGE)
}

fn within_hit_range(enemy: &EnemySnapshot, x: f32, y: f32) -> bool {
    (enemy.position.x - x).abs() < tuning::PROJECTILE_HIT_RANGE
        && (enemy.position.y - y).abs() < tuning::PROJECTILE_HIT_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_plane_core::{EnemyId, Point2D};

    fn player_at(x: f32, y: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Point2D::new(x, y),
            speed: tuning::PLAYER_SPEED,
            half_width: tuning::PLAYER_HALF_WIDTH,
            half_height: tuning::PLAYER_HALF_HEIGHT,
            scale: tuning::PLAYER_SCALE,
            score: 0,
            firing: false,
        }
    }

    fn enemy_at(x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            position: Point2D::new(x, y),
            health: tuning::ENEMY_FULL_HEALTH,
            dying: false,
            fade: 1.0,
        }
    }

    #[test]
    fn contact_box_is_asymmetric() {
        let player = player_at(100.0, 300.0);
        assert!(!touches_player(&player, &enemy_at(140.0, 300.0)));
        assert!(touches_player(&player, &enemy_at(60.0, 300.0)));
        assert!(touches_player(&player, &enemy_at(115.0, 300.0)));
    }

    #[test]
    fn contact_requires_vertical_overlap() {
        let player = player_at(100.0, 300.0);
        assert!(touches_player(&player, &enemy_at(90.0, 309.0)));
        assert!(!touches_player(&player, &enemy_at(90.0, 310.0)));
    }

    #[test]
    fn exact_horizontal_alignment_is_not_a_contact() {
        let player = player_at(100.0, 300.0);
        assert!(!touches_player(&player, &enemy_at(100.0, 300.0)));
    }

    #[test]
    fn hit_range_is_exclusive() {
        let enemy = enemy_at(300.0, 50.0);
        assert!(within_hit_range(&enemy, 310.0, 60.0));
        assert!(!within_hit_range(&enemy, 324.0, 50.0));
    }
}
