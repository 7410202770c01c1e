//! Authoritative enemy state management utilities.

use std::collections::BTreeMap;

use pixel_plane_core::{tuning, EnemyId, EnemySnapshot, Point2D};

/// Remaining fade ticks of a dying enemy.
///
/// Fade is counted in whole ticks so that an enemy disappears on exactly the
/// `FADE_TICKS`-th decrement; the opacity is derived from the count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Fade {
    remaining: u8,
}

impl Fade {
    pub(crate) const fn opaque() -> Self {
        Self {
            remaining: tuning::FADE_TICKS,
        }
    }

    /// Opacity in the range 0.0..=1.0.
    pub(crate) fn opacity(self) -> f32 {
        f32::from(self.remaining) / f32::from(tuning::FADE_TICKS)
    }

    pub(crate) fn step(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub(crate) const fn is_spent(self) -> bool {
        self.remaining == 0
    }
}

/// Enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) position: Point2D,
    pub(crate) health: u8,
    pub(crate) dying: bool,
    pub(crate) fade: Fade,
}

impl EnemyState {
    pub(crate) fn spawned_at(position: Point2D) -> Self {
        Self {
            position,
            health: tuning::ENEMY_FULL_HEALTH,
            dying: false,
            fade: Fade::opaque(),
        }
    }

    /// Marks the enemy as hit. Returns `false` when it was already dying.
    pub(crate) fn strike(&mut self) -> bool {
        if self.dying {
            return false;
        }
        self.health = 0;
        self.dying = true;
        self.fade = Fade::opaque();
        true
    }
}

/// Registry that stores enemies and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, EnemyState>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    /// Creates an empty enemy registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn insert(&mut self, state: EnemyState) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, state);
        id
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: EnemyId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (EnemyId, &mut EnemyState)> {
        self.entries.iter_mut().map(|(id, state)| (*id, state))
    }

    /// Removes every enemy matching the predicate, returning their identifiers
    /// in ascending order.
    pub(crate) fn remove_where<F>(&mut self, mut predicate: F) -> Vec<EnemyId>
    where
        F: FnMut(&EnemyState) -> bool,
    {
        let doomed: Vec<EnemyId> = self
            .entries
            .iter()
            .filter(|(_, state)| predicate(state))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            let _ = self.entries.remove(id);
        }
        doomed
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.entries
            .iter()
            .map(|(id, state)| EnemySnapshot {
                id: *id,
                position: state.position,
                health: state.health,
                dying: state.dying,
                fade: state.fade.opacity(),
            })
            .collect()
    }
}
