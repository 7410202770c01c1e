//! Projectile storage keyed by launch order.

use std::collections::BTreeMap;

use pixel_plane_core::{Point2D, ProjectileId, ProjectileSnapshot};

#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, Point2D>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn launch(&mut self, origin: Point2D) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, origin);
        id
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Moves every projectile up by `speed` and removes those above the canvas.
    pub(crate) fn advance(&mut self, speed: f32) -> Vec<ProjectileId> {
        for position in self.entries.values_mut() {
            position.y -= speed;
        }
        let expired: Vec<ProjectileId> = self
            .entries
            .iter()
            .filter(|(_, position)| position.y < 0.0)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            let _ = self.entries.remove(id);
        }
        expired
    }

    /// Drops the oldest projectiles until at most `cap` remain.
    pub(crate) fn trim_to(&mut self, cap: usize) -> Vec<ProjectileId> {
        let mut dropped = Vec::new();
        while self.entries.len() > cap {
            match self.entries.pop_first() {
                Some((id, _)) => dropped.push(id),
                None => break,
            }
        }
        dropped
    }

    pub(crate) fn snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.entries
            .iter()
            .map(|(id, position)| ProjectileSnapshot {
                id: *id,
                position: *position,
            })
            .collect()
    }
}
