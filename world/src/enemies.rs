//! Authoritative enemy state and combat resolution.

use std::collections::BTreeMap;

use soulkeeper_core::{DamageKind, EnemyId, Location, SpawnPointId};

/// Enemy currently standing on a spawn point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enemy {
    id: EnemyId,
    spawn_point: SpawnPointId,
    weakness: DamageKind,
    reward: u32,
    soul_location: Location,
}

impl Enemy {
    /// Identifier allocated by the world for the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Spawn point occupied by the enemy.
    #[must_use]
    pub const fn spawn_point(&self) -> SpawnPointId {
        self.spawn_point
    }

    /// Damage kind that earns a bonus when used against the enemy.
    #[must_use]
    pub const fn weakness(&self) -> DamageKind {
        self.weakness
    }

    /// Base number of points awarded for defeating the enemy.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        self.reward
    }

    /// Location where the enemy's soul can be used.
    #[must_use]
    pub const fn soul_location(&self) -> Location {
        self.soul_location
    }
}

/// Computes the points earned for defeating an enemy with the provided damage kind.
///
/// Exploiting the weakness pays `reward * 1.5` rounded to the nearest integer,
/// with halves going to the even neighbour; any other kind pays the base reward.
#[must_use]
pub fn resolve_points(weakness: DamageKind, reward: u32, kind: DamageKind) -> u32 {
    if kind != weakness {
        return reward;
    }
    let tripled = u64::from(reward) * 3;
    let boosted = tripled / 2 + u64::from(tripled % 4 == 3);
    u32::try_from(boosted).unwrap_or(u32::MAX)
}

/// Registry that stores living enemies and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, Enemy>,
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

    /// Stores a new enemy and returns the identifier allocated for it.
    pub(crate) fn insert(
        &mut self,
        spawn_point: SpawnPointId,
        weakness: DamageKind,
        reward: u32,
        soul_location: Location,
    ) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(
            id,
            Enemy {
                id,
                spawn_point,
                weakness,
                reward,
                soul_location,
            },
        );
        id
    }

    /// Removes an enemy, returning its final state when it was alive.
    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries.get(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.values()
    }
}
