#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative gameplay state management for Soulkeeper.

mod enemies;
mod souls;

use std::time::Duration;

use glam::Vec2;
use soulkeeper_core::{Command, EnemyId, Event, Location, SpawnError, SpawnPointId};
use tracing::{debug, warn};

use self::{enemies::EnemyRegistry, souls::SoulInventory};

pub use self::{
    enemies::{resolve_points, Enemy},
    souls::Soul,
};

const DEFAULT_RELEASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_SOUL_CAPACITY: usize = 12;
const DEFAULT_SPAWN_POINTS: [Vec2; 3] = [
    Vec2::new(160.0, 120.0),
    Vec2::new(480.0, 120.0),
    Vec2::new(800.0, 120.0),
];

/// Parameters used to construct a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Screen positions of the spawn points, indexed by [`SpawnPointId`].
    pub spawn_points: Vec<Vec2>,
    /// Time a spawn point stays unavailable after its enemy dies.
    pub release_delay: Duration,
    /// Maximum number of souls the inventory can hold.
    pub soul_capacity: usize,
    /// Location the player fights in, deciding which souls can be used.
    pub location: Location,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn_points: DEFAULT_SPAWN_POINTS.to_vec(),
            release_delay: DEFAULT_RELEASE_DELAY,
            soul_capacity: DEFAULT_SOUL_CAPACITY,
            location: Location::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpawnPointState {
    Free,
    Occupied(EnemyId),
    CoolingDown(Duration),
}

#[derive(Debug)]
struct SpawnPoint {
    position: Vec2,
    state: SpawnPointState,
}

/// Represents the authoritative Soulkeeper world state.
#[derive(Debug)]
pub struct World {
    spawn_points: Vec<SpawnPoint>,
    release_delay: Duration,
    location: Location,
    enemies: EnemyRegistry,
    souls: SoulInventory,
}

impl World {
    /// Creates a world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world from the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            spawn_points: config
                .spawn_points
                .into_iter()
                .map(|position| SpawnPoint {
                    position,
                    state: SpawnPointState::Free,
                })
                .collect(),
            release_delay: config.release_delay,
            location: config.location,
            enemies: EnemyRegistry::new(),
            souls: SoulInventory::new(config.soul_capacity),
        }
    }

    fn spawn_point_mut(&mut self, id: SpawnPointId) -> Option<&mut SpawnPoint> {
        self.spawn_points.get_mut(id.get() as usize)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            for (index, point) in world.spawn_points.iter_mut().enumerate() {
                let SpawnPointState::CoolingDown(remaining) = point.state else {
                    continue;
                };
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    point.state = SpawnPointState::Free;
                    out_events.push(Event::SpawnPointReleased {
                        spawn_point: SpawnPointId::new(index as u32),
                    });
                } else {
                    point.state = SpawnPointState::CoolingDown(remaining);
                }
            }
        }
        Command::SpawnEnemy {
            spawn_point,
            weakness,
            reward,
            soul_location,
        } => {
            let state = world.spawn_point_mut(spawn_point).map(|point| point.state);
            let rejection = match state {
                None => Some(SpawnError::UnknownSpawnPoint),
                Some(SpawnPointState::Occupied(_)) => Some(SpawnError::Occupied),
                Some(SpawnPointState::CoolingDown(_)) => Some(SpawnError::CoolingDown),
                Some(SpawnPointState::Free) => None,
            };
            if let Some(reason) = rejection {
                warn!(spawn_point = spawn_point.get(), %reason, "spawn request ignored");
                out_events.push(Event::SpawnRejected {
                    spawn_point,
                    reason,
                });
                return;
            }

            let enemy = world
                .enemies
                .insert(spawn_point, weakness, reward, soul_location);
            if let Some(point) = world.spawn_point_mut(spawn_point) {
                point.state = SpawnPointState::Occupied(enemy);
            }
            out_events.push(Event::EnemyCreated { enemy, spawn_point });
        }
        Command::DamageEnemy { enemy, kind } => {
            let Some(defeated) = world.enemies.remove(enemy) else {
                debug!(enemy = enemy.get(), "damage against a missing enemy ignored");
                return;
            };

            let release_delay = world.release_delay;
            let spawn_point = defeated.spawn_point();
            if let Some(point) = world.spawn_point_mut(spawn_point) {
                if release_delay.is_zero() {
                    point.state = SpawnPointState::Free;
                } else {
                    point.state = SpawnPointState::CoolingDown(release_delay);
                }
            }

            out_events.push(Event::EnemyKilled { enemy });
            if release_delay.is_zero() {
                out_events.push(Event::SpawnPointReleased { spawn_point });
            }
            out_events.push(Event::PointsScored {
                amount: resolve_points(defeated.weakness(), defeated.reward(), kind),
            });

            let granted = world.souls.grant(
                defeated.weakness(),
                defeated.reward(),
                defeated.soul_location(),
            );
            match granted {
                Some(soul) => {
                    out_events.push(Event::SoulGranted { soul });
                    out_events.push(Event::InventoryChanged);
                }
                None => {
                    warn!(
                        capacity = world.souls.capacity(),
                        "soul inventory full, soul discarded"
                    );
                }
            }
        }
        Command::UseSoul { soul } => {
            let Some(usable_in) = world.souls.get(soul).map(Soul::usable_in) else {
                return;
            };
            if usable_in != world.location {
                warn!(
                    soul = soul.get(),
                    ?usable_in,
                    location = ?world.location,
                    "soul cannot be used here"
                );
                out_events.push(Event::SoulUseRefused { soul, usable_in });
                return;
            }
            if let Some(used) = world.souls.take(soul) {
                out_events.push(Event::SoulUsed { soul });
                out_events.push(Event::PointsScored {
                    amount: used.value(),
                });
                out_events.push(Event::InventoryChanged);
            }
        }
        Command::DestroySoul { soul } => {
            if world.souls.take(soul).is_some() {
                out_events.push(Event::SoulDestroyed { soul });
                out_events.push(Event::InventoryChanged);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use soulkeeper_core::{EnemyId, Location, SoulId, SpawnPointId};

    use super::{Enemy, Soul, SpawnPointState, World};

    /// Enumerates living enemies ordered by identifier.
    pub fn enemies(world: &World) -> impl Iterator<Item = &Enemy> {
        world.enemies.iter()
    }

    /// Looks up a living enemy.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<&Enemy> {
        world.enemies.get(id)
    }

    /// Enumerates spawn points that currently accept a new enemy.
    #[must_use]
    pub fn free_spawn_points(world: &World) -> Vec<SpawnPointId> {
        world
            .spawn_points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.state == SpawnPointState::Free)
            .map(|(index, _)| SpawnPointId::new(index as u32))
            .collect()
    }

    /// Screen position of the provided spawn point.
    #[must_use]
    pub fn spawn_point_position(world: &World, id: SpawnPointId) -> Option<Vec2> {
        world
            .spawn_points
            .get(id.get() as usize)
            .map(|point| point.position)
    }

    /// Number of configured spawn points.
    #[must_use]
    pub fn spawn_point_count(world: &World) -> usize {
        world.spawn_points.len()
    }

    /// Souls held in the inventory in the order they were granted.
    #[must_use]
    pub fn souls(world: &World) -> &[Soul] {
        world.souls.souls()
    }

    /// Looks up a soul held in the inventory.
    #[must_use]
    pub fn soul(world: &World, id: SoulId) -> Option<&Soul> {
        world.souls.get(id)
    }

    /// Location the player currently fights in.
    #[must_use]
    pub fn location(world: &World) -> Location {
        world.location
    }

    /// Maximum number of souls the inventory can hold.
    #[must_use]
    pub fn soul_capacity(world: &World) -> usize {
        world.souls.capacity()
    }
}
