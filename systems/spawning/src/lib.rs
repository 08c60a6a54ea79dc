#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::{ops::RangeInclusive, time::Duration};

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use soulkeeper_core::{Command, DamageKind, Event, Location, SpawnPointId};
use tracing::warn;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
    rewards: RangeInclusive<u32>,
    soul_locations: Vec<Location>,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence, seed and reward range.
    ///
    /// Souls may be bound to any location until [`Config::with_soul_locations`]
    /// narrows the pool.
    #[must_use]
    pub fn new(spawn_interval: Duration, rng_seed: u64, rewards: RangeInclusive<u32>) -> Self {
        Self {
            spawn_interval,
            rng_seed,
            rewards,
            soul_locations: Location::ALL.to_vec(),
        }
    }

    /// Restricts the locations dropped souls are bound to; an empty pool keeps every location.
    #[must_use]
    pub fn with_soul_locations(mut self, locations: Vec<Location>) -> Self {
        if !locations.is_empty() {
            self.soul_locations = locations;
        }
        self
    }
}

/// Pure system that deterministically emits spawn commands as time advances.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
    rewards: RangeInclusive<u32>,
    soul_locations: Vec<Location>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rewards = if config.rewards.is_empty() {
            *config.rewards.start()..=*config.rewards.start()
        } else {
            config.rewards
        };
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            rewards,
            soul_locations: config.soul_locations,
        }
    }

    /// Consumes events and the free spawn points to emit spawn commands.
    ///
    /// Each elapsed interval produces one spawn on a distinct free point. An
    /// interval that finds no free point is dropped with a warning.
    pub fn handle(
        &mut self,
        events: &[Event],
        free_spawn_points: &[SpawnPointId],
        out: &mut Vec<Command>,
    ) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let attempts = self.resolve_spawn_attempts();

        let mut available = free_spawn_points.to_vec();
        for _ in 0..attempts {
            let Some(spawn_point) = self.take_spawn_point(&mut available) else {
                warn!("no free spawn point, spawn skipped");
                continue;
            };
            let weakness = self.next_weakness();
            let reward = self.rng.gen_range(self.rewards.clone());
            let soul_location = self.next_soul_location();
            out.push(Command::SpawnEnemy {
                spawn_point,
                weakness,
                reward,
                soul_location,
            });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn take_spawn_point(&mut self, available: &mut Vec<SpawnPointId>) -> Option<SpawnPointId> {
        let chosen = *available.choose(&mut self.rng)?;
        available.retain(|point| *point != chosen);
        Some(chosen)
    }

    fn next_weakness(&mut self) -> DamageKind {
        DamageKind::ALL[self.rng.gen_range(0..DamageKind::ALL.len())]
    }

    fn next_soul_location(&mut self) -> Location {
        self.soul_locations
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default()
    }
}
