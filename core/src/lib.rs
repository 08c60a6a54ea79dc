#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Soulkeeper gameplay layer.
//!
//! This crate defines the message surface that connects the session adapter,
//! the authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values through an
//! [`EventBus`] so that systems and navigation panels can react in a
//! deterministic order. Input arrives as [`InputFrame`] snapshots made of
//! edge-triggered [`InputSignal`] values and level-held [`InputButton`] values.

mod bus;

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use bus::{EventBus, Subscription};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an enemy appear at the provided spawn point.
    SpawnEnemy {
        /// Spawn point the enemy should occupy.
        spawn_point: SpawnPointId,
        /// Damage kind the enemy is weak against.
        weakness: DamageKind,
        /// Base number of points awarded for defeating the enemy.
        reward: u32,
        /// Location where the soul dropped by the enemy can be used.
        soul_location: Location,
    },
    /// Applies a single blow of the provided damage kind to an enemy.
    DamageEnemy {
        /// Identifier of the enemy receiving the blow.
        enemy: EnemyId,
        /// Kind of damage dealt.
        kind: DamageKind,
    },
    /// Consumes a soul from the inventory, cashing in its value.
    UseSoul {
        /// Identifier of the soul being consumed.
        soul: SoulId,
    },
    /// Discards a soul from the inventory without any reward.
    DestroySoul {
        /// Identifier of the soul being discarded.
        soul: SoulId,
    },
}

/// Domain events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy was created at a spawn point.
    EnemyCreated {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Spawn point the enemy occupies.
        spawn_point: SpawnPointId,
    },
    /// Announces that an enemy was defeated and removed from play.
    EnemyKilled {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
    },
    /// Announces that points were earned.
    PointsScored {
        /// Number of points earned.
        amount: u32,
    },
    /// Announces that the accumulated score changed.
    ScoreUpdated,
    /// Reports that a spawn request could not be honoured.
    SpawnRejected {
        /// Spawn point named in the request.
        spawn_point: SpawnPointId,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces that a spawn point finished cooling down and accepts enemies again.
    SpawnPointReleased {
        /// Spawn point that became available.
        spawn_point: SpawnPointId,
    },
    /// Confirms that a soul was added to the inventory.
    SoulGranted {
        /// Identifier of the granted soul.
        soul: SoulId,
    },
    /// Confirms that a soul was consumed.
    SoulUsed {
        /// Identifier of the consumed soul.
        soul: SoulId,
    },
    /// Reports that a soul cannot be used in the current location.
    SoulUseRefused {
        /// Identifier of the soul that stays in the inventory.
        soul: SoulId,
        /// Location the soul is bound to.
        usable_in: Location,
    },
    /// Confirms that a soul was discarded.
    SoulDestroyed {
        /// Identifier of the discarded soul.
        soul: SoulId,
    },
    /// Announces that the set of souls held in the inventory changed.
    InventoryChanged,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnError {
    /// The spawn point does not exist.
    UnknownSpawnPoint,
    /// Another enemy already stands on the spawn point.
    Occupied,
    /// The spawn point is still cooling down after its last enemy died.
    CoolingDown,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpawnPoint => write!(f, "spawn point does not exist"),
            Self::Occupied => write!(f, "spawn point is occupied"),
            Self::CoolingDown => write!(f, "spawn point is cooling down"),
        }
    }
}

/// Closed set of damage kinds an attack may deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// Close-quarters strike.
    Melee,
    /// Ranged attack.
    Distance,
    /// Spell attack.
    Magic,
}

impl DamageKind {
    /// Every damage kind in presentation order.
    pub const ALL: [DamageKind; 3] = [DamageKind::Melee, DamageKind::Distance, DamageKind::Magic];
}

/// Place the player is fighting in; souls only work where they belong.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Starting marshland.
    #[default]
    Swamps,
    /// Underground halls.
    Dungeon,
    /// Fortified keep.
    Castle,
    /// Streets of the capital.
    City,
    /// Top of the wizard's tower.
    Tower,
}

impl Location {
    /// Every location in travel order.
    pub const ALL: [Location; 5] = [
        Location::Swamps,
        Location::Dungeon,
        Location::Castle,
        Location::City,
        Location::Tower,
    ];
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
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

/// Unique identifier assigned to a soul held in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoulId(u32);

impl SoulId {
    /// Creates a new soul identifier with the provided numeric value.
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

/// Identifier of a spawn point, equal to its index in the configured list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpawnPointId(u32);

impl SpawnPointId {
    /// Creates a new spawn point identifier with the provided numeric value.
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

/// Axis-aligned rectangle expressed in screen or scroll-content pixels.
///
/// The y axis grows downward, matching the layout of on-screen lists.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    min: Vec2,
    size: Vec2,
}

impl ScreenRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Creates a rectangle of the provided size centred on a point.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Bottom-right corner of the rectangle.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Reports whether `other` lies entirely within this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &ScreenRect) -> bool {
        let max = self.max();
        let other_max = other.max();
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other_max.x <= max.x
            && other_max.y <= max.y
    }
}

/// Edge-triggered input signals delivered to navigation panels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSignal {
    /// Activates the current selection.
    Confirm,
    /// Backs out of the current mode or panel.
    Cancel,
    /// Directional press toward the top of the screen.
    Up,
    /// Directional press toward the bottom of the screen.
    Down,
    /// Directional press toward the left of the screen.
    Left,
    /// Directional press toward the right of the screen.
    Right,
    /// Moves focus between sub-lists; the value is an axis reading in `-1.0..=1.0`.
    ChangeFocus(f32),
}

impl InputSignal {
    /// Level-held button that produced this signal, if any.
    #[must_use]
    pub const fn button(&self) -> Option<InputButton> {
        match self {
            Self::Confirm => Some(InputButton::Confirm),
            Self::Cancel => Some(InputButton::Cancel),
            Self::Up => Some(InputButton::Up),
            Self::Down => Some(InputButton::Down),
            Self::Left => Some(InputButton::Left),
            Self::Right => Some(InputButton::Right),
            Self::ChangeFocus(_) => None,
        }
    }
}

/// Physical buttons whose held state is tracked between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputButton {
    /// Confirm button.
    Confirm,
    /// Cancel button.
    Cancel,
    /// Up direction.
    Up,
    /// Down direction.
    Down,
    /// Left direction.
    Left,
    /// Right direction.
    Right,
}

/// Input snapshot gathered once per frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Signals whose press edge occurred during this frame, in arrival order.
    #[serde(default)]
    pub pressed: Vec<InputSignal>,
    /// Buttons held down at the end of this frame.
    #[serde(default)]
    pub held: Vec<InputButton>,
}

impl InputFrame {
    /// Creates a frame in which nothing is pressed or held.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Creates a frame in which `signal` is pressed and its button remains held.
    #[must_use]
    pub fn press(signal: InputSignal) -> Self {
        Self {
            pressed: vec![signal],
            held: signal.button().into_iter().collect(),
        }
    }

    /// Creates a frame in which `signal` is pressed and released within the frame.
    #[must_use]
    pub fn tap(signal: InputSignal) -> Self {
        Self {
            pressed: vec![signal],
            held: Vec::new(),
        }
    }

    /// Reports whether the provided button is held at the end of the frame.
    #[must_use]
    pub fn is_held(&self, button: InputButton) -> bool {
        self.held.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rect_accepts_touching_edges() {
        let outer = ScreenRect::new(Vec2::ZERO, Vec2::new(100.0, 50.0));
        let inner = ScreenRect::new(Vec2::new(0.0, 10.0), Vec2::new(100.0, 40.0));
        let spilling = ScreenRect::new(Vec2::new(0.0, 20.0), Vec2::new(100.0, 40.0));

        assert!(outer.contains_rect(&inner));
        assert!(!outer.contains_rect(&spilling));
    }

    #[test]
    fn centered_rect_reports_its_center() {
        let rect = ScreenRect::centered(Vec2::new(40.0, 12.0), Vec2::new(20.0, 8.0));
        assert_eq!(rect.min(), Vec2::new(30.0, 8.0));
        assert_eq!(rect.center(), Vec2::new(40.0, 12.0));
    }

    #[test]
    fn press_holds_button_but_tap_releases_it() {
        let pressed = InputFrame::press(InputSignal::Confirm);
        let tapped = InputFrame::tap(InputSignal::Confirm);

        assert!(pressed.is_held(InputButton::Confirm));
        assert!(!tapped.is_held(InputButton::Confirm));
        assert!(InputFrame::press(InputSignal::ChangeFocus(1.0)).held.is_empty());
    }

    #[derive(Debug, Deserialize)]
    struct ScriptedSignals {
        pressed: Vec<InputSignal>,
    }

    #[test]
    fn signals_deserialize_from_strings_and_tables() {
        let parsed: ScriptedSignals =
            toml::from_str("pressed = [\"confirm\", { change_focus = -1.0 }, \"left\"]")
                .expect("signals parse");

        assert_eq!(
            parsed.pressed,
            vec![
                InputSignal::Confirm,
                InputSignal::ChangeFocus(-1.0),
                InputSignal::Left
            ]
        );
    }
}
