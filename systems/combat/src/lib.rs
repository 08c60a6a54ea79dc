#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns activated controls into combat and inventory commands.

use soulkeeper_core::{Command, DamageKind, EnemyId, SoulId};
use tracing::debug;

/// Control activation forwarded by the session after a submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// An attack button was pressed, arming its damage kind.
    Attack(DamageKind),
    /// An enemy was chosen as the target of the armed attack.
    Enemy(EnemyId),
    /// The "use" action was invoked on a soul.
    UseSoul(SoulId),
    /// The "destroy" action was invoked on a soul.
    DestroySoul(SoulId),
}

/// Combat system that remembers the armed attack and emits world commands.
#[derive(Debug)]
pub struct Combat {
    armed: DamageKind,
}

impl Default for Combat {
    fn default() -> Self {
        Self {
            armed: DamageKind::Melee,
        }
    }
}

impl Combat {
    /// Creates a combat system with the melee attack armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Damage kind applied to the next targeted enemy.
    #[must_use]
    pub const fn armed(&self) -> DamageKind {
        self.armed
    }

    /// Emits commands for the activations collected this frame, in order.
    pub fn handle(&mut self, activations: &[Activation], out: &mut Vec<Command>) {
        for activation in activations {
            match *activation {
                Activation::Attack(kind) => {
                    debug!(?kind, "attack armed");
                    self.armed = kind;
                }
                Activation::Enemy(enemy) => out.push(Command::DamageEnemy {
                    enemy,
                    kind: self.armed,
                }),
                Activation::UseSoul(soul) => out.push(Command::UseSoul { soul }),
                Activation::DestroySoul(soul) => out.push(Command::DestroySoul { soul }),
            }
        }
    }
}
