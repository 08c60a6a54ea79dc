//! Soul inventory held by the player.

use soulkeeper_core::{DamageKind, Location, SoulId};

/// Soul harvested from a defeated enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Soul {
    id: SoulId,
    kind: DamageKind,
    value: u32,
    usable_in: Location,
}

impl Soul {
    /// Identifier allocated by the world for the soul.
    #[must_use]
    pub const fn id(&self) -> SoulId {
        self.id
    }

    /// Damage kind the originating enemy was weak against.
    #[must_use]
    pub const fn kind(&self) -> DamageKind {
        self.kind
    }

    /// Points cashed in when the soul is used.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Location the soul is bound to.
    #[must_use]
    pub const fn usable_in(&self) -> Location {
        self.usable_in
    }

    /// Reports whether the soul can be cashed in at the provided location.
    #[must_use]
    pub fn is_usable_at(&self, location: Location) -> bool {
        self.usable_in == location
    }
}

/// Bounded, insertion-ordered collection of souls.
#[derive(Debug)]
pub(crate) struct SoulInventory {
    souls: Vec<Soul>,
    capacity: usize,
    next_soul_id: SoulId,
}

impl SoulInventory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            souls: Vec::new(),
            capacity,
            next_soul_id: SoulId::new(0),
        }
    }

    /// Adds a soul unless the inventory is full.
    pub(crate) fn grant(
        &mut self,
        kind: DamageKind,
        value: u32,
        usable_in: Location,
    ) -> Option<SoulId> {
        if self.souls.len() >= self.capacity {
            return None;
        }
        let id = self.next_soul_id;
        self.next_soul_id = SoulId::new(id.get().wrapping_add(1));
        self.souls.push(Soul {
            id,
            kind,
            value,
            usable_in,
        });
        Some(id)
    }

    pub(crate) fn get(&self, id: SoulId) -> Option<&Soul> {
        self.souls.iter().find(|soul| soul.id == id)
    }

    /// Removes and returns the soul with the provided identifier.
    pub(crate) fn take(&mut self, id: SoulId) -> Option<Soul> {
        let index = self.souls.iter().position(|soul| soul.id == id)?;
        Some(self.souls.remove(index))
    }

    pub(crate) fn souls(&self) -> &[Soul] {
        &self.souls
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }
}
