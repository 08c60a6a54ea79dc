#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that accumulates the player's score from scoring events.

use soulkeeper_core::Event;

/// Running score fed by [`Event::PointsScored`].
#[derive(Debug, Default)]
pub struct Scoreboard {
    total: u64,
}

impl Scoreboard {
    /// Creates a scoreboard starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated score.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Adds every scored amount in the batch and announces the change once.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        let mut scored = false;
        for event in events {
            if let Event::PointsScored { amount } = event {
                self.total = self.total.saturating_add(u64::from(*amount));
                scored = true;
            }
        }

        if scored {
            out.push(Event::ScoreUpdated);
        }
    }
}
