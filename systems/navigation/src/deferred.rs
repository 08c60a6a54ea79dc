//! Cooperative queue for panel work that must wait a frame, a release or a delay.

use std::time::Duration;

use soulkeeper_core::InputButton;

use crate::PanelId;

/// Panel work that runs after a suspension point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// Pick the first selection once layout has settled.
    InitialSelection,
    /// Switch a grid from item navigation to its action menu.
    EnterActionMode,
}

/// Condition that must hold before a deferred action becomes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// Due on the next frame.
    NextFrame,
    /// Due on the first later frame that ends with the button released.
    Released(InputButton),
    /// Due once the delay has elapsed, counted from the next frame.
    After(Duration),
}

/// Deferred action that became due this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Due {
    /// Panel that queued the action.
    pub owner: PanelId,
    /// Action to resume.
    pub action: Deferred,
}

#[derive(Debug)]
struct Pending {
    owner: PanelId,
    action: Deferred,
    wake: Wake,
}

/// Queue of deferred actions keyed by the panel that owns them.
///
/// Each `(owner, action)` pair is queued at most once; scheduling it again
/// replaces the earlier entry. Entries never become due in the frame that
/// queued them. Cancelling an owner drops all of its entries, which is how
/// a closing panel avoids resuming against torn-down state.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<Pending>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an action for the owner, replacing an identical pending action.
    pub fn schedule(&mut self, owner: PanelId, action: Deferred, wake: Wake) {
        let _ = self.cancel(owner, action);
        self.pending.push(Pending {
            owner,
            action,
            wake,
        });
    }

    /// Drops a pending action, returning whether one was queued.
    pub fn cancel(&mut self, owner: PanelId, action: Deferred) -> bool {
        let before = self.pending.len();
        self.pending
            .retain(|entry| !(entry.owner == owner && entry.action == action));
        self.pending.len() != before
    }

    /// Drops every pending action of the owner, returning how many were queued.
    pub fn cancel_owner(&mut self, owner: PanelId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.owner != owner);
        before - self.pending.len()
    }

    /// Reports whether the action is waiting for its wake condition.
    #[must_use]
    pub fn is_pending(&self, owner: PanelId, action: Deferred) -> bool {
        self.pending
            .iter()
            .any(|entry| entry.owner == owner && entry.action == action)
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Starts a new frame and returns the actions that became due, oldest first.
    ///
    /// `held` lists the buttons still held at the end of the frame.
    pub fn advance(&mut self, dt: Duration, held: &[InputButton]) -> Vec<Due> {
        let mut due = Vec::new();
        self.pending.retain_mut(|entry| {
            let ready = match &mut entry.wake {
                Wake::NextFrame => true,
                Wake::Released(button) => !held.contains(button),
                Wake::After(remaining) => {
                    *remaining = remaining.saturating_sub(dt);
                    remaining.is_zero()
                }
            };
            if ready {
                due.push(Due {
                    owner: entry.owner,
                    action: entry.action,
                });
            }
            !ready
        });
        due
    }
}
