//! Two cyclic lists sharing one panel: combat targets and attack actions.

use soulkeeper_core::InputSignal;
use tracing::debug;

use crate::{
    ensure_focused, first_selectable, valid_selection, Deferred, ItemId, NavContext, NavError,
    NavResult, Navigated, Panel, PanelId, SelectionHost, Wake,
};

const DEFAULT_FOCUS_THRESHOLD: f32 = 0.75;

/// Sub-list that currently receives directional input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DualList {
    /// Live enemies, ordered left to right on screen.
    #[default]
    Combat,
    /// Fixed attack actions.
    Actions,
}

/// Rule for choosing the selection after switching lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Always the first selectable entry.
    First,
    /// The selectable entry horizontally closest to the previous selection.
    #[default]
    NearestX,
}

/// Tunables of a [`DualListNavigation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualConfig {
    /// Axis magnitude a focus-change reading must reach.
    ///
    /// Readings at or above it activate the action list, readings at or below
    /// its negation activate the combat list.
    pub threshold: f32,
    /// Selection rule applied on each list switch.
    pub tie_break: TieBreak,
}

impl Default for DualConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FOCUS_THRESHOLD,
            tie_break: TieBreak::default(),
        }
    }
}

/// Panel toggling between a dynamic combat list and a fixed action list.
///
/// Both lists wrap around. The combat list is kept sorted by the horizontal
/// centre of each entry so that Left and Right follow screen order no matter
/// in which order enemies appear. A single selection pointer is shared by
/// both lists and recomputed whenever the active list changes.
#[derive(Debug)]
pub struct DualListNavigation {
    id: PanelId,
    config: DualConfig,
    combat: Vec<ItemId>,
    actions: Vec<ItemId>,
    active: DualList,
    selected: Option<ItemId>,
    open: bool,
}

impl DualListNavigation {
    /// Creates a closed panel with an empty combat list.
    #[must_use]
    pub fn new(id: PanelId, config: DualConfig, actions: Vec<ItemId>) -> Self {
        Self {
            id,
            config,
            combat: Vec::new(),
            actions,
            active: DualList::Combat,
            selected: None,
            open: false,
        }
    }

    /// Combat entries in screen order.
    #[must_use]
    pub fn combat(&self) -> &[ItemId] {
        &self.combat
    }

    /// Action entries in configured order.
    #[must_use]
    pub fn actions(&self) -> &[ItemId] {
        &self.actions
    }

    /// List currently receiving directional input.
    #[must_use]
    pub const fn active(&self) -> DualList {
        self.active
    }

    /// Entry the panel considers selected.
    #[must_use]
    pub const fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    fn active_items(&self) -> &[ItemId] {
        match self.active {
            DualList::Combat => &self.combat,
            DualList::Actions => &self.actions,
        }
    }

    /// Adds a freshly created combat entry and re-sorts the list by screen X.
    pub fn on_item_created(&mut self, item: ItemId, host: &dyn SelectionHost) {
        if self.combat.contains(&item) {
            return;
        }
        self.combat.push(item);
        self.combat
            .sort_by(|a, b| center_x(*a, host).total_cmp(&center_x(*b, host)));
    }

    /// Removes a combat entry whose owner was destroyed.
    ///
    /// When the entry was selected the selection is cleared, and the next
    /// directional input re-resolves from the start of the active list.
    pub fn on_item_removed(&mut self, item: ItemId, host: &mut dyn SelectionHost) -> bool {
        let before = self.combat.len();
        self.combat.retain(|listed| *listed != item);
        if self.selected == Some(item) {
            self.selected = None;
            if host.selected() == Some(item) {
                host.select(None);
            }
        }
        self.combat.len() != before
    }

    /// Moves one selectable entry through the active list, wrapping at both ends.
    ///
    /// At most one full lap is probed; if no entry is selectable the call is a
    /// no-op. Without a selection the first selectable entry is chosen.
    pub fn step(&mut self, forward: bool, host: &mut dyn SelectionHost) -> NavResult {
        let items = self.active_items();
        let len = items.len();
        if len == 0 {
            return Err(NavError::Empty);
        }

        let current = self
            .selected
            .and_then(|selected| items.iter().position(|item| *item == selected));
        let Some(index) = current else {
            let item = first_selectable(items, &*host)?;
            return Ok(self.select(Some(item), host));
        };

        let target = (1..=len)
            .map(|probe| {
                if forward {
                    (index + probe) % len
                } else {
                    (index + len - probe % len) % len
                }
            })
            .map(|candidate| items[candidate])
            .find(|item| host.is_selectable(*item))
            .ok_or(NavError::NoCandidate)?;
        Ok(self.select(Some(target), host))
    }

    /// Switches the active list according to a focus-change axis reading.
    pub fn change_focus(&mut self, axis: f32, host: &mut dyn SelectionHost) -> NavResult {
        let target = if axis >= self.config.threshold {
            DualList::Actions
        } else if axis <= -self.config.threshold {
            DualList::Combat
        } else {
            return Err(NavError::BelowThreshold(axis));
        };
        if target == self.active {
            return Err(NavError::Unchanged);
        }

        let anchor = self
            .selected
            .and_then(|selected| host.rect(selected))
            .map(|rect| rect.center().x);
        self.active = target;

        let mut candidates = self
            .active_items()
            .iter()
            .copied()
            .filter(|item| host.is_selectable(*item));
        let choice = match (self.config.tie_break, anchor) {
            (TieBreak::NearestX, Some(x)) => candidates.min_by(|a, b| {
                (center_x(*a, &*host) - x)
                    .abs()
                    .total_cmp(&(center_x(*b, &*host) - x).abs())
            }),
            _ => candidates.next(),
        };

        let _ = self.select(choice, host);
        debug!(panel = self.id.get(), list = ?target, "dual list switched");
        Ok(Navigated::ListChanged(target))
    }

    fn select(&mut self, item: Option<ItemId>, host: &mut dyn SelectionHost) -> Navigated {
        self.selected = item;
        host.select(item);
        match item {
            Some(item) => Navigated::Selected(item),
            None => Navigated::ListChanged(self.active),
        }
    }
}

fn center_x(item: ItemId, host: &dyn SelectionHost) -> f32 {
    host.rect(item)
        .map_or(f32::INFINITY, |rect| rect.center().x)
}

impl Panel for DualListNavigation {
    fn id(&self) -> PanelId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self, cx: &mut NavContext<'_>) -> NavResult {
        if self.open {
            return Err(NavError::Unchanged);
        }
        cx.focus.push(self.id)?;
        self.open = true;
        cx.scheduler
            .schedule(self.id, Deferred::InitialSelection, Wake::NextFrame);
        Ok(Navigated::Pending)
    }

    fn close(&mut self, cx: &mut NavContext<'_>) -> NavResult {
        if !self.open {
            return Err(NavError::Closed);
        }
        let _ = cx.focus.pop_panel(self.id)?;
        self.open = false;
        let _ = cx.scheduler.cancel_owner(self.id);
        if self.selected.is_some() && cx.host.selected() == self.selected {
            cx.host.select(None);
        }
        self.selected = None;
        Ok(Navigated::Closed(self.id))
    }

    fn handle_input(&mut self, signal: InputSignal, cx: &mut NavContext<'_>) -> NavResult {
        ensure_focused(self.id, cx.focus)?;
        if !self.open {
            return Err(NavError::Closed);
        }

        match signal {
            InputSignal::Left => self.step(false, cx.host),
            InputSignal::Right => self.step(true, cx.host),
            InputSignal::ChangeFocus(axis) => self.change_focus(axis, cx.host),
            InputSignal::Confirm => {
                let item = valid_selection(self.selected, &*cx.host)
                    .ok_or(NavError::NothingSelected)?;
                cx.host.submit(item);
                Ok(Navigated::Submitted(item))
            }
            InputSignal::Cancel => Ok(Navigated::CancelRequested(self.id)),
            InputSignal::Up | InputSignal::Down => Err(NavError::Unsupported),
        }
    }

    fn resume(&mut self, action: Deferred, cx: &mut NavContext<'_>) -> NavResult {
        if action != Deferred::InitialSelection {
            return Err(NavError::Unsupported);
        }
        if !self.open {
            return Err(NavError::Closed);
        }
        if let Some(item) = valid_selection(self.selected, &*cx.host) {
            return Ok(self.select(Some(item), cx.host));
        }
        let item = first_selectable(self.active_items(), &*cx.host)?;
        Ok(self.select(Some(item), cx.host))
    }

    fn restore(&mut self, cx: &mut NavContext<'_>) -> NavResult {
        if !self.open {
            return Err(NavError::Closed);
        }
        let item = valid_selection(self.selected, &*cx.host).ok_or(NavError::NothingSelected)?;
        Ok(self.select(Some(item), cx.host))
    }
}
