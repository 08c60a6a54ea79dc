//! Linear list navigation without wraparound.

use soulkeeper_core::InputSignal;

use crate::{
    ensure_focused, first_selectable, linear_step, valid_selection, Deferred, Direction,
    ItemId, NavContext, NavError, NavResult, Navigated, Panel, PanelId, SelectionHost, Wake,
};

/// Orientation deciding which directions step through a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListAxis {
    /// Up steps backward and Down steps forward.
    #[default]
    Vertical,
    /// Left steps backward and Right steps forward.
    Horizontal,
}

/// Behaviour switches for a [`ListNavigation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListConfig {
    /// Orientation of the list.
    pub axis: ListAxis,
    /// Keep the previous selection when reopened, if it is still valid.
    pub remember_selection: bool,
    /// Close the panel when Cancel is pressed.
    pub close_on_cancel: bool,
}

/// Panel navigating an ordered list of items one selectable step at a time.
///
/// Inactive and non-interactable items are skipped. Stepping past either end
/// is a no-op.
#[derive(Debug)]
pub struct ListNavigation {
    id: PanelId,
    config: ListConfig,
    items: Vec<ItemId>,
    selected: Option<ItemId>,
    open: bool,
}

impl ListNavigation {
    /// Creates a closed list panel over the provided items.
    #[must_use]
    pub fn new(id: PanelId, config: ListConfig, items: Vec<ItemId>) -> Self {
        Self {
            id,
            config,
            items,
            selected: None,
            open: false,
        }
    }

    /// Items in navigation order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Item the panel considers selected.
    #[must_use]
    pub const fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Replaces the items, dropping the selection if it is no longer listed.
    pub fn set_items(&mut self, items: Vec<ItemId>) {
        self.items = items;
        if self
            .selected
            .is_some_and(|selected| !self.items.contains(&selected))
        {
            self.selected = None;
        }
    }

    /// Removes an item that was destroyed elsewhere.
    pub fn remove_item(&mut self, item: ItemId, host: &mut dyn SelectionHost) -> bool {
        let before = self.items.len();
        self.items.retain(|listed| *listed != item);
        if self.selected == Some(item) {
            self.selected = None;
            if host.selected() == Some(item) {
                host.select(None);
            }
        }
        self.items.len() != before
    }

    /// Selects the next selectable item after the current one.
    ///
    /// Without a selection this picks the first selectable item instead.
    pub fn next(&mut self, host: &mut dyn SelectionHost) -> NavResult {
        self.step(true, host)
    }

    /// Selects the previous selectable item before the current one.
    ///
    /// Without a selection this picks the first selectable item instead.
    pub fn previous(&mut self, host: &mut dyn SelectionHost) -> NavResult {
        self.step(false, host)
    }

    fn step(&mut self, forward: bool, host: &mut dyn SelectionHost) -> NavResult {
        let current = self
            .selected
            .and_then(|selected| self.items.iter().position(|item| *item == selected));
        let target = match current {
            Some(index) => linear_step(&self.items, index, forward, &*host)?,
            None => first_selectable(&self.items, &*host)?,
        };
        Ok(self.select(target, host))
    }

    fn select(&mut self, item: ItemId, host: &mut dyn SelectionHost) -> Navigated {
        self.selected = Some(item);
        host.select(Some(item));
        Navigated::Selected(item)
    }

    fn direction_step(&mut self, direction: Direction, host: &mut dyn SelectionHost) -> NavResult {
        match (self.config.axis, direction) {
            (ListAxis::Vertical, Direction::Up) | (ListAxis::Horizontal, Direction::Left) => {
                self.previous(host)
            }
            (ListAxis::Vertical, Direction::Down) | (ListAxis::Horizontal, Direction::Right) => {
                self.next(host)
            }
            _ => Err(NavError::Unsupported),
        }
    }
}

impl Panel for ListNavigation {
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
        if cx
            .host
            .selected()
            .is_some_and(|selected| self.items.contains(&selected))
        {
            cx.host.select(None);
        }
        if !self.config.remember_selection {
            self.selected = None;
        }
        Ok(Navigated::Closed(self.id))
    }

    fn handle_input(&mut self, signal: InputSignal, cx: &mut NavContext<'_>) -> NavResult {
        ensure_focused(self.id, cx.focus)?;
        if !self.open {
            return Err(NavError::Closed);
        }

        if let Some(direction) = Direction::from_signal(signal) {
            return self.direction_step(direction, cx.host);
        }

        match signal {
            InputSignal::Confirm => {
                let item = valid_selection(self.selected, &*cx.host)
                    .ok_or(NavError::NothingSelected)?;
                cx.host.submit(item);
                Ok(Navigated::Submitted(item))
            }
            InputSignal::Cancel if self.config.close_on_cancel => self.close(cx),
            _ => Err(NavError::Unsupported),
        }
    }

    fn resume(&mut self, action: Deferred, cx: &mut NavContext<'_>) -> NavResult {
        if action != Deferred::InitialSelection {
            return Err(NavError::Unsupported);
        }
        if !self.open {
            return Err(NavError::Closed);
        }

        let remembered = if self.config.remember_selection {
            valid_selection(self.selected, &*cx.host)
        } else {
            None
        };
        let target = match remembered {
            Some(item) => item,
            None => first_selectable(&self.items, &*cx.host)?,
        };
        Ok(self.select(target, cx.host))
    }

    fn restore(&mut self, cx: &mut NavContext<'_>) -> NavResult {
        if !self.open {
            return Err(NavError::Closed);
        }
        let item = valid_selection(self.selected, &*cx.host).ok_or(NavError::NothingSelected)?;
        Ok(self.select(item, cx.host))
    }
}
