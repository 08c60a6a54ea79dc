//! Grid navigation with an action menu and automatic scrolling.

use soulkeeper_core::{InputButton, InputSignal};
use tracing::debug;

use crate::{
    ensure_focused, first_selectable, linear_step, valid_selection, Deferred, Direction,
    ItemId, NavContext, NavError, NavResult, Navigated, Panel, PanelId, ScrollViewport,
    SelectionHost, Wake,
};

/// Collaborator that supplies the grid's current entries.
pub trait EntrySource {
    /// Controls to lay out in the grid, in row-major order.
    fn selectable_entries(&self) -> Vec<ItemId>;
}

/// Which controls the grid is currently navigating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridMode {
    /// Moving between grid cells.
    #[default]
    Grid,
    /// Moving through the action menu of the selected cell.
    Action,
}

/// Layout and action menu of a [`GridNavigation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of cells per row; zero is treated as one.
    pub columns: usize,
    /// Controls of the action menu, top to bottom.
    pub actions: Vec<ItemId>,
}

/// Panel navigating items laid out in rows of fixed width.
///
/// Cell `i` sits at row `i / columns`, column `i % columns`. Movement never
/// wraps. Confirm opens the action menu once the confirm button is released;
/// Cancel backs out of the menu, then out of the panel.
#[derive(Debug)]
pub struct GridNavigation {
    id: PanelId,
    columns: usize,
    items: Vec<ItemId>,
    actions: Vec<ItemId>,
    selected: Option<ItemId>,
    action_selected: Option<ItemId>,
    mode: GridMode,
    viewport: ScrollViewport,
    open: bool,
}

impl GridNavigation {
    /// Creates a closed grid panel with no items.
    #[must_use]
    pub fn new(id: PanelId, config: GridConfig, viewport: ScrollViewport) -> Self {
        Self {
            id,
            columns: config.columns.max(1),
            items: Vec::new(),
            actions: config.actions,
            selected: None,
            action_selected: None,
            mode: GridMode::Grid,
            viewport,
            open: false,
        }
    }

    /// Items in row-major order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Selected grid cell.
    #[must_use]
    pub const fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Selected action while the action menu is open.
    #[must_use]
    pub const fn action_selected(&self) -> Option<ItemId> {
        self.action_selected
    }

    /// Current navigation mode.
    #[must_use]
    pub const fn mode(&self) -> GridMode {
        self.mode
    }

    /// Scroll state of the grid's viewport.
    #[must_use]
    pub const fn viewport(&self) -> &ScrollViewport {
        &self.viewport
    }

    /// Row and column of the selected cell.
    #[must_use]
    pub fn selected_cell(&self) -> Option<(usize, usize)> {
        self.selected_index()
            .map(|index| (index / self.columns, index % self.columns))
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected?;
        self.items.iter().position(|item| *item == selected)
    }

    /// Re-fetches the entries and returns the grid to cell navigation.
    ///
    /// The selection survives when its item is still listed; otherwise it
    /// falls back to the cell at the previous index, then to the first
    /// selectable cell.
    pub fn refresh(&mut self, source: &dyn EntrySource, cx: &mut NavContext<'_>) -> NavResult {
        let _ = cx.scheduler.cancel(self.id, Deferred::EnterActionMode);
        self.mode = GridMode::Grid;
        self.action_selected = None;

        let previous_index = self.selected_index();
        self.items = source.selectable_entries();

        let kept = valid_selection(self.selected, &*cx.host)
            .filter(|selected| self.items.contains(selected));
        let clamped = previous_index
            .and_then(|index| self.items.get(index.min(self.items.len().saturating_sub(1))))
            .copied()
            .filter(|item| cx.host.is_selectable(*item));
        let resolved = match kept.or(clamped) {
            Some(item) => Ok(item),
            None => first_selectable(&self.items, &*cx.host),
        };

        match resolved {
            Ok(item) => {
                self.selected = Some(item);
                if self.open && cx.focus.is_top(self.id) {
                    let _ = self.show_cell(item, cx.host);
                }
                Ok(Navigated::Selected(item))
            }
            Err(error) => {
                self.selected = None;
                if self.open && cx.focus.is_top(self.id) {
                    cx.host.select(None);
                }
                Err(error)
            }
        }
    }

    /// Moves the selection within the current mode.
    pub fn move_selection(
        &mut self,
        direction: Direction,
        host: &mut dyn SelectionHost,
    ) -> NavResult {
        match self.mode {
            GridMode::Grid => self.move_cell(direction, host),
            GridMode::Action => self.move_action(direction, host),
        }
    }

    fn move_cell(&mut self, direction: Direction, host: &mut dyn SelectionHost) -> NavResult {
        let Some(index) = self.selected_index() else {
            let item = first_selectable(&self.items, &*host)?;
            return Ok(self.show_cell(item, host));
        };

        let columns = self.columns;
        let len = self.items.len();
        let (row, column) = (index / columns, index % columns);
        let target = match direction {
            Direction::Up => (row > 0).then(|| index - columns),
            Direction::Down => Some(index + columns).filter(|target| *target < len),
            Direction::Left => (column > 0).then(|| index - 1),
            Direction::Right => {
                Some(index + 1).filter(|target| column + 1 < columns && *target < len)
            }
        }
        .ok_or(NavError::Boundary)?;

        let item = self.items[target];
        if !host.is_selectable(item) {
            return Err(NavError::NoCandidate);
        }
        Ok(self.show_cell(item, host))
    }

    fn move_action(&mut self, direction: Direction, host: &mut dyn SelectionHost) -> NavResult {
        let forward = match direction {
            Direction::Up => false,
            Direction::Down => true,
            Direction::Left | Direction::Right => return Err(NavError::Unsupported),
        };
        let current = self
            .action_selected
            .and_then(|selected| self.actions.iter().position(|item| *item == selected));
        let target = match current {
            Some(index) => linear_step(&self.actions, index, forward, &*host)?,
            None => first_selectable(&self.actions, &*host)?,
        };
        self.action_selected = Some(target);
        host.select(Some(target));
        Ok(Navigated::Selected(target))
    }

    fn show_cell(&mut self, item: ItemId, host: &mut dyn SelectionHost) -> Navigated {
        self.selected = Some(item);
        host.select(Some(item));
        if let Some(rect) = host.rect(item) {
            if let Some(delta) = self.viewport.scroll_into_view(&rect) {
                debug!(panel = self.id.get(), dx = delta.x, dy = delta.y, "grid scrolled");
            }
        }
        Navigated::Selected(item)
    }

    fn enter_action_mode(&mut self, cx: &mut NavContext<'_>) -> NavResult {
        if !self.open {
            return Err(NavError::Closed);
        }
        if self.mode == GridMode::Action {
            return Err(NavError::Unchanged);
        }
        let _ = valid_selection(self.selected, &*cx.host).ok_or(NavError::NothingSelected)?;
        let action = first_selectable(&self.actions, &*cx.host)?;

        self.mode = GridMode::Action;
        self.action_selected = Some(action);
        if cx.focus.is_top(self.id) {
            cx.host.select(Some(action));
        }
        debug!(panel = self.id.get(), "grid entered action mode");
        Ok(Navigated::ModeChanged(GridMode::Action))
    }

    fn leave_action_mode(&mut self, host: &mut dyn SelectionHost) -> NavResult {
        self.mode = GridMode::Grid;
        self.action_selected = None;
        match valid_selection(self.selected, &*host) {
            Some(item) => {
                let _ = self.show_cell(item, host);
            }
            None => {
                self.selected = None;
                host.select(None);
            }
        }
        Ok(Navigated::ModeChanged(GridMode::Grid))
    }
}

impl Panel for GridNavigation {
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
        self.mode = GridMode::Grid;
        self.viewport.reset();
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
        let owned = cx.host.selected().is_some_and(|selected| {
            self.items.contains(&selected) || self.actions.contains(&selected)
        });
        if owned {
            cx.host.select(None);
        }
        self.mode = GridMode::Grid;
        self.selected = None;
        self.action_selected = None;
        Ok(Navigated::Closed(self.id))
    }

    fn handle_input(&mut self, signal: InputSignal, cx: &mut NavContext<'_>) -> NavResult {
        ensure_focused(self.id, cx.focus)?;
        if !self.open {
            return Err(NavError::Closed);
        }

        if let Some(direction) = Direction::from_signal(signal) {
            return self.move_selection(direction, cx.host);
        }

        match (self.mode, signal) {
            (GridMode::Grid, InputSignal::Confirm) => {
                let _ = valid_selection(self.selected, &*cx.host)
                    .ok_or(NavError::NothingSelected)?;
                cx.scheduler.schedule(
                    self.id,
                    Deferred::EnterActionMode,
                    Wake::Released(InputButton::Confirm),
                );
                Ok(Navigated::Pending)
            }
            (GridMode::Action, InputSignal::Confirm) => {
                let item = valid_selection(self.selected, &*cx.host)
                    .ok_or(NavError::NothingSelected)?;
                let action = valid_selection(self.action_selected, &*cx.host)
                    .ok_or(NavError::NothingSelected)?;
                cx.host.submit(action);
                Ok(Navigated::Invoked { item, action })
            }
            (GridMode::Action, InputSignal::Cancel) => self.leave_action_mode(cx.host),
            (GridMode::Grid, InputSignal::Cancel) => self.close(cx),
            _ => Err(NavError::Unsupported),
        }
    }

    fn resume(&mut self, action: Deferred, cx: &mut NavContext<'_>) -> NavResult {
        match action {
            Deferred::EnterActionMode => self.enter_action_mode(cx),
            Deferred::InitialSelection => {
                if !self.open {
                    return Err(NavError::Closed);
                }
                let item = first_selectable(&self.items, &*cx.host)?;
                Ok(self.show_cell(item, cx.host))
            }
        }
    }

    fn restore(&mut self, cx: &mut NavContext<'_>) -> NavResult {
        if !self.open {
            return Err(NavError::Closed);
        }
        let target = match self.mode {
            GridMode::Grid => self.selected,
            GridMode::Action => self.action_selected,
        };
        let item = valid_selection(target, &*cx.host).ok_or(NavError::NothingSelected)?;
        cx.host.select(Some(item));
        Ok(Navigated::Selected(item))
    }
}
