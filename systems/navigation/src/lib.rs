#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Focus-stack driven navigation for Soulkeeper panels.
//!
//! Every navigable surface is a [`Panel`]. All panels listen to the same
//! input stream, but a panel only reacts when it sits on top of the shared
//! [`FocusStack`]. Panels own their selection state and drive a
//! [`SelectionHost`], the thin seam over whatever toolkit renders controls.
//! Work that has to wait for layout to settle or for a button to be released
//! is queued on the [`Scheduler`] and resumed through [`Panel::resume`], where
//! the panel re-validates its state before acting.
//!
//! Navigation never fails loudly. Every operation returns a [`NavResult`];
//! an [`Err`] means the input was a no-op and state is unchanged.

mod deferred;
mod dual;
mod focus;
mod grid;
mod host;
mod list;
mod scroll;

use soulkeeper_core::InputSignal;
use thiserror::Error;

pub use self::{
    deferred::{Deferred, Due, Scheduler, Wake},
    dual::{DualConfig, DualList, DualListNavigation, TieBreak},
    focus::{FocusError, FocusStack},
    grid::{EntrySource, GridConfig, GridMode, GridNavigation},
    host::{Control, MemoryHost, SelectionHost},
    list::{ListAxis, ListConfig, ListNavigation},
    scroll::ScrollViewport,
};

/// Identifier of a navigable panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u32);

impl PanelId {
    /// Creates a new panel identifier with the provided numeric value.
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

/// Identifier of a selectable control owned by a [`SelectionHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
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

/// Directional component of an input signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    Down,
    /// Toward the left of the screen.
    Left,
    /// Toward the right of the screen.
    Right,
}

impl Direction {
    /// Extracts the direction carried by a signal, if any.
    #[must_use]
    pub const fn from_signal(signal: InputSignal) -> Option<Self> {
        match signal {
            InputSignal::Up => Some(Self::Up),
            InputSignal::Down => Some(Self::Down),
            InputSignal::Left => Some(Self::Left),
            InputSignal::Right => Some(Self::Right),
            _ => None,
        }
    }
}

/// Successful navigation transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigated {
    /// The selection moved to the item.
    Selected(ItemId),
    /// The selected item's primary action was triggered.
    Submitted(ItemId),
    /// The transition was queued on the scheduler.
    Pending,
    /// The grid switched navigation mode.
    ModeChanged(GridMode),
    /// The dual-list panel switched its active list.
    ListChanged(DualList),
    /// An action from the grid's action menu was invoked on a grid item.
    Invoked {
        /// Grid item the action applies to.
        item: ItemId,
        /// Action control that was invoked.
        action: ItemId,
    },
    /// The panel closed and left the focus stack.
    Closed(PanelId),
    /// The panel cannot back out further and defers cancel to its owner.
    CancelRequested(PanelId),
}

/// Reasons a navigation request was a no-op.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum NavError {
    /// Another panel owns input focus.
    #[error("panel does not own input focus")]
    NotFocused,
    /// The panel is not open.
    #[error("panel is closed")]
    Closed,
    /// The panel has no items to navigate.
    #[error("panel has no items")]
    Empty,
    /// The selection already sits on the boundary in the requested direction.
    #[error("selection is at the boundary")]
    Boundary,
    /// No active and interactable item can take the selection.
    #[error("no selectable item found")]
    NoCandidate,
    /// The operation needs a valid selection and there is none.
    #[error("nothing is selected")]
    NothingSelected,
    /// A focus-change axis reading did not reach the configured threshold.
    #[error("axis value {0} is below the focus-change threshold")]
    BelowThreshold(f32),
    /// The requested state is already active.
    #[error("state is unchanged")]
    Unchanged,
    /// The panel does not react to this input.
    #[error("input is not handled by this panel")]
    Unsupported,
    /// The focus stack refused the operation.
    #[error(transparent)]
    Focus(#[from] FocusError),
}

/// Outcome of every navigation operation.
pub type NavResult = Result<Navigated, NavError>;

/// Shared services handed to a panel while it handles input.
pub struct NavContext<'a> {
    /// Stack deciding which panel owns input.
    pub focus: &'a mut FocusStack,
    /// Toolkit adapter that renders and activates controls.
    pub host: &'a mut dyn SelectionHost,
    /// Queue of deferred panel actions.
    pub scheduler: &'a mut Scheduler,
}

/// Navigable surface participating in the focus stack.
pub trait Panel {
    /// Identifier of the panel.
    fn id(&self) -> PanelId;

    /// Reports whether the panel is currently open.
    fn is_open(&self) -> bool;

    /// Shows the panel, takes input focus and queues the initial selection.
    fn open(&mut self, cx: &mut NavContext<'_>) -> NavResult;

    /// Hides the panel, releases input focus and cancels its deferred work.
    fn close(&mut self, cx: &mut NavContext<'_>) -> NavResult;

    /// Reacts to an input signal when the panel owns focus.
    fn handle_input(&mut self, signal: InputSignal, cx: &mut NavContext<'_>) -> NavResult;

    /// Continues a deferred action queued by this panel.
    fn resume(&mut self, action: Deferred, cx: &mut NavContext<'_>) -> NavResult;

    /// Re-applies the panel's selection to the host after focus returns to it.
    fn restore(&mut self, cx: &mut NavContext<'_>) -> NavResult;
}

fn ensure_focused(panel: PanelId, focus: &FocusStack) -> Result<(), NavError> {
    if focus.is_top(panel) {
        Ok(())
    } else {
        Err(NavError::NotFocused)
    }
}

fn first_selectable(items: &[ItemId], host: &dyn SelectionHost) -> Result<ItemId, NavError> {
    if items.is_empty() {
        return Err(NavError::Empty);
    }
    items
        .iter()
        .copied()
        .find(|item| host.is_selectable(*item))
        .ok_or(NavError::NoCandidate)
}

fn valid_selection(selected: Option<ItemId>, host: &dyn SelectionHost) -> Option<ItemId> {
    selected.filter(|item| host.is_selectable(*item))
}

/// Moves a linear selection one selectable step without wrapping.
fn linear_step(
    items: &[ItemId],
    current: usize,
    forward: bool,
    host: &dyn SelectionHost,
) -> Result<ItemId, NavError> {
    let found = if forward {
        items
            .iter()
            .skip(current + 1)
            .copied()
            .find(|item| host.is_selectable(*item))
    } else {
        items
            .iter()
            .take(current)
            .rev()
            .copied()
            .find(|item| host.is_selectable(*item))
    };
    found.ok_or(NavError::Boundary)
}
