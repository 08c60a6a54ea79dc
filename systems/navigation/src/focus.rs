//! Last-in-first-out stack deciding which panel owns input.

use thiserror::Error;

use crate::PanelId;

/// Reasons the focus stack refused a change.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FocusError {
    /// The stack holds no panel.
    #[error("focus stack is empty")]
    Empty,
    /// Popping would remove the base panel.
    #[error("the base panel cannot leave the focus stack")]
    BaseRetained,
    /// The panel already owns focus.
    #[error("panel {} already owns focus", .0.get())]
    AlreadyOnTop(PanelId),
    /// The panel asked to leave the stack while another panel owns focus.
    #[error("panel {} does not own focus", .0.get())]
    NotOnTop(PanelId),
}

/// Guarded focus stack: once a panel is pushed the stack never empties.
///
/// The top entry is the only panel eligible to react to input. Handlers call
/// [`FocusStack::is_top`] with their own identifier before acting.
#[derive(Debug, Default)]
pub struct FocusStack {
    panels: Vec<PanelId>,
}

impl FocusStack {
    /// Creates an empty focus stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives input focus to the panel.
    pub fn push(&mut self, panel: PanelId) -> Result<(), FocusError> {
        if self.top() == Some(panel) {
            return Err(FocusError::AlreadyOnTop(panel));
        }
        self.panels.push(panel);
        Ok(())
    }

    /// Removes the top panel, refusing to remove the last remaining one.
    pub fn pop(&mut self) -> Result<PanelId, FocusError> {
        match self.panels.len() {
            0 => Err(FocusError::Empty),
            1 => Err(FocusError::BaseRetained),
            _ => self.panels.pop().ok_or(FocusError::Empty),
        }
    }

    /// Removes the panel only when it currently owns focus.
    pub fn pop_panel(&mut self, panel: PanelId) -> Result<PanelId, FocusError> {
        match self.top() {
            None => Err(FocusError::Empty),
            Some(top) if top != panel => Err(FocusError::NotOnTop(panel)),
            Some(_) => self.pop(),
        }
    }

    /// Panel currently receiving input, if any.
    #[must_use]
    pub fn top(&self) -> Option<PanelId> {
        self.panels.last().copied()
    }

    /// Reports whether the panel currently receives input.
    #[must_use]
    pub fn is_top(&self, panel: PanelId) -> bool {
        self.top() == Some(panel)
    }

    /// Reports whether the panel is anywhere on the stack.
    #[must_use]
    pub fn contains(&self, panel: PanelId) -> bool {
        self.panels.contains(&panel)
    }

    /// Number of stacked panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Reports whether no panel owns focus.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
