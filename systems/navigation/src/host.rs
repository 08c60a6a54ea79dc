//! Seam between navigation panels and the toolkit that renders controls.

use std::collections::BTreeMap;

use soulkeeper_core::ScreenRect;

use crate::ItemId;

/// Toolkit adapter that owns controls and the current focused selection.
pub trait SelectionHost {
    /// Moves the focused selection to the item, or clears it.
    fn select(&mut self, item: Option<ItemId>);

    /// Item that currently holds the focused selection.
    fn selected(&self) -> Option<ItemId>;

    /// Reports whether the item exists, is active and is interactable.
    fn is_selectable(&self, item: ItemId) -> bool;

    /// Layout rectangle of the item, if it exists.
    fn rect(&self, item: ItemId) -> Option<ScreenRect>;

    /// Triggers the item's primary action, like a submit event on a button.
    fn submit(&mut self, item: ItemId);
}

/// Selectable control bound to the domain object it represents.
#[derive(Clone, Debug, PartialEq)]
pub struct Control<B> {
    binding: B,
    rect: ScreenRect,
    active: bool,
    interactable: bool,
}

impl<B> Control<B> {
    /// Domain object the control stands for.
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Layout rectangle of the control.
    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    /// Reports whether the control is active and interactable.
    pub fn is_selectable(&self) -> bool {
        self.active && self.interactable
    }
}

/// In-memory selection host used by headless sessions.
///
/// Submissions are recorded rather than dispatched; the owner drains them with
/// [`MemoryHost::take_submitted`] and maps each binding to domain work.
#[derive(Debug)]
pub struct MemoryHost<B> {
    controls: BTreeMap<ItemId, Control<B>>,
    selected: Option<ItemId>,
    submitted: Vec<ItemId>,
    next_item_id: ItemId,
}

impl<B> Default for MemoryHost<B> {
    fn default() -> Self {
        Self {
            controls: BTreeMap::new(),
            selected: None,
            submitted: Vec::new(),
            next_item_id: ItemId::new(0),
        }
    }
}

impl<B> MemoryHost<B> {
    /// Creates a host without controls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an active, interactable control and returns its identifier.
    pub fn spawn(&mut self, binding: B, rect: ScreenRect) -> ItemId {
        let id = self.next_item_id;
        self.next_item_id = ItemId::new(id.get().wrapping_add(1));
        let _ = self.controls.insert(
            id,
            Control {
                binding,
                rect,
                active: true,
                interactable: true,
            },
        );
        id
    }

    /// Destroys a control, clearing the selection if it pointed at it.
    pub fn despawn(&mut self, item: ItemId) -> Option<B> {
        let control = self.controls.remove(&item)?;
        if self.selected == Some(item) {
            self.selected = None;
        }
        self.submitted.retain(|submitted| *submitted != item);
        Some(control.binding)
    }

    /// Shows or hides a control.
    pub fn set_active(&mut self, item: ItemId, active: bool) {
        if let Some(control) = self.controls.get_mut(&item) {
            control.active = active;
        }
    }

    /// Enables or disables interaction with a control.
    pub fn set_interactable(&mut self, item: ItemId, interactable: bool) {
        if let Some(control) = self.controls.get_mut(&item) {
            control.interactable = interactable;
        }
    }

    /// Moves a control to a new layout rectangle.
    pub fn set_rect(&mut self, item: ItemId, rect: ScreenRect) {
        if let Some(control) = self.controls.get_mut(&item) {
            control.rect = rect;
        }
    }

    /// Looks up a control.
    #[must_use]
    pub fn control(&self, item: ItemId) -> Option<&Control<B>> {
        self.controls.get(&item)
    }

    /// Domain object bound to a control.
    #[must_use]
    pub fn binding(&self, item: ItemId) -> Option<&B> {
        self.controls.get(&item).map(Control::binding)
    }

    /// Finds the first control whose binding satisfies the predicate.
    pub fn find(&self, mut predicate: impl FnMut(&B) -> bool) -> Option<ItemId> {
        self.controls
            .iter()
            .find(|(_, control)| predicate(&control.binding))
            .map(|(id, _)| *id)
    }

    /// Takes the controls submitted since the last call, oldest first.
    pub fn take_submitted(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.submitted)
    }

    /// Number of live controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Reports whether the host holds no controls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

impl<B> SelectionHost for MemoryHost<B> {
    fn select(&mut self, item: Option<ItemId>) {
        self.selected = item.filter(|id| self.controls.contains_key(id));
    }

    fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    fn is_selectable(&self, item: ItemId) -> bool {
        self.controls
            .get(&item)
            .is_some_and(Control::is_selectable)
    }

    fn rect(&self, item: ItemId) -> Option<ScreenRect> {
        self.controls.get(&item).map(Control::rect)
    }

    fn submit(&mut self, item: ItemId) {
        if self.is_selectable(item) {
            self.submitted.push(item);
        }
    }
}
