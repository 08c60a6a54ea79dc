use std::time::Duration;

use glam::Vec2;
use soulkeeper_core::{InputSignal, ScreenRect};
use soulkeeper_system_navigation::{
    DualConfig, DualList, DualListNavigation, FocusStack, ItemId, MemoryHost, NavContext,
    NavError, Navigated, Panel, PanelId, Scheduler, SelectionHost, TieBreak,
};

const FRAME: Duration = Duration::from_millis(16);
const GAMEPLAY: PanelId = PanelId::new(0);
const CONTROL_SIZE: Vec2 = Vec2::new(60.0, 40.0);

struct Harness {
    focus: FocusStack,
    host: MemoryHost<&'static str>,
    scheduler: Scheduler,
    actions: Vec<ItemId>,
}

impl Harness {
    fn new(action_x: &[f32]) -> Self {
        let mut host = MemoryHost::new();
        let actions = action_x
            .iter()
            .map(|x| host.spawn("action", ScreenRect::centered(Vec2::new(*x, 500.0), CONTROL_SIZE)))
            .collect();
        Self {
            focus: FocusStack::new(),
            host,
            scheduler: Scheduler::new(),
            actions,
        }
    }

    fn cx(&mut self) -> NavContext<'_> {
        NavContext {
            focus: &mut self.focus,
            host: &mut self.host,
            scheduler: &mut self.scheduler,
        }
    }

    fn panel(&self, tie_break: TieBreak) -> DualListNavigation {
        DualListNavigation::new(
            GAMEPLAY,
            DualConfig {
                tie_break,
                ..DualConfig::default()
            },
            self.actions.clone(),
        )
    }

    fn spawn_enemy(&mut self, panel: &mut DualListNavigation, x: f32) -> ItemId {
        let item = self
            .host
            .spawn("enemy", ScreenRect::centered(Vec2::new(x, 120.0), CONTROL_SIZE));
        panel.on_item_created(item, &self.host);
        item
    }

    fn open(&mut self, panel: &mut DualListNavigation) -> Vec<Result<Navigated, NavError>> {
        assert_eq!(panel.open(&mut self.cx()), Ok(Navigated::Pending));
        let due = self.scheduler.advance(FRAME, &[]);
        due.into_iter()
            .map(|due| panel.resume(due.action, &mut self.cx()))
            .collect()
    }

    fn press(&mut self, panel: &mut DualListNavigation, signal: InputSignal) -> Result<Navigated, NavError> {
        panel.handle_input(signal, &mut self.cx())
    }
}

#[test]
fn combat_list_follows_screen_order_not_spawn_order() {
    let mut harness = Harness::new(&[160.0, 480.0, 800.0]);
    let mut panel = harness.panel(TieBreak::NearestX);

    let right = harness.spawn_enemy(&mut panel, 800.0);
    let left = harness.spawn_enemy(&mut panel, 160.0);
    let middle = harness.spawn_enemy(&mut panel, 480.0);

    assert_eq!(panel.combat(), &[left, middle, right]);
}

#[test]
fn opening_selects_the_leftmost_enemy_on_the_next_frame() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let right = harness.spawn_enemy(&mut panel, 700.0);
    let left = harness.spawn_enemy(&mut panel, 100.0);

    assert_eq!(harness.open(&mut panel), vec![Ok(Navigated::Selected(left))]);
    assert_ne!(harness.host.selected(), Some(right));
    assert_eq!(harness.host.selected(), Some(left));
}

#[test]
fn stepping_wraps_in_both_directions() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let first = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.spawn_enemy(&mut panel, 300.0);
    let last = harness.spawn_enemy(&mut panel, 500.0);
    let _ = harness.open(&mut panel);

    assert_eq!(harness.press(&mut panel, InputSignal::Left), Ok(Navigated::Selected(last)));
    assert_eq!(harness.press(&mut panel, InputSignal::Right), Ok(Navigated::Selected(first)));
}

#[test]
fn a_full_lap_returns_to_the_start() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    for x in [100.0, 220.0, 340.0, 460.0, 580.0] {
        let _ = harness.spawn_enemy(&mut panel, x);
    }
    let _ = harness.open(&mut panel);
    let _ = harness.press(&mut panel, InputSignal::Right);
    let start = panel.selected();
    let len = panel.combat().len();

    for _ in 0..len {
        let _ = harness.press(&mut panel, InputSignal::Right);
    }
    assert_eq!(panel.selected(), start);
    for _ in 0..len {
        let _ = harness.press(&mut panel, InputSignal::Left);
    }
    assert_eq!(panel.selected(), start);
}

#[test]
fn stepping_skips_entries_that_cannot_be_selected() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let first = harness.spawn_enemy(&mut panel, 100.0);
    let hidden = harness.spawn_enemy(&mut panel, 300.0);
    let last = harness.spawn_enemy(&mut panel, 500.0);
    harness.host.set_active(hidden, false);
    let _ = harness.open(&mut panel);

    assert_eq!(harness.press(&mut panel, InputSignal::Right), Ok(Navigated::Selected(last)));
    assert_eq!(harness.press(&mut panel, InputSignal::Right), Ok(Navigated::Selected(first)));
}

#[test]
fn a_lone_selectable_entry_keeps_the_selection() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let only = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.open(&mut panel);

    assert_eq!(harness.press(&mut panel, InputSignal::Right), Ok(Navigated::Selected(only)));
    assert_eq!(harness.press(&mut panel, InputSignal::Left), Ok(Navigated::Selected(only)));
}

#[test]
fn removing_the_selected_enemy_clears_selection_and_keeps_order() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let left = harness.spawn_enemy(&mut panel, 100.0);
    let middle = harness.spawn_enemy(&mut panel, 300.0);
    let right = harness.spawn_enemy(&mut panel, 500.0);
    let _ = harness.open(&mut panel);
    let _ = harness.press(&mut panel, InputSignal::Right);
    assert_eq!(panel.selected(), Some(middle));

    assert!(panel.on_item_removed(middle, &mut harness.host));
    let _ = harness.host.despawn(middle);

    assert_eq!(panel.combat(), &[left, right]);
    assert_eq!(panel.selected(), None);
    assert_eq!(harness.host.selected(), None);
    assert_eq!(harness.press(&mut panel, InputSignal::Right), Ok(Navigated::Selected(left)));
}

#[test]
fn removing_an_unlisted_item_is_a_no_op() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let enemy = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.open(&mut panel);

    assert!(!panel.on_item_removed(ItemId::new(99), &mut harness.host));
    assert_eq!(panel.selected(), Some(enemy));
}

#[test]
fn focus_changes_need_the_axis_threshold() {
    let mut harness = Harness::new(&[160.0, 480.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let _ = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.open(&mut panel);

    assert_eq!(
        harness.press(&mut panel, InputSignal::ChangeFocus(0.5)),
        Err(NavError::BelowThreshold(0.5))
    );
    assert_eq!(panel.active(), DualList::Combat);

    assert_eq!(
        harness.press(&mut panel, InputSignal::ChangeFocus(0.75)),
        Ok(Navigated::ListChanged(DualList::Actions))
    );
    assert_eq!(
        harness.press(&mut panel, InputSignal::ChangeFocus(1.0)),
        Err(NavError::Unchanged)
    );
    assert_eq!(
        harness.press(&mut panel, InputSignal::ChangeFocus(-0.9)),
        Ok(Navigated::ListChanged(DualList::Combat))
    );
}

#[test]
fn switching_lists_picks_the_horizontally_nearest_entry() {
    let mut harness = Harness::new(&[160.0, 480.0, 800.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let _ = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.spawn_enemy(&mut panel, 300.0);
    let far_right = harness.spawn_enemy(&mut panel, 520.0);
    let _ = harness.open(&mut panel);
    let _ = harness.press(&mut panel, InputSignal::Left);
    assert_eq!(panel.selected(), Some(far_right));

    let _ = harness.press(&mut panel, InputSignal::ChangeFocus(1.0));
    assert_eq!(panel.selected(), Some(harness.actions[1]));
    assert_eq!(harness.host.selected(), Some(harness.actions[1]));

    let _ = harness.press(&mut panel, InputSignal::Right);
    let _ = harness.press(&mut panel, InputSignal::ChangeFocus(-1.0));
    assert_eq!(panel.selected(), Some(far_right));
}

#[test]
fn equally_near_entries_resolve_to_the_first() {
    let mut harness = Harness::new(&[100.0, 300.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let _ = harness.spawn_enemy(&mut panel, 200.0);
    let _ = harness.open(&mut panel);

    let _ = harness.press(&mut panel, InputSignal::ChangeFocus(1.0));
    assert_eq!(panel.selected(), Some(harness.actions[0]));
}

#[test]
fn first_tie_break_ignores_position() {
    let mut harness = Harness::new(&[160.0, 480.0, 800.0]);
    let mut panel = harness.panel(TieBreak::First);
    let _ = harness.spawn_enemy(&mut panel, 790.0);
    let _ = harness.open(&mut panel);

    let _ = harness.press(&mut panel, InputSignal::ChangeFocus(1.0));
    assert_eq!(panel.selected(), Some(harness.actions[0]));
}

#[test]
fn switching_to_an_empty_list_clears_the_selection() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let _ = harness.open(&mut panel);
    let _ = harness.press(&mut panel, InputSignal::ChangeFocus(1.0));
    assert_eq!(panel.selected(), Some(harness.actions[0]));

    assert_eq!(
        harness.press(&mut panel, InputSignal::ChangeFocus(-1.0)),
        Ok(Navigated::ListChanged(DualList::Combat))
    );
    assert_eq!(panel.selected(), None);
    assert_eq!(harness.host.selected(), None);
    assert_eq!(harness.press(&mut panel, InputSignal::Right), Err(NavError::Empty));
}

#[test]
fn confirm_submits_and_cancel_is_deferred_to_the_owner() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let enemy = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.open(&mut panel);

    assert_eq!(harness.press(&mut panel, InputSignal::Confirm), Ok(Navigated::Submitted(enemy)));
    assert_eq!(harness.host.take_submitted(), vec![enemy]);
    assert_eq!(
        harness.press(&mut panel, InputSignal::Cancel),
        Ok(Navigated::CancelRequested(GAMEPLAY))
    );
    assert!(panel.is_open());
    assert_eq!(harness.press(&mut panel, InputSignal::Up), Err(NavError::Unsupported));
}

#[test]
fn covered_panel_ignores_input_and_restores_afterwards() {
    let mut harness = Harness::new(&[160.0]);
    let mut panel = harness.panel(TieBreak::NearestX);
    let enemy = harness.spawn_enemy(&mut panel, 100.0);
    let _ = harness.open(&mut panel);
    let menu = PanelId::new(1);
    harness.focus.push(menu).expect("menu");
    harness.host.select(None);

    assert_eq!(harness.press(&mut panel, InputSignal::Right), Err(NavError::NotFocused));

    let _ = harness.focus.pop_panel(menu).expect("menu on top");
    assert_eq!(panel.restore(&mut harness.cx()), Ok(Navigated::Selected(enemy)));
    assert_eq!(harness.host.selected(), Some(enemy));
}
