use std::time::Duration;

use soulkeeper_cli::{
    ItemBinding, Session, SessionConfig, SoulAction, GAMEPLAY_PANEL, INVENTORY_PANEL, MENU_PANEL,
};
use soulkeeper_core::{DamageKind, EnemyId, Event, InputFrame, InputSignal, Location};
use soulkeeper_system_navigation::{DualList, GridMode, ItemId, Panel, SelectionHost};
use soulkeeper_world::{query, resolve_points};

const FRAME: Duration = Duration::from_millis(16);

fn config() -> SessionConfig {
    souls_bound_to(Location::Swamps)
}

/// Session in the swamps whose souls all belong to `soul_location`.
fn souls_bound_to(soul_location: Location) -> SessionConfig {
    SessionConfig {
        spawn_interval_ms: 1_000,
        release_delay_ms: 60_000,
        location: Location::Swamps,
        soul_locations: vec![soul_location],
        ..SessionConfig::default()
    }
}

/// Session with one enemy on each of the three default spawn points.
fn populated() -> Session {
    populated_with(config())
}

fn populated_with(config: SessionConfig) -> Session {
    let mut session = Session::new(config).expect("session");
    for _ in 0..3 {
        let _ = session.frame(&InputFrame::idle(), Duration::from_secs(1));
    }
    assert_eq!(query::enemies(session.world()).count(), 3);
    session
}

fn tap(session: &mut Session, signal: InputSignal) -> Vec<Event> {
    session.frame(&InputFrame::tap(signal), FRAME)
}

fn idle(session: &mut Session) -> Vec<Event> {
    session.frame(&InputFrame::idle(), FRAME)
}

fn center_x(session: &Session, item: ItemId) -> f32 {
    session.host().rect(item).expect("control rect").center().x
}

fn enemy_of(session: &Session, item: ItemId) -> EnemyId {
    match session.host().binding(item) {
        Some(ItemBinding::Enemy(enemy)) => *enemy,
        other => panic!("expected an enemy control, found {other:?}"),
    }
}

fn kill_points(session: &Session, enemy: EnemyId, kind: DamageKind) -> u64 {
    let enemy = query::enemy(session.world(), enemy).expect("living enemy");
    u64::from(resolve_points(enemy.weakness(), enemy.reward(), kind))
}

fn soul_action(session: &Session, action: SoulAction) -> ItemId {
    session
        .host()
        .find(|binding| *binding == ItemBinding::SoulAction(action))
        .expect("soul action control")
}

fn open_inventory(session: &mut Session) {
    let _ = tap(session, InputSignal::Cancel);
    let _ = idle(session);
    let _ = tap(session, InputSignal::Down);
    let _ = tap(session, InputSignal::Confirm);
    assert_eq!(session.focused_panel(), Some(INVENTORY_PANEL));
    let _ = idle(session);
}

#[test]
fn spawned_enemies_are_listed_left_to_right() {
    let session = populated();
    let combat = session.gameplay().combat();

    assert_eq!(combat.len(), 3);
    let xs: Vec<f32> = combat.iter().map(|item| center_x(&session, *item)).collect();
    assert_eq!(xs, vec![160.0, 480.0, 800.0]);
    for item in combat {
        let enemy = enemy_of(&session, *item);
        assert_eq!(session.enemy_control(enemy), Some(*item));
    }
}

#[test]
fn first_directional_input_selects_the_leftmost_enemy() {
    let mut session = populated();
    assert_eq!(session.gameplay().selected(), None);

    let _ = tap(&mut session, InputSignal::Right);

    let leftmost = session.gameplay().combat()[0];
    assert_eq!(session.gameplay().selected(), Some(leftmost));
    assert_eq!(session.host().selected(), Some(leftmost));
}

#[test]
fn killing_the_middle_enemy_keeps_order_and_clears_selection() {
    let mut session = populated();
    let [left, middle, right] = <[ItemId; 3]>::try_from(session.gameplay().combat())
        .expect("three enemies");
    let _ = tap(&mut session, InputSignal::Right);
    let _ = tap(&mut session, InputSignal::Right);
    assert_eq!(session.gameplay().selected(), Some(middle));

    let target = enemy_of(&session, middle);
    let expected = kill_points(&session, target, DamageKind::Melee);
    let events = tap(&mut session, InputSignal::Confirm);

    assert!(events.contains(&Event::EnemyKilled { enemy: target }));
    assert!(events.contains(&Event::ScoreUpdated));
    assert_eq!(session.gameplay().combat(), &[left, right]);
    assert_eq!(session.gameplay().selected(), None);
    assert_eq!(session.host().selected(), None);
    assert_eq!(session.enemy_control(target), None);
    assert_eq!(session.score(), expected);

    let _ = tap(&mut session, InputSignal::Right);
    assert_eq!(session.gameplay().selected(), Some(left));
}

#[test]
fn armed_attack_kind_applies_to_the_next_target() {
    let mut session = populated();
    assert_eq!(session.armed(), DamageKind::Melee);

    let _ = tap(&mut session, InputSignal::ChangeFocus(1.0));
    assert_eq!(session.gameplay().active(), DualList::Actions);
    let _ = tap(&mut session, InputSignal::Right);
    let _ = tap(&mut session, InputSignal::Confirm);
    assert_eq!(session.armed(), DamageKind::Distance);

    let _ = tap(&mut session, InputSignal::ChangeFocus(-1.0));
    assert_eq!(session.gameplay().active(), DualList::Combat);
    let middle = session.gameplay().combat()[1];
    assert_eq!(session.gameplay().selected(), Some(middle), "nearest enemy to the button");

    let target = enemy_of(&session, middle);
    let expected = kill_points(&session, target, DamageKind::Distance);
    let _ = tap(&mut session, InputSignal::Confirm);

    assert!(query::enemy(session.world(), target).is_none());
    assert_eq!(session.score(), expected);
}

#[test]
fn small_focus_changes_are_ignored() {
    let mut session = populated();
    let _ = tap(&mut session, InputSignal::ChangeFocus(0.3));
    assert_eq!(session.gameplay().active(), DualList::Combat);
}

#[test]
fn pause_menu_stacks_over_gameplay_and_returns_focus() {
    let mut session = populated();
    let _ = tap(&mut session, InputSignal::Right);
    let gameplay_selection = session.gameplay().selected();

    let _ = tap(&mut session, InputSignal::Cancel);
    assert_eq!(session.focused_panel(), Some(MENU_PANEL));
    let _ = idle(&mut session);
    let resume = session.menu().items()[0];
    assert_eq!(session.host().selected(), Some(resume));

    let _ = tap(&mut session, InputSignal::Left);
    assert_eq!(session.gameplay().selected(), gameplay_selection);

    let _ = tap(&mut session, InputSignal::Cancel);
    assert_eq!(session.focused_panel(), Some(GAMEPLAY_PANEL));
    assert_eq!(session.host().selected(), gameplay_selection);
    assert!(!session.menu().is_open());
}

#[test]
fn resume_entry_closes_the_menu() {
    let mut session = populated();
    let _ = tap(&mut session, InputSignal::Cancel);
    let _ = idle(&mut session);

    let _ = tap(&mut session, InputSignal::Confirm);

    assert_eq!(session.focused_panel(), Some(GAMEPLAY_PANEL));
    for item in session.menu().items() {
        assert!(!session.host().is_selectable(*item));
    }
}

#[test]
fn inventory_opens_from_the_menu_and_closes_back_to_it() {
    let mut session = populated();
    open_inventory(&mut session);
    assert!(session.inventory().is_open());

    let _ = tap(&mut session, InputSignal::Cancel);

    assert_eq!(session.focused_panel(), Some(MENU_PANEL));
    let inventory_entry = session.menu().items()[1];
    assert_eq!(session.host().selected(), Some(inventory_entry));
}

#[test]
fn using_a_soul_scores_its_value_and_empties_the_grid() {
    let mut session = populated();
    let _ = tap(&mut session, InputSignal::Right);
    let target = enemy_of(&session, session.gameplay().combat()[0]);
    let reward = u64::from(query::enemy(session.world(), target).expect("enemy").reward());
    let _ = tap(&mut session, InputSignal::Confirm);
    let after_kill = session.score();
    assert_eq!(query::souls(session.world()).len(), 1);

    open_inventory(&mut session);
    let cell = session.inventory().selected().expect("soul cell selected");
    assert!(matches!(session.host().binding(cell), Some(ItemBinding::Soul(_))));

    let _ = session.frame(&InputFrame::press(InputSignal::Confirm), FRAME);
    assert_eq!(session.inventory().mode(), GridMode::Grid, "waits for release");
    let _ = idle(&mut session);
    assert_eq!(session.inventory().mode(), GridMode::Action);

    let events = tap(&mut session, InputSignal::Confirm);

    assert!(events.iter().any(|event| matches!(event, Event::SoulUsed { .. })));
    assert_eq!(session.score(), after_kill + reward);
    assert!(query::souls(session.world()).is_empty());
    assert_eq!(session.inventory().mode(), GridMode::Grid);
    assert_eq!(session.inventory().selected(), None);
    assert!(session.inventory().items().is_empty());
}

#[test]
fn destroying_a_soul_scores_nothing() {
    let mut session = populated();
    let _ = tap(&mut session, InputSignal::Right);
    let _ = tap(&mut session, InputSignal::Confirm);
    let after_kill = session.score();

    open_inventory(&mut session);
    let _ = session.frame(&InputFrame::press(InputSignal::Confirm), FRAME);
    let _ = idle(&mut session);
    let _ = tap(&mut session, InputSignal::Down);
    let events = tap(&mut session, InputSignal::Confirm);

    assert!(events.iter().any(|event| matches!(event, Event::SoulDestroyed { .. })));
    assert_eq!(session.score(), after_kill);
    assert!(query::souls(session.world()).is_empty());
}

#[test]
fn souls_from_elsewhere_offer_only_destroy() {
    let mut session = populated_with(souls_bound_to(Location::Tower));
    let _ = tap(&mut session, InputSignal::Right);
    let _ = tap(&mut session, InputSignal::Confirm);
    let after_kill = session.score();

    open_inventory(&mut session);
    let use_control = soul_action(&session, SoulAction::Use);
    let destroy_control = soul_action(&session, SoulAction::Destroy);
    assert!(!session.host().is_selectable(use_control));
    assert!(session.host().is_selectable(destroy_control));

    let _ = session.frame(&InputFrame::press(InputSignal::Confirm), FRAME);
    let _ = idle(&mut session);
    assert_eq!(session.inventory().mode(), GridMode::Action);
    assert_eq!(session.inventory().action_selected(), Some(destroy_control));

    let _ = tap(&mut session, InputSignal::Up);
    assert_eq!(session.inventory().action_selected(), Some(destroy_control));

    let events = tap(&mut session, InputSignal::Confirm);
    assert!(events.iter().any(|event| matches!(event, Event::SoulDestroyed { .. })));
    assert_eq!(session.score(), after_kill);
}

#[test]
fn soul_actions_follow_the_selected_soul() {
    let mut config = config();
    config.soul_locations = vec![Location::Swamps, Location::City];
    let mut session = populated_with(config);
    for _ in 0..3 {
        let _ = tap(&mut session, InputSignal::Right);
        let _ = tap(&mut session, InputSignal::Confirm);
    }
    let souls = query::souls(session.world()).to_vec();
    assert_eq!(souls.len(), 3);

    open_inventory(&mut session);
    let use_control = soul_action(&session, SoulAction::Use);
    for (index, soul) in souls.iter().enumerate() {
        if index > 0 {
            let _ = tap(&mut session, InputSignal::Right);
        }
        let cell = session.inventory().selected().expect("soul cell selected");
        assert_eq!(session.host().binding(cell), Some(&ItemBinding::Soul(soul.id())));
        assert_eq!(
            session.host().is_selectable(use_control),
            soul.is_usable_at(Location::Swamps),
            "use availability for soul {index}"
        );
    }
}

#[test]
fn identical_inputs_replay_identically() {
    let inputs = [
        InputFrame::idle(),
        InputFrame::tap(InputSignal::Right),
        InputFrame::tap(InputSignal::Confirm),
        InputFrame::tap(InputSignal::ChangeFocus(1.0)),
        InputFrame::tap(InputSignal::Confirm),
    ];
    let run = || {
        let mut session = Session::new(config()).expect("session");
        let mut events = Vec::new();
        for _ in 0..4 {
            for input in &inputs {
                events.extend(session.frame(input, Duration::from_millis(700)));
            }
        }
        (events, session.score())
    };

    assert_eq!(run(), run());
}
