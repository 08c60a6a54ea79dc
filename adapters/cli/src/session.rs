//! Headless session that owns every service and drives one frame at a time.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use soulkeeper_core::{
    Command, DamageKind, EnemyId, Event, EventBus, InputFrame, InputSignal, ScreenRect, SoulId,
    SpawnPointId, Subscription,
};
use soulkeeper_system_combat::{Activation, Combat};
use soulkeeper_system_navigation::{
    Due, DualListNavigation, EntrySource, FocusStack, GridConfig, GridNavigation, ItemId,
    ListAxis, ListConfig, ListNavigation, MemoryHost, NavContext, NavError, NavResult,
    Navigated, Panel, PanelId, Scheduler, ScrollViewport,
};
use soulkeeper_system_scoring::Scoreboard;
use soulkeeper_system_spawning::Spawning;
use soulkeeper_world::{apply, query, Soul, World};
use tracing::{debug, info};

use crate::config::{ConfigError, SessionConfig};

/// Base panel listing enemies and attack actions.
pub const GAMEPLAY_PANEL: PanelId = PanelId::new(0);
/// Pause menu opened by cancelling out of gameplay.
pub const MENU_PANEL: PanelId = PanelId::new(1);
/// Soul inventory grid opened from the pause menu.
pub const INVENTORY_PANEL: PanelId = PanelId::new(2);

const MENU_ENTRY_SIZE: Vec2 = Vec2::new(200.0, 48.0);
const ACTION_SIZE: Vec2 = Vec2::new(120.0, 40.0);

/// Action offered by the inventory's action menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoulAction {
    /// Consume the soul for its score value.
    Use,
    /// Discard the soul.
    Destroy,
}

/// Entry of the pause menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuEntry {
    /// Return to gameplay.
    Resume,
    /// Open the soul inventory.
    Inventory,
}

/// Domain object a selectable control stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemBinding {
    /// A living enemy in the combat list.
    Enemy(EnemyId),
    /// An attack button of the gameplay action bar.
    Attack(DamageKind),
    /// A soul cell of the inventory grid.
    Soul(SoulId),
    /// An entry of the inventory's action menu.
    SoulAction(SoulAction),
    /// An entry of the pause menu.
    Menu(MenuEntry),
}

#[derive(Debug)]
struct Ui {
    focus: FocusStack,
    host: MemoryHost<ItemBinding>,
    scheduler: Scheduler,
}

impl Ui {
    fn cx(&mut self) -> NavContext<'_> {
        NavContext {
            focus: &mut self.focus,
            host: &mut self.host,
            scheduler: &mut self.scheduler,
        }
    }

    fn set_active_all(&mut self, items: &[ItemId], active: bool) {
        for item in items {
            self.host.set_active(*item, active);
        }
    }
}

#[derive(Debug)]
struct Gameplay {
    panel: DualListNavigation,
    subscription: Subscription,
    enemies: BTreeMap<EnemyId, ItemId>,
}

#[derive(Debug)]
struct Menu {
    panel: ListNavigation,
}

#[derive(Debug, Default)]
struct SoulControls {
    entries: Vec<(SoulId, ItemId)>,
}

impl EntrySource for SoulControls {
    fn selectable_entries(&self) -> Vec<ItemId> {
        self.entries.iter().map(|(_, item)| *item).collect()
    }
}

#[derive(Debug)]
struct Inventory {
    panel: GridNavigation,
    subscription: Option<Subscription>,
    controls: SoulControls,
    actions: Vec<ItemId>,
}

/// Session root holding the world, the systems and the navigation panels.
///
/// Each service exists exactly once and is handed to its collaborators by
/// reference for the duration of a call. [`Session::frame`] advances
/// everything in a fixed order:
///
/// 1. resume deferred panel actions that became due;
/// 2. dispatch pressed signals to the panels, where only the focused one reacts;
/// 3. turn submitted controls into combat activations and menu transitions;
/// 4. apply the resulting commands to the world;
/// 5. run spawning and scoring on the produced events;
/// 6. publish the events on the bus;
/// 7. let each subscribed panel consume its mailbox.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    world: World,
    bus: EventBus<Event>,
    ui: Ui,
    spawning: Spawning,
    combat: Combat,
    scoreboard: Scoreboard,
    gameplay: Gameplay,
    menu: Menu,
    inventory: Inventory,
    frames: u64,
}

impl Session {
    /// Builds a session and opens the gameplay panel.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut bus = EventBus::new();
        let mut host = MemoryHost::new();

        let attack_controls = attack_bar(&config)
            .map(|(kind, rect)| host.spawn(ItemBinding::Attack(kind), rect))
            .collect();
        let gameplay = Gameplay {
            panel: DualListNavigation::new(GAMEPLAY_PANEL, config.dual(), attack_controls),
            subscription: bus.subscribe(),
            enemies: BTreeMap::new(),
        };

        let menu_center = spawn_span(&config).center() + Vec2::new(0.0, 160.0);
        let menu_items = [MenuEntry::Resume, MenuEntry::Inventory]
            .into_iter()
            .enumerate()
            .map(|(row, entry)| {
                let center = menu_center + Vec2::new(0.0, row as f32 * MENU_ENTRY_SIZE.y * 1.25);
                host.spawn(
                    ItemBinding::Menu(entry),
                    ScreenRect::centered(center, MENU_ENTRY_SIZE),
                )
            })
            .collect::<Vec<_>>();
        let menu = Menu {
            panel: ListNavigation::new(
                MENU_PANEL,
                ListConfig {
                    axis: ListAxis::Vertical,
                    remember_selection: false,
                    close_on_cancel: true,
                },
                menu_items.clone(),
            ),
        };

        let action_x = config.inventory_viewport.x + ACTION_SIZE.x;
        let actions = [SoulAction::Use, SoulAction::Destroy]
            .into_iter()
            .enumerate()
            .map(|(row, action)| {
                let min = Vec2::new(action_x, row as f32 * ACTION_SIZE.y * 1.25);
                host.spawn(
                    ItemBinding::SoulAction(action),
                    ScreenRect::new(min, ACTION_SIZE),
                )
            })
            .collect::<Vec<_>>();
        let inventory = Inventory {
            panel: GridNavigation::new(
                INVENTORY_PANEL,
                GridConfig {
                    columns: config.inventory_columns,
                    actions: actions.clone(),
                },
                ScrollViewport::new(config.inventory_viewport),
            ),
            subscription: None,
            controls: SoulControls::default(),
            actions,
        };

        let mut ui = Ui {
            focus: FocusStack::new(),
            host,
            scheduler: Scheduler::new(),
        };
        ui.set_active_all(&menu_items, false);
        ui.set_active_all(&inventory.actions, false);

        let mut session = Self {
            world: World::with_config(config.world()),
            spawning: Spawning::new(config.spawning()),
            combat: Combat::new(),
            scoreboard: Scoreboard::new(),
            bus,
            ui,
            gameplay,
            menu,
            inventory,
            frames: 0,
            config,
        };
        let opened = session.gameplay.panel.open(&mut session.ui.cx());
        log_outcome(GAMEPLAY_PANEL, &opened);
        info!(
            spawn_points = query::spawn_point_count(&session.world),
            location = ?query::location(&session.world),
            soul_capacity = query::soul_capacity(&session.world),
            "session started"
        );
        Ok(session)
    }

    /// Advances the session by one frame and returns the events it produced.
    pub fn frame(&mut self, input: &InputFrame, dt: Duration) -> Vec<Event> {
        self.frames += 1;

        for due in self.ui.scheduler.advance(dt, &input.held) {
            self.resume(due);
            self.sync_soul_actions();
        }

        for signal in &input.pressed {
            self.dispatch(*signal);
            self.sync_soul_actions();
        }

        let activations = self.drain_submissions();

        let mut commands = vec![Command::Tick { dt }];
        self.combat.handle(&activations, &mut commands);
        let mut events = Vec::new();
        for command in commands {
            apply(&mut self.world, command, &mut events);
        }

        let free_spawn_points = query::free_spawn_points(&self.world);
        let mut spawns = Vec::new();
        self.spawning.handle(&events, &free_spawn_points, &mut spawns);
        for command in spawns {
            apply(&mut self.world, command, &mut events);
        }

        let mut scored = Vec::new();
        self.scoreboard.handle(&events, &mut scored);
        events.extend(scored);

        self.bus.publish_all(events.iter().cloned());
        self.deliver_gameplay();
        self.deliver_inventory();

        events
    }

    /// Total score accumulated so far.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.scoreboard.total()
    }

    /// Number of frames processed.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Panel currently owning input focus.
    #[must_use]
    pub fn focused_panel(&self) -> Option<PanelId> {
        self.ui.focus.top()
    }

    /// Damage kind applied to the next targeted enemy.
    #[must_use]
    pub fn armed(&self) -> DamageKind {
        self.combat.armed()
    }

    /// Selection host holding every control.
    #[must_use]
    pub fn host(&self) -> &MemoryHost<ItemBinding> {
        &self.ui.host
    }

    /// Gameplay panel with the combat and action lists.
    #[must_use]
    pub fn gameplay(&self) -> &DualListNavigation {
        &self.gameplay.panel
    }

    /// Pause menu panel.
    #[must_use]
    pub fn menu(&self) -> &ListNavigation {
        &self.menu.panel
    }

    /// Inventory grid panel.
    #[must_use]
    pub fn inventory(&self) -> &GridNavigation {
        &self.inventory.panel
    }

    /// Control standing for a living enemy.
    #[must_use]
    pub fn enemy_control(&self, enemy: EnemyId) -> Option<ItemId> {
        self.gameplay.enemies.get(&enemy).copied()
    }

    /// Configuration the session was built from.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn resume(&mut self, due: Due) {
        let mut cx = self.ui.cx();
        let result = match due.owner {
            GAMEPLAY_PANEL => self.gameplay.panel.resume(due.action, &mut cx),
            MENU_PANEL => self.menu.panel.resume(due.action, &mut cx),
            INVENTORY_PANEL => self.inventory.panel.resume(due.action, &mut cx),
            _ => return,
        };
        log_outcome(due.owner, &result);
    }

    fn dispatch(&mut self, signal: InputSignal) {
        let panels: [&mut dyn Panel; 3] = [
            &mut self.inventory.panel,
            &mut self.menu.panel,
            &mut self.gameplay.panel,
        ];
        let mut outcome = None;
        for panel in panels {
            match panel.handle_input(signal, &mut self.ui.cx()) {
                Err(NavError::NotFocused) => {}
                result => {
                    outcome = Some((panel.id(), result));
                    break;
                }
            }
        }

        let Some((panel, result)) = outcome else {
            debug!(?signal, "no panel owns focus");
            return;
        };
        log_outcome(panel, &result);
        match result {
            Ok(Navigated::CancelRequested(GAMEPLAY_PANEL)) => self.open_menu(),
            Ok(Navigated::Closed(MENU_PANEL)) => self.menu_closed(),
            Ok(Navigated::Closed(INVENTORY_PANEL)) => self.inventory_closed(),
            _ => {}
        }
    }

    fn drain_submissions(&mut self) -> Vec<Activation> {
        let mut activations = Vec::new();
        for item in self.ui.host.take_submitted() {
            let Some(binding) = self.ui.host.binding(item).copied() else {
                continue;
            };
            match binding {
                ItemBinding::Enemy(enemy) => activations.push(Activation::Enemy(enemy)),
                ItemBinding::Attack(kind) => activations.push(Activation::Attack(kind)),
                ItemBinding::SoulAction(action) => {
                    let Some(soul) = self.selected_soul() else {
                        debug!(?action, "soul action without a selected soul");
                        continue;
                    };
                    activations.push(match action {
                        SoulAction::Use => Activation::UseSoul(soul),
                        SoulAction::Destroy => Activation::DestroySoul(soul),
                    });
                }
                ItemBinding::Soul(_) => {}
                ItemBinding::Menu(MenuEntry::Resume) => {
                    let result = self.menu.panel.close(&mut self.ui.cx());
                    log_outcome(MENU_PANEL, &result);
                    if result.is_ok() {
                        self.menu_closed();
                    }
                }
                ItemBinding::Menu(MenuEntry::Inventory) => self.open_inventory(),
            }
        }
        activations
    }

    fn selected_soul(&self) -> Option<SoulId> {
        let item = self.inventory.panel.selected()?;
        match self.ui.host.binding(item)? {
            ItemBinding::Soul(soul) => Some(*soul),
            _ => None,
        }
    }

    fn open_menu(&mut self) {
        self.ui.set_active_all(self.menu.panel.items(), true);
        let result = self.menu.panel.open(&mut self.ui.cx());
        log_outcome(MENU_PANEL, &result);
        if result.is_ok() {
            info!("pause menu opened");
        }
    }

    fn menu_closed(&mut self) {
        self.ui.set_active_all(self.menu.panel.items(), false);
        info!("pause menu closed");
        self.restore_top();
    }

    fn open_inventory(&mut self) {
        if self.inventory.panel.is_open() {
            return;
        }
        self.inventory.subscription = Some(self.bus.subscribe());
        self.ui.set_active_all(&self.inventory.actions, true);
        self.sync_soul_controls();
        let _ = self
            .inventory
            .panel
            .refresh(&self.inventory.controls, &mut self.ui.cx());
        let result = self.inventory.panel.open(&mut self.ui.cx());
        log_outcome(INVENTORY_PANEL, &result);
        if result.is_ok() {
            info!(souls = self.inventory.controls.entries.len(), "inventory opened");
        }
    }

    fn inventory_closed(&mut self) {
        if let Some(subscription) = self.inventory.subscription.take() {
            let _ = self.bus.unsubscribe(subscription);
        }
        for (_, item) in self.inventory.controls.entries.drain(..) {
            let _ = self.ui.host.despawn(item);
        }
        self.ui.set_active_all(&self.inventory.actions, false);
        info!("inventory closed");
        self.restore_top();
    }

    fn restore_top(&mut self) {
        let Some(top) = self.ui.focus.top() else {
            return;
        };
        let mut cx = self.ui.cx();
        let result = match top {
            GAMEPLAY_PANEL => self.gameplay.panel.restore(&mut cx),
            MENU_PANEL => self.menu.panel.restore(&mut cx),
            INVENTORY_PANEL => self.inventory.panel.restore(&mut cx),
            _ => return,
        };
        log_outcome(top, &result);
    }

    fn deliver_gameplay(&mut self) {
        for event in self.bus.drain(&self.gameplay.subscription) {
            match event {
                Event::EnemyCreated { enemy, spawn_point } => {
                    self.add_enemy_control(enemy, spawn_point);
                }
                Event::EnemyKilled { enemy } => self.remove_enemy_control(enemy),
                _ => {}
            }
        }
    }

    fn deliver_inventory(&mut self) {
        let Some(subscription) = &self.inventory.subscription else {
            return;
        };
        let changed = self
            .bus
            .drain(subscription)
            .iter()
            .any(|event| matches!(event, Event::InventoryChanged));
        if !changed {
            return;
        }

        self.sync_soul_controls();
        let result = self
            .inventory
            .panel
            .refresh(&self.inventory.controls, &mut self.ui.cx());
        log_outcome(INVENTORY_PANEL, &result);
        self.sync_soul_actions();
    }

    fn add_enemy_control(&mut self, enemy: EnemyId, spawn_point: SpawnPointId) {
        let Some(position) = query::spawn_point_position(&self.world, spawn_point) else {
            return;
        };
        let rect = ScreenRect::centered(position, self.config.enemy_control_size);
        let item = self.ui.host.spawn(ItemBinding::Enemy(enemy), rect);
        self.gameplay.panel.on_item_created(item, &self.ui.host);
        let _ = self.gameplay.enemies.insert(enemy, item);
        debug!(enemy = enemy.get(), item = item.get(), "enemy control created");
    }

    fn remove_enemy_control(&mut self, enemy: EnemyId) {
        let Some(item) = self.gameplay.enemies.remove(&enemy) else {
            return;
        };
        let _ = self.gameplay.panel.on_item_removed(item, &mut self.ui.host);
        let _ = self.ui.host.despawn(item);
        debug!(enemy = enemy.get(), item = item.get(), "enemy control removed");
    }

    /// Enables the action menu entries that apply to the selected soul.
    ///
    /// Use is only offered where the soul belongs; both entries go dark while
    /// no soul is selected.
    fn sync_soul_actions(&mut self) {
        if !self.inventory.panel.is_open() {
            return;
        }
        let location = query::location(&self.world);
        let soul = self
            .selected_soul()
            .and_then(|soul| query::soul(&self.world, soul));
        let selected = soul.is_some();
        let usable = soul.is_some_and(|soul| soul.is_usable_at(location));

        for item in &self.inventory.actions {
            let interactable = match self.ui.host.binding(*item) {
                Some(ItemBinding::SoulAction(SoulAction::Use)) => usable,
                Some(ItemBinding::SoulAction(SoulAction::Destroy)) => selected,
                _ => continue,
            };
            self.ui.host.set_interactable(*item, interactable);
        }
    }

    /// Mirrors the world's souls as grid controls laid out row by row.
    fn sync_soul_controls(&mut self) {
        let souls: Vec<SoulId> = query::souls(&self.world).iter().map(Soul::id).collect();
        let host = &mut self.ui.host;
        let entries = &mut self.inventory.controls.entries;

        entries.retain(|(soul, item)| {
            let alive = souls.contains(soul);
            if !alive {
                let _ = host.despawn(*item);
            }
            alive
        });
        for soul in &souls {
            if !entries.iter().any(|(listed, _)| listed == soul) {
                let item = host.spawn(
                    ItemBinding::Soul(*soul),
                    ScreenRect::new(Vec2::ZERO, self.config.inventory_cell),
                );
                entries.push((*soul, item));
            }
        }
        entries.sort_by_key(|(soul, _)| souls.iter().position(|listed| listed == soul));

        let columns = self.config.inventory_columns.max(1);
        for (index, (_, item)) in entries.iter().enumerate() {
            let cell = Vec2::new((index % columns) as f32, (index / columns) as f32);
            host.set_rect(
                *item,
                ScreenRect::new(cell * self.config.inventory_cell, self.config.inventory_cell),
            );
        }
    }
}

fn log_outcome(panel: PanelId, result: &NavResult) {
    match result {
        Ok(navigated) => debug!(panel = panel.get(), ?navigated, "navigation"),
        Err(error) => debug!(panel = panel.get(), %error, "navigation ignored"),
    }
}

/// Horizontal extent of the spawn points at their mean height.
fn spawn_span(config: &SessionConfig) -> ScreenRect {
    let (min_x, max_x) = config
        .spawn_points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), point| {
            (min.min(point.x), max.max(point.x))
        });
    let count = config.spawn_points.len().max(1) as f32;
    let y = config.spawn_points.iter().map(|point| point.y).sum::<f32>() / count;
    if min_x > max_x {
        return ScreenRect::new(Vec2::new(0.0, y), Vec2::ZERO);
    }
    ScreenRect::new(Vec2::new(min_x, y), Vec2::new(max_x - min_x, 0.0))
}

/// Attack buttons spread evenly under the spawn points.
fn attack_bar(config: &SessionConfig) -> impl Iterator<Item = (DamageKind, ScreenRect)> {
    let span = spawn_span(config);
    let steps = (DamageKind::ALL.len() - 1).max(1) as f32;
    let y = config.action_bar_y;
    DamageKind::ALL
        .into_iter()
        .enumerate()
        .map(move |(index, kind)| {
            let x = span.min().x + span.size().x * index as f32 / steps;
            (kind, ScreenRect::centered(Vec2::new(x, y), ACTION_SIZE))
        })
}
