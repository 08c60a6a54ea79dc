#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless adapter that runs a Soulkeeper session from scripted input.
//!
//! The adapter is the composition root: [`Session`] owns the world, the event
//! bus, the pure systems and the navigation panels, and wires them together
//! once per frame. Configuration and input scripts are TOML documents.

mod config;
mod script;
mod session;

pub use self::{
    config::{ConfigError, SessionConfig, TieBreakSetting},
    script::{Script, ScriptError, ScriptFrame},
    session::{
        ItemBinding, MenuEntry, Session, SoulAction, GAMEPLAY_PANEL, INVENTORY_PANEL, MENU_PANEL,
    },
};
