//! Combat module - player health, immunity window, and death.
//!
//! Enemies report the damage they deal as [`PlayerHitEvent`](crate::core::PlayerHitEvent)s;
//! this module decides how much of it lands.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{apply_player_hits, CombatSet};
