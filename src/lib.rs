//! Castle Sentinels - enemy brains for a 2D side-scrolling action game.
//!
//! This crate owns the non-player characters: where patrolling enemies walk,
//! when they notice the player, how they chase and attack, and how they react
//! to being hit and dying. Rendering, input and audio playback live elsewhere;
//! they talk to this crate through events and named animation cues.
//!
//! # Architecture
//!
//! The crate is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, cross-system events, kill tally
//! - **Probe**: Vector helpers, ray fans and grids, collision layer filters
//! - **Npc**: Actor state machine, guardian and bat behaviors, cue player, data files
//! - **Combat**: Player damage intake and immunity window

pub mod combat;
pub mod core;
pub mod npc;
pub mod probe;

use bevy::prelude::*;

/// Main plugin that adds all sub-plugins.
pub struct SentinelsPlugin;

impl Plugin for SentinelsPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player damage intake
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(npc::NpcPlugin);
    }
}
