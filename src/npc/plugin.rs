//! NPC plugin - registers data loading, spawning, and per-tick systems.

use bevy::prelude::*;

use super::data::{load_layer_config, load_npc_definitions, NpcRegistry};
use super::spawning::spawn_level_npcs;
use super::systems;
use crate::core::GameState;
use crate::probe::LayerConfig;

/// NPC plugin - handles definitions, spawning, the state machines, and death.
pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NpcRegistry>()
            .init_resource::<LayerConfig>()
            // Data files are read synchronously while loading
            .add_systems(
                OnEnter(GameState::Loading),
                (load_layer_config, load_npc_definitions),
            )
            .add_systems(OnEnter(GameState::InGame), spawn_level_npcs)
            // Hits land before the tick so the reaction starts on the same frame;
            // cues advance after it so triggers start on the next one
            .add_systems(
                Update,
                (
                    systems::apply_hits,
                    systems::tick_npcs,
                    systems::drive_cues,
                    systems::mirror_hit_boxes,
                    systems::sync_contact_layers,
                    systems::resolve_contact_damage,
                    systems::schedule_corpse_removal,
                    systems::despawn_dead_npcs,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
