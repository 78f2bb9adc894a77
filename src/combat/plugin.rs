//! Combat plugin - player damage intake.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - applies enemy damage to the player.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
