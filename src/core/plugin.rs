//! Core plugin that sets up game states, events, and the kill tally.

use bevy::prelude::*;

use super::events::*;
use super::states::*;
use super::tally::{tally_kills, KillTally};

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, GameOver)
/// - Global events (HitEvent, NpcDeathEvent, etc.)
/// - Kill counting
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<HitEvent>()
            .add_event::<NpcDeathEvent>()
            .add_event::<NpcSoundEvent>()
            .add_event::<PlayerHitEvent>()

            .init_resource::<KillTally>()

            // Data files are read synchronously on entering Loading,
            // so gameplay can start on the next frame
            .add_systems(OnEnter(GameState::Loading), transition_to_game)

            .add_systems(Update, tally_kills.run_if(in_state(GameState::InGame)));
    }
}

/// Leave the loading state once the loaders have run.
fn transition_to_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}
