//! Combat systems - player damage intake and death.

use bevy::prelude::*;

use super::components::*;
use crate::core::{GameState, PlayerHitEvent};

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Timers,
    Damage,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // System ordering
        .configure_sets(
            Update,
            (CombatSet::Timers, CombatSet::Damage)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(Update, tick_immunity.in_set(CombatSet::Timers))
        .add_systems(Update, apply_player_hits.in_set(CombatSet::Damage));
}

/// Count down invincibility windows.
fn tick_immunity(time: Res<Time>, mut query: Query<&mut Immunity>) {
    for mut immunity in query.iter_mut() {
        if immunity.is_active() {
            immunity.tick(time.delta_secs());
        }
    }
}

/// Apply enemy damage to the player, honouring the immunity window.
pub fn apply_player_hits(
    mut commands: Commands,
    mut hits: EventReader<PlayerHitEvent>,
    mut players: Query<(&mut Health, Option<&mut Immunity>, Option<&Dead>), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for hit in hits.read() {
        let Ok((mut health, immunity, dead)) = players.get_mut(hit.player) else {
            continue;
        };
        if dead.is_some() {
            continue;
        }

        if let Some(mut immunity) = immunity {
            if immunity.is_active() {
                continue;
            }
            immunity.trigger();
        }

        let dealt = health.take_damage(hit.amount);
        debug!("Player took {} from {:?}, {} left", dealt, hit.source, health.current);

        if health.is_dead() {
            info!("Player died! Transitioning to Game Over...");
            commands.entity(hit.player).insert(Dead);
            next_state.set(GameState::GameOver);
        }
    }
}
