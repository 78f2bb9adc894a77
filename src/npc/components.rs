//! ECS-only NPC components. The NPC state itself lives in [`super::Npc`].

use bevy::prelude::*;

use super::behavior::DEFAULT_CORPSE_LINGER;

/// Sensor child that hurts the player while its owner's attack connects.
#[derive(Component, Debug, Clone, Copy)]
pub struct AttackHitBox {
    pub owner: Entity,
    /// Local offset when the owner faces right
    pub offset: Vec2,
}

/// Time left before a corpse is removed.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl DeathTimer {
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}

impl Default for DeathTimer {
    fn default() -> Self {
        Self::new(DEFAULT_CORPSE_LINGER)
    }
}
