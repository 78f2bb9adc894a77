//! Combat-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Component for entities that can take damage.
#[derive(Component, Debug)]
pub struct Health {
    pub current: f32,
}

impl Health {
    pub fn new(current: f32) -> Self {
        Self { current }
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.clamp(0.0, self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Invincibility window after the player is hurt.
///
/// Enemy contact damage arrives every tick the bodies touch, so the player
/// side decides how often it actually lands.
#[derive(Component, Debug)]
pub struct Immunity {
    /// Seconds of invincibility granted per hit
    pub duration: f32,
    /// Seconds left
    pub remaining: f32,
}

impl Immunity {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }
}

impl Default for Immunity {
    fn default() -> Self {
        Self::new(0.6)
    }
}

/// Marker component for entities that have died (prevents multiple death handling).
#[derive(Component)]
pub struct Dead;
