//! Global events used for cross-system communication.
//!
//! The NPC core never calls into the game shell directly. Damage comes in as
//! a [`HitEvent`], and everything the shell needs to know about (deaths,
//! sounds, damage dealt to the player) goes out as an event.

use bevy::prelude::*;
use serde::Deserialize;

/// Enemy families with their own behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum NpcKind {
    /// Holds a guard point and attacks in melee.
    Guardian,
    /// Flies its patrol route and chases by facing the target.
    Bat,
}

/// Audible notifications raised by an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcSound {
    Attack,
    Death,
}

/// Sent when something lands a blow on an NPC.
///
/// This is the single damage entry point for enemies. The player's attack
/// resolution sends it for every enemy its swing overlaps.
#[derive(Event, Debug, Clone, Copy)]
pub struct HitEvent {
    /// NPC receiving the hit
    pub target: Entity,
    /// Entity that dealt the hit
    pub source: Entity,
    /// Damage amount
    pub amount: f32,
}

/// Sent once an NPC's death sequence has played far enough to count.
///
/// Systems can listen for this to award score, update the HUD, etc.
#[derive(Event, Debug, Clone, Copy)]
pub struct NpcDeathEvent {
    /// NPC that died
    pub entity: Entity,
    /// Which family it belonged to
    pub kind: NpcKind,
    /// Entity that dealt the killing blow
    pub killed_by: Option<Entity>,
}

/// Sent when an NPC wants a sound played.
#[derive(Event, Debug, Clone, Copy)]
pub struct NpcSoundEvent {
    pub entity: Entity,
    pub sound: NpcSound,
}

/// Sent when an enemy body or attack hit box touches the player.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerHitEvent {
    /// Player being hit
    pub player: Entity,
    /// Enemy dealing the damage
    pub source: Entity,
    /// Contact damage of the enemy
    pub amount: f32,
}
