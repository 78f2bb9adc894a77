//! Per-tick inputs and outputs of the NPC brains.

use bevy::prelude::*;

use super::cue::{Cue, CueFeed, CueSignal};
use crate::core::NpcSound;
use crate::probe::RayCaster;

/// Collider name that marks the player in probe results.
pub const PLAYER_NAME: &str = "Player";

/// Resolves weak target references.
pub trait TargetLookup {
    /// Position of `target`, or `None` once it is no longer a live player.
    fn locate(&self, target: Entity) -> Option<Vec2>;
}

/// Live players and where they stand this tick.
#[derive(Debug, Default)]
pub struct TargetRoster {
    players: Vec<(Entity, Vec2)>,
}

impl TargetRoster {
    pub fn new(players: impl IntoIterator<Item = (Entity, Vec2)>) -> Self {
        Self {
            players: players.into_iter().collect(),
        }
    }
}

impl TargetLookup for TargetRoster {
    fn locate(&self, target: Entity) -> Option<Vec2> {
        self.players
            .iter()
            .find(|(entity, _)| *entity == target)
            .map(|(_, position)| *position)
    }
}

/// Everything an NPC may read during one tick.
pub struct TickContext<'a> {
    /// Seconds since the previous tick
    pub dt: f32,
    /// Seconds since startup
    pub now: f32,
    pub probe: &'a dyn RayCaster,
    pub cues: &'a dyn CueFeed,
    pub targets: &'a dyn TargetLookup,
}

/// Things an NPC reports to the outside world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NpcEvent {
    Sound(NpcSound),
    /// Death sequence reached the point where the kill counts.
    Died { killer: Entity },
    /// Corpse should be handed to physics with this velocity.
    Launched(Vec2),
}

/// Signals and events collected during one tick, drained by the ECS systems.
#[derive(Debug, Default)]
pub struct Outbox {
    pub cues: Vec<CueSignal>,
    pub events: Vec<NpcEvent>,
}

impl Outbox {
    pub fn cue(&mut self, signal: CueSignal) {
        self.cues.push(signal);
    }

    pub fn event(&mut self, event: NpcEvent) {
        self.events.push(event);
    }

    pub fn walking(&mut self, on: bool) {
        self.cue(CueSignal::Hold(Cue::Walking, on));
    }

    pub fn trigger(&mut self, cue: Cue) {
        self.cue(CueSignal::Trigger(cue));
    }
}
