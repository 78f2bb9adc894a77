//! Kill counting for score and level-exit logic.

use bevy::prelude::*;
use std::collections::HashMap;

use super::events::{NpcDeathEvent, NpcKind};

/// Number of enemies killed this run, per family.
#[derive(Resource, Debug, Default)]
pub struct KillTally {
    kills: HashMap<NpcKind, u32>,
}

impl KillTally {
    pub fn record(&mut self, kind: NpcKind) {
        *self.kills.entry(kind).or_default() += 1;
    }

    pub fn count(&self, kind: NpcKind) -> u32 {
        self.kills.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.kills.values().sum()
    }
}

/// Count every reported enemy death.
pub fn tally_kills(mut deaths: EventReader<NpcDeathEvent>, mut tally: ResMut<KillTally>) {
    for death in deaths.read() {
        tally.record(death.kind);
        info!(
            "{:?} {:?} killed ({} kills total)",
            death.kind,
            death.entity,
            tally.total()
        );
    }
}
