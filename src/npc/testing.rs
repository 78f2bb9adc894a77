//! Fixtures shared by the NPC unit tests.

use bevy::prelude::*;

use super::actor::{Actor, ActorConfig, BodyProbe, Facing, Patrol, VisionCone};
use super::context::{TargetLookup, TickContext};
use super::cue::{Cue, CueFeed};
use crate::probe::{LayerConfig, RayCaster};

/// Cue feed whose playing clip is set by hand.
#[derive(Debug, Default)]
pub struct FakeCues {
    playing: Option<(Cue, f32)>,
}

impl FakeCues {
    pub fn play(&mut self, cue: Cue, duration: f32) {
        self.playing = Some((cue, duration));
    }
}

impl CueFeed for FakeCues {
    fn has_started(&self, cue: Cue) -> bool {
        self.playing.is_some_and(|(playing, _)| playing == cue)
    }

    fn current_duration(&self) -> f32 {
        self.playing.map_or(0.0, |(_, duration)| duration)
    }
}

/// No player anywhere.
pub struct NoTargets;

impl TargetLookup for NoTargets {
    fn locate(&self, _: Entity) -> Option<Vec2> {
        None
    }
}

pub fn context<'a>(
    dt: f32,
    now: f32,
    probe: &'a dyn RayCaster,
    cues: &'a dyn CueFeed,
    targets: &'a dyn TargetLookup,
) -> TickContext<'a> {
    TickContext {
        dt,
        now,
        probe,
        cues,
        targets,
    }
}

/// Ground actor with 50 health walking at 1 unit/s, facing right.
pub fn actor_at(position: Vec2, waypoints: &[Vec2]) -> Actor {
    Actor::new(ActorConfig {
        health: 50.0,
        speed: 1.0,
        position,
        facing: Facing::Right,
        patrol: Patrol::new(waypoints.to_vec()).expect("test route has waypoints"),
        vision: VisionCone {
            rays: 10,
            angle: 30.0,
            distance: 10.0,
            origin_offset: Vec2::ZERO,
        },
        body: BodyProbe {
            half_extents: Vec2::new(0.5, 1.0),
            samples: 3,
            distance: 0.2,
        },
        layers: LayerConfig::default(),
    })
}
