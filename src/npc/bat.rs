//! Flying NPC that keeps turning toward the player once it has seen them.

use bevy::prelude::*;

use super::actor::Actor;
use super::context::{NpcEvent, Outbox, TickContext, PLAYER_NAME};
use super::hostile::Hostile;
use crate::probe::{find_first_by_name, RayHit};

/// Velocity handed to a bat corpse when it drops out of the air.
pub const DEFAULT_FALL_VELOCITY: Vec2 = Vec2::new(0.0, -5.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatConfig {
    /// Speed factor applied on every hit taken, compounding
    pub speed_multiplier: f32,
    pub fall_velocity: Vec2,
}

#[derive(Debug, Clone)]
pub struct Bat {
    config: BatConfig,
    target: Option<Entity>,
}

impl Bat {
    pub fn new(config: BatConfig) -> Self {
        Self { config, target: None }
    }

    pub fn config(&self) -> &BatConfig {
        &self.config
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn tick(&mut self, actor: &mut Actor, hostile: &Hostile, ctx: &TickContext, out: &mut Outbox) {
        actor.cast_vision(ctx.probe);
        actor.patrol(ctx.dt, out, |_| hostile.should_stop());
        actor.probe_movement(ctx.probe);

        if !actor.is_alive() {
            return;
        }
        self.detect(actor, ctx);
        self.pursue(actor, ctx);
    }

    fn detect(&mut self, actor: &Actor, ctx: &TickContext) {
        if self.target.is_some() {
            return;
        }
        let Some(entity) = find_first_by_name(actor.vision_hits(), PLAYER_NAME).and_then(RayHit::entity) else {
            return;
        };
        if ctx.targets.locate(entity).is_some() {
            self.target = Some(entity);
            info!("Bat spotted {:?}", entity);
        }
    }

    fn pursue(&mut self, actor: &mut Actor, ctx: &TickContext) {
        let Some(target) = self.target else {
            return;
        };
        match ctx.targets.locate(target) {
            Some(position) => {
                if !actor.patrol.flip_on_move {
                    actor.face_towards(position.x);
                }
            }
            None => {
                self.target = None;
                info!("Bat lost {:?}", target);
            }
        }
    }

    /// Every hit makes the bat faster.
    pub fn after_take_hit(&mut self, actor: &mut Actor) {
        actor.speed *= self.config.speed_multiplier;
        debug!("Bat enraged, speed now {}", actor.speed);
    }

    pub fn after_death(&mut self, out: &mut Outbox) {
        self.target = None;
        out.event(NpcEvent::Launched(self.config.fall_velocity));
    }
}
