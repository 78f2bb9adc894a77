//! Ground melee NPC that guards a stretch of floor.
//!
//! A guardian patrols until it sees the player, then chases as long as the
//! spot it would attack from lies inside its chase range around the guard
//! point. Once there it attacks on a cooldown. Leaving the range, or losing
//! the target, sends it back to patrolling in the same tick.

use bevy::prelude::*;
use serde::Deserialize;

use super::actor::Actor;
use super::context::{NpcEvent, Outbox, TickContext, PLAYER_NAME};
use super::cue::Cue;
use crate::core::NpcSound;
use crate::probe::{count_by_tag, find_first_by_name, ProbeTag, RayHit};

/// How far the guardian may follow a target left and right of its guard point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChaseRange {
    pub left: f32,
    pub right: f32,
}

impl ChaseRange {
    pub fn symmetric(range: f32) -> Self {
        Self {
            left: range,
            right: range,
        }
    }

    pub fn contains(&self, guard_point: f32, x: f32) -> bool {
        x >= guard_point - self.left && x <= guard_point + self.right
    }
}

/// Guardian-specific settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardianConfig {
    /// X coordinate the chase range is measured from
    pub guard_point: f32,
    pub chase_range: ChaseRange,
    /// Gap kept between guardian and target when attacking
    pub distancing: f32,
    /// Seconds between attack starts
    pub attack_cooldown: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum AttackCycle {
    #[default]
    Idle,
    AwaitingStart,
    Playing {
        elapsed: f32,
        duration: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Guardian {
    config: GuardianConfig,
    next_attack: f32,
    target: Option<Entity>,
    attack: AttackCycle,
}

impl Guardian {
    pub fn new(config: GuardianConfig) -> Self {
        Self {
            config,
            next_attack: f32::NEG_INFINITY,
            target: None,
            attack: AttackCycle::Idle,
        }
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// An attack clip was requested and has not finished yet.
    pub fn is_attacking(&self) -> bool {
        self.attack != AttackCycle::Idle
    }

    /// Where to stand to attack a target at `target_x`: `distancing` short of
    /// it on the guardian's side.
    pub fn distanced_waypoint(&self, own_x: f32, target_x: f32) -> f32 {
        if own_x > target_x {
            target_x + self.config.distancing
        } else if own_x < target_x {
            target_x - self.config.distancing
        } else {
            target_x
        }
    }

    fn in_range(&self, x: f32) -> bool {
        self.config.chase_range.contains(self.config.guard_point, x)
    }

    /// Guardians only pause at waypoints while nothing else has their attention.
    pub fn should_stop(&self, actor: &Actor) -> bool {
        self.target.is_none() && actor.routine_active()
    }

    pub fn tick(&mut self, actor: &mut Actor, ctx: &TickContext, out: &mut Outbox) {
        actor.cast_vision(ctx.probe);
        let reacting = actor.reaction().in_progress();

        if actor.is_alive() && !reacting {
            self.detect(actor, ctx);
        }
        actor.patrol(ctx.dt, out, |actor| self.should_stop(actor));
        self.advance_attack(ctx);
        if !reacting {
            self.chase(actor, ctx, out);
        }
        actor.probe_movement(ctx.probe);
    }

    fn detect(&mut self, actor: &mut Actor, ctx: &TickContext) {
        if self.target.is_some() {
            return;
        }
        let Some(entity) = find_first_by_name(actor.vision_hits(), PLAYER_NAME).and_then(RayHit::entity) else {
            return;
        };
        let Some(position) = ctx.targets.locate(entity) else {
            return;
        };

        let stand_x = self.distanced_waypoint(actor.position.x, position.x);
        if self.in_range(stand_x) {
            self.target = Some(entity);
            actor.suspend_routine();
            info!("Guardian spotted {:?}", entity);
        }
    }

    fn chase(&mut self, actor: &mut Actor, ctx: &TickContext, out: &mut Outbox) {
        let Some(target) = self.target else {
            return;
        };
        if actor.routine_active() || !actor.is_alive() {
            return;
        }

        let Some(position) = ctx.targets.locate(target) else {
            self.release(actor);
            return;
        };
        let stand_x = self.distanced_waypoint(actor.position.x, position.x);
        if !self.in_range(stand_x) {
            self.release(actor);
            return;
        }

        let stand = Vec2::new(stand_x, position.y);
        if actor.is_waypoint_reached(stand) {
            self.attack(actor, position, ctx.now, out);
        } else if !self.is_attacking() {
            actor.move_to(stand, ctx.dt, out);
            if count_by_tag(actor.movement_hits(), ProbeTag::Ground) > 0 {
                out.walking(false);
            }
        }
    }

    fn attack(&mut self, actor: &mut Actor, target: Vec2, now: f32, out: &mut Outbox) {
        actor.face_towards(target.x);
        out.walking(false);

        if now > self.next_attack && !self.is_attacking() {
            self.next_attack = now + self.config.attack_cooldown;
            self.attack = AttackCycle::AwaitingStart;
            out.trigger(Cue::Attack);
            out.event(NpcEvent::Sound(NpcSound::Attack));
        }
    }

    fn advance_attack(&mut self, ctx: &TickContext) {
        loop {
            match self.attack {
                AttackCycle::Idle => return,
                AttackCycle::AwaitingStart => {
                    if !ctx.cues.has_started(Cue::Attack) {
                        return;
                    }
                    self.attack = AttackCycle::Playing {
                        elapsed: 0.0,
                        duration: ctx.cues.current_duration(),
                    };
                }
                AttackCycle::Playing { elapsed, duration } => {
                    let elapsed = elapsed + ctx.dt;
                    self.attack = if elapsed >= duration {
                        AttackCycle::Idle
                    } else {
                        AttackCycle::Playing { elapsed, duration }
                    };
                    return;
                }
            }
        }
    }

    fn release(&mut self, actor: &mut Actor) {
        self.target = None;
        self.attack = AttackCycle::Idle;
        actor.resume_routine();
        info!("Guardian lost its target, back to patrol");
    }

    /// Whoever hit the guardian becomes its target, wherever they are.
    pub fn after_take_hit(&mut self, actor: &mut Actor, source: Entity) {
        self.target = Some(source);
        self.attack = AttackCycle::Idle;
        actor.suspend_routine();
    }

    pub fn after_death(&mut self) {
        self.target = None;
        self.attack = AttackCycle::Idle;
    }
}
