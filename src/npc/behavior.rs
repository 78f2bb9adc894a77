//! The [`Npc`] component: shared actor state plus the behavior of its family.

use bevy::prelude::*;

use super::actor::{Actor, HitReaction, ReactionOutcome};
use super::bat::Bat;
use super::context::{NpcEvent, Outbox, TickContext};
use super::guardian::Guardian;
use super::hostile::Hostile;
use crate::core::NpcKind;

/// Seconds a corpse stays in the world before it is despawned.
pub const DEFAULT_CORPSE_LINGER: f32 = 2.0;

/// Per-family decision making layered over [`Actor`].
#[derive(Debug, Clone)]
pub enum Behavior {
    Guardian(Guardian),
    Bat(Bat),
}

/// What an NPC is doing right now. Exactly one applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Patrolling,
    Chasing,
    Attacking,
    TakingHit,
    Dying,
    Dead,
}

#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub actor: Actor,
    pub hostile: Hostile,
    pub behavior: Behavior,
    pub corpse_linger: f32,
}

impl Npc {
    pub fn new(actor: Actor, hostile: Hostile, behavior: Behavior) -> Self {
        Self {
            actor,
            hostile,
            behavior,
            corpse_linger: DEFAULT_CORPSE_LINGER,
        }
    }

    pub fn kind(&self) -> NpcKind {
        match self.behavior {
            Behavior::Guardian(_) => NpcKind::Guardian,
            Behavior::Bat(_) => NpcKind::Bat,
        }
    }

    pub fn target(&self) -> Option<Entity> {
        match &self.behavior {
            Behavior::Guardian(guardian) => guardian.target(),
            Behavior::Bat(bat) => bat.target(),
        }
    }

    pub fn activity(&self) -> Activity {
        match self.actor.reaction() {
            HitReaction::Dead => return Activity::Dead,
            HitReaction::AwaitingDeath { .. } => return Activity::Dying,
            HitReaction::AwaitingHurt { .. } | HitReaction::Hurting { .. } => return Activity::TakingHit,
            HitReaction::Ready => {}
        }

        match &self.behavior {
            Behavior::Guardian(guardian) if guardian.is_attacking() => Activity::Attacking,
            Behavior::Guardian(guardian) if guardian.target().is_some() => Activity::Chasing,
            Behavior::Bat(bat) if bat.target().is_some() => Activity::Chasing,
            _ => Activity::Patrolling,
        }
    }

    /// Deliver a hit. Returns false when it was ignored.
    pub fn take_hit(&mut self, source: Entity, amount: f32, out: &mut Outbox) -> bool {
        self.actor.take_hit(source, amount, out)
    }

    pub fn tick(&mut self, ctx: &TickContext, out: &mut Outbox) {
        match self.actor.advance_reaction(ctx, out) {
            Some(ReactionOutcome::Survived { source }) => match &mut self.behavior {
                Behavior::Guardian(guardian) => guardian.after_take_hit(&mut self.actor, source),
                Behavior::Bat(bat) => bat.after_take_hit(&mut self.actor),
            },
            Some(ReactionOutcome::Died { killer }) => {
                match &mut self.behavior {
                    Behavior::Guardian(guardian) => guardian.after_death(),
                    Behavior::Bat(bat) => bat.after_death(out),
                }
                out.event(NpcEvent::Died { killer });
            }
            None => {}
        }

        self.actor.advance_stop(ctx.dt);
        self.actor.begin_tick();
        match &mut self.behavior {
            Behavior::Guardian(guardian) => guardian.tick(&mut self.actor, ctx, out),
            Behavior::Bat(bat) => bat.tick(&mut self.actor, &self.hostile, ctx, out),
        }
    }

    /// Damage the attack hit box deals to an overlapping player right now.
    pub fn hitbox_damage(&self) -> Option<f32> {
        (self.actor.player_contact() && self.hostile.is_damage_frame_playing())
            .then(|| self.hostile.contact_damage())
    }

    /// Damage the body deals to a touching player this tick.
    pub fn body_contact_damage(&self) -> Option<f32> {
        let touches = matches!(self.behavior, Behavior::Bat(_)) && self.actor.player_contact();
        touches.then(|| self.hostile.contact_damage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::bat::{BatConfig, DEFAULT_FALL_VELOCITY};
    use crate::npc::context::TargetRoster;
    use crate::npc::cue::Cue;
    use crate::npc::guardian::{ChaseRange, GuardianConfig};
    use crate::npc::testing::{actor_at, context, FakeCues, NoTargets};
    use crate::probe::NoColliders;

    const PLAYER: Entity = Entity::PLACEHOLDER;

    fn guardian_npc() -> Npc {
        let guardian = Guardian::new(GuardianConfig {
            guard_point: 0.0,
            chase_range: ChaseRange::symmetric(5.0),
            distancing: 1.0,
            attack_cooldown: 1.0,
        });
        Npc::new(
            actor_at(Vec2::ZERO, &[Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)]),
            Hostile::new(10.0),
            Behavior::Guardian(guardian),
        )
    }

    fn bat_npc(speed: f32) -> Npc {
        let mut actor = actor_at(Vec2::ZERO, &[Vec2::new(0.0, 3.0)]);
        actor.speed = speed;
        actor.patrol.vertical = true;
        actor.patrol.flip_on_move = false;
        Npc::new(
            actor,
            Hostile::new(5.0),
            Behavior::Bat(Bat::new(BatConfig {
                speed_multiplier: 1.5,
                fall_velocity: DEFAULT_FALL_VELOCITY,
            })),
        )
    }

    /// Deliver a hit and run ticks until the hurt clip has played out.
    fn hit_and_recover(npc: &mut Npc, amount: f32) -> Outbox {
        let mut out = Outbox::default();
        npc.take_hit(PLAYER, amount, &mut out);
        let mut cues = FakeCues::default();
        cues.play(Cue::TakeHit, 0.2);
        for i in 0..5 {
            npc.tick(&context(0.1, i as f32 * 0.1, &NoColliders, &cues, &NoTargets), &mut out);
        }
        out
    }

    #[test]
    fn bat_speed_compounds_across_hits() {
        let mut npc = bat_npc(10.0);
        hit_and_recover(&mut npc, 1.0);
        hit_and_recover(&mut npc, 1.0);
        assert!((npc.actor.speed - 22.5).abs() < 1e-4);
    }

    #[test]
    fn surviving_guardian_targets_attacker() {
        let mut npc = guardian_npc();
        npc.take_hit(PLAYER, 1.0, &mut Outbox::default());
        assert_eq!(npc.activity(), Activity::TakingHit);

        let mut out = Outbox::default();
        let mut cues = FakeCues::default();
        cues.play(Cue::TakeHit, 0.0);
        let roster = TargetRoster::new([(PLAYER, Vec2::new(3.0, 0.0))]);
        npc.tick(&context(0.1, 0.1, &NoColliders, &cues, &roster), &mut out);
        assert_eq!(npc.target(), Some(PLAYER));
        assert_eq!(npc.activity(), Activity::Chasing);
    }

    #[test]
    fn lethal_hit_skips_after_take_hit() {
        let mut npc = guardian_npc();
        let mut out = Outbox::default();
        npc.take_hit(PLAYER, 50.0, &mut out);

        let mut cues = FakeCues::default();
        cues.play(Cue::TakeHit, 0.0);
        npc.tick(&context(0.1, 0.1, &NoColliders, &cues, &NoTargets), &mut out);
        assert_eq!(npc.activity(), Activity::Dying);
        assert_eq!(npc.target(), None);
        assert_eq!(npc.hitbox_damage(), None);

        cues.play(Cue::Death, 1.0);
        npc.tick(&context(0.1, 0.2, &NoColliders, &cues, &NoTargets), &mut out);
        assert_eq!(npc.activity(), Activity::Dead);
        assert_eq!(npc.target(), None);
        assert!(out.events.contains(&NpcEvent::Died { killer: PLAYER }));

        let deaths = out.events.iter().filter(|e| matches!(e, NpcEvent::Died { .. })).count();
        npc.tick(&context(0.1, 0.3, &NoColliders, &cues, &NoTargets), &mut out);
        let after = out.events.iter().filter(|e| matches!(e, NpcEvent::Died { .. })).count();
        assert_eq!(deaths, after);
    }

    #[test]
    fn dead_bat_falls_and_stops_hurting() {
        let mut npc = bat_npc(2.0);
        assert_eq!(npc.body_contact_damage(), Some(5.0));

        let mut out = hit_and_recover(&mut npc, 100.0);
        let mut cues = FakeCues::default();
        cues.play(Cue::Death, 1.0);
        npc.tick(&context(0.1, 1.0, &NoColliders, &cues, &NoTargets), &mut out);

        assert!(out.events.contains(&NpcEvent::Launched(Vec2::new(0.0, -5.0))));
        assert_eq!(npc.body_contact_damage(), None);
        assert_eq!(npc.actor.speed, 2.0);

        let position = npc.actor.position;
        npc.tick(&context(0.1, 1.1, &NoColliders, &cues, &NoTargets), &mut out);
        assert_eq!(npc.actor.position, position);
    }

    #[test]
    fn hitbox_damage_needs_damage_frame() {
        let mut npc = guardian_npc();
        assert_eq!(npc.hitbox_damage(), None);
        npc.hostile.set_damage_frame_playing(true);
        assert_eq!(npc.hitbox_damage(), Some(10.0));
        assert_eq!(npc.body_contact_damage(), None);
    }

    #[test]
    fn starts_out_patrolling() {
        assert_eq!(guardian_npc().activity(), Activity::Patrolling);
        assert_eq!(bat_npc(1.0).activity(), Activity::Patrolling);
    }
}
