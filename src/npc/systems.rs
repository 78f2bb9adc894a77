//! ECS systems that feed the NPC state machines and apply what they report.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::behavior::Npc;
use super::components::{AttackHitBox, DeathTimer};
use super::context::{NpcEvent, Outbox, TargetRoster, TickContext};
use super::cue::{CueFeed, CuePlayer};
use crate::combat::{Health, Player};
use crate::core::{HitEvent, NpcDeathEvent, NpcSoundEvent, PlayerHitEvent};
use crate::probe::{collision_groups, HitCollider, Layer, NoColliders, ProbeTag, RapierProbe, RayCaster};

/// Deliver incoming hits. A second hit on a busy NPC is dropped.
pub fn apply_hits(mut hits: EventReader<HitEvent>, mut npcs: Query<(&mut Npc, &mut CuePlayer)>) {
    for hit in hits.read() {
        let Ok((mut npc, mut cues)) = npcs.get_mut(hit.target) else {
            continue;
        };

        let mut outbox = Outbox::default();
        if !npc.take_hit(hit.source, hit.amount, &mut outbox) {
            debug!("{:?} ignored a hit from {:?}", hit.target, hit.source);
        }
        for signal in outbox.cues {
            cues.apply(signal);
        }
    }
}

/// Run one tick of every NPC.
#[allow(clippy::too_many_arguments)]
pub fn tick_npcs(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    colliders: Query<(Option<&Name>, Option<&ProbeTag>)>,
    players: Query<(Entity, &Transform, &Health), (With<Player>, Without<Npc>)>,
    mut npcs: Query<(Entity, &mut Npc, &mut CuePlayer, &mut Transform)>,
    mut deaths: EventWriter<NpcDeathEvent>,
    mut sounds: EventWriter<NpcSoundEvent>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();
    let context = rapier_context.get_single().ok();

    let roster = TargetRoster::new(
        players
            .iter()
            .filter(|(_, _, health)| !health.is_dead())
            .map(|(entity, transform, _)| (entity, transform.translation.truncate())),
    );
    let identify = |entity: Entity| {
        let (name, tag) = colliders
            .get(entity)
            .map(|(name, tag)| (name.cloned(), tag.copied()))
            .unwrap_or_default();
        HitCollider { entity, name, tag }
    };

    for (entity, mut npc, mut cues, mut transform) in npcs.iter_mut() {
        // Physics may have moved the body since the last tick
        npc.actor.position = transform.translation.truncate();

        let rapier_probe = context.map(|context| RapierProbe::new(context, &identify).excluding(entity));
        let probe: &dyn RayCaster = match &rapier_probe {
            Some(probe) => probe,
            None => &NoColliders,
        };

        let mut outbox = Outbox::default();
        let ctx = TickContext {
            dt,
            now,
            probe,
            cues: &*cues as &dyn CueFeed,
            targets: &roster,
        };
        npc.tick(&ctx, &mut outbox);

        transform.translation.x = npc.actor.position.x;
        if npc.actor.patrol.vertical {
            transform.translation.y = npc.actor.position.y;
        }

        for signal in outbox.cues {
            cues.apply(signal);
        }
        for event in outbox.events {
            match event {
                NpcEvent::Sound(sound) => {
                    sounds.send(NpcSoundEvent { entity, sound });
                }
                NpcEvent::Died { killer } => {
                    info!("{:?} {:?} died", npc.kind(), entity);
                    deaths.send(NpcDeathEvent {
                        entity,
                        kind: npc.kind(),
                        killed_by: Some(killer),
                    });
                }
                NpcEvent::Launched(velocity) => {
                    commands
                        .entity(entity)
                        .insert((RigidBody::Dynamic, Velocity::linear(velocity)));
                }
            }
        }
    }
}

/// Advance cue clips and expose the attack damage window to the hit boxes.
pub fn drive_cues(time: Res<Time>, mut npcs: Query<(&mut CuePlayer, &mut Npc)>) {
    for (mut cues, mut npc) in npcs.iter_mut() {
        cues.advance(time.delta_secs());
        let in_window = cues.in_damage_window();
        if npc.hostile.is_damage_frame_playing() != in_window {
            npc.hostile.set_damage_frame_playing(in_window);
        }
    }
}

/// Keep attack hit boxes on the side their owner faces.
pub fn mirror_hit_boxes(npcs: Query<&Npc>, mut hit_boxes: Query<(&AttackHitBox, &mut Transform)>) {
    for (hit_box, mut transform) in hit_boxes.iter_mut() {
        let Ok(npc) = npcs.get(hit_box.owner) else {
            continue;
        };
        transform.translation.x = hit_box.offset.x * npc.actor.facing.sign();
        transform.translation.y = hit_box.offset.y;
    }
}

/// Move NPCs that can no longer touch the player to the corpse layer.
pub fn sync_contact_layers(mut npcs: Query<(&Npc, &mut CollisionGroups)>) {
    for (npc, mut groups) in npcs.iter_mut() {
        let layer = if npc.actor.player_contact() {
            Layer::Enemy
        } else {
            Layer::Corpse
        };
        let wanted = collision_groups(layer);
        if groups.memberships != wanted.memberships {
            *groups = wanted;
        }
    }
}

/// Damage the player through touching bat bodies and active attack hit boxes.
pub fn resolve_contact_damage(
    rapier_context: Query<&RapierContext>,
    npcs: Query<(Entity, &Npc)>,
    hit_boxes: Query<(Entity, &AttackHitBox)>,
    players: Query<Entity, With<Player>>,
    mut player_hits: EventWriter<PlayerHitEvent>,
) {
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    for player in players.iter() {
        // Bodies hurt on every tick of contact, not only the first
        for (entity, npc) in npcs.iter() {
            let Some(amount) = npc.body_contact_damage() else {
                continue;
            };
            let touching = context
                .contact_pair(entity, player)
                .is_some_and(|pair| pair.has_any_active_contact());
            if touching {
                player_hits.send(PlayerHitEvent {
                    player,
                    source: entity,
                    amount,
                });
            }
        }

        for (hit_box, owner) in hit_boxes.iter() {
            let Ok((_, npc)) = npcs.get(owner.owner) else {
                continue;
            };
            let Some(amount) = npc.hitbox_damage() else {
                continue;
            };
            if context.intersection_pair(hit_box, player) == Some(true) {
                player_hits.send(PlayerHitEvent {
                    player,
                    source: owner.owner,
                    amount,
                });
            }
        }
    }
}

/// Start the corpse timer of every NPC that just died.
pub fn schedule_corpse_removal(
    mut commands: Commands,
    mut deaths: EventReader<NpcDeathEvent>,
    npcs: Query<&Npc, Without<DeathTimer>>,
) {
    for death in deaths.read() {
        if let Ok(npc) = npcs.get(death.entity) {
            commands.entity(death.entity).insert(DeathTimer::new(npc.corpse_linger));
        }
    }
}

/// Despawn corpses once they have lingered long enough.
pub fn despawn_dead_npcs(mut commands: Commands, time: Res<Time>, mut query: Query<(Entity, &mut DeathTimer)>) {
    for (entity, mut death_timer) in query.iter_mut() {
        death_timer.0.tick(time.delta());

        if death_timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
