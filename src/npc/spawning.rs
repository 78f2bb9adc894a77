//! Level spawn lists and NPC entity construction.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::components::AttackHitBox;
use super::data::{read_ron, NpcDefinition, NpcRegistry};
use super::error::{DataLoadError, NpcConfigError};
use crate::probe::{collision_groups, Layer, LayerConfig, ProbeTag};

/// One NPC placed in a level.
#[derive(Deserialize, Clone, Debug)]
pub struct NpcSpawn {
    /// Registry key, i.e. the definition file stem
    pub definition: String,
    pub position: (f32, f32),
    pub waypoints: Vec<(f32, f32)>,
    /// Centre of a guardian's chase range. Defaults to the spawn x.
    #[serde(default)]
    pub guard_point: Option<f32>,
    #[serde(default)]
    pub facing_left: bool,
}

/// Level spawn file structure.
#[derive(Deserialize, Clone, Debug)]
pub struct LevelSpawns {
    pub spawns: Vec<NpcSpawn>,
}

/// Spawns to place when the game starts.
#[derive(Resource, Default, Debug)]
pub struct LevelSpawnList(pub Vec<NpcSpawn>);

pub fn load_level_spawns(path: impl AsRef<Path>) -> Result<LevelSpawns, DataLoadError> {
    read_ron(path.as_ref())
}

/// Spawn one NPC with its body and, if defined, its attack hit box.
pub fn spawn_npc(
    commands: &mut Commands,
    definition: &NpcDefinition,
    spawn: &NpcSpawn,
    layers: LayerConfig,
) -> Result<Entity, NpcConfigError> {
    let npc = definition.build(spawn, layers)?;
    let half = npc.actor.body().half_extents;
    let position = npc.actor.position;

    // Flyers are moved kinematically; walkers leave their vertical axis to gravity.
    let body = if definition.vertical_patrol {
        RigidBody::KinematicPositionBased
    } else {
        RigidBody::Dynamic
    };

    let mut entity = commands.spawn((
        Name::new(definition.name.clone()),
        ProbeTag::Enemy,
        definition.cue_player(),
        npc,
        Transform::from_translation(position.extend(0.0)),
        body,
        Collider::cuboid(half.x, half.y),
        collision_groups(Layer::Enemy),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
    ));

    if let Some(hit_box) = &definition.hit_box {
        let owner = entity.id();
        let offset = Vec2::from(hit_box.offset);
        entity.with_children(|parent| {
            parent.spawn((
                AttackHitBox { owner, offset },
                Transform::from_translation(offset.extend(0.0)),
                Collider::cuboid(hit_box.half_extents.0, hit_box.half_extents.1),
                Sensor,
                collision_groups(Layer::Sensor),
            ));
        });
    }

    Ok(entity.id())
}

/// Spawn every NPC of the current level.
pub fn spawn_level_npcs(
    mut commands: Commands,
    registry: Res<NpcRegistry>,
    layers: Res<LayerConfig>,
    spawns: Option<Res<LevelSpawnList>>,
) {
    let Some(spawns) = spawns else {
        warn!("No level spawn list loaded, no NPCs spawned");
        return;
    };

    for spawn in &spawns.0 {
        let Some(definition) = registry.get(&spawn.definition) else {
            warn!("{}", NpcConfigError::UnknownDefinition(spawn.definition.clone()));
            continue;
        };

        match spawn_npc(&mut commands, definition, spawn, *layers) {
            Ok(_) => info!(
                "Spawned {} at ({}, {})",
                definition.name, spawn.position.0, spawn.position.1
            ),
            Err(e) => error!("Refused to spawn {}: {}", spawn.definition, e),
        }
    }
}
