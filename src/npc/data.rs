//! NPC definitions loaded from RON files.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::actor::{Actor, ActorConfig, BodyProbe, Facing, Patrol, VisionCone, DEFAULT_WAYPOINT_RADIUS};
use super::bat::{Bat, BatConfig, DEFAULT_FALL_VELOCITY};
use super::behavior::{Behavior, Npc, DEFAULT_CORPSE_LINGER};
use super::cue::{Cue, CueClip, CuePlayer};
use super::error::{DataLoadError, NpcConfigError};
use super::guardian::{ChaseRange, Guardian, GuardianConfig};
use super::hostile::Hostile;
use super::spawning::NpcSpawn;
use crate::core::NpcKind;
use crate::probe::LayerConfig;

/// Directory holding one definition file per NPC type.
pub const NPC_DATA_DIR: &str = "assets/data/npcs";

/// Optional override of the probe layer filters.
pub const LAYER_CONFIG_PATH: &str = "assets/data/layers.ron";

/// Vision cone settings.
#[derive(Deserialize, Clone, Debug)]
pub struct VisionDef {
    pub rays: usize,
    pub angle: f32,
    pub distance: f32,
    #[serde(default)]
    pub origin_offset: (f32, f32),
}

/// Body size and the obstacle probe cast ahead of it.
#[derive(Deserialize, Clone, Debug)]
pub struct BodyDef {
    pub half_extents: (f32, f32),
    pub samples: usize,
    pub probe_distance: f32,
}

/// Attack hit box, offset toward the facing side.
#[derive(Deserialize, Clone, Debug)]
pub struct HitBoxDef {
    pub offset: (f32, f32),
    pub half_extents: (f32, f32),
}

/// Family-specific settings.
#[derive(Deserialize, Clone, Debug)]
pub enum KindDef {
    Guardian {
        distancing: f32,
        attack_cooldown: f32,
        chase_range: ChaseRange,
    },
    Bat {
        speed_multiplier: f32,
        #[serde(default = "default_fall_velocity")]
        fall_velocity: (f32, f32),
    },
}

fn default_fall_velocity() -> (f32, f32) {
    DEFAULT_FALL_VELOCITY.into()
}

fn default_true() -> bool {
    true
}

fn default_waypoint_radius() -> f32 {
    DEFAULT_WAYPOINT_RADIUS
}

fn default_corpse_linger() -> f32 {
    DEFAULT_CORPSE_LINGER
}

/// NPC definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct NpcDefinition {
    pub name: String,
    pub health: f32,
    pub speed: f32,
    #[serde(default)]
    pub stop_time: f32,
    #[serde(default = "default_true")]
    pub flip_on_move: bool,
    #[serde(default)]
    pub vertical_patrol: bool,
    #[serde(default = "default_waypoint_radius")]
    pub waypoint_radius: f32,
    pub vision: VisionDef,
    pub body: BodyDef,
    pub contact_damage: f32,
    #[serde(default = "default_corpse_linger")]
    pub corpse_linger: f32,
    #[serde(default)]
    pub hit_box: Option<HitBoxDef>,
    #[serde(default)]
    pub cues: HashMap<Cue, CueClip>,
    pub kind: KindDef,
}

fn positive(field: &'static str, value: f32) -> Result<(), NpcConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(NpcConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), NpcConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(NpcConfigError::Negative { field, value })
    }
}

impl NpcDefinition {
    pub fn kind(&self) -> NpcKind {
        match self.kind {
            KindDef::Guardian { .. } => NpcKind::Guardian,
            KindDef::Bat { .. } => NpcKind::Bat,
        }
    }

    /// Check every value the state machines rely on.
    pub fn validate(&self) -> Result<(), NpcConfigError> {
        positive("health", self.health)?;
        non_negative("speed", self.speed)?;
        non_negative("stop_time", self.stop_time)?;
        positive("waypoint_radius", self.waypoint_radius)?;
        non_negative("vision.angle", self.vision.angle)?;
        non_negative("vision.distance", self.vision.distance)?;
        positive("body.half_extents.x", self.body.half_extents.0)?;
        positive("body.half_extents.y", self.body.half_extents.1)?;
        non_negative("body.probe_distance", self.body.probe_distance)?;
        non_negative("contact_damage", self.contact_damage)?;
        non_negative("corpse_linger", self.corpse_linger)?;

        if let Some(hit_box) = &self.hit_box {
            positive("hit_box.half_extents.x", hit_box.half_extents.0)?;
            positive("hit_box.half_extents.y", hit_box.half_extents.1)?;
        }

        for clip in self.cues.values() {
            non_negative("cue duration", clip.duration)?;
            if let Some((start, end)) = clip.damage_window {
                if !(0.0..=1.0).contains(&start) || !(start..=1.0).contains(&end) {
                    return Err(NpcConfigError::InvalidDamageWindow { start, end });
                }
            }
        }

        match &self.kind {
            KindDef::Guardian {
                distancing,
                attack_cooldown,
                chase_range,
            } => {
                non_negative("distancing", *distancing)?;
                non_negative("attack_cooldown", *attack_cooldown)?;
                non_negative("chase_range.left", chase_range.left)?;
                non_negative("chase_range.right", chase_range.right)?;
            }
            KindDef::Bat { speed_multiplier, .. } => {
                positive("speed_multiplier", *speed_multiplier)?;
            }
        }
        Ok(())
    }

    /// Cue player timed from this definition's clips.
    pub fn cue_player(&self) -> CuePlayer {
        CuePlayer::new(self.cues.clone())
    }

    /// Build the NPC for one spawn, refusing invalid configuration.
    pub fn build(&self, spawn: &NpcSpawn, layers: LayerConfig) -> Result<Npc, NpcConfigError> {
        self.validate()?;

        let waypoints = spawn.waypoints.iter().copied().map(Vec2::from).collect();
        let mut patrol = Patrol::new(waypoints)?;
        patrol.reached_radius = self.waypoint_radius;
        patrol.stop_time = self.stop_time;
        patrol.flip_on_move = self.flip_on_move;
        patrol.vertical = self.vertical_patrol;

        let position = Vec2::from(spawn.position);
        let actor = Actor::new(ActorConfig {
            health: self.health,
            speed: self.speed,
            position,
            facing: if spawn.facing_left { Facing::Left } else { Facing::Right },
            patrol,
            vision: VisionCone {
                rays: self.vision.rays,
                angle: self.vision.angle,
                distance: self.vision.distance,
                origin_offset: Vec2::from(self.vision.origin_offset),
            },
            body: BodyProbe {
                half_extents: Vec2::from(self.body.half_extents),
                samples: self.body.samples,
                distance: self.body.probe_distance,
            },
            layers,
        });

        let behavior = match &self.kind {
            KindDef::Guardian {
                distancing,
                attack_cooldown,
                chase_range,
            } => Behavior::Guardian(Guardian::new(GuardianConfig {
                guard_point: spawn.guard_point.unwrap_or(position.x),
                chase_range: *chase_range,
                distancing: *distancing,
                attack_cooldown: *attack_cooldown,
            })),
            KindDef::Bat {
                speed_multiplier,
                fall_velocity,
            } => Behavior::Bat(Bat::new(BatConfig {
                speed_multiplier: *speed_multiplier,
                fall_velocity: Vec2::from(*fall_velocity),
            })),
        };

        let mut npc = Npc::new(actor, Hostile::new(self.contact_damage), behavior);
        npc.corpse_linger = self.corpse_linger;
        Ok(npc)
    }
}

/// Resource holding all loaded NPC definitions, keyed by file stem.
#[derive(Resource, Default)]
pub struct NpcRegistry {
    pub definitions: HashMap<String, NpcDefinition>,
}

impl NpcRegistry {
    /// Get an NPC definition by type name.
    pub fn get(&self, npc_type: &str) -> Option<&NpcDefinition> {
        self.definitions.get(npc_type)
    }
}

/// Parse RON text, labelling errors with `path`.
pub fn parse_ron<T: DeserializeOwned>(path: &str, contents: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })
}

/// Read and parse a RON file.
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let label = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(label));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: label.clone(),
        details: e.to_string(),
    })?;
    parse_ron(&label, &contents)
}

/// Load all NPC definitions from the assets/data/npcs/ directory.
pub fn load_npc_definitions(mut registry: ResMut<NpcRegistry>) {
    let npc_dir = Path::new(NPC_DATA_DIR);

    if !npc_dir.exists() {
        warn!("NPC definitions directory not found: {:?}", npc_dir);
        return;
    }

    let Ok(entries) = fs::read_dir(npc_dir) else {
        warn!("Failed to read NPC definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }

        let npc_type = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        match read_ron::<NpcDefinition>(&path) {
            Ok(definition) => {
                info!("Loaded NPC definition: {} ({})", definition.name, npc_type);
                registry.definitions.insert(npc_type, definition);
            }
            Err(e) => error!("Failed to load NPC definition: {}", e),
        }
    }

    info!("Loaded {} NPC definitions", registry.definitions.len());
}

/// Override the probe layer filters from assets/data/layers.ron when present.
pub fn load_layer_config(mut layers: ResMut<LayerConfig>) {
    match read_ron::<LayerConfig>(Path::new(LAYER_CONFIG_PATH)) {
        Ok(config) => {
            *layers = config;
            info!("Loaded layer config from {}", LAYER_CONFIG_PATH);
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Layer config {} not found, using defaults", path);
        }
        Err(e) => error!("Failed to load layer config: {}", e),
    }
}
