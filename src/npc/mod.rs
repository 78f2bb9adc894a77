//! NPC module - patrolling enemies, their senses, and their combat reactions.
//!
//! Every NPC is an [`Npc`] component: an [`Actor`] (health, patrol route,
//! facing, vision and body probes, hit/death sequence) plus the
//! [`Behavior`] of its family. The state machines are plain Rust driven
//! through a [`TickContext`]; the systems in this module feed them from the
//! ECS and turn their [`Outbox`] into component writes and events.

pub mod actor;
pub mod bat;
pub mod behavior;
pub mod components;
pub mod context;
pub mod cue;
pub mod data;
pub mod error;
pub mod guardian;
pub mod hostile;
mod plugin;
pub mod spawning;
pub mod systems;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{Actor, ActorConfig, BodyProbe, Facing, HitReaction, Patrol, VisionCone};
pub use bat::{Bat, BatConfig};
pub use behavior::{Activity, Behavior, Npc};
pub use components::{AttackHitBox, DeathTimer};
pub use context::{NpcEvent, Outbox, TargetLookup, TargetRoster, TickContext};
pub use cue::{Cue, CueClip, CueFeed, CuePlayer, CueSignal};
pub use data::{NpcDefinition, NpcRegistry};
pub use error::{DataLoadError, NpcConfigError};
pub use guardian::{ChaseRange, Guardian, GuardianConfig};
pub use hostile::Hostile;
pub use plugin::NpcPlugin;
pub use spawning::{load_level_spawns, spawn_npc, LevelSpawnList, LevelSpawns, NpcSpawn};
