//! Probe module - vector helpers and batched ray casts.
//!
//! Vision cones and ground/wall detection are both built from the same
//! primitive: a single ray cast against a layer filter. The collision world
//! sits behind the [`RayCaster`] trait so the NPC brains can be driven by
//! Rapier in the game and by plain boxes in tests.

mod layers;
mod rapier;
mod raycast;
mod vector;

#[cfg(test)]
pub(crate) mod testing;

pub use layers::{collision_groups, Layer, LayerConfig, LayerFilter};
pub use rapier::RapierProbe;
pub use raycast::*;
pub use vector::{move_towards, rotate_vector};
