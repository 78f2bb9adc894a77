//! Collision layers and the filters probes cast against.
//!
//! Which layers count as "ground" and which as "target" is configuration:
//! the [`LayerConfig`] resource can be overridden from `assets/data/layers.ron`.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionGroups, Group};
use serde::Deserialize;

/// Physics layers used by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Layer {
    /// Terrain, walls and platforms
    Foreground,
    /// The player body
    Player,
    /// Living enemy bodies
    Enemy,
    /// Dead enemies: still land on terrain, never touch the player
    Corpse,
    /// Attack hit boxes
    Sensor,
}

impl Layer {
    pub const fn bits(self) -> u32 {
        match self {
            Layer::Foreground => 1 << 0,
            Layer::Player => 1 << 1,
            Layer::Enemy => 1 << 2,
            Layer::Corpse => 1 << 3,
            Layer::Sensor => 1 << 4,
        }
    }

    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.bits())
    }
}

/// A set of layers a probe is allowed to hit.
///
/// Deserializes from a list of layer names, e.g. `[Foreground, Player]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Vec<Layer>")]
pub struct LayerFilter(u32);

impl LayerFilter {
    pub const NONE: Self = Self(0);

    pub fn of(layers: &[Layer]) -> Self {
        Self(layers.iter().fold(0, |bits, layer| bits | layer.bits()))
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bits() != 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }
}

impl From<Vec<Layer>> for LayerFilter {
    fn from(layers: Vec<Layer>) -> Self {
        Self::of(&layers)
    }
}

/// Collision groups for a body living on `layer`.
pub fn collision_groups(layer: Layer) -> CollisionGroups {
    let filters = match layer {
        Layer::Foreground => LayerFilter::of(&[
            Layer::Foreground,
            Layer::Player,
            Layer::Enemy,
            Layer::Corpse,
        ]),
        Layer::Player => LayerFilter::of(&[Layer::Foreground, Layer::Enemy, Layer::Sensor]),
        Layer::Enemy => LayerFilter::of(&[Layer::Foreground, Layer::Player]),
        Layer::Corpse => LayerFilter::of(&[Layer::Foreground]),
        Layer::Sensor => LayerFilter::of(&[Layer::Player]),
    };
    CollisionGroups::new(layer.group(), filters.group())
}

/// Layer filters used by NPC probes.
#[derive(Resource, Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// What the vision cone can see (and be blocked by)
    pub vision: LayerFilter,
    /// What counts as an obstacle ahead of movement
    pub movement: LayerFilter,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            vision: LayerFilter::of(&[Layer::Foreground, Layer::Player]),
            movement: LayerFilter::of(&[Layer::Foreground]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_contains_only_listed_layers() {
        let filter = LayerFilter::of(&[Layer::Foreground, Layer::Player]);
        assert!(filter.contains(Layer::Foreground));
        assert!(filter.contains(Layer::Player));
        assert!(!filter.contains(Layer::Enemy));
        assert!(!LayerFilter::NONE.contains(Layer::Foreground));
    }

    #[test]
    fn config_reads_layer_names_from_ron() {
        let config: LayerConfig = ron::from_str("(vision: [Foreground], movement: [Foreground, Enemy])")
            .expect("valid layer config");
        assert_eq!(config.vision, LayerFilter::of(&[Layer::Foreground]));
        assert!(config.movement.contains(Layer::Enemy));
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let config: LayerConfig = ron::from_str("(movement: [Enemy])").expect("valid layer config");
        assert_eq!(config.vision, LayerConfig::default().vision);
        assert_eq!(config.movement, LayerFilter::of(&[Layer::Enemy]));
    }

    #[test]
    fn corpses_do_not_collide_with_the_player() {
        let corpse = collision_groups(Layer::Corpse);
        assert!(!corpse.filters.contains(Layer::Player.group()));
        assert!(collision_groups(Layer::Enemy).filters.contains(Layer::Player.group()));
    }
}
