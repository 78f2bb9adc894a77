//! Single, fan-shaped and grid-shaped ray casts.

use bevy::prelude::*;
use serde::Deserialize;

use super::layers::LayerFilter;
use super::vector::rotate_vector;

/// Classification tag carried by colliders that probes care about.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ProbeTag {
    Ground,
    Player,
    Enemy,
}

/// Identity of a collider a ray ran into.
#[derive(Debug, Clone, PartialEq)]
pub struct HitCollider {
    pub entity: Entity,
    pub name: Option<Name>,
    pub tag: Option<ProbeTag>,
}

/// Result of one ray cast. A miss has no collider and ends at full length.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub collider: Option<HitCollider>,
    pub point: Vec2,
    pub distance: f32,
}

impl RayHit {
    pub fn miss(origin: Vec2, direction: Vec2, max_distance: f32) -> Self {
        Self {
            collider: None,
            point: origin + direction * max_distance,
            distance: max_distance,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.collider.is_some()
    }

    pub fn entity(&self) -> Option<Entity> {
        self.collider.as_ref().map(|c| c.entity)
    }
}

/// The collision world as seen by probes.
pub trait RayCaster {
    /// Closest collider on a layer in `filter` along the ray, with its distance.
    ///
    /// `direction` is normalized by the caller.
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: LayerFilter,
    ) -> Option<(HitCollider, f32)>;
}

/// Empty world, used when no physics context exists.
pub struct NoColliders;

impl RayCaster for NoColliders {
    fn cast_ray(&self, _: Vec2, _: Vec2, _: f32, _: LayerFilter) -> Option<(HitCollider, f32)> {
        None
    }
}

/// Cast a single ray.
pub fn raycast(
    caster: &dyn RayCaster,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    filter: LayerFilter,
) -> RayHit {
    let direction = direction.normalize_or_zero();
    match caster.cast_ray(origin, direction, max_distance, filter) {
        Some((collider, distance)) => RayHit {
            collider: Some(collider),
            point: origin + direction * distance,
            distance,
        },
        None => RayHit::miss(origin, direction, max_distance),
    }
}

/// Number of rays a fan actually casts: even counts gain one so a ray
/// always runs straight down the middle.
pub fn fan_ray_count(count: usize) -> usize {
    if count > 0 && count % 2 == 0 {
        count + 1
    } else {
        count
    }
}

/// Cast `count` rays spread evenly over `total_angle` degrees, centered on
/// `direction`. Rays start `origin_offset` units along `direction`.
///
/// Results are ordered from the most counter-clockwise ray to the most
/// clockwise one.
#[allow(clippy::too_many_arguments)]
pub fn raycast_fan(
    caster: &dyn RayCaster,
    count: usize,
    total_angle: f32,
    origin: Vec2,
    origin_offset: f32,
    direction: Vec2,
    max_distance: f32,
    filter: LayerFilter,
) -> Vec<RayHit> {
    let count = fan_ray_count(count);
    let direction = direction.normalize_or_zero();
    let origin = origin + direction * origin_offset;

    let (first, step) = if count > 1 {
        (total_angle / 2.0, total_angle / (count - 1) as f32)
    } else {
        (0.0, 0.0)
    };

    (0..count)
        .map(|i| {
            let ray = rotate_vector(direction, first - step * i as f32);
            raycast(caster, origin, ray, max_distance, filter)
        })
        .collect()
}

/// Cast `samples` parallel rays from the leading edges of `bounds` in the
/// direction of `movement`.
///
/// Horizontal movement probes the left or right edge, vertical movement the
/// top or bottom edge, diagonal movement both (horizontal rays first). A
/// body standing still casts nothing.
pub fn raycast_grid(
    caster: &dyn RayCaster,
    bounds: Rect,
    movement: Vec2,
    samples: usize,
    probe_distance: f32,
    filter: LayerFilter,
) -> Vec<RayHit> {
    let mut hits = Vec::new();
    if samples == 0 {
        return hits;
    }

    let spacing = |extent: f32| {
        if samples > 1 {
            extent / (samples - 1) as f32
        } else {
            0.0
        }
    };

    if movement.x != 0.0 {
        let step = spacing(bounds.height());
        let (x, direction) = if movement.x > 0.0 {
            (bounds.max.x, Vec2::X)
        } else {
            (bounds.min.x, Vec2::NEG_X)
        };
        hits.extend((0..samples).map(|i| {
            let origin = Vec2::new(x, bounds.max.y - step * i as f32);
            raycast(caster, origin, direction, probe_distance, filter)
        }));
    }

    if movement.y != 0.0 {
        let step = spacing(bounds.width());
        let (y, direction) = if movement.y > 0.0 {
            (bounds.max.y, Vec2::Y)
        } else {
            (bounds.min.y, Vec2::NEG_Y)
        };
        hits.extend((0..samples).map(|i| {
            let origin = Vec2::new(bounds.max.x - step * i as f32, y);
            raycast(caster, origin, direction, probe_distance, filter)
        }));
    }

    hits
}

/// First hit (in cast order) on a collider called `name`.
pub fn find_first_by_name<'a>(hits: &'a [RayHit], name: &str) -> Option<&'a RayHit> {
    hits.iter().find(|hit| {
        hit.collider
            .as_ref()
            .and_then(|c| c.name.as_ref())
            .is_some_and(|n| n.as_str() == name)
    })
}

/// Number of hits on colliders tagged `tag`.
pub fn count_by_tag(hits: &[RayHit], tag: ProbeTag) -> usize {
    hits.iter()
        .filter(|hit| hit.collider.as_ref().is_some_and(|c| c.tag == Some(tag)))
        .count()
}
