//! Fake collision worlds for unit tests.

use std::cell::RefCell;

use bevy::prelude::*;

use super::layers::{Layer, LayerFilter};
use super::raycast::{HitCollider, ProbeTag, RayCaster};

/// A world made of axis-aligned boxes.
#[derive(Default)]
pub struct BoxWorld {
    bodies: Vec<(Rect, Layer, HitCollider)>,
    next_id: u32,
}

impl BoxWorld {
    /// Add a box and return the entity id it reports on hits.
    pub fn add(&mut self, name: &str, tag: ProbeTag, layer: Layer, center: Vec2, half: Vec2) -> Entity {
        self.next_id += 1;
        let entity = Entity::from_raw(1000 + self.next_id);
        self.bodies.push((
            Rect::from_center_half_size(center, half),
            layer,
            HitCollider {
                entity,
                name: Some(Name::new(name.to_string())),
                tag: Some(tag),
            },
        ));
        entity
    }

    /// Move the box owned by `entity`.
    pub fn place(&mut self, entity: Entity, center: Vec2) {
        for (rect, _, collider) in &mut self.bodies {
            if collider.entity == entity {
                *rect = Rect::from_center_half_size(center, rect.half_size());
            }
        }
    }
}

impl RayCaster for BoxWorld {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: LayerFilter,
    ) -> Option<(HitCollider, f32)> {
        self.bodies
            .iter()
            .filter(|(_, layer, _)| filter.contains(*layer))
            .filter_map(|(rect, _, collider)| {
                entry_distance(origin, direction, *rect)
                    .filter(|t| *t <= max_distance)
                    .map(|t| (collider.clone(), t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Slab test: distance along the ray to where it enters `rect`.
fn entry_distance(origin: Vec2, direction: Vec2, rect: Rect) -> Option<f32> {
    let mut near = 0.0f32;
    let mut far = f32::INFINITY;
    for (o, d, lo, hi) in [
        (origin.x, direction.x, rect.min.x, rect.max.x),
        (origin.y, direction.y, rect.min.y, rect.max.y),
    ] {
        if d.abs() < 1e-6 {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let (t1, t2) = ((lo - o) / d, (hi - o) / d);
            near = near.max(t1.min(t2));
            far = far.min(t1.max(t2));
            if near > far {
                return None;
            }
        }
    }
    Some(near)
}

/// Records every ray cast against it and never hits anything.
#[derive(Default)]
pub struct RecordingCaster {
    rays: RefCell<Vec<(Vec2, Vec2)>>,
}

impl RecordingCaster {
    pub fn origins(&self) -> Vec<Vec2> {
        self.rays.borrow().iter().map(|(o, _)| *o).collect()
    }

    pub fn directions(&self) -> Vec<Vec2> {
        self.rays.borrow().iter().map(|(_, d)| *d).collect()
    }
}

impl RayCaster for RecordingCaster {
    fn cast_ray(&self, origin: Vec2, direction: Vec2, _: f32, _: LayerFilter) -> Option<(HitCollider, f32)> {
        self.rays.borrow_mut().push((origin, direction));
        None
    }
}
