//! Rapier-backed ray caster.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionGroups, Group, QueryFilter, RapierContext};

use super::layers::LayerFilter;
use super::raycast::{HitCollider, RayCaster};

/// Casts probe rays into the Rapier physics world.
///
/// Sensors never block rays, and the probing body can exclude its own collider.
pub struct RapierProbe<'a> {
    context: &'a RapierContext,
    identify: &'a dyn Fn(Entity) -> HitCollider,
    exclude: Option<Entity>,
}

impl<'a> RapierProbe<'a> {
    pub fn new(context: &'a RapierContext, identify: &'a dyn Fn(Entity) -> HitCollider) -> Self {
        Self {
            context,
            identify,
            exclude: None,
        }
    }

    /// Ignore the collider attached to `entity`.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

impl RayCaster for RapierProbe<'_> {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: LayerFilter,
    ) -> Option<(HitCollider, f32)> {
        let mut query = QueryFilter::default()
            .exclude_sensors()
            .groups(CollisionGroups::new(Group::ALL, filter.group()));
        if let Some(entity) = self.exclude {
            query = query.exclude_collider(entity);
        }

        self.context
            .cast_ray(origin, direction, max_distance, true, query)
            .map(|(entity, distance)| ((self.identify)(entity), distance))
    }
}
