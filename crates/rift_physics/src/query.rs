//! Scene queries (raycasting)

use rapier3d::prelude as rapier;

use rift_math::{Ray, Vec3};

use crate::body::BodyTag;
use crate::layers::CollisionLayers;

/// Result of a raycast query
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// Identity of the collider that was hit. Level geometry carries its quad
    /// index here.
    pub tag: BodyTag,
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
    /// Room containing the hit collider
    pub room: usize,
}

/// Options for raycast queries
#[derive(Debug, Clone, Copy)]
pub struct RaycastOptions {
    /// Maximum distance for the ray
    pub max_distance: f32,
    /// Only hit solid colliders (not sensors)
    pub solid_only: bool,
    /// Collision layers filter
    pub filter: CollisionLayers,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::MAX,
            solid_only: true,
            filter: CollisionLayers::ALL,
        }
    }
}

impl RaycastOptions {
    /// Set maximum distance
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Set collision filter
    pub fn with_filter(mut self, filter: CollisionLayers) -> Self {
        self.filter = filter;
        self
    }

    /// Hit sensors too
    pub fn include_sensors(mut self) -> Self {
        self.solid_only = false;
        self
    }
}

/// Query interface borrowed from the collision scene
pub struct SceneQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
    /// Room each collider lives in
    pub(crate) rooms: &'a std::collections::HashMap<rapier::ColliderHandle, usize>,
    /// Collider carrying the player body, excluded from every cast
    pub(crate) player_collider: Option<rapier::ColliderHandle>,
}

impl<'a> SceneQuery<'a> {
    /// Cast a ray and get the closest hit with its surface normal
    pub fn raycast(&self, ray: &Ray, options: &RaycastOptions) -> Option<RaycastHit> {
        self.raycast_raw(ray, options).map(|(_, hit)| hit)
    }

    pub(crate) fn raycast_raw(
        &self,
        ray: &Ray,
        options: &RaycastOptions,
    ) -> Option<(rapier::ColliderHandle, RaycastHit)> {
        let rapier_ray = rapier::Ray::new(
            rapier::Point::new(ray.origin.x, ray.origin.y, ray.origin.z),
            rapier::Vector::new(ray.direction.x, ray.direction.y, ray.direction.z),
        );

        let mut filter = rapier::QueryFilter::new().groups(rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(options.filter.memberships),
            rapier::Group::from_bits_truncate(options.filter.filter),
        ));

        if options.solid_only {
            filter = filter.exclude_sensors();
        }
        if let Some(player) = self.player_collider {
            filter = filter.exclude_collider(player);
        }

        self.query_pipeline
            .cast_ray_and_get_normal(
                self.bodies,
                self.colliders,
                &rapier_ray,
                options.max_distance,
                options.solid_only,
                filter,
            )
            .map(|(handle, intersection)| {
                let point = rapier_ray.point_at(intersection.time_of_impact);
                let user_data = self
                    .colliders
                    .get(handle)
                    .map(|c| c.user_data)
                    .unwrap_or(0);

                let hit = RaycastHit {
                    tag: BodyTag::unpack(user_data),
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                    distance: intersection.time_of_impact,
                    room: self.rooms.get(&handle).copied().unwrap_or(0),
                };
                (handle, hit)
            })
    }
}
