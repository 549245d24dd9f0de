pub mod util;

use cgmath::{InnerSpace, Quaternion, Vector3};
use engine::physics_log;
use rapier3d::{
    parry::{query::ShapeCastOptions, shape::Ball},
    prelude::*,
};

use crate::host::{CollisionWorld, TraceHit};

use util::{quat_to_nquat, vec_to_npoint, vec_to_nvec};

/// Static collision scene for teleport traces, backed by rapier
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        self.query_pipeline.update(&self.collider_set);
        handle
    }

    /// Axis-aligned ground slab whose top face sits at `height`
    pub fn add_ground(&mut self, height: f32, half_size: f32) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_size, 0.5, half_size)
            .translation(vector![0.0, height - 0.5, 0.0])
            .build();
        self.add_static_collider(collider)
    }

    pub fn add_static_box(
        &mut self,
        half_extents: Vector3<f32>,
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vec_to_nvec(position))
            .rotation(quat_to_nquat(rotation).scaled_axis())
            .build();
        self.add_static_collider(collider)
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Cast along `start..end`, reporting the hit as a fraction of the segment
    fn cast_segment(&self, start: Vector3<f32>, end: Vector3<f32>, max_toi: f32) -> Option<f32> {
        let delta = end - start;
        if delta.magnitude2() <= f32::EPSILON {
            return None;
        }

        let ray = Ray::new(vec_to_npoint(start), vec_to_nvec(delta));
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_toi,
                true,
                QueryFilter::default(),
            )
            .map(|(_handle, toi)| toi)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionWorld for PhysicsWorld {
    fn trace_line(&self, start: Vector3<f32>, end: Vector3<f32>) -> Option<TraceHit> {
        let toi = self.cast_segment(start, end, 1.0)?;
        let location = start + (end - start) * toi;
        physics_log!(TRACE, "line trace hit at {:?}", location);
        Some(TraceHit {
            location,
            distance: (location - start).magnitude(),
        })
    }

    /// Sweeps a ball of `radius`. The hit location is the ball's centre at
    /// the time of impact.
    fn trace_sphere(
        &self,
        start: Vector3<f32>,
        end: Vector3<f32>,
        radius: f32,
    ) -> Option<TraceHit> {
        if radius <= 0.0 {
            return self.trace_line(start, end);
        }

        let delta = end - start;
        let shape_pos = Isometry::translation(start.x, start.y, start.z);
        let (_handle, hit) = self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &vec_to_nvec(delta),
            &Ball::new(radius),
            ShapeCastOptions::with_max_time_of_impact(1.0),
            QueryFilter::default(),
        )?;

        let location = start + delta * hit.time_of_impact;
        physics_log!(TRACE, "sphere trace hit at {:?}", location);
        Some(TraceHit {
            location,
            distance: (location - start).magnitude(),
        })
    }
}
