use cgmath::{InnerSpace, Vector3};
use engine::teleport_log;

use crate::{
    config::{TargetingMode, VrCharacterConfig},
    host::{CollisionWorld, NavigationQuery, Pose},
};

use super::{ArcTrajectory, ProjectileParams};

/// A walkable destination and the path that reached it
#[derive(Clone, Debug, PartialEq)]
pub struct TeleportTarget {
    pub location: Vector3<f32>,
    pub path: Vec<Vector3<f32>>,
}

/// Trace from `aim` and snap the hit onto the nav mesh.
/// None when nothing is hit in range or the hit isn't near walkable ground.
pub fn find_teleport_destination(
    config: &VrCharacterConfig,
    aim: &Pose,
    collision: &dyn CollisionWorld,
    navigation: &dyn NavigationQuery,
) -> Option<TeleportTarget> {
    let start = aim.position;
    let look = aim.forward().normalize();

    let trajectory = match config.targeting {
        TargetingMode::LineTrace => {
            ArcTrajectory::line(start, start + look * config.max_teleport_distance, collision)
        }
        TargetingMode::Projectile => {
            let params = ProjectileParams {
                start,
                launch_velocity: look * config.projectile_speed,
                radius: config.projectile_radius,
                max_sim_time: config.simulation_time,
                sim_frequency: config.sim_frequency,
                gravity: config.gravity,
            };
            ArcTrajectory::predict(&params, collision)
        }
    };

    let hit_location = trajectory.landing_position()?;

    let Some(location) = navigation.project_point(hit_location, config.projection_extent) else {
        teleport_log!(TRACE, "hit at {:?} is not on the nav mesh", hit_location);
        return None;
    };

    teleport_log!(
        TRACE,
        "destination {:?}, arc length {:.2}m",
        location,
        trajectory.get_arc_length()
    );

    Some(TeleportTarget {
        location,
        path: trajectory.points,
    })
}

/// Single-slot cache of the last valid destination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DestinationMarker {
    pub location: Vector3<f32>,
    pub visible: bool,
}

impl DestinationMarker {
    pub fn new() -> Self {
        Self {
            location: Vector3::new(0.0, 0.0, 0.0),
            visible: false,
        }
    }

    /// Overwrite the marker with this tick's result. A pinned location (the
    /// snapshot taken when a teleport starts) wins over the live candidate so
    /// the target doesn't drift while the screen fades out.
    pub fn update(&mut self, candidate: Option<Vector3<f32>>, pinned: Option<Vector3<f32>>) {
        match pinned.or(candidate) {
            Some(location) => {
                self.location = location;
                self.visible = true;
            }
            None => self.visible = false,
        }
    }

    /// The location a teleport would go to right now
    pub fn destination(&self) -> Option<Vector3<f32>> {
        self.visible.then_some(self.location)
    }
}

impl Default for DestinationMarker {
    fn default() -> Self {
        Self::new()
    }
}
