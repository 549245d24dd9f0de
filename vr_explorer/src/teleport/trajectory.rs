use cgmath::{InnerSpace, Vector3};

use crate::{
    config::MAX_SIMULATION_STEPS,
    host::{CollisionWorld, TraceHit},
};

/// Launch parameters for a predicted teleport projectile
#[derive(Clone, Copy, Debug)]
pub struct ProjectileParams {
    pub start: Vector3<f32>,
    pub launch_velocity: Vector3<f32>,
    pub radius: f32,
    /// Longest simulated flight, in seconds
    pub max_sim_time: f32,
    /// Samples per simulated second
    pub sim_frequency: f32,
    /// Downward acceleration along -Y
    pub gravity: f32,
}

/// Arc trajectory sampled into a polyline, stopped at the first collision
#[derive(Clone, Debug, Default)]
pub struct ArcTrajectory {
    /// Points along the arc, starting at the launch position. When the arc
    /// hit something, the last point is the hit location.
    pub points: Vec<Vector3<f32>>,
    pub hit: Option<TraceHit>,
}

impl ArcTrajectory {
    /// Step the projectile through `world` until it hits something or the
    /// simulation time runs out
    pub fn predict(params: &ProjectileParams, world: &dyn CollisionWorld) -> Self {
        let mut points = vec![params.start];

        if params.sim_frequency <= 0.0 || params.max_sim_time <= 0.0 {
            return ArcTrajectory { points, hit: None };
        }

        let time_step = 1.0 / params.sim_frequency;
        let steps = (params.max_sim_time * params.sim_frequency)
            .ceil()
            .min(MAX_SIMULATION_STEPS) as usize;
        let mut previous = params.start;

        for step in 1..=steps {
            let t = (step as f32 * time_step).min(params.max_sim_time);
            let position = Self::calculate_position_at_time(
                params.start,
                params.launch_velocity,
                params.gravity,
                t,
            );

            if let Some(hit) = world.trace_sphere(previous, position, params.radius) {
                points.push(hit.location);
                return ArcTrajectory {
                    points,
                    hit: Some(hit),
                };
            }

            points.push(position);
            previous = position;
        }

        ArcTrajectory { points, hit: None }
    }

    /// Straight trace treated as a two-point path
    pub fn line(start: Vector3<f32>, end: Vector3<f32>, world: &dyn CollisionWorld) -> Self {
        match world.trace_line(start, end) {
            Some(hit) => ArcTrajectory {
                points: vec![start, hit.location],
                hit: Some(hit),
            },
            None => ArcTrajectory {
                points: vec![start, end],
                hit: None,
            },
        }
    }

    /// Calculate position at specific time using kinematic equation
    fn calculate_position_at_time(
        start_position: Vector3<f32>,
        initial_velocity: Vector3<f32>,
        gravity: f32,
        time: f32,
    ) -> Vector3<f32> {
        Vector3::new(
            start_position.x + initial_velocity.x * time,
            start_position.y + initial_velocity.y * time - 0.5 * gravity * time * time,
            start_position.z + initial_velocity.z * time,
        )
    }

    pub fn landing_position(&self) -> Option<Vector3<f32>> {
        self.hit.map(|hit| hit.location)
    }

    pub fn get_arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FlatWorld;
    use cgmath::vec3;

    fn params(start: Vector3<f32>, direction: Vector3<f32>, speed: f32) -> ProjectileParams {
        ProjectileParams {
            start,
            launch_velocity: direction.normalize() * speed,
            radius: 0.0,
            max_sim_time: 5.0,
            sim_frequency: 15.0,
            gravity: 9.8,
        }
    }

    #[test]
    fn test_arc_lands_on_floor() {
        let world = FlatWorld::new(0.0);
        let trajectory = ArcTrajectory::predict(
            &params(vec3(0.0, 2.0, 0.0), vec3(0.0, 0.5, -1.0), 10.0),
            &world,
        );

        let landing = trajectory.landing_position().unwrap();
        assert!(landing.y.abs() < 1e-4);
        assert!(landing.z < -1.0);
        assert_eq!(trajectory.points.first(), Some(&vec3(0.0, 2.0, 0.0)));
        assert_eq!(trajectory.points.last(), Some(&landing));
    }

    #[test]
    fn test_horizontal_throw_moves_forward() {
        let world = FlatWorld::new(0.0);
        let trajectory = ArcTrajectory::predict(
            &params(vec3(0.0, 5.0, 0.0), vec3(1.0, 0.0, 0.0), 10.0),
            &world,
        );

        let landing = trajectory.landing_position().unwrap();
        // ~1.01s of fall at 10 m/s
        assert!(landing.x > 9.0 && landing.x < 11.0);
    }

    #[test]
    fn test_no_hit_runs_full_simulation() {
        let world = FlatWorld::new(-1000.0);
        let trajectory = ArcTrajectory::predict(
            &params(vec3(0.0, 2.0, 0.0), vec3(0.0, 0.0, -1.0), 10.0),
            &world,
        );

        assert!(trajectory.hit.is_none());
        // start + 75 samples at 15 Hz over 5s
        assert_eq!(trajectory.points.len(), 76);
    }

    #[test]
    fn test_sample_count_is_capped() {
        let world = FlatWorld::new(-1e9);
        let mut long_flight = params(vec3(0.0, 2.0, 0.0), vec3(0.0, 0.0, -1.0), 10.0);
        long_flight.max_sim_time = 1e6;
        long_flight.sim_frequency = 1e3;

        let trajectory = ArcTrajectory::predict(&long_flight, &world);
        assert!(trajectory.hit.is_none());
        assert_eq!(trajectory.points.len(), MAX_SIMULATION_STEPS as usize + 1);
    }

    #[test]
    fn test_points_are_monotonic_in_travel_direction() {
        let world = FlatWorld::new(0.0);
        let trajectory = ArcTrajectory::predict(
            &params(vec3(0.0, 1.5, 0.0), vec3(0.0, 0.3, -1.0), 8.0),
            &world,
        );
        assert!(trajectory
            .points
            .windows(2)
            .all(|pair| pair[1].z < pair[0].z));
    }

    #[test]
    fn test_line_trace_path() {
        let world = FlatWorld::new(0.0);
        let hit = ArcTrajectory::line(vec3(0.0, 2.0, 0.0), vec3(0.0, -2.0, -4.0), &world);
        assert_eq!(hit.points.len(), 2);
        assert!(hit.landing_position().is_some());

        let miss = ArcTrajectory::line(vec3(0.0, 2.0, 0.0), vec3(0.0, 2.0, -4.0), &world);
        assert!(miss.hit.is_none());
        assert_eq!(miss.points, vec![vec3(0.0, 2.0, 0.0), vec3(0.0, 2.0, -4.0)]);
    }

    #[test]
    fn test_get_arc_length() {
        let trajectory = ArcTrajectory {
            points: vec![vec3(0.0, 0.0, 0.0), vec3(3.0, 4.0, 0.0), vec3(3.0, 4.0, 2.0)],
            hit: None,
        };
        assert_eq!(trajectory.get_arc_length(), 7.0);
    }
}
