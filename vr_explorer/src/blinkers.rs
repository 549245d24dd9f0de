use cgmath::{InnerSpace, Vector2, Vector3, vec2, vec4};
use engine::comfort_log;

use crate::{
    config::BlinkerConfig,
    curve::ResponseCurve,
    host::{MaterialParameters, PlayerController},
};

/// Vignette anchor used when there is no meaningful direction of travel
pub const SCREEN_CENTRE: Vector2<f32> = Vector2 { x: 0.5, y: 0.5 };

/// Vignette radius for the current speed
pub fn blinker_radius(curve: &ResponseCurve, speed: f32) -> f32 {
    curve.evaluate(speed)
}

/// Normalized screen position the vignette should open around: the point
/// `stationary_distance` ahead along the direction of travel, mirrored in
/// front of the camera when moving backwards.
pub fn blinker_centre(
    velocity: Vector3<f32>,
    camera_location: Vector3<f32>,
    camera_forward: Vector3<f32>,
    controller: Option<&dyn PlayerController>,
    stationary_distance: f32,
    stationary_speed: f32,
) -> Vector2<f32> {
    if velocity.magnitude() <= stationary_speed {
        return SCREEN_CENTRE;
    }
    let direction = velocity.normalize();

    let travel_point = if camera_forward.dot(direction) > 0.0 {
        camera_location + direction * stationary_distance
    } else {
        camera_location - direction * stationary_distance
    };

    let Some(controller) = controller else {
        return SCREEN_CENTRE;
    };
    let Some(screen) = controller.project_world_to_screen(travel_point) else {
        return SCREEN_CENTRE;
    };

    let viewport = controller.viewport_size();
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return SCREEN_CENTRE;
    }
    vec2(screen.x / viewport.x, screen.y / viewport.y)
}

/// Speed-driven vignette on the blinker post-process material
pub struct Blinkers {
    config: BlinkerConfig,
    material: Option<Box<dyn MaterialParameters>>,
}

impl Blinkers {
    pub fn new(config: BlinkerConfig) -> Self {
        Self {
            config,
            material: None,
        }
    }

    pub fn set_material(&mut self, material: Option<Box<dyn MaterialParameters>>) {
        if material.is_none() {
            comfort_log!(DEBUG, "no blinker material, vignette disabled");
        }
        self.material = material;
    }

    pub fn is_enabled(&self) -> bool {
        self.material.is_some() && self.config.radius_vs_velocity.is_some()
    }

    /// Push this frame's radius and centre. Does nothing without a curve or
    /// material.
    pub fn update(
        &mut self,
        velocity: Vector3<f32>,
        camera_location: Vector3<f32>,
        camera_forward: Vector3<f32>,
        controller: Option<&dyn PlayerController>,
    ) {
        let Some(curve) = self.config.radius_vs_velocity.as_ref() else {
            return;
        };
        let Some(material) = self.material.as_mut() else {
            return;
        };

        let radius = blinker_radius(curve, velocity.magnitude());
        material.set_scalar_parameter(&self.config.radius_parameter, radius);

        let centre = blinker_centre(
            velocity,
            camera_location,
            camera_forward,
            controller,
            self.config.stationary_distance,
            self.config.stationary_speed,
        );
        material.set_vector_parameter(
            &self.config.centre_parameter,
            vec4(centre.x, centre.y, 0.0, 0.0),
        );
    }
}
