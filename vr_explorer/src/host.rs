use cgmath::{Quaternion, Rotation, Vector2, Vector3, Vector4, vec3};

use crate::input_context::InputComponent;

/// Result of a trace against the environment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub location: Vector3<f32>,
    /// Distance from the trace start to `location`
    pub distance: f32,
}

/// Collision queries provided by the host's physics scene
pub trait CollisionWorld {
    /// First blocking hit on the segment `start..end`
    fn trace_line(&self, start: Vector3<f32>, end: Vector3<f32>) -> Option<TraceHit>;

    /// First blocking hit for a sphere swept along `start..end`.
    /// Worlds without shape casts may fall back to a line trace.
    fn trace_sphere(
        &self,
        start: Vector3<f32>,
        end: Vector3<f32>,
        _radius: f32,
    ) -> Option<TraceHit> {
        self.trace_line(start, end)
    }
}

/// Projection onto the walkable surface
pub trait NavigationQuery {
    /// Nearest walkable point within the axis-aligned box `point ± extent`
    fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFadeRequest {
    pub from_alpha: f32,
    pub to_alpha: f32,
    pub duration: f32,
    pub color: Vector3<f32>,
    pub fade_audio: bool,
    /// Keep the final alpha after the fade finishes
    pub hold_when_finished: bool,
}

/// The local player's controller. Its absence disables fades and teleporting.
pub trait PlayerController {
    fn start_camera_fade(&mut self, request: CameraFadeRequest);

    /// Screen position in pixels, or None when the point can't be projected
    fn project_world_to_screen(&self, world_location: Vector3<f32>) -> Option<Vector2<f32>>;

    fn viewport_size(&self) -> Vector2<f32>;
}

/// Dynamic parameters on a post-process material instance
pub trait MaterialParameters {
    fn set_scalar_parameter(&mut self, name: &str, value: f32);
    fn set_vector_parameter(&mut self, name: &str, value: Vector4<f32>);
}

/// Position and orientation, either in world space or relative to the VR root
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self::new(position, Quaternion::new(1.0, 0.0, 0.0, 0.0))
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(vec3(0.0, 0.0, -1.0))
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(vec3(1.0, 0.0, 0.0))
    }
}

/// Tracked device poses relative to the VR root, as reported by the headset runtime
#[derive(Clone, Copy, Debug)]
pub struct TrackingState {
    pub head: Pose,
    pub left_hand: Option<Pose>,
    pub right_hand: Option<Pose>,
}

impl TrackingState {
    pub fn head_only(head: Pose) -> Self {
        Self {
            head,
            left_hand: None,
            right_hand: None,
        }
    }
}

/// Services handed over once when play starts
#[derive(Default)]
pub struct BeginPlayContext {
    pub controller: Option<Box<dyn PlayerController>>,
    /// Instance of the blinker post-process material, if the host created one
    pub blinker_material: Option<Box<dyn MaterialParameters>>,
}

/// Everything the character reads during one frame
pub struct TickContext<'a> {
    pub delta_time: f32,
    pub tracking: TrackingState,
    /// Current velocity of the character's movement component
    pub velocity: Vector3<f32>,
    pub collision: &'a dyn CollisionWorld,
    pub navigation: &'a dyn NavigationQuery,
}

/// Callbacks the host's game loop invokes on a registered actor
pub trait GameLoopActor {
    fn begin_play(&mut self, context: BeginPlayContext);

    fn tick(&mut self, context: &TickContext);

    fn setup_player_input(&self, input: &mut InputComponent);

    /// Called before the actor is destroyed; pending timers must not fire afterwards
    fn end_play(&mut self);
}
