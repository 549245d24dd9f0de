use cgmath::{Vector3, vec3};
use engine::locomotion_log;

/// Horizontal offset between the tracked camera and the actor origin.
///
/// The actor is moved by the returned offset and the VR root by its negative,
/// which keeps the camera where it is in the world while the capsule follows
/// the player around the room.
pub fn recenter(actor_location: Vector3<f32>, camera_world: Vector3<f32>) -> Vector3<f32> {
    let offset = camera_world - actor_location;
    vec3(offset.x, 0.0, offset.z)
}

/// Apply [`recenter`] to the actor and VR root in place. Returns the offset.
pub fn apply_recenter(
    actor_location: &mut Vector3<f32>,
    vr_root_offset: &mut Vector3<f32>,
    camera_world: Vector3<f32>,
) -> Vector3<f32> {
    let offset = recenter(*actor_location, camera_world);
    *actor_location += offset;
    *vr_root_offset -= offset;

    if offset.x != 0.0 || offset.z != 0.0 {
        locomotion_log!(TRACE, "recentered by {:?}", offset);
    }
    offset
}

/// Movement requests gathered from the locomotion axes since the last consume
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementInput {
    pending: Vector3<f32>,
}

impl MovementInput {
    pub fn new() -> Self {
        Self {
            pending: vec3(0.0, 0.0, 0.0),
        }
    }

    pub fn add(&mut self, direction: Vector3<f32>, scale: f32) {
        self.pending += direction * scale;
    }

    pub fn pending(&self) -> Vector3<f32> {
        self.pending
    }

    /// Take the accumulated input and reset it
    pub fn consume(&mut self) -> Vector3<f32> {
        std::mem::replace(&mut self.pending, vec3(0.0, 0.0, 0.0))
    }
}

impl Default for MovementInput {
    fn default() -> Self {
        Self::new()
    }
}
