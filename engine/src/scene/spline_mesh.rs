use cgmath::{Vector3, Zero};

/// A mesh deformed along one cubic Hermite segment, in the owning
/// component's local space
#[derive(Clone, Debug, PartialEq)]
pub struct SplineMeshObject {
    pub mesh: Option<String>,
    pub material: Option<String>,
    pub start_position: Vector3<f32>,
    pub start_tangent: Vector3<f32>,
    pub end_position: Vector3<f32>,
    pub end_tangent: Vector3<f32>,
    pub visible: bool,
}

impl SplineMeshObject {
    pub fn new(mesh: Option<String>, material: Option<String>) -> Self {
        Self {
            mesh,
            material,
            start_position: Vector3::zero(),
            start_tangent: Vector3::zero(),
            end_position: Vector3::zero(),
            end_tangent: Vector3::zero(),
            visible: false,
        }
    }

    pub fn set_start_and_end(
        &mut self,
        start_position: Vector3<f32>,
        start_tangent: Vector3<f32>,
        end_position: Vector3<f32>,
        end_tangent: Vector3<f32>,
    ) {
        self.start_position = start_position;
        self.start_tangent = start_tangent;
        self.end_position = end_position;
        self.end_tangent = end_tangent;
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Point on the segment for `t` in [0, 1]
    pub fn sample(&self, t: f32) -> Vector3<f32> {
        let t = t.clamp(0.0, 1.0);
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        self.start_position * h00
            + self.start_tangent * h10
            + self.end_position * h01
            + self.end_tangent * h11
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_sample_hits_endpoints() {
        let mut segment = SplineMeshObject::new(None, None);
        segment.set_start_and_end(
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(1.0, -1.0, 0.0),
        );

        assert_eq!(segment.sample(0.0), vec3(0.0, 0.0, 0.0));
        assert_eq!(segment.sample(1.0), vec3(2.0, 0.0, 0.0));
        assert!(segment.sample(0.5).y > 0.0);
    }

    #[test]
    fn test_new_segment_starts_hidden() {
        assert!(!SplineMeshObject::new(None, None).visible);
    }
}
