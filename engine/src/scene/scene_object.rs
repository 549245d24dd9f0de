use cgmath::{Matrix4, SquareMatrix, Vector3};

/// A static mesh placed in the world
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub mesh: Option<String>,
    pub material: Option<String>,
    pub transform: Matrix4<f32>,
    pub local_transform: Matrix4<f32>,
    pub visible: bool,
    pub depth_write: bool,
}

impl SceneObject {
    pub fn new(mesh: Option<String>, material: Option<String>) -> SceneObject {
        SceneObject {
            mesh,
            material,
            transform: Matrix4::identity(),
            local_transform: Matrix4::identity(),
            visible: true,
            depth_write: true,
        }
    }

    /// Get the world position of this scene object from its transform matrix
    pub fn get_world_position(&self) -> Vector3<f32> {
        let final_transform = self.transform * self.local_transform;
        Vector3::new(
            final_transform[3][0],
            final_transform[3][1],
            final_transform[3][2],
        )
    }

    /// Replace the translation of the world transform, keeping rotation and scale
    pub fn set_world_position(&mut self, position: Vector3<f32>) {
        self.transform[3][0] = position.x;
        self.transform[3][1] = position.y;
        self.transform[3][2] = position.z;
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    pub fn set_local_transform(&mut self, transform: Matrix4<f32>) {
        self.local_transform = transform;
    }

    pub fn get_transform(&self) -> Matrix4<f32> {
        self.transform
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }
}
