// Render proxies handed to the host renderer. These carry no GPU state;
// the host reads transforms, visibility and asset names each frame.

pub mod scene_object;
pub use scene_object::SceneObject;

pub mod spline_mesh;
pub use spline_mesh::SplineMeshObject;
