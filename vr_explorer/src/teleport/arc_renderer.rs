use cgmath::{Matrix4, SquareMatrix, Vector3, vec3};
use engine::scene::SplineMeshObject;

use crate::config::ArcVisualConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplinePoint {
    pub position: Vector3<f32>,
    pub tangent: Vector3<f32>,
}

/// Curve through the teleport path, stored in the spline component's local space
#[derive(Clone, Debug, Default)]
pub struct TeleportSpline {
    points: Vec<SplinePoint>,
}

impl TeleportSpline {
    /// Rebuild from local-space positions. Interior tangents are central
    /// differences, the ends use the adjacent segment.
    pub fn set_points(&mut self, positions: &[Vector3<f32>]) {
        self.points.clear();

        let count = positions.len();
        for (i, &position) in positions.iter().enumerate() {
            let tangent = if count < 2 {
                vec3(0.0, 0.0, 0.0)
            } else if i == 0 {
                positions[1] - positions[0]
            } else if i == count - 1 {
                positions[i] - positions[i - 1]
            } else {
                (positions[i + 1] - positions[i - 1]) * 0.5
            };
            self.points.push(SplinePoint { position, tangent });
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<&SplinePoint> {
        self.points.get(index)
    }
}

/// Reusable segment meshes indexed by path position. Grows to the longest
/// path seen and never shrinks; unused entries are hidden, not dropped.
#[derive(Clone, Debug, Default)]
pub struct ArcMeshPool {
    segments: Vec<SplineMeshObject>,
}

impl ArcMeshPool {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[SplineMeshObject] {
        &self.segments
    }

    pub fn visible_count(&self) -> usize {
        self.segments.iter().filter(|s| s.visible).count()
    }

    fn hide_all(&mut self) {
        for segment in &mut self.segments {
            segment.set_visibility(false);
        }
    }

    fn get_or_create(&mut self, index: usize, visuals: &ArcVisualConfig) -> &mut SplineMeshObject {
        while self.segments.len() <= index {
            self.segments.push(SplineMeshObject::new(
                visuals.arc_mesh.clone(),
                visuals.arc_material.clone(),
            ));
        }
        &mut self.segments[index]
    }
}

/// Draws the teleport path as a chain of spline meshes
pub struct ArcRenderer {
    visuals: ArcVisualConfig,
    spline: TeleportSpline,
    pool: ArcMeshPool,
}

impl ArcRenderer {
    pub fn new(visuals: ArcVisualConfig) -> Self {
        Self {
            visuals,
            spline: TeleportSpline::default(),
            pool: ArcMeshPool::default(),
        }
    }

    pub fn spline(&self) -> &TeleportSpline {
        &self.spline
    }

    pub fn pool(&self) -> &ArcMeshPool {
        &self.pool
    }

    /// Show `path` (world space). `component_transform` places the spline
    /// component in the world; an empty path hides every segment.
    pub fn draw_teleport_path(&mut self, path: &[Vector3<f32>], component_transform: Matrix4<f32>) {
        self.update_spline(path, component_transform);

        self.pool.hide_all();

        let segment_count = self.spline.len().saturating_sub(1);
        for i in 0..segment_count {
            let (Some(start), Some(end)) = (self.spline.point(i), self.spline.point(i + 1)) else {
                break;
            };
            let (start, end) = (*start, *end);

            let segment = self.pool.get_or_create(i, &self.visuals);
            segment.set_start_and_end(start.position, start.tangent, end.position, end.tangent);
            segment.set_visibility(true);
        }
    }

    fn update_spline(&mut self, path: &[Vector3<f32>], component_transform: Matrix4<f32>) {
        let world_to_local = component_transform
            .invert()
            .unwrap_or_else(Matrix4::identity);

        let local: Vec<Vector3<f32>> = path
            .iter()
            .map(|p| (world_to_local * p.extend(1.0)).truncate())
            .collect();
        self.spline.set_points(&local);
    }
}
