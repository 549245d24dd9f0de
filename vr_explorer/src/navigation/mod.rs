//! Walkable-surface queries for teleport destinations
//!
//! The nav mesh is a set of convex polygonal cells. Projection snaps a point
//! to the nearest point on any cell that lies inside the search box, which is
//! how teleport hits on walls, props and ledges get rejected or pulled onto
//! the floor.
use std::path::Path;

use cgmath::{InnerSpace, Vector3, vec3};
use engine::nav_log;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    error::{VrError, VrResult},
    host::NavigationQuery,
};

/// One convex walkable polygon. Vertices are wound consistently in the XZ
/// plane; the surface height is interpolated from the vertex heights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavCell {
    pub vertices: Vec<Vector3<f32>>,
}

impl NavCell {
    /// Horizontal rectangle from `min` to `max` (XZ) at height `y`
    pub fn rect(min_x: f32, min_z: f32, max_x: f32, max_z: f32, y: f32) -> Self {
        NavCell {
            vertices: vec![
                vec3(min_x, y, min_z),
                vec3(max_x, y, min_z),
                vec3(max_x, y, max_z),
                vec3(min_x, y, max_z),
            ],
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        let sum = self
            .vertices
            .iter()
            .fold(vec3(0.0, 0.0, 0.0), |acc, v| acc + *v);
        sum / self.vertices.len().max(1) as f32
    }

    /// Test if a point is inside the cell, ignoring height
    ///
    /// The cell is convex, so the point is inside when it sits on the same
    /// side of every edge.
    fn contains_xz(&self, point: Vector3<f32>) -> bool {
        let mut sign = None;

        for (i, v1) in self.vertices.iter().enumerate() {
            let v2 = self.vertices[(i + 1) % self.vertices.len()];

            let edge = vec3(v2.x - v1.x, 0.0, v2.z - v1.z);
            let to_point = vec3(point.x - v1.x, 0.0, point.z - v1.z);
            let cross = edge.x * to_point.z - edge.z * to_point.x;

            if cross.abs() < f32::EPSILON {
                continue;
            }

            let current_sign = cross > 0.0;
            match sign {
                None => sign = Some(current_sign),
                Some(prev_sign) if prev_sign != current_sign => return false,
                _ => {}
            }
        }

        true
    }

    /// Closest point of the cell's outline to `point` in the XZ plane
    fn closest_edge_point_xz(&self, point: Vector3<f32>) -> Vector3<f32> {
        let flat = vec3(point.x, 0.0, point.z);
        let mut best = self.vertices[0];
        let mut best_distance = f32::MAX;

        for (i, v1) in self.vertices.iter().enumerate() {
            let v2 = self.vertices[(i + 1) % self.vertices.len()];
            let a = vec3(v1.x, 0.0, v1.z);
            let b = vec3(v2.x, 0.0, v2.z);
            let ab = b - a;

            let length2 = ab.magnitude2();
            let t = if length2 > f32::EPSILON {
                ((flat - a).dot(ab) / length2).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let candidate = a + ab * t;
            let distance = (candidate - flat).magnitude2();
            if distance < best_distance {
                best_distance = distance;
                best = candidate;
            }
        }

        best
    }

    /// Surface height under `point`, from the plane through the first three vertices
    fn height_at(&self, point: Vector3<f32>) -> f32 {
        let a = self.vertices[0];
        let b = self.vertices[1];
        let c = self.vertices[2];
        let normal = (b - a).cross(c - a);

        if normal.y.abs() < f32::EPSILON {
            return self.center().y;
        }

        // normal . (p - a) = 0, solved for p.y
        a.y - (normal.x * (point.x - a.x) + normal.z * (point.z - a.z)) / normal.y
    }

    /// Nearest point on the cell surface to `point`
    fn closest_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        let on_plane = if self.contains_xz(point) {
            point
        } else {
            self.closest_edge_point_xz(point)
        };
        vec3(on_plane.x, self.height_at(on_plane), on_plane.z)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavMesh {
    cells: Vec<NavCell>,
}

impl NavMesh {
    pub fn new(cells: Vec<NavCell>) -> VrResult<Self> {
        for (idx, cell) in cells.iter().enumerate() {
            if cell.vertices.len() < 3 {
                return Err(VrError::validation(
                    format!("nav cell {}", idx),
                    "needs at least three vertices",
                ));
            }
            if cell
                .vertices
                .iter()
                .any(|v| !v.x.is_finite() || !v.y.is_finite() || !v.z.is_finite())
            {
                return Err(VrError::validation(
                    format!("nav cell {}", idx),
                    "vertices must be finite",
                ));
            }
        }

        Ok(Self { cells })
    }

    pub fn from_json_str(json: &str) -> VrResult<Self> {
        let cells: Vec<NavCell> = serde_json::from_str(json).map_err(|source| VrError::Parse {
            context: "nav mesh".to_owned(),
            source,
        })?;
        Self::new(cells)
    }

    pub fn load(path: impl AsRef<Path>) -> VrResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VrError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn cells(&self) -> &[NavCell] {
        &self.cells
    }

    /// Index of the cell whose footprint contains `pos`, if any
    pub fn cell_from_position(&self, pos: Vector3<f32>) -> Option<usize> {
        self.cells.iter().position(|cell| cell.contains_xz(pos))
    }
}

impl NavigationQuery for NavMesh {
    fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>> {
        let projected = self
            .cells
            .iter()
            .map(|cell| cell.closest_point(point))
            .filter(|candidate| {
                let delta = *candidate - point;
                delta.x.abs() <= extent.x && delta.y.abs() <= extent.y && delta.z.abs() <= extent.z
            })
            .min_by_key(|candidate| OrderedFloat((*candidate - point).magnitude2()));

        if projected.is_none() {
            nav_log!(TRACE, "no walkable surface within {:?} of {:?}", extent, point);
        }
        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_mesh() -> NavMesh {
        NavMesh::new(vec![
            NavCell::rect(-5.0, -5.0, 5.0, 5.0, 0.0),
            NavCell::rect(10.0, -2.0, 14.0, 2.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_point_inside_cell_projects_down() {
        let mesh = two_level_mesh();
        let projected = mesh.project_point(vec3(1.0, 0.4, -2.0), vec3(1.0, 1.0, 1.0));
        assert_eq!(projected, Some(vec3(1.0, 0.0, -2.0)));
    }

    #[test]
    fn test_point_outside_footprint_snaps_to_edge() {
        let mesh = two_level_mesh();
        let projected = mesh.project_point(vec3(5.5, 0.0, 0.0), vec3(1.0, 1.0, 1.0));
        assert_eq!(projected, Some(vec3(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_point_beyond_extent_fails() {
        let mesh = two_level_mesh();
        assert_eq!(
            mesh.project_point(vec3(7.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0)),
            None
        );
        // a wall hit 2m up is out of the vertical search range
        assert_eq!(
            mesh.project_point(vec3(0.0, 2.0, 0.0), vec3(1.0, 1.0, 1.0)),
            None
        );
    }

    #[test]
    fn test_nearest_cell_wins() {
        let mesh = two_level_mesh();
        let projected = mesh.project_point(vec3(12.0, 2.5, 0.0), vec3(1.0, 5.0, 1.0));
        assert_eq!(projected, Some(vec3(12.0, 3.0, 0.0)));
    }

    #[test]
    fn test_sloped_cell_interpolates_height() {
        let ramp = NavCell {
            vertices: vec![
                vec3(0.0, 0.0, 0.0),
                vec3(4.0, 2.0, 0.0),
                vec3(4.0, 2.0, 4.0),
                vec3(0.0, 0.0, 4.0),
            ],
        };
        let mesh = NavMesh::new(vec![ramp]).unwrap();
        let projected = mesh
            .project_point(vec3(2.0, 1.5, 2.0), vec3(1.0, 1.0, 1.0))
            .unwrap();
        assert!((projected.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cell_from_position() {
        let mesh = two_level_mesh();
        assert_eq!(mesh.cell_from_position(vec3(0.0, 0.0, 0.0)), Some(0));
        assert_eq!(mesh.cell_from_position(vec3(12.0, 0.0, 0.0)), Some(1));
        assert_eq!(mesh.cell_from_position(vec3(8.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_rejects_degenerate_cells() {
        let err = NavMesh::new(vec![NavCell {
            vertices: vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)],
        }]);
        assert!(err.is_err());
    }

    #[test]
    fn test_loads_from_json() {
        let mesh = NavMesh::from_json_str(
            r#"[{ "vertices": [[0,0,0],[2,0,0],[2,0,2],[0,0,2]] }]"#,
        )
        .unwrap();
        assert_eq!(mesh.cells().len(), 1);
        assert_eq!(mesh.cells()[0].center(), vec3(1.0, 0.0, 1.0));
    }
}
