// Fakes for the host interfaces, shared by the unit tests

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use cgmath::{InnerSpace, Vector2, Vector3, Vector4, vec2};

use crate::host::{
    CameraFadeRequest, CollisionWorld, MaterialParameters, NavigationQuery, PlayerController,
    TraceHit,
};

/// Infinite horizontal plane at `height`
pub struct FlatWorld {
    height: f32,
}

impl FlatWorld {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl CollisionWorld for FlatWorld {
    fn trace_line(&self, start: Vector3<f32>, end: Vector3<f32>) -> Option<TraceHit> {
        let above_start = start.y - self.height;
        let above_end = end.y - self.height;
        if above_start < 0.0 || above_end > 0.0 || above_start == above_end {
            return None;
        }

        let t = above_start / (above_start - above_end);
        let mut location = start + (end - start) * t;
        location.y = self.height;
        Some(TraceHit {
            location,
            distance: (location - start).magnitude(),
        })
    }
}

pub struct RejectAllNavigation;

impl NavigationQuery for RejectAllNavigation {
    fn project_point(&self, _point: Vector3<f32>, _extent: Vector3<f32>) -> Option<Vector3<f32>> {
        None
    }
}

/// Every point is walkable where it is
pub struct AcceptAllNavigation;

impl NavigationQuery for AcceptAllNavigation {
    fn project_point(&self, point: Vector3<f32>, _extent: Vector3<f32>) -> Option<Vector3<f32>> {
        Some(point)
    }
}

/// Records fades and projections. Clones share their recordings.
#[derive(Clone)]
pub struct RecordingController {
    pub fades: Rc<RefCell<Vec<CameraFadeRequest>>>,
    pub projected: Rc<RefCell<Vec<Vector3<f32>>>>,
    pub projection: Option<Vector2<f32>>,
    pub viewport: Vector2<f32>,
}

impl RecordingController {
    pub fn with_projection(mut self, screen: Vector2<f32>) -> Self {
        self.projection = Some(screen);
        self
    }

    pub fn without_projection(mut self) -> Self {
        self.projection = None;
        self
    }
}

impl Default for RecordingController {
    fn default() -> Self {
        Self {
            fades: Rc::default(),
            projected: Rc::default(),
            projection: Some(vec2(960.0, 540.0)),
            viewport: vec2(1920.0, 1080.0),
        }
    }
}

impl PlayerController for RecordingController {
    fn start_camera_fade(&mut self, request: CameraFadeRequest) {
        self.fades.borrow_mut().push(request);
    }

    fn project_world_to_screen(&self, world_location: Vector3<f32>) -> Option<Vector2<f32>> {
        self.projected.borrow_mut().push(world_location);
        self.projection
    }

    fn viewport_size(&self) -> Vector2<f32> {
        self.viewport
    }
}

#[derive(Clone, Default)]
pub struct RecordingMaterial {
    scalars: Rc<RefCell<HashMap<String, f32>>>,
    vectors: Rc<RefCell<HashMap<String, Vector4<f32>>>>,
}

impl RecordingMaterial {
    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.scalars.borrow().get(name).copied()
    }

    pub fn vector(&self, name: &str) -> Option<Vector4<f32>> {
        self.vectors.borrow().get(name).copied()
    }
}

impl MaterialParameters for RecordingMaterial {
    fn set_scalar_parameter(&mut self, name: &str, value: f32) {
        self.scalars.borrow_mut().insert(name.to_owned(), value);
    }

    fn set_vector_parameter(&mut self, name: &str, value: Vector4<f32>) {
        self.vectors.borrow_mut().insert(name.to_owned(), value);
    }
}
