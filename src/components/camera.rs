//! Scene camera.
//!
//! A camera is a `Transform` plus a screen viewport. Rendering through a
//! camera applies the inverse of its matrix and then offsets by the viewport
//! origin, so the camera position ends up in the viewport's top-left corner.

use bevy_ecs::prelude::*;

use crate::geom::{Matrix, Rectangle};

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Camera {
    pub name: String,
    /// Screen rectangle this camera draws into.
    pub viewport: Rectangle,
    pub active: bool,
    pub visible: bool,
}

impl Camera {
    pub fn new(name: impl Into<String>, viewport: Rectangle) -> Self {
        Self {
            name: name.into(),
            viewport,
            active: true,
            visible: true,
        }
    }

    /// World-to-screen matrix given the camera's own world matrix. `None`
    /// when the camera matrix is singular.
    pub fn view_matrix(&self, camera_matrix: &Matrix) -> Option<Matrix> {
        let mut view = camera_matrix.inverse()?;
        view.translate(self.viewport.x, self.viewport.y);
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    #[test]
    fn test_view_matrix_offsets() {
        let cam = Camera::new("main", Rectangle::new(10.0, 20.0, 100.0, 100.0));
        let view = cam.view_matrix(&Matrix::translation(50.0, 50.0)).unwrap();
        let p = view.transform_point(Point::new(50.0, 50.0));
        assert_eq!(p, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_singular_camera() {
        let cam = Camera::new("main", Rectangle::new(0.0, 0.0, 1.0, 1.0));
        let m = Matrix::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(cam.view_matrix(&m).is_none());
    }
}
