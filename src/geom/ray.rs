use serde::Serialize;

use super::Point;

/// Half-line starting at `(x1, y1)` and passing through `(x2, y2)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Ray {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Ray {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn set_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        *self = Self::new(x1, y1, x2, y2);
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn angle(&self) -> f32 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// True when `(x, y)` lies on the ray: on its supporting line and not
    /// behind the origin.
    pub fn is_point_on_ray(&self, x: f32, y: f32) -> bool {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let cross = (x - self.x1) * dy - (y - self.y1) * dx;
        if cross.abs() >= 1e-4 {
            return false;
        }
        (x - self.x1) * dx + (y - self.y1) * dy >= 0.0
    }
}
