use serde::Serialize;

use super::Point;

/// Line through two points. Depending on the query it is treated as an
/// infinite line or as the segment between the two points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Line {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn set_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        *self = Self::new(x1, y1, x2, y2);
        self
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn length(&self) -> f32 {
        self.start().distance_to(self.end())
    }

    /// Angle of the direction vector in radians.
    pub fn angle(&self) -> f32 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    pub fn slope(&self) -> f32 {
        (self.y2 - self.y1) / (self.x2 - self.x1)
    }

    /// True when `(x, y)` lies on the infinite line (within `1e-4`).
    pub fn is_point_on_line(&self, x: f32, y: f32) -> bool {
        ((x - self.x1) * (self.y2 - self.y1) - (self.x2 - self.x1) * (y - self.y1)).abs() < 1e-4
    }

    /// True when `(x, y)` lies on the segment between the two end points.
    pub fn is_point_on_segment(&self, x: f32, y: f32) -> bool {
        let (min_x, max_x) = (self.x1.min(self.x2), self.x1.max(self.x2));
        let (min_y, max_y) = (self.y1.min(self.y2), self.y1.max(self.y2));
        self.is_point_on_line(x, y) && x >= min_x && x <= max_x && y >= min_y && y <= max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_on_line_vs_segment() {
        let l = Line::new(0.0, 0.0, 10.0, 10.0);
        assert!(l.is_point_on_line(20.0, 20.0));
        assert!(!l.is_point_on_segment(20.0, 20.0));
        assert!(l.is_point_on_segment(5.0, 5.0));
        assert!(!l.is_point_on_line(5.0, 6.0));
    }

    #[test]
    fn test_length_and_angle() {
        let l = Line::new(0.0, 0.0, 0.0, 10.0);
        assert!((l.length() - 10.0).abs() < 1e-5);
        assert!((l.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }
}
