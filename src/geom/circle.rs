use serde::Serialize;

use super::{Point, Rectangle};

/// Circle described by its center and diameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, diameter: f32) -> Self {
        Self {
            x,
            y,
            diameter: diameter.max(0.0),
        }
    }

    pub fn set_to(&mut self, x: f32, y: f32, diameter: f32) -> &mut Self {
        *self = Self::new(x, y, diameter);
        self
    }

    pub fn radius(&self) -> f32 {
        self.diameter * 0.5
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius() * self.radius()
    }

    pub fn circumference(&self) -> f32 {
        std::f32::consts::PI * self.diameter
    }

    pub fn is_empty(&self) -> bool {
        self.diameter <= 0.0
    }

    /// Point on the circumference at `angle` radians.
    pub fn circumference_point(&self, angle: f32) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x + cos * self.radius(), self.y + sin * self.radius())
    }

    pub fn contains_point(&self, p: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        self.center().distance_squared_to(p) <= self.radius() * self.radius()
    }

    pub fn bounds(&self) -> Rectangle {
        let r = self.radius();
        Rectangle::new(self.x - r, self.y - r, self.diameter, self.diameter)
    }
}
