//! Per-frame pointer input resource.
//!
//! The scene only consumes a polled pointer: its position in screen pixels
//! and whether the primary button is down. Whatever captures the device
//! writes here once per frame through [`PointerState::set`].

use bevy_ecs::prelude::*;

use crate::geom::Point;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub is_down: bool,
    /// Went down this frame.
    pub just_pressed: bool,
    /// Went up this frame.
    pub just_released: bool,
}

impl PointerState {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Record this frame's pointer sample, deriving the edge flags from the
    /// previous one.
    pub fn set(&mut self, x: f32, y: f32, is_down: bool) {
        self.just_pressed = is_down && !self.is_down;
        self.just_released = !is_down && self.is_down;
        self.x = x;
        self.y = y;
        self.is_down = is_down;
    }
}
