use bevy_ecs::prelude::Component;

use crate::geom::{Point, Rectangle};

/// Sprite is identified by a texture key, its size in pixels and an offset if
/// the texture is a spritesheet. The offset selects the frame cell.
///
/// The pivot is the node's registration point (`Transform::reg_x/reg_y`).
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Point,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            offset: Point::ZERO,
            flip_h: false,
            flip_v: false,
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Point::new(x, y);
        self
    }

    /// Source rectangle inside the texture.
    pub fn source(&self) -> Rectangle {
        Rectangle::new(self.offset.x, self.offset.y, self.width, self.height)
    }
}
