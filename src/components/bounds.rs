use bevy_ecs::prelude::*;

use crate::components::transform::{Transform, concatenated_matrix, inverse_transform_point};
use crate::geom::{Point, Rectangle};

/// Local hit box of a node.
///
/// The box is expressed in node space like the drawables: `offset` is
/// relative to the registration point, so a box with zero offset covers the
/// same pixels as a sprite of the same size.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Bounds {
    pub size: Point,
    pub offset: Point,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Point::new(width, height),
            offset: Point::ZERO,
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Point::new(x, y);
        self
    }

    /// Box in node space. Negative sizes are normalized.
    pub fn local_rect(&self, transform: &Transform) -> Rectangle {
        let p0 = Point::new(
            self.offset.x - transform.reg_x,
            self.offset.y - transform.reg_y,
        );
        Rectangle::from_points(p0, p0 + self.size)
    }
}

/// World-space axis-aligned box enclosing `node`'s bounds under its
/// concatenated matrix.
pub fn world_bounds(world: &World, node: Entity) -> Option<Rectangle> {
    let bounds = world.get::<Bounds>(node)?;
    let transform = world.get::<Transform>(node)?;
    let matrix = concatenated_matrix(world, node)?;
    let local = bounds.local_rect(transform);
    let corners = [
        Point::new(local.left(), local.top()),
        Point::new(local.right(), local.top()),
        Point::new(local.right(), local.bottom()),
        Point::new(local.left(), local.bottom()),
    ]
    .map(|c| matrix.transform_point(c));
    let (mut min, mut max) = (corners[0], corners[0]);
    for c in &corners[1..] {
        min = Point::new(min.x.min(c.x), min.y.min(c.y));
        max = Point::new(max.x.max(c.x), max.y.max(c.y));
    }
    Some(Rectangle::from_points(min, max))
}

/// Exact hit-test of a world point against `node`'s bounds, rotation and
/// scale included.
pub fn contains_point(world: &World, node: Entity, point: Point) -> bool {
    let (Some(bounds), Some(transform)) = (world.get::<Bounds>(node), world.get::<Transform>(node))
    else {
        return false;
    };
    let local_rect = bounds.local_rect(transform);
    inverse_transform_point(world, node, point).is_some_and(|p| local_rect.contains_point(p))
}
