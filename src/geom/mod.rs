//! 2D geometry primitives.
//!
//! Pure value types shared by the transform hierarchy, the physics body and
//! the render traversal. Nothing in here touches the ECS world.
//!
//! Submodules overview:
//! - [`point`] – 2D point / vector with basic arithmetic
//! - [`rectangle`] – axis-aligned rectangle used for bounds and AABB tests
//! - [`matrix`] – 2×3 affine matrix (a, b, c, d, tx, ty)
//! - [`circle`] – circle defined by center and diameter
//! - [`line`] – infinite line / segment through two points
//! - [`ray`] – half-line from an origin through a second point
//! - [`intersect`] – intersection routines between the primitives above

pub mod circle;
pub mod intersect;
pub mod line;
pub mod matrix;
pub mod point;
pub mod ray;
pub mod rectangle;

pub use circle::Circle;
pub use line::Line;
pub use matrix::Matrix;
pub use point::Point;
pub use ray::Ray;
pub use rectangle::Rectangle;

/// Tolerance used by the approximate comparisons in this module.
pub const EPSILON: f32 = 1e-6;
