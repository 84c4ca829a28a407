//! Parent-relative 2D transform.
//!
//! Every scene node carries a [`Transform`] holding its local position,
//! scale, rotation (radians) and registration point. The `parent` handle
//! links transforms into a tree; [`concatenated_matrix`] walks that tree to
//! produce the node's world matrix.
//!
//! The parent link is only writable through [`set_parent`], which rejects
//! any link that would make a transform its own ancestor.

use bevy_ecs::prelude::*;
use log::warn;
use smallvec::SmallVec;

use crate::error::SceneError;
use crate::geom::{Matrix, Point};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Registration (pivot) point in local pixels. Drawables are rendered
    /// offset by `(-reg_x, -reg_y)` so the pivot sits on `(x, y)`.
    pub reg_x: f32,
    pub reg_y: f32,
    parent: Option<Entity>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Transform {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            reg_x: 0.0,
            reg_y: 0.0,
            parent: None,
        }
    }

    /// Replace every local field. The parent link is left as is.
    #[allow(clippy::too_many_arguments)]
    pub fn set_transform(
        &mut self,
        x: f32,
        y: f32,
        scale_x: f32,
        scale_y: f32,
        rotation: f32,
        reg_x: f32,
        reg_y: f32,
    ) -> &mut Self {
        self.x = x;
        self.y = y;
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self.rotation = rotation;
        self.reg_x = reg_x;
        self.reg_y = reg_y;
        self
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_registration(mut self, reg_x: f32, reg_y: f32) -> Self {
        self.reg_x = reg_x;
        self.reg_y = reg_y;
        self
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Uniform scale.
    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }

    pub fn rotate(&mut self, angle: f32) -> &mut Self {
        self.rotation += angle;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Local matrix rebuilt from position, scale and rotation.
    pub fn matrix(&self) -> Matrix {
        Matrix::from_transform(self.x, self.y, self.scale_x, self.scale_y, self.rotation)
    }
}

/// Parent transform handle of `node`, if any.
pub fn parent_of(world: &World, node: Entity) -> Option<Entity> {
    world.get::<Transform>(node).and_then(Transform::parent)
}

/// True when `candidate` is `node` itself or one of its descendants, walking
/// up from `candidate` through the parent links.
pub fn check_ancestor(world: &World, node: Entity, candidate: Entity) -> bool {
    let mut current = Some(candidate);
    while let Some(e) = current {
        if e == node {
            return true;
        }
        current = parent_of(world, e);
    }
    false
}

/// Set (or clear) the parent transform of `child`.
///
/// Fails with [`SceneError::CycleDetected`] when `parent` is `child` or one of
/// its descendants; the existing link is kept.
pub fn set_parent(
    world: &mut World,
    child: Entity,
    parent: Option<Entity>,
) -> Result<(), SceneError> {
    if world.get::<Transform>(child).is_none() {
        return Err(SceneError::MissingNode(child));
    }
    if let Some(p) = parent {
        if world.get::<Transform>(p).is_none() {
            return Err(SceneError::MissingNode(p));
        }
        if check_ancestor(world, child, p) {
            warn!("Rejected transform parent {:?} for {:?}: cycle", p, child);
            return Err(SceneError::CycleDetected { child, parent: p });
        }
    }
    if let Some(mut transform) = world.get_mut::<Transform>(child) {
        transform.parent = parent;
    }
    Ok(())
}

/// World matrix of `node`: its local matrix with every ancestor's local
/// matrix applied after it, nearest ancestor first.
pub fn concatenated_matrix(world: &World, node: Entity) -> Option<Matrix> {
    let transform = world.get::<Transform>(node)?;
    let mut matrix = transform.matrix();
    let mut chain: SmallVec<[Entity; 8]> = SmallVec::new();
    let mut current = transform.parent();
    while let Some(p) = current {
        let Some(parent) = world.get::<Transform>(p) else {
            break;
        };
        if chain.contains(&p) {
            break;
        }
        chain.push(p);
        matrix.prepend(&parent.matrix());
        current = parent.parent();
    }
    Some(matrix)
}

/// Map a point from `node`'s local space into world space.
pub fn transform_point(world: &World, node: Entity, point: Point) -> Option<Point> {
    concatenated_matrix(world, node).map(|m| m.transform_point(point))
}

/// Map a world-space point into `node`'s local space. `None` when the node
/// is missing or its world matrix is singular.
pub fn inverse_transform_point(world: &World, node: Entity, point: Point) -> Option<Point> {
    concatenated_matrix(world, node)?
        .inverse()
        .map(|m| m.transform_point(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn spawn(world: &mut World, t: Transform) -> Entity {
        world.spawn(t).id()
    }

    #[test]
    fn test_root_matrix_is_local_matrix() {
        let mut world = World::new();
        let t = Transform::new(10.0, 20.0).with_scale(2.0, 3.0).with_rotation(0.3);
        let e = spawn(&mut world, t);
        let m = concatenated_matrix(&world, e).unwrap();
        assert!(m.approx_eq(&t.matrix(), EPSILON));
    }

    #[test]
    fn test_three_level_chain() {
        let mut world = World::new();
        let root = spawn(&mut world, Transform::new(100.0, 0.0).with_rotation(FRAC_PI_2));
        let mid = spawn(&mut world, Transform::new(10.0, 0.0).with_scale(2.0, 2.0));
        let leaf = spawn(&mut world, Transform::new(5.0, 1.0));
        set_parent(&mut world, mid, Some(root)).unwrap();
        set_parent(&mut world, leaf, Some(mid)).unwrap();

        // leaf origin -> (5, 1) in mid space -> scaled (10, 2) + (10, 0) = (20, 2)
        // in root space: rotate 90deg -> (-2, 20), translate -> (98, 20)
        let p = transform_point(&world, leaf, Point::ZERO).unwrap();
        assert!(approx_eq(p.x, 98.0), "x = {}", p.x);
        assert!(approx_eq(p.y, 20.0), "y = {}", p.y);

        let manual = {
            let mut m = Matrix::from_transform(5.0, 1.0, 1.0, 1.0, 0.0);
            m.prepend(&Matrix::from_transform(10.0, 0.0, 2.0, 2.0, 0.0));
            m.prepend(&Matrix::from_transform(100.0, 0.0, 1.0, 1.0, FRAC_PI_2));
            m
        };
        let m = concatenated_matrix(&world, leaf).unwrap();
        assert!(m.approx_eq(&manual, EPSILON));
    }

    #[test]
    fn test_moving_parent_moves_descendants() {
        let mut world = World::new();
        let root = spawn(&mut world, Transform::new(0.0, 0.0));
        let child = spawn(&mut world, Transform::new(5.0, 5.0));
        set_parent(&mut world, child, Some(root)).unwrap();

        world.get_mut::<Transform>(root).unwrap().translate(10.0, -3.0);
        let p = transform_point(&world, child, Point::ZERO).unwrap();
        assert!(approx_eq(p.x, 15.0));
        assert!(approx_eq(p.y, 2.0));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut world = World::new();
        let a = spawn(&mut world, Transform::default());
        let b = spawn(&mut world, Transform::default());
        let c = spawn(&mut world, Transform::default());
        set_parent(&mut world, b, Some(a)).unwrap();
        set_parent(&mut world, c, Some(b)).unwrap();

        let result = set_parent(&mut world, a, Some(c));
        assert_eq!(result, Err(SceneError::CycleDetected { child: a, parent: c }));
        assert_eq!(parent_of(&world, a), None);

        assert!(set_parent(&mut world, a, Some(a)).is_err());
        assert_eq!(parent_of(&world, a), None);
    }

    #[test]
    fn test_check_ancestor() {
        let mut world = World::new();
        let a = spawn(&mut world, Transform::default());
        let b = spawn(&mut world, Transform::default());
        let other = spawn(&mut world, Transform::default());
        set_parent(&mut world, b, Some(a)).unwrap();
        assert!(check_ancestor(&world, a, b));
        assert!(check_ancestor(&world, a, a));
        assert!(!check_ancestor(&world, b, a));
        assert!(!check_ancestor(&world, a, other));
    }

    #[test]
    fn test_clear_parent() {
        let mut world = World::new();
        let a = spawn(&mut world, Transform::new(50.0, 0.0));
        let b = spawn(&mut world, Transform::new(1.0, 0.0));
        set_parent(&mut world, b, Some(a)).unwrap();
        set_parent(&mut world, b, None).unwrap();
        let p = transform_point(&world, b, Point::ZERO).unwrap();
        assert!(approx_eq(p.x, 1.0));
    }

    #[test]
    fn test_inverse_transform_point() {
        let mut world = World::new();
        let e = spawn(&mut world, Transform::new(10.0, 10.0).with_scale(2.0, 2.0));
        let local = inverse_transform_point(&world, e, Point::new(14.0, 16.0)).unwrap();
        assert!(approx_eq(local.x, 2.0));
        assert!(approx_eq(local.y, 3.0));
    }

    #[test]
    fn test_set_transform_replaces_fields() {
        let mut t = Transform::new(1.0, 1.0);
        t.set_transform(2.0, 3.0, 4.0, 5.0, 0.5, 6.0, 7.0);
        assert_eq!(t.position(), Point::new(2.0, 3.0));
        assert_eq!((t.scale_x, t.scale_y, t.rotation), (4.0, 5.0, 0.5));
        assert_eq!((t.reg_x, t.reg_y), (6.0, 7.0));
        assert!(t.is_root());
    }
}
