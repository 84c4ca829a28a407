//! 2×3 affine matrix.
//!
//! Points are mapped as
//!
//! ```text
//! x' = a·x + c·y + tx
//! y' = b·x + d·y + ty
//! ```
//!
//! [`Matrix::prepend`] composes so that the *argument* is applied after
//! `self`; that is the order used to build a concatenated (world) matrix from
//! a local matrix and its parent's concatenated matrix.

use serde::Serialize;

use super::Point;

/// Below this absolute determinant a matrix is treated as singular.
const SINGULAR_DETERMINANT: f32 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Rotation-scale composition followed by a translation.
    ///
    /// `a = cos·sx, b = sin·sx, c = -sin·sy, d = cos·sy, tx = x, ty = y`
    pub fn from_transform(x: f32, y: f32, scale_x: f32, scale_y: f32, rotation: f32) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Self {
            a: cos * scale_x,
            b: sin * scale_x,
            c: -sin * scale_y,
            d: cos * scale_y,
            tx: x,
            ty: y,
        }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    pub fn set_to(&mut self, a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> &mut Self {
        *self = Self::new(a, b, c, d, tx, ty);
        self
    }

    pub fn identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Compose so that `m` is applied after `self`: `result(p) = m(self(p))`.
    pub fn prepend(&mut self, m: &Matrix) -> &mut Self {
        let Matrix {
            a,
            b,
            c,
            d,
            tx,
            ty,
        } = *self;
        self.a = m.a * a + m.c * b;
        self.b = m.b * a + m.d * b;
        self.c = m.a * c + m.c * d;
        self.d = m.b * c + m.d * d;
        self.tx = m.a * tx + m.c * ty + m.tx;
        self.ty = m.b * tx + m.d * ty + m.ty;
        self
    }

    /// Compose so that `m` is applied before `self`: `result(p) = self(m(p))`.
    pub fn append(&mut self, m: &Matrix) -> &mut Self {
        let Matrix {
            a,
            b,
            c,
            d,
            tx,
            ty,
        } = *self;
        self.a = a * m.a + c * m.b;
        self.b = b * m.a + d * m.b;
        self.c = a * m.c + c * m.d;
        self.d = b * m.c + d * m.d;
        self.tx = a * m.tx + c * m.ty + tx;
        self.ty = b * m.tx + d * m.ty + ty;
        self
    }

    /// Inverse matrix, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det.abs() < SINGULAR_DETERMINANT || !det.is_finite() {
            return None;
        }
        Some(Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    /// Invert in place. Returns `false` and leaves `self` untouched when singular.
    pub fn invert(&mut self) -> bool {
        match self.inverse() {
            Some(inv) => {
                *self = inv;
                true
            }
            None => false,
        }
    }

    /// Translate after the current transform.
    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.tx += dx;
        self.ty += dy;
        self
    }

    /// Scale after the current transform.
    pub fn scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.prepend(&Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Rotate (radians) after the current transform.
    pub fn rotate(&mut self, angle: f32) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        self.prepend(&Matrix::new(cos, sin, -sin, cos, 0.0, 0.0))
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    pub fn approx_eq(&self, other: &Matrix, epsilon: f32) -> bool {
        (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.c - other.c).abs() < epsilon
            && (self.d - other.d).abs() < epsilon
            && (self.tx - other.tx).abs() < epsilon
            && (self.ty - other.ty).abs() < epsilon
    }
}
