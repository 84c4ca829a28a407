//! Intersection routines between geometry primitives.
//!
//! Point-valued tests return `Option<Point>` with the intersection point;
//! the rest return a plain `bool`. Parallel or coincident lines never report
//! an intersection point.

use super::{Circle, Line, Point, Ray, Rectangle};

const PARALLEL_EPSILON: f32 = 1e-9;

fn cross(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * by - ay * bx
}

/// Parameters `(t, u)` of the intersection between `p + t·r` and `q + u·s`.
fn line_parameters(p1: Point, p2: Point, q1: Point, q2: Point) -> Option<(f32, f32)> {
    let (rx, ry) = (p2.x - p1.x, p2.y - p1.y);
    let (sx, sy) = (q2.x - q1.x, q2.y - q1.y);
    let denom = cross(rx, ry, sx, sy);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let (qpx, qpy) = (q1.x - p1.x, q1.y - p1.y);
    let t = cross(qpx, qpy, sx, sy) / denom;
    let u = cross(qpx, qpy, rx, ry) / denom;
    Some((t, u))
}

fn point_at(p1: Point, p2: Point, t: f32) -> Point {
    Point::new(p1.x + (p2.x - p1.x) * t, p1.y + (p2.y - p1.y) * t)
}

fn unit_range(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Two infinite lines.
pub fn line_to_line(a: &Line, b: &Line) -> Option<Point> {
    let (t, _) = line_parameters(a.start(), a.end(), b.start(), b.end())?;
    Some(point_at(a.start(), a.end(), t))
}

/// An infinite line against a segment.
pub fn line_to_segment(line: &Line, segment: &Line) -> Option<Point> {
    let (t, u) = line_parameters(line.start(), line.end(), segment.start(), segment.end())?;
    unit_range(u).then(|| point_at(line.start(), line.end(), t))
}

/// Two segments.
pub fn segment_to_segment(a: &Line, b: &Line) -> Option<Point> {
    let (t, u) = line_parameters(a.start(), a.end(), b.start(), b.end())?;
    (unit_range(t) && unit_range(u)).then(|| point_at(a.start(), a.end(), t))
}

/// An infinite line against a ray.
pub fn line_to_ray(line: &Line, ray: &Ray) -> Option<Point> {
    let ray_end = Point::new(ray.x2, ray.y2);
    let (t, u) = line_parameters(line.start(), line.end(), ray.origin(), ray_end)?;
    (u >= 0.0).then(|| point_at(line.start(), line.end(), t))
}

fn rectangle_edges(rect: &Rectangle) -> [Line; 4] {
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    [
        Line::new(l, t, r, t),
        Line::new(r, t, r, b),
        Line::new(r, b, l, b),
        Line::new(l, b, l, t),
    ]
}

/// First point where the ray enters (or, starting inside, leaves) `rect`.
pub fn ray_to_rectangle(ray: &Ray, rect: &Rectangle) -> Option<Point> {
    let ray_end = Point::new(ray.x2, ray.y2);
    rectangle_edges(rect)
        .iter()
        .filter_map(|edge| {
            let (t, u) = line_parameters(ray.origin(), ray_end, edge.start(), edge.end())?;
            (t >= 0.0 && unit_range(u)).then_some(t)
        })
        .min_by(|a, b| a.total_cmp(b))
        .map(|t| point_at(ray.origin(), ray_end, t))
}

/// First edge crossing of an infinite line with `rect`, in edge order
/// (top, right, bottom, left).
pub fn line_to_rectangle(line: &Line, rect: &Rectangle) -> Option<Point> {
    rectangle_edges(rect)
        .iter()
        .find_map(|edge| line_to_segment(line, edge))
}

/// True when the infinite line passes within the circle's radius.
pub fn line_to_circle(line: &Line, circle: &Circle) -> bool {
    if circle.is_empty() {
        return false;
    }
    let (dx, dy) = (line.x2 - line.x1, line.y2 - line.y1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < PARALLEL_EPSILON {
        return circle.contains_point(line.start());
    }
    let distance = cross(dx, dy, circle.x - line.x1, circle.y - line.y1).abs() / len;
    distance <= circle.radius()
}

pub fn circle_to_circle(a: &Circle, b: &Circle) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let reach = a.radius() + b.radius();
    a.center().distance_squared_to(b.center()) <= reach * reach
}

pub fn circle_to_rectangle(circle: &Circle, rect: &Rectangle) -> bool {
    if circle.is_empty() || rect.is_empty() {
        return false;
    }
    let closest = Point::new(
        circle.x.clamp(rect.left(), rect.right()),
        circle.y.clamp(rect.top(), rect.bottom()),
    );
    closest.distance_squared_to(circle.center()) <= circle.radius() * circle.radius()
}

pub fn point_to_rectangle(point: Point, rect: &Rectangle) -> bool {
    rect.contains_point(point)
}

pub fn rectangle_to_rectangle(a: &Rectangle, b: &Rectangle) -> bool {
    a.intersects(b)
}
