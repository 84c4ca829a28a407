//! Arcade-style physics body.
//!
//! [`ArcadePhysics`] is a [`Behavior`] that integrates velocity, acceleration
//! and drag into its owner's [`Transform`] every update, and resolves
//! axis-aligned overlaps between two bodies by pushing them apart and
//! exchanging momentum.
//!
//! # Timing
//!
//! Integration uses a fixed step (`update_interval`, 0.1 by default) per
//! update call, independent of the real frame duration.
//!
//! # Collision sides
//!
//! `touching`, `was_touching` and `allow_collisions` are bitmasks over
//! [`LEFT`], [`RIGHT`], [`UP`] and [`DOWN`]. The flags are one hex digit
//! apart (0x1, 0x10, 0x100, 0x1000); never treat them as 1/2/4/8.
//!
//! `touching` is cleared by every update and only accumulates during that
//! frame's separation calls; `was_touching` keeps the previous frame's value.
//!
//! # Example
//! ```ignore
//! let mut body = ArcadePhysics::new(32.0, 32.0);
//! body.velocity = Point::new(10.0, 0.0);
//! body.max_velocity.x = 50.0;
//! add_component(&mut world, player, body)?;
//! ```

use bevy_ecs::prelude::*;

use crate::components::behavior::{Behavior, BehaviorContext, BehaviorCore};
use crate::components::transform::Transform;
use crate::geom::{Point, Rectangle};

pub const NONE: u32 = 0;
pub const LEFT: u32 = 0x0001;
pub const RIGHT: u32 = 0x0010;
pub const UP: u32 = 0x0100;
pub const DOWN: u32 = 0x1000;
pub const CEILING: u32 = UP;
pub const FLOOR: u32 = DOWN;
pub const WALL: u32 = LEFT | RIGHT;
pub const ANY: u32 = LEFT | RIGHT | UP | DOWN;

/// Extra overlap tolerated before a contact is considered a tunnel-through.
pub const OVERLAP_BIAS: f32 = 4.0;
/// Fixed integration step in seconds.
pub const DEFAULT_UPDATE_INTERVAL: f32 = 0.1;
/// Velocity limit meaning "no limit"; clamping is skipped for this value.
pub const UNBOUNDED_VELOCITY: f32 = 10000.0;

/// Default component name.
pub const ARCADE_PHYSICS: &str = "ArcadePhysics";

/// Tunables copied into each body at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSettings {
    pub update_interval: f32,
    pub overlap_bias: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            overlap_bias: OVERLAP_BIAS,
        }
    }
}

/// Called once per overlapping pair with `(this_owner, other_owner)`.
pub type OverlapCallback = Box<dyn FnMut(Entity, Entity) + Send + Sync>;

pub struct ArcadePhysics {
    core: BehaviorCore,
    pub width: f32,
    pub height: f32,
    pub mass: f32,
    /// 0 = no bounce, 1 = full bounce.
    pub elasticity: f32,
    pub velocity: Point,
    pub acceleration: Point,
    pub drag: Point,
    pub max_velocity: Point,
    /// Radians.
    pub angle: f32,
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    pub angular_drag: f32,
    pub max_angular: f32,
    /// Immovable bodies are never displaced or re-velocitied by separation.
    pub immovable: bool,
    /// When false the body does not integrate its own motion.
    pub moves: bool,
    pub touching: u32,
    pub was_touching: u32,
    pub allow_collisions: u32,
    /// Owner position at the start of the last update.
    pub last: Point,
    /// Whether the owning node is active. Collision queries refresh it from
    /// the owner before separating; a platform only carries riders while
    /// its owner is active.
    pub owner_active: bool,
    pub settings: PhysicsSettings,
    callback: Option<OverlapCallback>,
}

impl std::fmt::Debug for ArcadePhysics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcadePhysics")
            .field("name", &self.core.name())
            .field("size", &(self.width, self.height))
            .field("velocity", &self.velocity)
            .field("touching", &format_args!("{:#06x}", self.touching))
            .field("immovable", &self.immovable)
            .finish()
    }
}

impl ArcadePhysics {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_settings(width, height, PhysicsSettings::default())
    }

    pub fn with_settings(width: f32, height: f32, settings: PhysicsSettings) -> Self {
        Self {
            core: BehaviorCore::new(ARCADE_PHYSICS),
            width,
            height,
            mass: 1.0,
            elasticity: 0.0,
            velocity: Point::ZERO,
            acceleration: Point::ZERO,
            drag: Point::ZERO,
            max_velocity: Point::new(UNBOUNDED_VELOCITY, UNBOUNDED_VELOCITY),
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            angular_drag: 0.0,
            max_angular: UNBOUNDED_VELOCITY,
            immovable: false,
            moves: true,
            touching: NONE,
            was_touching: NONE,
            allow_collisions: ANY,
            last: Point::ZERO,
            owner_active: true,
            settings,
            callback: None,
        }
    }

    /// Builder: rename the component (default `"ArcadePhysics"`).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let active = self.core.active;
        self.core = BehaviorCore::new(name);
        self.core.active = active;
        self
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Point::new(vx, vy);
        self
    }

    pub fn with_immovable(mut self, immovable: bool) -> Self {
        self.immovable = immovable;
        self
    }

    /// Register the callback fired by overlap queries.
    pub fn set_callback(&mut self, callback: impl FnMut(Entity, Entity) + Send + Sync + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub(crate) fn fire_callback(&mut self, this: Entity, other: Entity) {
        if let Some(callback) = self.callback.as_mut() {
            callback(this, other);
        }
    }

    /// Whether collisions are allowed on any side.
    pub fn solid(&self) -> bool {
        self.allow_collisions & ANY > NONE
    }

    pub fn set_solid(&mut self, solid: bool) {
        self.allow_collisions = if solid { ANY } else { NONE };
    }

    pub fn is_touching(&self, direction: u32) -> bool {
        self.touching & direction > NONE
    }

    /// Touching `direction` this frame but not the previous one.
    pub fn just_touched(&self, direction: u32) -> bool {
        self.is_touching(direction) && self.was_touching & direction == NONE
    }

    /// Body rectangle at the given owner transform.
    pub fn hitbox(&self, transform: &Transform) -> Rectangle {
        Rectangle::new(transform.x, transform.y, self.width, self.height)
    }

    /// One physics update against the owner's transform: snapshot `last`,
    /// integrate motion, roll `touching` into `was_touching`.
    pub fn step(&mut self, transform: &mut Transform) {
        self.last = transform.position();
        if self.moves {
            self.update_motion(transform);
        }
        self.was_touching = self.touching;
        self.touching = NONE;
    }

    /// Half-step velocity integration for angle, x and y.
    pub fn update_motion(&mut self, transform: &mut Transform) {
        let dt = self.settings.update_interval;

        let delta_v = (compute_velocity(
            self.angular_velocity,
            self.angular_acceleration,
            self.angular_drag,
            self.max_angular,
            dt,
        ) - self.angular_velocity)
            / 2.0;
        self.angular_velocity += delta_v;
        let delta = self.angular_velocity * dt;
        self.angular_velocity += delta_v;
        self.angle += delta;
        transform.rotation += delta;

        let delta_v = (compute_velocity(
            self.velocity.x,
            self.acceleration.x,
            self.drag.x,
            self.max_velocity.x,
            dt,
        ) - self.velocity.x)
            / 2.0;
        self.velocity.x += delta_v;
        let delta = self.velocity.x * dt;
        self.velocity.x += delta_v;
        transform.x += delta;

        let delta_v = (compute_velocity(
            self.velocity.y,
            self.acceleration.y,
            self.drag.y,
            self.max_velocity.y,
            dt,
        ) - self.velocity.y)
            / 2.0;
        self.velocity.y += delta_v;
        let delta = self.velocity.y * dt;
        self.velocity.y += delta_v;
        transform.y += delta;
    }
}

impl Behavior for ArcadePhysics {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "ArcadePhysics"
    }

    fn update(&mut self, ctx: &mut BehaviorContext) {
        if let Some(mut transform) = ctx.world.get_mut::<Transform>(ctx.owner) {
            self.step(&mut transform);
        }
    }
}

/// New velocity after one step of acceleration, or drag when there is no
/// acceleration, clamped to `[-max, max]` unless `max` is
/// [`UNBOUNDED_VELOCITY`] or not finite.
pub fn compute_velocity(velocity: f32, acceleration: f32, drag: f32, max: f32, dt: f32) -> f32 {
    let mut v = velocity;
    if acceleration != 0.0 {
        v += acceleration * dt;
    } else if drag != 0.0 {
        let d = drag.abs() * dt;
        if v - d > 0.0 {
            v -= d;
        } else if v + d < 0.0 {
            v += d;
        } else {
            v = 0.0;
        }
    }
    if v != 0.0 && max != UNBOUNDED_VELOCITY && max.is_finite() {
        let max = max.abs();
        v = v.clamp(-max, max);
    }
    v
}

/// Non-positive or non-finite masses count as unit mass.
fn effective_mass(mass: f32) -> f32 {
    if mass.is_finite() && mass > 0.0 {
        mass
    } else {
        1.0
    }
}

fn sign(v: f32) -> f32 {
    if v > 0.0 { 1.0 } else { -1.0 }
}

/// Velocities after an exchange between two movable bodies along one axis.
fn exchange_velocities(v1: f32, v2: f32, a: &ArcadePhysics, b: &ArcadePhysics) -> (f32, f32) {
    let (m1, m2) = (effective_mass(a.mass), effective_mass(b.mass));
    let mut new_v1 = ((v2 * v2 * m2) / m1).sqrt() * sign(v2);
    let mut new_v2 = ((v1 * v1 * m1) / m2).sqrt() * sign(v1);
    let average = (new_v1 + new_v2) * 0.5;
    new_v1 -= average;
    new_v2 -= average;
    (average + new_v1 * a.elasticity, average + new_v2 * b.elasticity)
}

fn overlaps_swept(r1: &Rectangle, r2: &Rectangle) -> bool {
    r1.x + r1.width > r2.x
        && r1.x < r2.x + r2.width
        && r1.y + r1.height > r2.y
        && r1.y < r2.y + r2.height
}

/// Resolve overlap along both axes. Returns true when either axis separated.
pub fn separate(
    a: &mut ArcadePhysics,
    ta: &mut Transform,
    b: &mut ArcadePhysics,
    tb: &mut Transform,
) -> bool {
    let separated_x = separate_x(a, ta, b, tb);
    let separated_y = separate_y(a, ta, b, tb);
    separated_x || separated_y
}

/// Resolve overlap along the x axis.
pub fn separate_x(
    a: &mut ArcadePhysics,
    ta: &mut Transform,
    b: &mut ArcadePhysics,
    tb: &mut Transform,
) -> bool {
    if a.immovable && b.immovable {
        return false;
    }

    let mut overlap = 0.0;
    let delta_a = ta.x - a.last.x;
    let delta_b = tb.x - b.last.x;

    if delta_a != delta_b {
        let delta_a_abs = delta_a.abs();
        let delta_b_abs = delta_b.abs();
        let rect_a = Rectangle::new(
            ta.x - delta_a.max(0.0),
            a.last.y,
            a.width + delta_a_abs,
            a.height,
        );
        let rect_b = Rectangle::new(
            tb.x - delta_b.max(0.0),
            b.last.y,
            b.width + delta_b_abs,
            b.height,
        );

        if overlaps_swept(&rect_a, &rect_b) {
            let max_overlap = delta_a_abs + delta_b_abs + a.settings.overlap_bias;
            if delta_a > delta_b {
                overlap = ta.x + a.width - tb.x;
                if overlap > max_overlap
                    || a.allow_collisions & RIGHT == NONE
                    || b.allow_collisions & LEFT == NONE
                {
                    overlap = 0.0;
                } else {
                    a.touching |= RIGHT;
                    b.touching |= LEFT;
                }
            } else if delta_a < delta_b {
                overlap = ta.x - b.width - tb.x;
                if -overlap > max_overlap
                    || a.allow_collisions & LEFT == NONE
                    || b.allow_collisions & RIGHT == NONE
                {
                    overlap = 0.0;
                } else {
                    a.touching |= LEFT;
                    b.touching |= RIGHT;
                }
            }
        }
    }

    if overlap == 0.0 {
        return false;
    }

    let (va, vb) = (a.velocity.x, b.velocity.x);
    if !a.immovable && !b.immovable {
        overlap *= 0.5;
        ta.x -= overlap;
        tb.x += overlap;
        let (new_va, new_vb) = exchange_velocities(va, vb, a, b);
        a.velocity.x = new_va;
        b.velocity.x = new_vb;
    } else if !a.immovable {
        ta.x -= overlap;
        a.velocity.x = vb - va * a.elasticity;
    } else {
        tb.x += overlap;
        b.velocity.x = va - vb * b.elasticity;
    }
    true
}

/// Resolve overlap along the y axis.
///
/// When one side is immovable and the other lands on it, the movable body is
/// carried horizontally by the immovable one's motion this frame.
pub fn separate_y(
    a: &mut ArcadePhysics,
    ta: &mut Transform,
    b: &mut ArcadePhysics,
    tb: &mut Transform,
) -> bool {
    if a.immovable && b.immovable {
        return false;
    }

    let mut overlap = 0.0;
    let delta_a = ta.y - a.last.y;
    let delta_b = tb.y - b.last.y;

    if delta_a != delta_b {
        let delta_a_abs = delta_a.abs();
        let delta_b_abs = delta_b.abs();
        let rect_a = Rectangle::new(
            ta.x,
            ta.y - delta_a.max(0.0),
            a.width,
            a.height + delta_a_abs,
        );
        let rect_b = Rectangle::new(
            tb.x,
            tb.y - delta_b.max(0.0),
            b.width,
            b.height + delta_b_abs,
        );

        if overlaps_swept(&rect_a, &rect_b) {
            let max_overlap = delta_a_abs + delta_b_abs + a.settings.overlap_bias;
            if delta_a > delta_b {
                overlap = ta.y + a.height - tb.y;
                if overlap > max_overlap
                    || a.allow_collisions & DOWN == NONE
                    || b.allow_collisions & UP == NONE
                {
                    overlap = 0.0;
                } else {
                    a.touching |= DOWN;
                    b.touching |= UP;
                }
            } else if delta_a < delta_b {
                overlap = ta.y - b.height - tb.y;
                if -overlap > max_overlap
                    || a.allow_collisions & UP == NONE
                    || b.allow_collisions & DOWN == NONE
                {
                    overlap = 0.0;
                } else {
                    a.touching |= UP;
                    b.touching |= DOWN;
                }
            }
        }
    }

    if overlap == 0.0 {
        return false;
    }

    let (va, vb) = (a.velocity.y, b.velocity.y);
    if !a.immovable && !b.immovable {
        overlap *= 0.5;
        ta.y -= overlap;
        tb.y += overlap;
        let (new_va, new_vb) = exchange_velocities(va, vb, a, b);
        a.velocity.y = new_va;
        b.velocity.y = new_vb;
    } else if !a.immovable {
        ta.y -= overlap;
        a.velocity.y = vb - va * a.elasticity;
        // riding a moving platform
        if b.owner_active && b.moves && delta_a > delta_b {
            ta.x += tb.x - b.last.x;
        }
    } else {
        tb.y += overlap;
        b.velocity.y = va - vb * b.elasticity;
        if a.owner_active && a.moves && delta_a < delta_b {
            tb.x += ta.x - a.last.x;
        }
    }
    true
}
