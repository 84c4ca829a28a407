//! Overlap queries between physics bodies.
//!
//! Collisions are not run by the frame loop: game code calls these queries
//! from its own update, against single nodes or whole groups. Each query
//! works on the [`ArcadePhysics`] component of the nodes involved and their
//! local transforms.
//!
//! For every overlapping pair the query
//! - optionally separates the two bodies,
//! - fires the first body's overlap callback with `(a, b)`,
//! - triggers a [`CollisionEvent`].
//!
//! Group queries recurse into nested groups on both sides and OR together
//! the results of every pair; they never stop early and do not skip
//! repeated pairs.
//!
//! A node's component manager is out of the world while its hooks run. A
//! behavior querying its own node goes through [`overlaps_from`] or
//! [`collide_from`], which find the owner's body among its siblings.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::arcadephysics::{self, ArcadePhysics};
use crate::components::behavior::{Behavior, BehaviorContext};
use crate::components::componentmanager::ComponentManager;
use crate::components::node::Node;
use crate::components::transform::Transform;
use crate::events::collision::CollisionEvent;
use crate::scene::group::members;
use crate::scene::{is_group, restore_components, take_components};

fn is_live(world: &World, node: Entity) -> bool {
    world.get::<Node>(node).is_none_or(|n| n.exists)
}

fn is_active(world: &World, node: Entity) -> bool {
    world.get::<Node>(node).is_none_or(|n| n.active)
}

fn has_body(world: &World, node: Entity) -> bool {
    let Some(manager) = world.get::<ComponentManager>(node) else {
        return false;
    };
    if manager.owner() != node {
        warn!(
            "components of {node:?} are out of the world while its hooks run; \
             query from its behaviors with collide_from/overlaps_from"
        );
        return false;
    }
    manager
        .find::<ArcadePhysics>()
        .is_some_and(|p| p.core().active)
}

/// Run `f` on `a`'s body, already borrowed by the caller, and on the body of
/// `b`. Transforms are written back afterwards.
fn with_body<R>(
    world: &mut World,
    a: Entity,
    pa: &mut ArcadePhysics,
    b: Entity,
    f: impl FnOnce(&mut ArcadePhysics, &mut Transform, &mut ArcadePhysics, &mut Transform) -> R,
) -> Option<R> {
    if a == b || !pa.core().active || !has_body(world, b) {
        return None;
    }
    let mut ta = *world.get::<Transform>(a)?;
    let mut tb = *world.get::<Transform>(b)?;
    let (active_a, active_b) = (is_active(world, a), is_active(world, b));
    let mut manager_b = take_components(world, b)?;

    let result = manager_b.find_mut::<ArcadePhysics>().map(|pb| {
        pa.owner_active = active_a;
        pb.owner_active = active_b;
        f(pa, &mut ta, pb, &mut tb)
    });

    restore_components(world, b, manager_b);
    if result.is_some() {
        if let Some(mut t) = world.get_mut::<Transform>(a) {
            *t = ta;
        }
        if let Some(mut t) = world.get_mut::<Transform>(b) {
            *t = tb;
        }
    }
    result
}

/// Run `f` on the bodies and transforms of two distinct nodes.
fn with_bodies<R>(
    world: &mut World,
    a: Entity,
    b: Entity,
    f: impl FnOnce(&mut ArcadePhysics, &mut Transform, &mut ArcadePhysics, &mut Transform) -> R,
) -> Option<R> {
    if a == b || !has_body(world, a) || !has_body(world, b) {
        return None;
    }
    let mut manager_a = take_components(world, a)?;
    let result = manager_a
        .find_mut::<ArcadePhysics>()
        .and_then(|pa| with_body(world, a, pa, b, f));
    restore_components(world, a, manager_a);
    result
}

/// Overlap test and response for one pair, `None` when they do not overlap.
fn overlap_pair(
    a: Entity,
    b: Entity,
    separate_objects: bool,
) -> impl FnOnce(&mut ArcadePhysics, &mut Transform, &mut ArcadePhysics, &mut Transform) -> Option<bool>
{
    move |pa, ta, pb, tb| {
        if !pa.hitbox(ta).intersects(&pb.hitbox(tb)) {
            return None;
        }
        let separated = separate_objects && arcadephysics::separate(pa, ta, pb, tb);
        pa.fire_callback(a, b);
        Some(separated)
    }
}

fn report(world: &mut World, a: Entity, b: Entity, outcome: Option<bool>) -> bool {
    match outcome {
        Some(separated) => {
            world.trigger(CollisionEvent { a, b, separated });
            true
        }
        None => false,
    }
}

/// Resolve overlap between two bodies without any overlap test, callback
/// or event. Returns true when either axis separated.
pub fn separate(world: &mut World, a: Entity, b: Entity) -> bool {
    with_bodies(world, a, b, arcadephysics::separate).unwrap_or(false)
}

/// Strict AABB test between two bodies at their current positions. When
/// they overlap, optionally separate them, then fire `a`'s callback and
/// trigger a [`CollisionEvent`].
///
/// A node's own body is unreachable while its hooks run; behaviors query
/// their owner with [`overlaps_from`].
pub fn overlaps(world: &mut World, a: Entity, b: Entity, separate_objects: bool) -> bool {
    if !is_live(world, a) || !is_live(world, b) {
        return false;
    }
    let outcome = with_bodies(world, a, b, overlap_pair(a, b, separate_objects)).flatten();
    report(world, a, b, outcome)
}

/// `a` against every member of `group`, recursing into nested groups.
pub fn overlaps_group(world: &mut World, a: Entity, group: Entity, separate_objects: bool) -> bool {
    let mut any = false;
    for member in members(world, group) {
        let hit = if is_group(world, member) {
            overlaps_group(world, a, member, separate_objects)
        } else {
            overlaps(world, a, member, separate_objects)
        };
        any |= hit;
    }
    any
}

/// Every member of `first` (recursively) against `second`.
pub fn overlaps_group_group(
    world: &mut World,
    first: Entity,
    second: Entity,
    separate_objects: bool,
) -> bool {
    let mut any = false;
    for member in members(world, first) {
        let hit = if is_group(world, member) {
            overlaps_group_group(world, member, second, separate_objects)
        } else {
            overlaps_group(world, member, second, separate_objects)
        };
        any |= hit;
    }
    any
}

/// `a` against each node of `others`; groups in the list are recursed into.
pub fn overlaps_list(world: &mut World, a: Entity, others: &[Entity], separate_objects: bool) -> bool {
    let mut any = false;
    for &other in others {
        let hit = if is_group(world, other) {
            overlaps_group(world, a, other, separate_objects)
        } else {
            overlaps(world, a, other, separate_objects)
        };
        any |= hit;
    }
    any
}

/// [`overlaps`] with the hook owner as the first body. The owner's
/// [`ArcadePhysics`] is looked up among the running behavior's siblings.
pub fn overlaps_from(ctx: &mut BehaviorContext, other: Entity, separate_objects: bool) -> bool {
    let a = ctx.owner;
    if is_group(ctx.world, other) {
        let mut any = false;
        for member in members(ctx.world, other) {
            any |= overlaps_from(ctx, member, separate_objects);
        }
        return any;
    }
    let world = &mut *ctx.world;
    if !is_live(world, a) || !is_live(world, other) {
        return false;
    }
    let Some(pa) = ctx.siblings.find_mut::<ArcadePhysics>() else {
        warn!("{a:?} has no physics body next to the querying behavior");
        return false;
    };
    let outcome = with_body(world, a, pa, other, overlap_pair(a, other, separate_objects)).flatten();
    report(world, a, other, outcome)
}

/// Overlap and separate two bodies.
pub fn collide(world: &mut World, a: Entity, b: Entity) -> bool {
    overlaps(world, a, b, true)
}

pub fn collide_group(world: &mut World, a: Entity, group: Entity) -> bool {
    overlaps_group(world, a, group, true)
}

pub fn collide_group_group(world: &mut World, first: Entity, second: Entity) -> bool {
    overlaps_group_group(world, first, second, true)
}

pub fn collide_list(world: &mut World, a: Entity, others: &[Entity]) -> bool {
    overlaps_list(world, a, others, true)
}

/// Collide the hook owner with `other`, a single node or a group.
pub fn collide_from(ctx: &mut BehaviorContext, other: Entity) -> bool {
    overlaps_from(ctx, other, true)
}
