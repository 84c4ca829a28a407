//! Collision event type.
//!
//! Overlap queries trigger a [`CollisionEvent`] for every overlapping pair
//! they find, after separation (when requested) has been applied. Observers
//! can react in a decoupled manner (damage, sound, despawn, etc.).

use bevy_ecs::prelude::*;

/// `a` is the node the query was made for, `b` the one it overlapped.
/// `separated` tells whether the pair was pushed apart by this query.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    pub separated: bool,
}
