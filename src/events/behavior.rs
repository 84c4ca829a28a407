use bevy_ecs::prelude::*;

use crate::components::behavior::OwnerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorChange {
    Added,
    Removed,
}

/// A named component was attached to or removed from `owner`.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct BehaviorEvent {
    pub owner: Entity,
    pub owner_kind: OwnerKind,
    pub name: String,
    pub change: BehaviorChange,
}
