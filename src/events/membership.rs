//! Scene membership notifications.
//!
//! Every attach/detach performed through the scene API triggers one
//! [`MembershipEvent`] after the world has been updated, so observers always
//! see the new parentage. Reorders inside a group trigger
//! [`ChildReorderedEvent`].

use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipChange {
    AddedToState,
    RemovedFromState,
    AddedToGroup,
    RemovedFromGroup,
    AddedToLayer,
    RemovedFromLayer,
}

impl MembershipChange {
    pub fn is_added(self) -> bool {
        matches!(
            self,
            MembershipChange::AddedToState
                | MembershipChange::AddedToGroup
                | MembershipChange::AddedToLayer
        )
    }
}

/// `node` joined or left `owner` (a state, group or layer).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipEvent {
    pub node: Entity,
    pub owner: Entity,
    pub change: MembershipChange,
}

/// `child` moved to `index` inside `group`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildReorderedEvent {
    pub group: Entity,
    pub child: Entity,
    pub index: usize,
}
