//! Active state resources.
//!
//! [`ActiveState`] holds the state currently driven by the frame loop.
//! [`NextState`] holds a requested switch; it is applied by
//! [`apply_pending_state`](crate::systems::gamestate::apply_pending_state) at
//! the start of the next frame.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveState {
    current: Option<Entity>,
}

impl ActiveState {
    pub fn get(&self) -> Option<Entity> {
        self.current
    }

    pub(crate) fn set(&mut self, state: Option<Entity>) {
        self.current = state;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NextStates {
    #[default]
    Unchanged,
    Pending(Entity),
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextState {
    next: NextStates,
}

impl NextState {
    pub fn get(&self) -> NextStates {
        self.next
    }

    /// Mark a switch to `state` as pending.
    pub fn set(&mut self, state: Entity) {
        self.next = NextStates::Pending(state);
    }

    pub fn reset(&mut self) {
        self.next = NextStates::Unchanged;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.next, NextStates::Pending(_))
    }
}
