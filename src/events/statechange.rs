//! State switch notification.
//!
//! [`apply_pending_state`](crate::systems::gamestate::apply_pending_state)
//! triggers a [`StateChangedEvent`] after the [`ActiveState`] has been
//! updated and the new state's lifecycle flags have been set.
//!
//! [`ActiveState`]: crate::resources::activestate::ActiveState

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangedEvent {
    pub from: Option<Entity>,
    pub to: Entity,
}
