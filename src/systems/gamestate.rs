//! State switching.
//!
//! [`request_state`] records the intent in [`NextState`]; the switch happens
//! in [`apply_pending_state`] at the start of the next frame so it never
//! runs in the middle of a tree walk.
//!
//! On a switch the outgoing state loses its ready flag and, unless it is
//! persistent, all its children and its texture cache. The incoming state is
//! marked created, initialised and ready, its switch count is bumped and a
//! [`StateChangedEvent`] is triggered.

use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::node::{Node, NodeKind};
use crate::components::stateconfig::StateConfig;
use crate::error::SceneError;
use crate::events::statechange::StateChangedEvent;
use crate::resources::activestate::{ActiveState, NextState, NextStates};
use crate::resources::texturestore::TextureCache;
use crate::scene::destroy;
use crate::scene::group::members;

/// Ask for a switch to `state` at the next frame.
pub fn request_state(world: &mut World, state: Entity) -> Result<(), SceneError> {
    match world.get::<Node>(state).map(Node::kind) {
        Some(NodeKind::State) => {}
        Some(_) => return Err(SceneError::InvalidOwner(state)),
        None => return Err(SceneError::MissingNode(state)),
    }
    world
        .get_resource_or_insert_with(NextState::default)
        .set(state);
    debug!("State switch to {:?} requested", state);
    Ok(())
}

pub fn active_state(world: &World) -> Option<Entity> {
    world.get_resource::<ActiveState>().and_then(ActiveState::get)
}

/// Apply a pending switch, if any. Returns the new active state.
pub fn apply_pending_state(world: &mut World) -> Option<Entity> {
    let NextStates::Pending(next) = world.get_resource::<NextState>()?.get() else {
        return None;
    };
    world.resource_mut::<NextState>().reset();

    if world.get::<StateConfig>(next).is_none() {
        warn!("Pending state {:?} no longer exists", next);
        return None;
    }
    let previous = active_state(world);
    if previous == Some(next) {
        debug!("State {:?} is already active", next);
        return None;
    }

    if let Some(old) = previous {
        leave_state(world, old);
    }

    world
        .get_resource_or_insert_with(ActiveState::default)
        .set(Some(next));
    if let Some(mut config) = world.get_mut::<StateConfig>(next) {
        config.is_created = true;
        config.is_initialised = true;
        config.is_ready = true;
        config.switch_count += 1;
        info!(
            "Switched to state '{}' (switch #{})",
            config.name, config.switch_count
        );
    }
    world.trigger(StateChangedEvent {
        from: previous,
        to: next,
    });
    Some(next)
}

fn leave_state(world: &mut World, state: Entity) {
    let persistent = match world.get_mut::<StateConfig>(state) {
        Some(mut config) => {
            config.is_ready = false;
            config.is_persistent
        }
        None => return,
    };
    if persistent {
        return;
    }
    for child in members(world, state) {
        if let Err(e) = destroy(world, child) {
            warn!("Failed to destroy {:?} while leaving {:?}: {}", child, state, e);
        }
    }
    if let Some(mut cache) = world.get_mut::<TextureCache>(state) {
        cache.0.clear();
    }
    debug!("Cleared non-persistent state {:?}", state);
}
