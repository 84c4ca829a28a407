//! Layer attachment and state propagation.
//!
//! A node sits on at most one layer. Attaching a node that is already on a
//! layer fails with [`SceneError::AlreadyAttached`] and keeps the existing
//! attachment.
//!
//! The state back-reference is propagated down the subtree whenever a node
//! becomes reachable from a state. The first time a node gets a state it is
//! also given a fresh id from the [`RandomGenerator`].

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::layer::Layer;
use crate::components::node::{Members, Node};
use crate::error::SceneError;
use crate::events::membership::{MembershipChange, MembershipEvent};
use crate::resources::random::RandomGenerator;

/// Put `node` on `layer`'s render list.
pub fn add_to_layer(world: &mut World, node: Entity, layer: Entity) -> Result<(), SceneError> {
    let Some(info) = world.get::<Node>(node) else {
        return Err(SceneError::MissingNode(node));
    };
    if let Some(existing) = info.layer() {
        warn!(
            "{:?} is already on layer {:?}; refusing to add it to {:?}",
            node, existing, layer
        );
        return Err(SceneError::AlreadyAttached(existing));
    }
    let Some(mut bucket) = world.get_mut::<Layer>(layer) else {
        return Err(SceneError::InvalidOwner(layer));
    };
    bucket.render_list.push(node);
    if let Some(mut info) = world.get_mut::<Node>(node) {
        info.set_layer(Some(layer));
    }
    world.trigger(MembershipEvent {
        node,
        owner: layer,
        change: MembershipChange::AddedToLayer,
    });
    Ok(())
}

/// Take `node` off its layer. Returns the layer it was on.
pub fn remove_from_layer(world: &mut World, node: Entity) -> Option<Entity> {
    let layer = world.get::<Node>(node)?.layer()?;
    if let Some(mut bucket) = world.get_mut::<Layer>(layer) {
        bucket.render_list.retain(|&e| e != node);
    }
    if let Some(mut info) = world.get_mut::<Node>(node) {
        info.set_layer(None);
    }
    world.trigger(MembershipEvent {
        node,
        owner: layer,
        change: MembershipChange::RemovedFromLayer,
    });
    Some(layer)
}

/// Despawn a layer, releasing every node on it.
pub fn destroy_layer(world: &mut World, layer: Entity) -> Result<(), SceneError> {
    let Some(bucket) = world.get::<Layer>(layer) else {
        return Err(SceneError::InvalidOwner(layer));
    };
    let nodes = bucket.render_list.clone();
    for node in nodes {
        remove_from_layer(world, node);
    }
    world.despawn(layer);
    Ok(())
}

/// Give `node` and its whole subtree the `state` back-reference, assigning
/// ids to nodes that never had one.
pub(crate) fn propagate_state(world: &mut World, node: Entity, state: Entity) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        let needs_id = match world.get::<Node>(current) {
            Some(info) => info.id().is_none(),
            None => continue,
        };
        let id = if needs_id {
            Some(next_id(world))
        } else {
            None
        };
        if let Some(mut info) = world.get_mut::<Node>(current) {
            info.set_state(Some(state));
            if let Some(id) = id {
                debug!("Assigned id {} to {:?}", id, current);
                info.set_id(id);
            }
        }
        if let Some(members) = world.get::<Members>(current) {
            stack.extend(members.iter());
        }
    }
}

/// Clear the state back-reference of `node` only; its descendants keep
/// theirs.
pub(crate) fn clear_state(world: &mut World, node: Entity) {
    if let Some(mut info) = world.get_mut::<Node>(node) {
        info.set_state(None);
    }
}

fn next_id(world: &mut World) -> String {
    if !world.contains_resource::<RandomGenerator>() {
        world.insert_resource(RandomGenerator::default());
    }
    world.resource_mut::<RandomGenerator>().uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{spawn_entity, spawn_layer};
    use bevy_ecs::observer::On;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_layer_attach_once() {
        let mut world = World::new();
        let first = spawn_layer(&mut world, "bg");
        let second = spawn_layer(&mut world, "fg");
        let e = spawn_entity(&mut world, "e");

        add_to_layer(&mut world, e, first).unwrap();
        assert_eq!(
            add_to_layer(&mut world, e, second),
            Err(SceneError::AlreadyAttached(first))
        );
        assert_eq!(world.get::<Node>(e).unwrap().layer(), Some(first));
        assert_eq!(world.get::<Layer>(first).unwrap().render_list(), &[e]);
        assert!(world.get::<Layer>(second).unwrap().is_empty());
    }

    #[test]
    fn test_layer_events_and_removal() {
        let mut world = World::new();
        let layer = spawn_layer(&mut world, "bg");
        let e = spawn_entity(&mut world, "e");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        world.add_observer(move |t: On<MembershipEvent>| {
            seen_clone.lock().unwrap().push(t.event().change);
        });
        world.flush();

        add_to_layer(&mut world, e, layer).unwrap();
        assert_eq!(remove_from_layer(&mut world, e), Some(layer));
        assert_eq!(remove_from_layer(&mut world, e), None);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                MembershipChange::AddedToLayer,
                MembershipChange::RemovedFromLayer
            ]
        );
    }

    #[test]
    fn test_non_layer_owner_rejected() {
        let mut world = World::new();
        let e = spawn_entity(&mut world, "e");
        let other = spawn_entity(&mut world, "other");
        assert_eq!(
            add_to_layer(&mut world, e, other),
            Err(SceneError::InvalidOwner(other))
        );
        assert_eq!(world.get::<Node>(e).unwrap().layer(), None);
    }

    #[test]
    fn test_destroy_layer_releases_nodes() {
        let mut world = World::new();
        let layer = spawn_layer(&mut world, "bg");
        let e = spawn_entity(&mut world, "e");
        add_to_layer(&mut world, e, layer).unwrap();
        destroy_layer(&mut world, layer).unwrap();
        assert_eq!(world.get::<Node>(e).unwrap().layer(), None);
    }
}
