//! Scene-graph construction and component attachment.
//!
//! Scene nodes are plain bevy entities carrying a [`Node`], a [`Transform`]
//! and a [`ComponentManager`]; groups and states also carry [`Members`].
//! Everything that changes the graph goes through the free functions of this
//! module and its submodules so that membership, transform parentage and the
//! back-references on [`Node`] stay in lockstep.
//!
//! Submodules:
//! - [`group`] – ordered child-list operations of groups and states
//! - [`membership`] – layer attachment and state propagation

pub mod group;
pub mod membership;

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::behavior::{Behavior, OwnerKind};
use crate::components::camera::Camera;
use crate::components::componentmanager::ComponentManager;
use crate::components::layer::Layer;
use crate::components::node::{Members, Node, NodeKind};
use crate::components::stateconfig::StateConfig;
use crate::components::transform::Transform;
use crate::error::SceneError;
use crate::events::behavior::{BehaviorChange, BehaviorEvent};
use crate::geom::Rectangle;
use crate::resources::texturestore::TextureCache;

fn spawn_node(world: &mut World, kind: NodeKind, name: &str) -> Entity {
    let entity = world.spawn_empty().id();
    world.entity_mut(entity).insert((
        Node::new(kind, name),
        Transform::default(),
        ComponentManager::new(kind.owner_kind(), entity),
    ));
    if kind.is_group() {
        world.entity_mut(entity).insert(Members::default());
    }
    debug!("Spawned {:?} '{}' as {:?}", kind, name, entity);
    entity
}

/// Spawn a leaf node.
pub fn spawn_entity(world: &mut World, name: &str) -> Entity {
    spawn_node(world, NodeKind::Entity, name)
}

/// Spawn an empty group.
pub fn spawn_group(world: &mut World, name: &str) -> Entity {
    spawn_node(world, NodeKind::Group, name)
}

/// Spawn a state: a root group with its own texture cache and lifecycle
/// descriptor.
pub fn spawn_state(world: &mut World, name: &str) -> Entity {
    let state = spawn_node(world, NodeKind::State, name);
    world
        .entity_mut(state)
        .insert((StateConfig::new(name), TextureCache::default()));
    state
}

pub fn spawn_layer(world: &mut World, name: &str) -> Entity {
    let layer = world.spawn(Layer::new(name)).id();
    world
        .entity_mut(layer)
        .insert(ComponentManager::new(OwnerKind::Layer, layer));
    layer
}

pub fn spawn_camera(world: &mut World, name: &str, viewport: Rectangle) -> Entity {
    world
        .spawn((Camera::new(name, viewport), Transform::default()))
        .id()
}

pub fn node_kind(world: &World, node: Entity) -> Option<NodeKind> {
    world.get::<Node>(node).map(Node::kind)
}

pub fn is_group(world: &World, node: Entity) -> bool {
    node_kind(world, node).is_some_and(NodeKind::is_group)
}

/// Detach `node`'s manager from the world so its behaviors can borrow the
/// world mutably.
pub(crate) fn take_components(world: &mut World, node: Entity) -> Option<ComponentManager> {
    let mut slot = world.get_mut::<ComponentManager>(node)?;
    Some(std::mem::take(&mut *slot))
}

/// Put back a manager taken with [`take_components`]. Behaviors added to the
/// node in the meantime are merged after the existing ones.
pub(crate) fn restore_components(world: &mut World, node: Entity, mut manager: ComponentManager) {
    match world.get_mut::<ComponentManager>(node) {
        Some(mut slot) => {
            let added = std::mem::replace(&mut *slot, manager);
            if !added.is_empty() {
                slot.absorb(added);
            }
        }
        None => {
            // node was despawned by one of its own behaviors
            manager.remove_all(true);
        }
    }
}

/// Run `f` with `node`'s component manager and the world borrowed together.
pub fn with_components<R>(
    world: &mut World,
    node: Entity,
    f: impl FnOnce(&mut ComponentManager, &mut World) -> R,
) -> Option<R> {
    let mut manager = take_components(world, node)?;
    let result = f(&mut manager, world);
    restore_components(world, node, manager);
    Some(result)
}

/// Attach `behavior` to `owner` (node or layer) and notify observers.
pub fn add_component(
    world: &mut World,
    owner: Entity,
    behavior: impl Behavior,
) -> Result<(), SceneError> {
    let name = behavior.name().to_string();
    let owner_kind = {
        let mut manager = world
            .get_mut::<ComponentManager>(owner)
            .ok_or(SceneError::InvalidOwner(owner))?;
        manager.add(behavior)?;
        manager.owner_kind()
    };
    world.trigger(BehaviorEvent {
        owner,
        owner_kind,
        name,
        change: BehaviorChange::Added,
    });
    Ok(())
}

/// Remove the component called `name` from `owner`. With `destroy` the
/// component cannot be attached again.
pub fn remove_component(
    world: &mut World,
    owner: Entity,
    name: &str,
    destroy: bool,
) -> Option<Box<dyn Behavior>> {
    let (owner_kind, removed) = {
        let mut manager = world.get_mut::<ComponentManager>(owner)?;
        let removed = manager.remove_component_by_name(name, destroy)?;
        (manager.owner_kind(), removed)
    };
    world.trigger(BehaviorEvent {
        owner,
        owner_kind,
        name: name.to_string(),
        change: BehaviorChange::Removed,
    });
    Some(removed)
}

pub fn get_component<'w, T: Behavior>(world: &'w World, owner: Entity, name: &str) -> Option<&'w T> {
    world.get::<ComponentManager>(owner)?.get::<T>(name)
}

/// Mutable typed access to a component of `owner`.
pub fn get_component_mut<'w, T: Behavior>(
    world: &'w mut World,
    owner: Entity,
    name: &str,
) -> Option<&'w mut T> {
    world
        .get_mut::<ComponentManager>(owner)?
        .into_inner()
        .get_mut::<T>(name)
}

pub fn has_component(world: &World, owner: Entity, name: &str) -> bool {
    world
        .get::<ComponentManager>(owner)
        .is_some_and(|m| m.has_component(name))
}

/// Destroy `node` and, for groups, its whole subtree: detach it from its
/// group and layer, destroy its components and despawn it.
pub fn destroy(world: &mut World, node: Entity) -> Result<(), SceneError> {
    let Some(info) = world.get::<Node>(node) else {
        warn!("destroy: {:?} is not a scene node", node);
        return Err(SceneError::MissingNode(node));
    };
    let (parent, layer, kind) = (info.group(), info.layer(), info.kind());

    if let Some(parent) = parent {
        group::remove_child(world, parent, node)?;
    }
    if layer.is_some() {
        membership::remove_from_layer(world, node);
    }
    if kind.is_group() {
        let children = group::members(world, node);
        for child in children {
            destroy(world, child)?;
        }
    }
    if let Some(mut node_info) = world.get_mut::<Node>(node) {
        node_info.exists = false;
    }
    if let Some(mut manager) = world.get_mut::<ComponentManager>(node) {
        manager.remove_all(true);
    }
    world.despawn(node);
    debug!("Destroyed {:?}", node);
    Ok(())
}
