//! Update traversal.
//!
//! Walks the scene tree top-down. A group runs its components' `update`,
//! then updates every live and active member in list order, then runs its
//! components' `post_update`. An entity runs `pre_update`, `update` and
//! `post_update` of its components.
//!
//! The member list is snapshotted before descending, so members added or
//! removed by a behavior take effect next frame.

use bevy_ecs::prelude::*;

use crate::components::componentmanager::UpdateHook;
use crate::components::layer::Layer;
use crate::components::node::Node;
use crate::scene::group::members;
use crate::scene::with_components;

fn run_hook(world: &mut World, node: Entity, hook: UpdateHook) {
    with_components(world, node, |manager, world| manager.dispatch_update(world, hook));
}

/// Update `node` and, for groups, its subtree. Dead or inactive nodes are
/// skipped.
pub fn update_node(world: &mut World, node: Entity) {
    let Some(info) = world.get::<Node>(node) else {
        return;
    };
    if !info.updates() {
        return;
    }
    if info.is_group() {
        run_hook(world, node, UpdateHook::Update);
        for child in members(world, node) {
            update_node(world, child);
        }
        run_hook(world, node, UpdateHook::PostUpdate);
    } else {
        run_hook(world, node, UpdateHook::PreUpdate);
        run_hook(world, node, UpdateHook::Update);
        run_hook(world, node, UpdateHook::PostUpdate);
    }
}

/// Update a state: its components' `pre_update`, then the regular group
/// update.
pub fn update_state(world: &mut World, state: Entity) {
    if world.get::<Node>(state).is_some_and(Node::updates) {
        run_hook(world, state, UpdateHook::PreUpdate);
    }
    update_node(world, state);
}

/// Run the components attached to visible layers.
pub fn update_layers(world: &mut World) {
    let layers: Vec<Entity> = world
        .query::<(Entity, &Layer)>()
        .iter(world)
        .filter(|(_, layer)| layer.visible)
        .map(|(e, _)| e)
        .collect();
    for layer in layers {
        run_hook(world, layer, UpdateHook::PreUpdate);
        run_hook(world, layer, UpdateHook::Update);
        run_hook(world, layer, UpdateHook::PostUpdate);
    }
}
