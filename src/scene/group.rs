//! Ordered child lists of groups and states.
//!
//! Every mutation keeps three things in lockstep: the group's [`Members`],
//! the child's `Transform` parent and the child's [`Node::group`]
//! back-reference. A node is a member of `group` exactly when its transform
//! parent is `group`.
//!
//! Adding a node that already belongs to another group moves it: it is
//! removed from the old group first (with its removal event). Re-adding a
//! current member is a no-op.
//!
//! Index-based mutations fail with [`SceneError::IndexOutOfRange`] instead of
//! silently doing nothing; inserting at `len` appends.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::node::{Members, Node, NodeKind};
use crate::components::transform::{check_ancestor, parent_of, set_parent};
use crate::error::SceneError;
use crate::events::membership::{ChildReorderedEvent, MembershipChange, MembershipEvent};
use crate::resources::random::RandomGenerator;
use crate::scene::membership::{clear_state, propagate_state};

/// Snapshot of the members of `group` (empty for non-groups).
pub fn members(world: &World, group: Entity) -> Vec<Entity> {
    world
        .get::<Members>(group)
        .map(|m| m.as_slice().to_vec())
        .unwrap_or_default()
}

pub fn num_children(world: &World, group: Entity) -> usize {
    world.get::<Members>(group).map_or(0, Members::len)
}

fn require_group(world: &World, group: Entity) -> Result<NodeKind, SceneError> {
    let kind = world
        .get::<Node>(group)
        .map(Node::kind)
        .ok_or(SceneError::MissingNode(group))?;
    if !kind.is_group() || world.get::<Members>(group).is_none() {
        return Err(SceneError::NotAGroup(group));
    }
    Ok(kind)
}

fn out_of_range(index: usize, len: usize) -> SceneError {
    warn!("Child index {} out of range (len {})", index, len);
    SceneError::IndexOutOfRange { index, len }
}

fn membership_change(group_kind: NodeKind, added: bool) -> MembershipChange {
    match (group_kind, added) {
        (NodeKind::State, true) => MembershipChange::AddedToState,
        (NodeKind::State, false) => MembershipChange::RemovedFromState,
        (_, true) => MembershipChange::AddedToGroup,
        (_, false) => MembershipChange::RemovedFromGroup,
    }
}

/// Reject a missing `child`, a state, or a `child` that is an ancestor of
/// `group`.
fn check_insertable(world: &World, group: Entity, child: Entity) -> Result<(), SceneError> {
    let child_info = world.get::<Node>(child).ok_or(SceneError::MissingNode(child))?;
    if child_info.kind() == NodeKind::State {
        warn!("State {:?} cannot be added to a group", child);
        return Err(SceneError::InvalidOwner(group));
    }
    if check_ancestor(world, child, group) {
        warn!("Refusing to add {:?} under its own descendant {:?}", child, group);
        return Err(SceneError::CycleDetected {
            child,
            parent: group,
        });
    }
    Ok(())
}

/// Insert `child` into `group` at `index` (append when `None`).
fn insert_child(
    world: &mut World,
    group: Entity,
    child: Entity,
    index: Option<usize>,
) -> Result<Entity, SceneError> {
    let group_kind = require_group(world, group)?;
    check_insertable(world, group, child)?;
    let previous_group = world.get::<Node>(child).and_then(Node::group);

    // re-adding a current member changes nothing
    if parent_of(world, child) == Some(group) && previous_group == Some(group) {
        return Ok(child);
    }
    let len = num_children(world, group);
    if let Some(i) = index {
        if i > len {
            return Err(out_of_range(i, len));
        }
    }

    if let Some(old) = previous_group {
        remove_child(world, old, child)?;
    }

    set_parent(world, child, Some(group))?;
    if let Some(mut list) = world.get_mut::<Members>(group) {
        match index {
            Some(i) => list.0.insert(i, child),
            None => list.0.push(child),
        }
    }
    let group_state = world.get::<Node>(group).and_then(Node::state);
    if let Some(mut info) = world.get_mut::<Node>(child) {
        info.set_group(Some(group));
    }
    let state = if group_kind == NodeKind::State {
        Some(group)
    } else {
        group_state
    };
    if let Some(state) = state {
        propagate_state(world, child, state);
    }

    world.trigger(MembershipEvent {
        node: child,
        owner: group,
        change: membership_change(group_kind, true),
    });
    Ok(child)
}

/// Remove the member at `index`, clearing its parentage.
fn detach_at(world: &mut World, group: Entity, index: usize) -> Result<Entity, SceneError> {
    let group_kind = require_group(world, group)?;
    let len = num_children(world, group);
    if index >= len {
        return Err(out_of_range(index, len));
    }
    let child = match world.get_mut::<Members>(group) {
        Some(mut list) => list.0.remove(index),
        None => return Err(SceneError::NotAGroup(group)),
    };
    if parent_of(world, child) == Some(group) {
        set_parent(world, child, None)?;
    }
    if let Some(mut info) = world.get_mut::<Node>(child) {
        info.set_group(None);
    }
    if group_kind == NodeKind::State {
        clear_state(world, child);
    }
    world.trigger(MembershipEvent {
        node: child,
        owner: group,
        change: membership_change(group_kind, false),
    });
    Ok(child)
}

pub fn add_child(world: &mut World, group: Entity, child: Entity) -> Result<Entity, SceneError> {
    insert_child(world, group, child, None)
}

/// Insert at `index`; `index == num_children` appends.
pub fn add_child_at(
    world: &mut World,
    group: Entity,
    child: Entity,
    index: usize,
) -> Result<Entity, SceneError> {
    insert_child(world, group, child, Some(index))
}

/// Insert right before the member `before`.
pub fn add_child_before(
    world: &mut World,
    group: Entity,
    child: Entity,
    before: Entity,
) -> Result<Entity, SceneError> {
    let index = get_child_index(world, group, before).ok_or(SceneError::NotAMember {
        group,
        child: before,
    })?;
    insert_child(world, group, child, Some(index))
}

/// Insert right after the member `after`.
pub fn add_child_after(
    world: &mut World,
    group: Entity,
    child: Entity,
    after: Entity,
) -> Result<Entity, SceneError> {
    let index = get_child_index(world, group, after).ok_or(SceneError::NotAMember {
        group,
        child: after,
    })?;
    insert_child(world, group, child, Some(index + 1))
}

pub fn remove_child(world: &mut World, group: Entity, child: Entity) -> Result<Entity, SceneError> {
    require_group(world, group)?;
    let index = get_child_index(world, group, child)
        .ok_or(SceneError::NotAMember { group, child })?;
    detach_at(world, group, index)
}

pub fn remove_child_at(world: &mut World, group: Entity, index: usize) -> Result<Entity, SceneError> {
    detach_at(world, group, index)
}

/// Remove the members in `begin..end`, in order. `end` is clamped to the
/// member count.
pub fn remove_children(
    world: &mut World,
    group: Entity,
    begin: usize,
    end: usize,
) -> Result<Vec<Entity>, SceneError> {
    require_group(world, group)?;
    let len = num_children(world, group);
    let end = end.min(len);
    if begin > end {
        return Err(out_of_range(begin, len));
    }
    let mut removed = Vec::with_capacity(end - begin);
    for _ in begin..end {
        removed.push(detach_at(world, group, begin)?);
    }
    Ok(removed)
}

/// Remove every member.
pub fn clear(world: &mut World, group: Entity) -> Result<Vec<Entity>, SceneError> {
    remove_children(world, group, 0, usize::MAX)
}

fn reordered(world: &mut World, group: Entity, child: Entity, index: usize) {
    debug!("{:?} moved to index {} in {:?}", child, index, group);
    world.trigger(ChildReorderedEvent {
        group,
        child,
        index,
    });
}

/// Exchange the positions of two members.
pub fn swap_children(
    world: &mut World,
    group: Entity,
    a: Entity,
    b: Entity,
) -> Result<(), SceneError> {
    require_group(world, group)?;
    let i = get_child_index(world, group, a).ok_or(SceneError::NotAMember { group, child: a })?;
    let j = get_child_index(world, group, b).ok_or(SceneError::NotAMember { group, child: b })?;
    swap_children_at(world, group, i, j)
}

/// Exchange the members at two indices.
pub fn swap_children_at(
    world: &mut World,
    group: Entity,
    i: usize,
    j: usize,
) -> Result<(), SceneError> {
    require_group(world, group)?;
    let len = num_children(world, group);
    if i >= len {
        return Err(out_of_range(i, len));
    }
    if j >= len {
        return Err(out_of_range(j, len));
    }
    if i == j {
        return Ok(());
    }
    let (a, b) = match world.get_mut::<Members>(group) {
        Some(mut list) => {
            list.0.swap(i, j);
            (list.0[i], list.0[j])
        }
        None => return Err(SceneError::NotAGroup(group)),
    };
    reordered(world, group, a, i);
    reordered(world, group, b, j);
    Ok(())
}

/// Move `child` to `index`, shifting the members in between.
pub fn set_child_index(
    world: &mut World,
    group: Entity,
    child: Entity,
    index: usize,
) -> Result<(), SceneError> {
    require_group(world, group)?;
    let current =
        get_child_index(world, group, child).ok_or(SceneError::NotAMember { group, child })?;
    let len = num_children(world, group);
    if index >= len {
        return Err(out_of_range(index, len));
    }
    if current == index {
        return Ok(());
    }
    if let Some(mut list) = world.get_mut::<Members>(group) {
        let moved = list.0.remove(current);
        list.0.insert(index, moved);
    }
    reordered(world, group, child, index);
    Ok(())
}

/// Put `new` where `old` is and remove `old`. If `new` is already a member
/// it is moved. Nothing changes when `new` cannot go under `group`.
pub fn replace_child(
    world: &mut World,
    group: Entity,
    old: Entity,
    new: Entity,
) -> Result<Entity, SceneError> {
    require_group(world, group)?;
    check_insertable(world, group, new)?;
    if old == new {
        return Ok(new);
    }
    if get_child_index(world, group, old).is_none() {
        return Err(SceneError::NotAMember { group, child: old });
    }
    if get_child_index(world, group, new).is_some() {
        remove_child(world, group, new)?;
    }
    let index = get_child_index(world, group, old).ok_or(SceneError::NotAMember { group, child: old })?;
    detach_at(world, group, index)?;
    insert_child(world, group, new, Some(index))
}

pub fn get_child_at(world: &World, group: Entity, index: usize) -> Option<Entity> {
    world.get::<Members>(group)?.as_slice().get(index).copied()
}

pub fn get_child_index(world: &World, group: Entity, child: Entity) -> Option<usize> {
    world.get::<Members>(group)?.index_of(child)
}

/// Depth-first search of the subtree for a node matching `pred`.
fn find_in_subtree(
    world: &World,
    group: Entity,
    pred: &dyn Fn(&Node) -> bool,
) -> Option<Entity> {
    let list = world.get::<Members>(group)?;
    for child in list.iter() {
        let Some(info) = world.get::<Node>(child) else {
            continue;
        };
        if pred(info) {
            return Some(child);
        }
        if info.is_group() {
            if let Some(found) = find_in_subtree(world, child, pred) {
                return Some(found);
            }
        }
    }
    None
}

/// First node in the subtree named `name`.
pub fn get_child_by_name(world: &World, group: Entity, name: &str) -> Option<Entity> {
    find_in_subtree(world, group, &|n| n.name == name)
}

/// Node in the subtree whose id is `id`.
pub fn get_child_by_id(world: &World, group: Entity, id: &str) -> Option<Entity> {
    find_in_subtree(world, group, &|n| n.id() == Some(id))
}

/// Whether `child` is a member of `group`; with `deep`, anywhere in its
/// subtree.
pub fn contains_child(world: &World, group: Entity, child: Entity, deep: bool) -> bool {
    let Some(list) = world.get::<Members>(group) else {
        return false;
    };
    if list.contains(child) {
        return true;
    }
    deep && list
        .iter()
        .any(|member| world.get::<Members>(member).is_some() && contains_child(world, member, child, true))
}

fn exists(world: &World, node: Entity) -> bool {
    world.get::<Node>(node).is_some_and(|n| n.exists)
}

pub fn count_living(world: &World, group: Entity) -> usize {
    members(world, group).into_iter().filter(|&e| exists(world, e)).count()
}

pub fn count_dead(world: &World, group: Entity) -> usize {
    members(world, group).into_iter().filter(|&e| !exists(world, e)).count()
}

pub fn get_first_alive(world: &World, group: Entity) -> Option<Entity> {
    members(world, group).into_iter().find(|&e| exists(world, e))
}

pub fn get_first_dead(world: &World, group: Entity) -> Option<Entity> {
    members(world, group).into_iter().find(|&e| !exists(world, e))
}

/// Call `f` on a snapshot of the members, so `f` may change the group.
pub fn for_each(world: &mut World, group: Entity, mut f: impl FnMut(&mut World, Entity)) {
    for child in members(world, group) {
        f(world, child);
    }
}

/// Random member in `start..start + length`.
///
/// `length == 0` means "up to the end"; a `start` past the end restarts at 0.
/// An index that still falls past the end picks the last member. Returns
/// `None` for an empty group.
pub fn get_random(world: &mut World, group: Entity, start: usize, length: usize) -> Option<Entity> {
    let list = members(world, group);
    let len = list.len();
    if len == 0 {
        return None;
    }
    let length = if length == 0 { len } else { length };
    let start = if start > len { 0 } else { start };
    if !world.contains_resource::<RandomGenerator>() {
        world.insert_resource(RandomGenerator::default());
    }
    let offset = world.resource_mut::<RandomGenerator>().index(length);
    let index = start + offset;
    Some(if index >= len { list[len - 1] } else { list[index] })
}
