//! Scene node descriptor.
//!
//! Every Entity, Group and State carries a [`Node`] with its flags and its
//! non-owning back-references (state, group, layer). Groups and States also
//! carry [`Members`], their ordered child list.

use bevy_ecs::prelude::*;

use crate::components::behavior::OwnerKind;

/// Closed set of scene node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entity,
    Group,
    /// Root group of a per-state tree.
    State,
}

impl NodeKind {
    /// Groups and States hold children.
    pub fn is_group(self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::State)
    }

    pub fn owner_kind(self) -> OwnerKind {
        match self {
            NodeKind::Entity => OwnerKind::Entity,
            NodeKind::Group => OwnerKind::Group,
            NodeKind::State => OwnerKind::State,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Node {
    kind: NodeKind,
    pub name: String,
    id: Option<String>,
    /// Cleared by destroy; dead nodes are counted by `count_dead`.
    pub exists: bool,
    /// Inactive nodes are skipped by update.
    pub active: bool,
    /// Nodes that will not render are skipped by render.
    pub will_render: bool,
    pub visible: bool,
    pub alpha: f32,
    state: Option<Entity>,
    group: Option<Entity>,
    layer: Option<Entity>,
}

impl Node {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            id: None,
            exists: true,
            active: true,
            will_render: true,
            visible: true,
            alpha: 1.0,
            state: None,
            group: None,
            layer: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    /// Id assigned on first attachment to a state.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> Option<Entity> {
        self.state
    }

    pub fn group(&self) -> Option<Entity> {
        self.group
    }

    pub fn layer(&self) -> Option<Entity> {
        self.layer
    }

    /// Whether update should descend into this node.
    pub fn updates(&self) -> bool {
        self.exists && self.active
    }

    /// Whether render should descend into this node.
    pub fn renders(&self) -> bool {
        self.exists && self.will_render && self.visible && self.alpha > 0.0
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub(crate) fn set_state(&mut self, state: Option<Entity>) {
        self.state = state;
    }

    pub(crate) fn set_group(&mut self, group: Option<Entity>) {
        self.group = group;
    }

    pub(crate) fn set_layer(&mut self, layer: Option<Entity>) {
        self.layer = layer;
    }
}

/// Ordered children of a Group or State.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Members(pub(crate) Vec<Entity>);

impl Members {
    pub fn as_slice(&self) -> &[Entity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, child: Entity) -> bool {
        self.0.contains(&child)
    }

    pub fn index_of(&self, child: Entity) -> Option<usize> {
        self.0.iter().position(|&e| e == child)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }
}
