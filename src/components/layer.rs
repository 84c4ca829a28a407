//! Render buckets.
//!
//! A [`Layer`] is a flat render list, independent from group parentage. A
//! node can sit on at most one layer; layers are drawn after the active
//! state's tree, each one sorted by [`ZIndex`](super::zindex::ZIndex).

use bevy_ecs::prelude::*;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    /// Draw order between layers; lower first.
    pub order: i32,
    pub(crate) render_list: Vec<Entity>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            order: 0,
            render_list: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn render_list(&self) -> &[Entity] {
        &self.render_list
    }

    pub fn contains(&self, node: Entity) -> bool {
        self.render_list.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.render_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.render_list.is_empty()
    }
}
