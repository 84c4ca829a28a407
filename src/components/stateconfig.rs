//! Lifecycle descriptor attached to every State.

use bevy_ecs::prelude::*;

#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct StateConfig {
    pub name: String,
    /// Set the first time the state becomes active.
    pub is_created: bool,
    pub is_initialised: bool,
    /// Set once the state has been switched to and its first frame can run.
    pub is_ready: bool,
    /// Persistent states keep their children when switched away from.
    pub is_persistent: bool,
    pub switch_count: u32,
}

impl StateConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn persistent(mut self) -> Self {
        self.is_persistent = true;
        self
    }
}
