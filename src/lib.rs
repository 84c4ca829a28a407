//! Aberred scene library.
//!
//! An entity/component scene graph on top of `bevy_ecs`: nested groups and
//! states with parent-relative transforms, attachable behaviors, arcade
//! physics with pairwise and group collision, and a render traversal that
//! emits draw calls into a pluggable surface.

pub mod components;
pub mod error;
pub mod events;
pub mod geom;
pub mod resources;
pub mod scene;
pub mod systems;
