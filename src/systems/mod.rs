//! Scene systems.
//!
//! Free functions over the [`World`](bevy_ecs::world::World) that advance the
//! simulation and render it.
//!
//! Submodules overview
//! - [`collision`] – overlap queries and separation between physics bodies
//! - [`frame`] – one-frame driver tying the other systems together
//! - [`gamestate`] – request and apply switches of the active state
//! - [`render`] – depth-first render traversal into a draw surface
//! - [`time`] – update simulation time and delta
//! - [`update`] – top-down update traversal of the scene tree

pub mod collision;
pub mod frame;
pub mod gamestate;
pub mod render;
pub mod time;
pub mod update;
