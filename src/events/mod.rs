//! Event types triggered by the scene.
//!
//! Events provide a decoupled way to react to scene changes: the scene API
//! triggers them on the world and observers registered with
//! `World::add_observer` consume them.
//!
//! Submodules:
//! - [`behavior`] – a named component was attached to or removed from a node
//! - [`collision`] – overlapping pairs found by overlap queries
//! - [`membership`] – nodes joining or leaving states, groups and layers
//! - [`statechange`] – the active state was switched
pub mod behavior;
pub mod collision;
pub mod membership;
pub mod statechange;
