//! Components carried by scene entities.
//!
//! Plain bevy components hold per-node data (transform, node flags, child
//! list, drawables). Attachable behaviors implement
//! [`Behavior`](behavior::Behavior) and live in a node's
//! [`ComponentManager`](componentmanager::ComponentManager).
//!
//! Submodules overview:
//! - [`arcadephysics`] – arcade physics body behavior and pairwise separation
//! - [`behavior`] – the behavior contract and its owner bookkeeping
//! - [`bounds`] – local hit box and world-space hit-testing
//! - [`camera`] – viewport camera
//! - [`componentmanager`] – name-keyed behavior container with hook fan-out
//! - [`layer`] – flat render bucket
//! - [`node`] – scene node flags, back-references and child list
//! - [`pointerinput`] – hover, press and drag behavior driven by the pointer
//! - [`sprite`] – textured quad drawable
//! - [`stateconfig`] – lifecycle descriptor of a state
//! - [`textfield`] – text drawable
//! - [`transform`] – parent-relative transform and matrix concatenation
//! - [`zindex`] – draw order inside a layer

pub mod arcadephysics;
pub mod behavior;
pub mod bounds;
pub mod camera;
pub mod componentmanager;
pub mod layer;
pub mod node;
pub mod pointerinput;
pub mod sprite;
pub mod stateconfig;
pub mod textfield;
pub mod transform;
pub mod zindex;
