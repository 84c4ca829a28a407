//! Errors returned by scene-graph mutations.
//!
//! Lookups return `Option`; anything that changes membership, parentage or
//! component attachment returns `Result<_, SceneError>` and leaves the world
//! untouched on failure.

use bevy_ecs::entity::Entity;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The node or component already has an owner of this kind.
    #[error("{0:?} is already attached")]
    AlreadyAttached(Entity),

    /// The target cannot own the node or component (wrong kind, or the node
    /// does not carry the required components).
    #[error("{0:?} cannot own this item")]
    InvalidOwner(Entity),

    /// The component was destroyed and cannot be attached again.
    #[error("component '{0}' has been destroyed")]
    DestroyedComponent(String),

    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{child:?} is not a member of {group:?}")]
    NotAMember { group: Entity, child: Entity },

    /// Re-parenting would make a transform its own ancestor.
    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    CycleDetected { child: Entity, parent: Entity },

    /// The handle does not refer to a live scene node.
    #[error("{0:?} is not a scene node")]
    MissingNode(Entity),

    #[error("{0:?} is not a group")]
    NotAGroup(Entity),
}
