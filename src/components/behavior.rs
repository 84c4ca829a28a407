//! Attachable units of behavior.
//!
//! A [`Behavior`] is a named piece of logic stored in a node's
//! [`ComponentManager`](super::componentmanager::ComponentManager). It can be
//! owned by exactly one node at a time (a state, layer, group or entity); the
//! owner handle lives in its [`BehaviorCore`].
//!
//! Hooks receive a context giving access to the world and the owner handle.
//! While the hooks of a node run, that node's own `ComponentManager` is
//! detached from the world, so a behavior can freely read and write any other
//! bevy component of its owner (its `Transform`, `Bounds`, ...). The other
//! behaviors of the same owner are reached through
//! [`BehaviorContext::siblings`] instead.

use std::any::Any;

use bevy_ecs::prelude::*;
use log::warn;

use crate::error::SceneError;
use crate::geom::Matrix;
use crate::resources::rendertarget::DrawSurface;

/// What kind of node owns a component manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    State,
    Layer,
    Group,
    #[default]
    Entity,
}

/// Owner handle of an attached behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Owner {
    pub kind: OwnerKind,
    pub entity: Entity,
}

/// State shared by every behavior: name, active flag and owner link.
#[derive(Clone, Debug)]
pub struct BehaviorCore {
    name: String,
    /// Inactive behaviors stay attached but their hooks are skipped.
    pub active: bool,
    owner: Option<Owner>,
    destroyed: bool,
}

impl BehaviorCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            owner: None,
            destroyed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    fn owner_of_kind(&self, kind: OwnerKind) -> Option<Entity> {
        self.owner.filter(|o| o.kind == kind).map(|o| o.entity)
    }

    pub fn state(&self) -> Option<Entity> {
        self.owner_of_kind(OwnerKind::State)
    }

    pub fn layer(&self) -> Option<Entity> {
        self.owner_of_kind(OwnerKind::Layer)
    }

    pub fn group(&self) -> Option<Entity> {
        self.owner_of_kind(OwnerKind::Group)
    }

    pub fn entity(&self) -> Option<Entity> {
        self.owner_of_kind(OwnerKind::Entity)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Record `entity` as owner. Fails when destroyed or already owned.
    pub fn attach(&mut self, kind: OwnerKind, entity: Entity) -> Result<(), SceneError> {
        if self.destroyed {
            warn!("Component '{}' is destroyed and cannot be attached", self.name);
            return Err(SceneError::DestroyedComponent(self.name.clone()));
        }
        if let Some(owner) = self.owner {
            warn!(
                "Component '{}' is already attached to {:?} ({:?})",
                self.name, owner.entity, owner.kind
            );
            return Err(SceneError::AlreadyAttached(owner.entity));
        }
        self.owner = Some(Owner { kind, entity });
        Ok(())
    }

    /// Clear the owner link. Returns the previous owner.
    pub fn detach(&mut self) -> Option<Owner> {
        self.owner.take()
    }

    /// Clear the owner and deactivate for good.
    pub fn destroy(&mut self) {
        self.owner = None;
        self.active = false;
        self.destroyed = true;
    }
}

/// Context handed to update hooks.
pub struct BehaviorContext<'w> {
    pub world: &'w mut World,
    pub owner: Entity,
    pub siblings: Siblings<'w>,
}

/// The behaviors stored next to the one whose hook is running.
pub struct Siblings<'s> {
    before: &'s mut [Box<dyn Behavior>],
    after: &'s mut [Box<dyn Behavior>],
}

impl<'s> Siblings<'s> {
    pub(crate) fn new(
        before: &'s mut [Box<dyn Behavior>],
        after: &'s mut [Box<dyn Behavior>],
    ) -> Self {
        Self { before, after }
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find<T: Behavior>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|b| downcast_ref::<T>(b.as_ref()))
    }

    pub fn find_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find_map(|b| downcast_mut::<T>(b.as_mut()))
    }
}

/// Context handed to render hooks.
pub struct RenderContext<'a> {
    pub world: &'a World,
    pub owner: Entity,
    /// Concatenated matrix of the owner for this pass (camera included).
    pub matrix: Matrix,
    pub alpha: f32,
    pub surface: &'a mut dyn DrawSurface,
}

/// Contract every attachable component implements.
///
/// Only [`core`](Behavior::core), [`core_mut`](Behavior::core_mut) and
/// [`kind`](Behavior::kind) are required; every hook defaults to a no-op.
pub trait Behavior: Any + Send + Sync {
    fn core(&self) -> &BehaviorCore;
    fn core_mut(&mut self) -> &mut BehaviorCore;

    /// Static type tag, for diagnostics.
    fn kind(&self) -> &'static str;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn is_active(&self) -> bool {
        let core = self.core();
        core.active && !core.is_destroyed()
    }

    fn pre_update(&mut self, _ctx: &mut BehaviorContext) {}
    fn update(&mut self, _ctx: &mut BehaviorContext) {}
    fn post_update(&mut self, _ctx: &mut BehaviorContext) {}

    fn pre_render(&mut self, _ctx: &mut RenderContext) {}
    fn render(&mut self, _ctx: &mut RenderContext) {}
    fn post_render(&mut self, _ctx: &mut RenderContext) {}
}

/// Downcast a behavior to its concrete type.
pub fn downcast_ref<'a, T: Behavior>(behavior: &'a (dyn Behavior + 'static)) -> Option<&'a T> {
    (behavior as &'a dyn Any).downcast_ref::<T>()
}

pub fn downcast_mut<'a, T: Behavior>(
    behavior: &'a mut (dyn Behavior + 'static),
) -> Option<&'a mut T> {
    (behavior as &'a mut dyn Any).downcast_mut::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker {
        core: BehaviorCore,
    }

    impl Behavior for Marker {
        fn core(&self) -> &BehaviorCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut BehaviorCore {
            &mut self.core
        }
        fn kind(&self) -> &'static str {
            "Marker"
        }
    }

    #[test]
    fn test_attach_once() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut core = BehaviorCore::new("marker");
        core.attach(OwnerKind::Group, a).unwrap();
        assert_eq!(core.group(), Some(a));
        assert_eq!(core.entity(), None);

        // second owner rejected, first preserved
        assert_eq!(
            core.attach(OwnerKind::Entity, b),
            Err(SceneError::AlreadyAttached(a))
        );
        assert_eq!(core.group(), Some(a));
    }

    #[test]
    fn test_destroyed_cannot_attach() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let mut core = BehaviorCore::new("marker");
        core.attach(OwnerKind::Entity, a).unwrap();
        core.destroy();
        assert!(core.owner().is_none());
        assert!(!core.active);
        assert_eq!(
            core.attach(OwnerKind::Entity, a),
            Err(SceneError::DestroyedComponent("marker".into()))
        );
    }

    #[test]
    fn test_downcast() {
        let marker = Marker {
            core: BehaviorCore::new("p"),
        };
        let boxed: Box<dyn Behavior> = Box::new(marker);
        assert!(downcast_ref::<Marker>(boxed.as_ref()).is_some());
        assert_eq!(boxed.kind(), "Marker");
        assert!(boxed.is_active());
    }
}
