//! Name-keyed container of behaviors owned by one scene node.
//!
//! Every node (entity, group, state) and every layer carries a
//! [`ComponentManager`]. It stores behaviors in insertion order under unique
//! names, performs the owner attach on [`add`](ComponentManager::add) and fans
//! out the update/render hooks to every *active* behavior.
//!
//! Re-adding under an existing name replaces the stored behavior in place:
//! the slot keeps its original position in the dispatch order and the
//! replaced behavior is detached.

use bevy_ecs::prelude::*;
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::behavior::{
    Behavior, BehaviorContext, OwnerKind, RenderContext, Siblings, downcast_mut, downcast_ref,
};
use crate::error::SceneError;
use crate::geom::Matrix;
use crate::resources::rendertarget::DrawSurface;

/// Which update hook to fan out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateHook {
    PreUpdate,
    Update,
    PostUpdate,
}

/// Which render hook to fan out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderHook {
    PreRender,
    Render,
    PostRender,
}

#[derive(Component)]
pub struct ComponentManager {
    owner_kind: OwnerKind,
    owner: Entity,
    slots: Vec<Box<dyn Behavior>>,
    index: FxHashMap<String, usize>,
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new(OwnerKind::Entity, Entity::PLACEHOLDER)
    }
}

impl ComponentManager {
    pub fn new(owner_kind: OwnerKind, owner: Entity) -> Self {
        Self {
            owner_kind,
            owner,
            slots: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn owner_kind(&self) -> OwnerKind {
        self.owner_kind
    }

    pub fn owner(&self) -> Entity {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Component names in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|b| b.name())
    }

    /// Store `behavior` under its name and attach it to this manager's owner.
    pub fn add(&mut self, behavior: impl Behavior) -> Result<&mut dyn Behavior, SceneError> {
        self.add_boxed(Box::new(behavior))
    }

    pub fn add_boxed(
        &mut self,
        mut behavior: Box<dyn Behavior>,
    ) -> Result<&mut dyn Behavior, SceneError> {
        behavior.core_mut().attach(self.owner_kind, self.owner)?;
        let name = behavior.name().to_string();
        let existing = self.index.get(&name).copied();
        let slot = match existing {
            Some(i) => {
                let mut replaced = std::mem::replace(&mut self.slots[i], behavior);
                replaced.core_mut().detach();
                debug!("Component '{}' on {:?} replaced", name, self.owner);
                i
            }
            None => {
                self.slots.push(behavior);
                let i = self.slots.len() - 1;
                self.index.insert(name, i);
                i
            }
        };
        Ok(self.slots[slot].as_mut())
    }

    pub fn get_component(&self, name: &str) -> Option<&dyn Behavior> {
        self.index.get(name).map(|&i| self.slots[i].as_ref())
    }

    pub fn get_component_mut(&mut self, name: &str) -> Option<&mut dyn Behavior> {
        let i = *self.index.get(name)?;
        Some(self.slots[i].as_mut())
    }

    /// Typed lookup by name.
    pub fn get<T: Behavior>(&self, name: &str) -> Option<&T> {
        let i = *self.index.get(name)?;
        downcast_ref::<T>(self.slots[i].as_ref())
    }

    pub fn get_mut<T: Behavior>(&mut self, name: &str) -> Option<&mut T> {
        let i = *self.index.get(name)?;
        downcast_mut::<T>(self.slots[i].as_mut())
    }

    /// First behavior of type `T`, whatever its name.
    pub fn find<T: Behavior>(&self) -> Option<&T> {
        self.slots.iter().find_map(|b| downcast_ref::<T>(b.as_ref()))
    }

    pub fn find_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find_map(|b| downcast_mut::<T>(b.as_mut()))
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_active_component(&self, name: &str) -> bool {
        self.get_component(name).is_some_and(|b| b.is_active())
    }

    /// Remove a behavior by name. With `destroy` the behavior is destroyed
    /// (owner cleared, deactivated, not reusable); otherwise it is only
    /// detached and may be added elsewhere.
    pub fn remove_component_by_name(
        &mut self,
        name: &str,
        destroy: bool,
    ) -> Option<Box<dyn Behavior>> {
        let i = self.index.remove(name)?;
        let mut removed = self.slots.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        if destroy {
            removed.core_mut().destroy();
        } else {
            removed.core_mut().detach();
        }
        Some(removed)
    }

    /// Remove every behavior; returns how many were removed.
    pub fn remove_all(&mut self, destroy: bool) -> usize {
        let count = self.slots.len();
        for mut behavior in self.slots.drain(..) {
            if destroy {
                behavior.core_mut().destroy();
            } else {
                behavior.core_mut().detach();
            }
        }
        self.index.clear();
        count
    }

    /// Move behaviors added to `other` (e.g. while this manager was detached
    /// from the world) into `self`, keeping their order.
    pub(crate) fn absorb(&mut self, mut other: ComponentManager) {
        for mut behavior in other.slots.drain(..) {
            behavior.core_mut().detach();
            if let Err(e) = self.add_boxed(behavior) {
                debug!("Dropped component while merging managers: {}", e);
            }
        }
    }

    /// Run `hook` on every active behavior. Each one sees the others through
    /// its context's siblings.
    pub fn dispatch_update(&mut self, world: &mut World, hook: UpdateHook) {
        let owner = self.owner;
        for i in 0..self.slots.len() {
            let (before, rest) = self.slots.split_at_mut(i);
            let Some((behavior, after)) = rest.split_first_mut() else {
                break;
            };
            if !behavior.is_active() {
                continue;
            }
            let mut ctx = BehaviorContext {
                world: &mut *world,
                owner,
                siblings: Siblings::new(before, after),
            };
            match hook {
                UpdateHook::PreUpdate => behavior.pre_update(&mut ctx),
                UpdateHook::Update => behavior.update(&mut ctx),
                UpdateHook::PostUpdate => behavior.post_update(&mut ctx),
            }
        }
    }

    pub fn pre_update(&mut self, world: &mut World) {
        self.dispatch_update(world, UpdateHook::PreUpdate);
    }

    pub fn update(&mut self, world: &mut World) {
        self.dispatch_update(world, UpdateHook::Update);
    }

    pub fn post_update(&mut self, world: &mut World) {
        self.dispatch_update(world, UpdateHook::PostUpdate);
    }

    pub fn dispatch_render(
        &mut self,
        world: &World,
        surface: &mut dyn DrawSurface,
        matrix: Matrix,
        alpha: f32,
        hook: RenderHook,
    ) {
        let mut ctx = RenderContext {
            world,
            owner: self.owner,
            matrix,
            alpha,
            surface,
        };
        for behavior in self.slots.iter_mut() {
            if !behavior.is_active() {
                continue;
            }
            match hook {
                RenderHook::PreRender => behavior.pre_render(&mut ctx),
                RenderHook::Render => behavior.render(&mut ctx),
                RenderHook::PostRender => behavior.post_render(&mut ctx),
            }
        }
    }
}
