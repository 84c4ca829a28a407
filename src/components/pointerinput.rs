//! Pointer interaction behavior.
//!
//! [`PointerInput`] polls the [`PointerState`] resource every update and
//! hit-tests it against its owner's [`Bounds`]. It tracks hover and press
//! state, and can drag its owner around: the node follows the pointer,
//! either keeping the grab offset or snapping its bounds center under it.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::behavior::{Behavior, BehaviorContext, BehaviorCore};
use crate::components::bounds::{Bounds, contains_point};
use crate::components::transform::{Transform, concatenated_matrix, parent_of, transform_point};
use crate::geom::Point;
use crate::resources::input::PointerState;

pub const POINTER_INPUT: &str = "PointerInput";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Keep the offset between the pointer and the node at grab time.
    KeepOffset,
    /// Put the center of the bounds under the pointer.
    SnapToCenter,
}

#[derive(Debug)]
pub struct PointerInput {
    core: BehaviorCore,
    pub drag: Option<DragMode>,
    within_bounds: bool,
    is_pressed: bool,
    just_pressed: bool,
    just_released: bool,
    dragging: bool,
    grab_offset: Point,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerInput {
    pub fn new() -> Self {
        Self {
            core: BehaviorCore::new(POINTER_INPUT),
            drag: None,
            within_bounds: false,
            is_pressed: false,
            just_pressed: false,
            just_released: false,
            dragging: false,
            grab_offset: Point::ZERO,
        }
    }

    pub fn draggable(mut self, mode: DragMode) -> Self {
        self.drag = Some(mode);
        self
    }

    pub fn within_bounds(&self) -> bool {
        self.within_bounds
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn just_pressed(&self) -> bool {
        self.just_pressed
    }

    pub fn just_released(&self) -> bool {
        self.just_released
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn start_drag(&mut self, world: &World, owner: Entity, pointer: Point, mode: DragMode) {
        let Some(origin) = transform_point(world, owner, Point::ZERO) else {
            return;
        };
        self.grab_offset = match mode {
            DragMode::KeepOffset => origin - pointer,
            DragMode::SnapToCenter => {
                let center = world
                    .get::<Bounds>(owner)
                    .zip(world.get::<Transform>(owner))
                    .map(|(b, t)| b.local_rect(t).center())
                    .and_then(|c| transform_point(world, owner, c));
                match center {
                    Some(center) => origin - center,
                    None => Point::ZERO,
                }
            }
        };
        self.dragging = true;
        debug!("Drag started on {:?}", owner);
    }

    /// Move the owner so its origin sits at `pointer + grab_offset` in world
    /// space.
    fn follow(&self, world: &mut World, owner: Entity, pointer: Point) {
        let target = pointer + self.grab_offset;
        let local = match parent_of(world, owner) {
            Some(parent) => {
                match concatenated_matrix(world, parent).and_then(|m| m.inverse()) {
                    Some(inv) => inv.transform_point(target),
                    None => return,
                }
            }
            None => target,
        };
        if let Some(mut transform) = world.get_mut::<Transform>(owner) {
            transform.set_position(local.x, local.y);
        }
    }
}

impl Behavior for PointerInput {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "PointerInput"
    }

    fn update(&mut self, ctx: &mut BehaviorContext) {
        let Some(pointer) = ctx.world.get_resource::<PointerState>().copied() else {
            return;
        };
        let position = pointer.position();
        self.within_bounds = contains_point(ctx.world, ctx.owner, position);
        self.just_pressed = false;
        self.just_released = false;

        if pointer.just_pressed && self.within_bounds {
            self.is_pressed = true;
            self.just_pressed = true;
            if let Some(mode) = self.drag {
                self.start_drag(ctx.world, ctx.owner, position, mode);
            }
        }
        if !pointer.is_down && self.is_pressed {
            self.is_pressed = false;
            self.just_released = true;
            if self.dragging {
                self.dragging = false;
                debug!("Drag stopped on {:?}", ctx.owner);
            }
        }
        if self.dragging {
            self.follow(ctx.world, ctx.owner, position);
        }
    }
}
