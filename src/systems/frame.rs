//! Frame driver.
//!
//! One frame is: advance the clock, apply a pending state switch, update the
//! active state's tree, update layer components. Rendering is a separate
//! call so a headless host can skip it. Collision queries are not part of
//! the frame; behaviors run them from their own hooks.

use bevy_ecs::prelude::*;

use crate::resources::rendertarget::DrawSurface;
use crate::systems::gamestate::{active_state, apply_pending_state};
use crate::systems::render::render_frame;
use crate::systems::time::update_world_time;
use crate::systems::update::{update_layers, update_state};

/// Advance the simulation by one frame of `dt` seconds.
pub fn advance_frame(world: &mut World, dt: f32) {
    update_world_time(world, dt);
    apply_pending_state(world);
    if let Some(state) = active_state(world) {
        update_state(world, state);
    }
    update_layers(world);
}

/// Advance then render one frame.
pub fn run_frame(world: &mut World, dt: f32, surface: &mut dyn DrawSurface) {
    advance_frame(world, dt);
    render_frame(world, surface);
}
