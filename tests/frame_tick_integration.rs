//! Integration tests for the frame driver.
//!
//! Covers state switching, the clock, behaviors that restructure the scene
//! while it is being updated, and pointer dragging across frames.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test frame_tick_integration
//! ```

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use aberredscene::components::behavior::{Behavior, BehaviorContext, BehaviorCore};
use aberredscene::components::bounds::Bounds;
use aberredscene::components::componentmanager::ComponentManager;
use aberredscene::components::pointerinput::{DragMode, POINTER_INPUT, PointerInput};
use aberredscene::components::stateconfig::StateConfig;
use aberredscene::components::transform::Transform;
use aberredscene::events::statechange::StateChangedEvent;
use aberredscene::geom::Point;
use aberredscene::resources::input::PointerState;
use aberredscene::resources::texturestore::{TextureCache, TextureInfo};
use aberredscene::resources::worldtime::WorldTime;
use aberredscene::scene::group::{add_child, members, num_children};
use aberredscene::scene::{
    add_component, destroy, get_component, has_component, spawn_entity, spawn_layer, spawn_state,
};
use aberredscene::systems::frame::advance_frame;
use aberredscene::systems::gamestate::{active_state, request_state};

/// Counts its update calls.
struct Counter {
    core: BehaviorCore,
    ticks: Arc<Mutex<u32>>,
}

impl Counter {
    fn new(name: &str, ticks: Arc<Mutex<u32>>) -> Self {
        Self {
            core: BehaviorCore::new(name),
            ticks,
        }
    }
}

impl Behavior for Counter {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }
    fn kind(&self) -> &'static str {
        "Counter"
    }
    fn update(&mut self, _ctx: &mut BehaviorContext) {
        *self.ticks.lock().unwrap() += 1;
    }
}

/// Destroys its own node on the first update.
struct SelfDestruct {
    core: BehaviorCore,
}

impl Behavior for SelfDestruct {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }
    fn kind(&self) -> &'static str {
        "SelfDestruct"
    }
    fn update(&mut self, ctx: &mut BehaviorContext) {
        destroy(ctx.world, ctx.owner).unwrap();
    }
}

/// Attaches a [`Counter`] to its owner on the first update.
struct Spawner {
    core: BehaviorCore,
    ticks: Arc<Mutex<u32>>,
    done: bool,
}

impl Behavior for Spawner {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }
    fn kind(&self) -> &'static str {
        "Spawner"
    }
    fn update(&mut self, ctx: &mut BehaviorContext) {
        if !self.done {
            add_component(ctx.world, ctx.owner, Counter::new("late", self.ticks.clone())).unwrap();
            self.done = true;
        }
    }
}

// =============================================================================
// Clock and states
// =============================================================================

#[test]
fn clock_advances_every_frame() {
    let mut world = World::new();
    for _ in 0..3 {
        advance_frame(&mut world, 0.5);
    }
    let time = world.resource::<WorldTime>();
    assert_eq!(time.frame_count, 3);
    assert!((time.elapsed - 1.5).abs() < 1e-6);
    assert!((time.delta - 0.5).abs() < 1e-6);
}

#[test]
fn state_switch_happens_on_the_next_frame() {
    let mut world = World::new();
    let title = spawn_state(&mut world, "title");
    let level = spawn_state(&mut world, "level");
    world.entity_mut(level).insert(StateConfig::new("level").persistent());
    let logo = spawn_entity(&mut world, "logo");
    add_child(&mut world, title, logo).unwrap();
    world
        .get_mut::<TextureCache>(title)
        .unwrap()
        .0
        .insert("logo", TextureInfo {
            width: 64,
            height: 32,
            handle: 3,
        });

    let switches = Arc::new(Mutex::new(Vec::new()));
    let switches_clone = switches.clone();
    world.add_observer(move |t: On<StateChangedEvent>| {
        let ev = t.event();
        switches_clone.lock().unwrap().push((ev.from, ev.to));
    });
    world.flush();

    request_state(&mut world, title).unwrap();
    assert_eq!(active_state(&world), None);
    advance_frame(&mut world, 0.016);
    assert_eq!(active_state(&world), Some(title));
    let config = world.get::<StateConfig>(title).unwrap();
    assert!(config.is_created && config.is_initialised && config.is_ready);
    assert_eq!(config.switch_count, 1);

    request_state(&mut world, level).unwrap();
    advance_frame(&mut world, 0.016);
    assert_eq!(active_state(&world), Some(level));
    // the title state is not persistent: its children and cache are gone
    assert!(!world.get::<StateConfig>(title).unwrap().is_ready);
    assert_eq!(num_children(&world, title), 0);
    assert!(world.get_entity(logo).is_err());
    assert!(world.get::<TextureCache>(title).unwrap().0.is_empty());

    assert_eq!(
        *switches.lock().unwrap(),
        vec![(None, title), (Some(title), level)]
    );
}

#[test]
fn persistent_state_keeps_children_when_left() {
    let mut world = World::new();
    let hub = spawn_state(&mut world, "hub");
    world.entity_mut(hub).insert(StateConfig::new("hub").persistent());
    let other = spawn_state(&mut world, "other");
    let npc = spawn_entity(&mut world, "npc");
    add_child(&mut world, hub, npc).unwrap();

    request_state(&mut world, hub).unwrap();
    advance_frame(&mut world, 0.016);
    request_state(&mut world, other).unwrap();
    advance_frame(&mut world, 0.016);
    request_state(&mut world, hub).unwrap();
    advance_frame(&mut world, 0.016);

    assert_eq!(members(&world, hub), vec![npc]);
    assert_eq!(world.get::<StateConfig>(hub).unwrap().switch_count, 2);
}

#[test]
fn only_the_active_state_and_layers_are_updated() {
    let mut world = World::new();
    let active = spawn_state(&mut world, "active");
    let idle = spawn_state(&mut world, "idle");
    let layer = spawn_layer(&mut world, "hud");
    let on_active = Arc::new(Mutex::new(0));
    let on_idle = Arc::new(Mutex::new(0));
    let on_layer = Arc::new(Mutex::new(0));
    add_component(&mut world, active, Counter::new("c", on_active.clone())).unwrap();
    add_component(&mut world, idle, Counter::new("c", on_idle.clone())).unwrap();
    add_component(&mut world, layer, Counter::new("c", on_layer.clone())).unwrap();

    request_state(&mut world, active).unwrap();
    for _ in 0..3 {
        advance_frame(&mut world, 0.016);
    }
    assert_eq!(*on_active.lock().unwrap(), 3);
    assert_eq!(*on_idle.lock().unwrap(), 0);
    assert_eq!(*on_layer.lock().unwrap(), 3);
}

// =============================================================================
// Restructuring during update
// =============================================================================

#[test]
fn behavior_can_destroy_its_own_node() {
    let mut world = World::new();
    let state = spawn_state(&mut world, "s");
    let doomed = spawn_entity(&mut world, "doomed");
    let survivor = spawn_entity(&mut world, "survivor");
    let ticks = Arc::new(Mutex::new(0));
    add_component(
        &mut world,
        doomed,
        SelfDestruct {
            core: BehaviorCore::new("boom"),
        },
    )
    .unwrap();
    add_component(&mut world, survivor, Counter::new("c", ticks.clone())).unwrap();
    add_child(&mut world, state, doomed).unwrap();
    add_child(&mut world, state, survivor).unwrap();
    request_state(&mut world, state).unwrap();

    advance_frame(&mut world, 0.016);
    advance_frame(&mut world, 0.016);
    assert!(world.get_entity(doomed).is_err());
    assert_eq!(members(&world, state), vec![survivor]);
    assert_eq!(*ticks.lock().unwrap(), 2);
}

#[test]
fn component_added_during_update_runs_from_next_frame() {
    let mut world = World::new();
    let state = spawn_state(&mut world, "s");
    let node = spawn_entity(&mut world, "node");
    add_child(&mut world, state, node).unwrap();
    let ticks = Arc::new(Mutex::new(0));
    add_component(
        &mut world,
        node,
        Spawner {
            core: BehaviorCore::new("spawner"),
            ticks: ticks.clone(),
            done: false,
        },
    )
    .unwrap();
    request_state(&mut world, state).unwrap();

    advance_frame(&mut world, 0.016);
    assert_eq!(*ticks.lock().unwrap(), 0);
    let manager = world.get::<ComponentManager>(node).unwrap();
    assert_eq!(manager.names().collect::<Vec<_>>(), vec!["spawner", "late"]);
    assert!(has_component(&world, node, "late"));

    advance_frame(&mut world, 0.016);
    assert_eq!(*ticks.lock().unwrap(), 1);
}

// =============================================================================
// Pointer input
// =============================================================================

#[test]
fn pointer_drag_snaps_center_under_pointer() {
    let mut world = World::new();
    world.insert_resource(PointerState::default());
    let state = spawn_state(&mut world, "s");
    let handle = spawn_entity(&mut world, "handle");
    world
        .entity_mut(handle)
        .insert((Transform::default(), Bounds::new(20.0, 20.0)));
    add_child(&mut world, state, handle).unwrap();
    add_component(
        &mut world,
        handle,
        PointerInput::new().draggable(DragMode::SnapToCenter),
    )
    .unwrap();
    request_state(&mut world, state).unwrap();

    world.resource_mut::<PointerState>().set(5.0, 5.0, true);
    advance_frame(&mut world, 0.016);
    assert_eq!(
        world.get::<Transform>(handle).unwrap().position(),
        Point::new(-5.0, -5.0)
    );

    // the pointer leaves the bounds but the drag continues
    world.resource_mut::<PointerState>().set(50.0, 40.0, true);
    advance_frame(&mut world, 0.016);
    assert_eq!(
        world.get::<Transform>(handle).unwrap().position(),
        Point::new(40.0, 30.0)
    );

    world.resource_mut::<PointerState>().set(50.0, 40.0, false);
    advance_frame(&mut world, 0.016);
    let input = get_component::<PointerInput>(&world, handle, POINTER_INPUT).unwrap();
    assert!(!input.is_dragging());
    assert!(input.just_released());
    assert_eq!(
        world.get::<Transform>(handle).unwrap().position(),
        Point::new(40.0, 30.0)
    );
}
