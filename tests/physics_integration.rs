//! Integration tests for arcade physics bodies driven through the scene.
//!
//! Bodies move during the update traversal and are separated by the
//! collision queries, the same way a game loop would run them.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test physics_integration
//! ```

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use aberredscene::components::arcadephysics::{
    ARCADE_PHYSICS, ArcadePhysics, FLOOR, LEFT, NONE, RIGHT, UP,
};
use aberredscene::components::behavior::{Behavior, BehaviorContext, BehaviorCore};
use aberredscene::components::transform::Transform;
use aberredscene::events::collision::CollisionEvent;
use aberredscene::scene::group::add_child;
use aberredscene::scene::{add_component, get_component, spawn_entity, spawn_group};
use aberredscene::systems::collision::{
    collide, collide_from, collide_group, collide_group_group, collide_list, overlaps_group_group,
    overlaps_list,
};
use aberredscene::systems::update::update_node;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn spawn_body(world: &mut World, name: &str, x: f32, y: f32, body: ArcadePhysics) -> Entity {
    let e = spawn_entity(world, name);
    world.entity_mut(e).insert(Transform::new(x, y));
    add_component(world, e, body).unwrap();
    e
}

fn body(world: &World, e: Entity) -> &ArcadePhysics {
    get_component::<ArcadePhysics>(world, e, ARCADE_PHYSICS).unwrap()
}

fn position(world: &World, e: Entity) -> (f32, f32) {
    let t = world.get::<Transform>(e).unwrap();
    (t.x, t.y)
}

/// Two 32x32 boxes 8px apart closing at 1px per step each.
fn head_on(world: &mut World, elasticity: f32) -> (Entity, Entity) {
    let mut left = ArcadePhysics::new(32.0, 32.0).with_velocity(10.0, 0.0);
    left.elasticity = elasticity;
    let mut right = ArcadePhysics::new(32.0, 32.0).with_velocity(-10.0, 0.0);
    right.elasticity = elasticity;
    let a = spawn_body(world, "left", 0.0, 0.0, left);
    let b = spawn_body(world, "right", 40.0, 0.0, right);
    (a, b)
}

fn step_and_collide(world: &mut World, a: Entity, b: Entity) -> bool {
    update_node(world, a);
    update_node(world, b);
    collide(world, a, b)
}

// =============================================================================
// Head-on collisions
// =============================================================================

#[test]
fn head_on_inelastic_stops_both_bodies() {
    let mut world = World::new();
    let (a, b) = head_on(&mut world, 0.0);

    // edges meet after four steps without overlapping
    for _ in 0..4 {
        assert!(!step_and_collide(&mut world, a, b));
    }
    assert_eq!(position(&world, a), (4.0, 0.0));
    assert_eq!(position(&world, b), (36.0, 0.0));

    // fifth step overlaps by 2px; each body gives back half
    assert!(step_and_collide(&mut world, a, b));
    let (ax, _) = position(&world, a);
    let (bx, _) = position(&world, b);
    assert!(approx_eq(ax, 4.0));
    assert!(approx_eq(bx, 36.0));
    assert!(approx_eq(body(&world, a).velocity.x, 0.0));
    assert!(approx_eq(body(&world, b).velocity.x, 0.0));
    assert!(body(&world, a).is_touching(RIGHT));
    assert!(body(&world, b).is_touching(LEFT));
    assert!(!body(&world, a).is_touching(LEFT));
}

#[test]
fn head_on_elastic_swaps_velocities() {
    let mut world = World::new();
    let (a, b) = head_on(&mut world, 1.0);
    for _ in 0..5 {
        step_and_collide(&mut world, a, b);
    }
    assert!(approx_eq(body(&world, a).velocity.x, -10.0));
    assert!(approx_eq(body(&world, b).velocity.x, 10.0));

    // bodies now move apart and stop touching
    step_and_collide(&mut world, a, b);
    assert!(approx_eq(position(&world, a).0, 3.0));
    assert!(approx_eq(position(&world, b).0, 37.0));
    assert_eq!(body(&world, a).touching, NONE);
    assert!(body(&world, a).was_touching & RIGHT != NONE);
}

#[test]
fn collision_event_and_callback_fire_once_per_contact() {
    let mut world = World::new();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let hits_clone = hits.clone();
    let mut left = ArcadePhysics::new(32.0, 32.0).with_velocity(10.0, 0.0);
    left.set_callback(move |this, other| hits_clone.lock().unwrap().push((this, other)));
    let a = spawn_body(&mut world, "left", 0.0, 0.0, left);
    let b = spawn_body(
        &mut world,
        "right",
        40.0,
        0.0,
        ArcadePhysics::new(32.0, 32.0).with_velocity(-10.0, 0.0),
    );

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    world.add_observer(move |t: On<CollisionEvent>| {
        events_clone.lock().unwrap().push(*t.event());
    });
    world.flush();

    for _ in 0..5 {
        step_and_collide(&mut world, a, b);
    }
    assert_eq!(*hits.lock().unwrap(), vec![(a, b)]);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].a, a);
    assert_eq!(events[0].b, b);
    assert!(events[0].separated);
}

#[test]
fn collision_order_relative_to_motion_is_up_to_the_caller() {
    let spawn = |world: &mut World| {
        let right = ArcadePhysics::new(32.0, 32.0).with_velocity(10.0, 0.0);
        let left = ArcadePhysics::new(32.0, 32.0).with_velocity(-10.0, 0.0);
        let a = spawn_body(world, "a", 0.0, 0.0, right);
        let b = spawn_body(world, "b", 33.0, 0.0, left);
        (a, b)
    };

    // collide between the two moves: b has not stepped yet, edges only touch
    let mut world = World::new();
    let (a, b) = spawn(&mut world);
    update_node(&mut world, a);
    assert!(!collide(&mut world, a, b));
    update_node(&mut world, b);
    assert_eq!(position(&world, b), (32.0, 0.0));

    // collide after both moves: 1px overlap is resolved
    let mut world = World::new();
    let (a, b) = spawn(&mut world);
    update_node(&mut world, a);
    update_node(&mut world, b);
    assert!(collide(&mut world, a, b));
    assert!(approx_eq(position(&world, a).0, 0.5));
    assert!(approx_eq(position(&world, b).0, 32.5));
}

#[test]
fn collide_list_separates_against_each_entry() {
    let mut world = World::new();
    let mover = ArcadePhysics::new(10.0, 10.0).with_velocity(10.0, 0.0);
    let a = spawn_body(&mut world, "a", 0.0, 0.0, mover);
    let b = spawn_body(&mut world, "b", 10.0, 0.0, ArcadePhysics::new(10.0, 10.0));
    let far = spawn_body(&mut world, "far", 300.0, 0.0, ArcadePhysics::new(10.0, 10.0));
    let empty = spawn_group(&mut world, "empty");

    update_node(&mut world, a);
    assert_eq!(position(&world, a), (1.0, 0.0));
    assert!(collide_list(&mut world, a, &[far, empty, b]));
    assert!(approx_eq(position(&world, a).0, 0.5));
    assert!(approx_eq(position(&world, b).0, 10.5));
    assert!(!collide_list(&mut world, a, &[far, empty]));
}

// =============================================================================
// Queries from a body's own behaviors
// =============================================================================

/// Collides its owner against `target` after the body has moved.
struct Bumper {
    core: BehaviorCore,
    target: Entity,
    results: Arc<Mutex<Vec<bool>>>,
}

impl Behavior for Bumper {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }
    fn kind(&self) -> &'static str {
        "Bumper"
    }
    fn post_update(&mut self, ctx: &mut BehaviorContext) {
        let hit = collide_from(ctx, self.target);
        self.results.lock().unwrap().push(hit);
    }
}

#[test]
fn behavior_collides_its_own_body_from_a_hook() {
    let mut world = World::new();
    let mover = ArcadePhysics::new(32.0, 32.0).with_velocity(10.0, 0.0);
    let a = spawn_body(&mut world, "a", 0.0, 0.0, mover);
    let wall = spawn_body(
        &mut world,
        "wall",
        32.5,
        0.0,
        ArcadePhysics::new(32.0, 32.0).with_immovable(true),
    );
    let walls = spawn_group(&mut world, "walls");
    add_child(&mut world, walls, wall).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    world.add_observer(move |t: On<CollisionEvent>| {
        events_clone.lock().unwrap().push((t.event().a, t.event().b));
    });
    world.flush();

    let results = Arc::new(Mutex::new(Vec::new()));
    add_component(
        &mut world,
        a,
        Bumper {
            core: BehaviorCore::new("bumper"),
            target: walls,
            results: results.clone(),
        },
    )
    .unwrap();

    update_node(&mut world, a);
    assert_eq!(*results.lock().unwrap(), vec![true]);
    assert_eq!(*events.lock().unwrap(), vec![(a, wall)]);
    // moved to 1, pushed back out of the wall
    assert!(approx_eq(position(&world, a).0, 0.5));
    assert_eq!(position(&world, wall), (32.5, 0.0));
    assert!(body(&world, a).is_touching(RIGHT));
    assert!(approx_eq(body(&world, a).velocity.x, 0.0));
}

// =============================================================================
// Immovable bodies and platforms
// =============================================================================

#[test]
fn falling_body_rides_moving_platform() {
    let mut world = World::new();
    let faller = spawn_body(
        &mut world,
        "faller",
        20.0,
        10.0,
        ArcadePhysics::new(32.0, 32.0).with_velocity(0.0, 100.0),
    );
    let platform = spawn_body(
        &mut world,
        "platform",
        0.0,
        50.0,
        ArcadePhysics::new(100.0, 16.0)
            .with_velocity(10.0, 0.0)
            .with_immovable(true),
    );

    assert!(step_and_collide(&mut world, faller, platform));
    let (x, y) = position(&world, faller);
    // pushed back on top and carried by the platform's 1px step
    assert!(approx_eq(y, 18.0));
    assert!(approx_eq(x, 21.0));
    assert!(approx_eq(body(&world, faller).velocity.y, 0.0));
    assert!(body(&world, faller).is_touching(FLOOR));
    assert!(body(&world, platform).is_touching(UP));
    // the platform itself is never pushed
    assert_eq!(position(&world, platform), (1.0, 50.0));
}

#[test]
fn two_immovable_bodies_never_separate() {
    let mut world = World::new();
    let a = spawn_body(
        &mut world,
        "a",
        0.0,
        0.0,
        ArcadePhysics::new(10.0, 10.0).with_immovable(true),
    );
    let b = spawn_body(
        &mut world,
        "b",
        5.0,
        0.0,
        ArcadePhysics::new(10.0, 10.0).with_immovable(true),
    );
    // they still overlap; nothing moves
    assert!(collide(&mut world, a, b));
    assert_eq!(position(&world, a), (0.0, 0.0));
    assert_eq!(position(&world, b), (5.0, 0.0));
}

// =============================================================================
// Group queries
// =============================================================================

#[test]
fn group_queries_or_results_across_nested_groups() {
    let mut world = World::new();
    let first = spawn_group(&mut world, "first");
    let second = spawn_group(&mut world, "second");
    let nested = spawn_group(&mut world, "nested");

    let a1 = spawn_body(&mut world, "a1", 0.0, 0.0, ArcadePhysics::new(10.0, 10.0));
    let a2 = spawn_body(&mut world, "a2", 100.0, 0.0, ArcadePhysics::new(10.0, 10.0));
    let b1 = spawn_body(&mut world, "b1", 5.0, 5.0, ArcadePhysics::new(10.0, 10.0));
    let b2 = spawn_body(&mut world, "b2", 105.0, 5.0, ArcadePhysics::new(10.0, 10.0));
    let far = spawn_body(&mut world, "far", 500.0, 500.0, ArcadePhysics::new(10.0, 10.0));
    add_child(&mut world, first, a1).unwrap();
    add_child(&mut world, first, a2).unwrap();
    add_child(&mut world, second, b1).unwrap();
    add_child(&mut world, second, nested).unwrap();
    add_child(&mut world, nested, b2).unwrap();

    let pairs = Arc::new(Mutex::new(Vec::new()));
    let pairs_clone = pairs.clone();
    world.add_observer(move |t: On<CollisionEvent>| {
        let ev = t.event();
        pairs_clone.lock().unwrap().push((ev.a, ev.b));
    });
    world.flush();

    assert!(overlaps_group_group(&mut world, first, second, false));
    assert_eq!(*pairs.lock().unwrap(), vec![(a1, b1), (a2, b2)]);

    pairs.lock().unwrap().clear();
    assert!(!collide_group(&mut world, far, second));
    assert!(overlaps_list(&mut world, a2, &[far, second], false));
    assert_eq!(*pairs.lock().unwrap(), vec![(a2, b2)]);
}

#[test]
fn inactive_body_is_ignored_by_queries() {
    let mut world = World::new();
    let a = spawn_body(&mut world, "a", 0.0, 0.0, ArcadePhysics::new(10.0, 10.0));
    let mut sleeping = ArcadePhysics::new(10.0, 10.0);
    sleeping.core_mut().active = false;
    let b = spawn_body(&mut world, "b", 5.0, 0.0, sleeping);
    assert!(!collide(&mut world, a, b));
}

// =============================================================================
// Robustness
// =============================================================================

#[test]
fn velocities_stay_bounded_and_finite() {
    let mut world = World::new();
    let group = spawn_group(&mut world, "crowd");
    let mut bodies = Vec::new();
    for i in 0..6 {
        let mut physics = ArcadePhysics::new(12.0, 12.0)
            .with_velocity(if i % 2 == 0 { 40.0 } else { -40.0 }, 15.0 * i as f32);
        physics.acceleration.y = 200.0;
        physics.max_velocity.y = 80.0;
        physics.elasticity = 0.8;
        // degenerate masses count as unit mass
        physics.mass = match i {
            0 => 0.0,
            1 => f32::NAN,
            _ => 1.0,
        };
        let e = spawn_body(&mut world, "crate", 14.0 * i as f32, 0.0, physics);
        add_child(&mut world, group, e).unwrap();
        bodies.push(e);
    }
    let floor = spawn_body(
        &mut world,
        "floor",
        -100.0,
        120.0,
        ArcadePhysics::new(400.0, 20.0).with_immovable(true),
    );

    for _ in 0..200 {
        update_node(&mut world, group);
        update_node(&mut world, floor);
        collide_group(&mut world, floor, group);
        collide_group_group(&mut world, group, group);
    }

    for e in bodies {
        let (x, y) = position(&world, e);
        let physics = body(&world, e);
        assert!(x.is_finite() && y.is_finite());
        assert!(physics.velocity.x.is_finite() && physics.velocity.y.is_finite());
        assert!(physics.velocity.y.abs() <= 80.0 + EPSILON);
    }
    assert_eq!(position(&world, floor), (-100.0, 120.0));
}
