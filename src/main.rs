//! Aberred scene demo.
//!
//! Builds a small arena headlessly: two boxes sliding toward each other and
//! falling onto an immovable floor. The arena state runs the collision
//! queries from its own post-update hook, every frame is rendered into a
//! [`RecordingSurface`], and contacts are logged as they happen.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 30 --json
//! ```

use std::path::PathBuf;

use aberredscene::components::arcadephysics::{ArcadePhysics, FLOOR};
use aberredscene::components::behavior::{Behavior, BehaviorContext, BehaviorCore};
use aberredscene::components::sprite::Sprite;
use aberredscene::components::textfield::TextField;
use aberredscene::components::transform::Transform;
use aberredscene::error::SceneError;
use aberredscene::events::collision::CollisionEvent;
use aberredscene::resources::engineconfig::EngineConfig;
use aberredscene::resources::random::RandomGenerator;
use aberredscene::resources::rendertarget::RecordingSurface;
use aberredscene::resources::texturestore::{TextureInfo, TextureStore};
use aberredscene::scene::group::{add_child, members};
use aberredscene::scene::{add_component, get_component, spawn_entity, spawn_group, spawn_state};
use aberredscene::systems::collision::{collide_group, collide_group_group};
use aberredscene::systems::frame::run_frame;
use aberredscene::systems::gamestate::request_state;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

/// Aberred scene graph demo
#[derive(Parser)]
#[command(version, about = "Headless demo of the Aberred scene graph")]
struct Cli {
    /// INI file with [physics], [render] and [scene] settings.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 20)]
    frames: u32,

    /// Random seed; overrides the config file. 0 seeds from entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the draw list of the last frame as JSON.
    #[arg(long)]
    json: bool,
}

/// Runs the arena's collision queries after its members have moved.
struct Referee {
    core: BehaviorCore,
    boxes: Entity,
    floor: Entity,
}

impl Behavior for Referee {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }
    fn kind(&self) -> &'static str {
        "Referee"
    }

    fn post_update(&mut self, ctx: &mut BehaviorContext) {
        collide_group_group(ctx.world, self.boxes, self.boxes);
        collide_group(ctx.world, self.floor, self.boxes);
    }
}

fn spawn_box(
    world: &mut World,
    name: &str,
    position: (f32, f32),
    body: ArcadePhysics,
) -> Result<Entity, SceneError> {
    let size = (body.width, body.height);
    let e = spawn_entity(world, name);
    world.entity_mut(e).insert((
        Transform::new(position.0, position.1),
        Sprite::new("box", size.0, size.1),
    ));
    add_component(world, e, body)?;
    Ok(e)
}

fn build_arena(world: &mut World, config: &EngineConfig) -> Result<Entity, SceneError> {
    let settings = config.physics();
    let arena = spawn_state(world, "arena");
    let boxes = spawn_group(world, "boxes");
    add_child(world, arena, boxes)?;

    let mut left = ArcadePhysics::with_settings(32.0, 32.0, settings).with_velocity(10.0, 0.0);
    left.acceleration.y = 40.0;
    left.elasticity = 1.0;
    left.set_callback(|this, other| log::debug!("{:?} hit {:?}", this, other));
    let mut right = ArcadePhysics::with_settings(32.0, 32.0, settings).with_velocity(-10.0, 0.0);
    right.acceleration.y = 40.0;
    right.elasticity = 1.0;

    let left = spawn_box(world, "left", (0.0, 0.0), left)?;
    let right = spawn_box(world, "right", (40.0, 0.0), right)?;
    add_child(world, boxes, left)?;
    add_child(world, boxes, right)?;

    let floor_body = ArcadePhysics::with_settings(200.0, 16.0, settings).with_immovable(true);
    let floor = spawn_box(world, "floor", (-50.0, 48.0), floor_body)?;
    add_child(world, arena, floor)?;

    let label = spawn_entity(world, "label");
    world.entity_mut(label).insert((
        Transform::new(8.0, 8.0),
        TextField::new("arena", "default", 12.0),
    ));
    add_child(world, arena, label)?;

    add_component(
        world,
        arena,
        Referee {
            core: BehaviorCore::new("Referee"),
            boxes,
            floor,
        },
    )?;
    request_state(world, arena)?;
    Ok(boxes)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = EngineConfig::with_path(&cli.config);
    if cli.config.exists() {
        if let Err(e) = config.load_from_file() {
            warn!("{}; using defaults", e);
        }
    } else {
        info!("No config at {:?}; using defaults", cli.config);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut world = World::new();
    world.insert_resource(RandomGenerator::with_seed(config.seed));
    let mut store = TextureStore::default();
    store.0.insert(
        "box",
        TextureInfo {
            width: 32,
            height: 32,
            handle: 1,
        },
    );
    world.insert_resource(store);
    world.insert_resource(config.clone());

    world.add_observer(|t: On<CollisionEvent>| {
        let ev = t.event();
        info!(
            "Contact {:?} / {:?} (separated: {})",
            ev.a, ev.b, ev.separated
        );
    });
    world.flush();

    let boxes = match build_arena(&mut world, &config) {
        Ok(boxes) => boxes,
        Err(e) => {
            error!("Failed to build the arena: {}", e);
            std::process::exit(1);
        }
    };

    let mut surface = RecordingSurface::new();
    for _ in 0..cli.frames {
        run_frame(&mut world, config.update_interval, &mut surface);
    }

    for node in members(&world, boxes) {
        if let (Some(t), Some(body)) = (
            world.get::<Transform>(node),
            get_component::<ArcadePhysics>(&world, node, "ArcadePhysics"),
        ) {
            info!(
                "{:?} at ({:.2}, {:.2}) velocity ({:.2}, {:.2}) on floor: {}",
                node,
                t.x,
                t.y,
                body.velocity.x,
                body.velocity.y,
                body.is_touching(FLOOR)
            );
        }
    }
    info!(
        "Rendered {} frames, {} draw calls in the last one",
        surface.frames,
        surface.commands.len()
    );

    if cli.json {
        match surface.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize draw list: {}", e),
        }
    }
}
