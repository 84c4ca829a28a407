//! Render traversal.
//!
//! Walks the active state's tree depth-first, then every visible layer, once
//! per camera, and issues draw calls into a [`DrawSurface`].
//!
//! For each node that renders (alive, `will_render`, visible, non-zero
//! alpha):
//! 1. its components' `pre_render`,
//! 2. its [`Sprite`] and [`TextField`], placed at `(-reg_x, -reg_y)` in node
//!    space,
//! 3. its components' `render`,
//! 4. its members, in list order,
//! 5. its components' `post_render`.
//!
//! Every draw uses the node's concatenated matrix with the camera's view
//! matrix applied after it. The walk carries the parent's matrix down, so
//! each node only applies its own local matrix. Alpha multiplies down the
//! tree.
//!
//! Nodes sitting on a layer are skipped by the tree walk and drawn by their
//! layer instead, sorted by [`ZIndex`]. Sprites whose texture is in neither
//! the node's state cache nor the global [`TextureStore`] are not drawn.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::camera::Camera;
use crate::components::componentmanager::RenderHook;
use crate::components::layer::Layer;
use crate::components::node::Node;
use crate::components::sprite::Sprite;
use crate::components::textfield::TextField;
use crate::components::transform::{Transform, concatenated_matrix, parent_of};
use crate::components::zindex::ZIndex;
use crate::geom::{Matrix, Rectangle};
use crate::resources::engineconfig::EngineConfig;
use crate::resources::rendertarget::DrawSurface;
use crate::resources::texturestore::{TextureCache, TextureStore};
use crate::scene::group::members;
use crate::scene::{restore_components, take_components};
use crate::systems::gamestate::active_state;

/// Screen viewport and view matrix of one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPass {
    pub viewport: Rectangle,
    pub view: Matrix,
}

/// One pass per active visible camera, ordered by entity; a single identity
/// pass over the whole screen when there is none.
pub fn render_passes(world: &mut World, width: u32, height: u32) -> Vec<RenderPass> {
    let mut cameras: Vec<(Entity, Camera)> = world
        .query::<(Entity, &Camera)>()
        .iter(world)
        .filter(|(_, cam)| cam.active && cam.visible)
        .map(|(e, cam)| (e, cam.clone()))
        .collect();
    if cameras.is_empty() {
        return vec![RenderPass {
            viewport: Rectangle::new(0.0, 0.0, width as f32, height as f32),
            view: Matrix::IDENTITY,
        }];
    }
    cameras.sort_by_key(|(e, _)| *e);
    cameras
        .into_iter()
        .filter_map(|(e, cam)| {
            let view = concatenated_matrix(world, e).and_then(|m| cam.view_matrix(&m));
            if view.is_none() {
                warn!("Camera '{}' has a singular matrix; skipped", cam.name);
            }
            view.map(|view| RenderPass {
                viewport: cam.viewport,
                view,
            })
        })
        .collect()
}

/// Render one frame: the active state, then layers, through every camera.
pub fn render_frame(world: &mut World, surface: &mut dyn DrawSurface) {
    let (width, height) = world
        .get_resource::<EngineConfig>()
        .map_or((640, 360), |c| (c.render_width, c.render_height));
    surface.begin_frame(width, height);

    for pass in render_passes(world, width, height) {
        surface.set_viewport(pass.viewport);
        if let Some(state) = active_state(world) {
            render_node(world, state, &pass.view, 1.0, surface, false);
        }
        render_layers(world, &pass.view, surface);
    }

    surface.end_frame();
}

fn render_layers(world: &mut World, view: &Matrix, surface: &mut dyn DrawSurface) {
    let mut layers: Vec<(i32, Entity)> = world
        .query::<(Entity, &Layer)>()
        .iter(world)
        .filter(|(_, layer)| layer.visible)
        .map(|(e, layer)| (layer.order, e))
        .collect();
    layers.sort();

    for (_, layer) in layers {
        let mut list = match world.get::<Layer>(layer) {
            Some(bucket) => bucket.render_list().to_vec(),
            None => continue,
        };
        list.sort_by_key(|&node| world.get::<ZIndex>(node).copied().unwrap_or_default());

        render_hook(world, layer, surface, *view, 1.0, RenderHook::PreRender);
        render_hook(world, layer, surface, *view, 1.0, RenderHook::Render);
        for node in list {
            render_node(world, node, view, 1.0, surface, true);
        }
        render_hook(world, layer, surface, *view, 1.0, RenderHook::PostRender);
    }
}

fn render_hook(
    world: &mut World,
    node: Entity,
    surface: &mut dyn DrawSurface,
    matrix: Matrix,
    alpha: f32,
    hook: RenderHook,
) {
    if let Some(mut manager) = take_components(world, node) {
        manager.dispatch_render(world, surface, matrix, alpha, hook);
        restore_components(world, node, manager);
    }
}

/// `view` with the world matrix of `node`'s parent applied before it.
fn parent_matrix(world: &World, node: Entity, view: &Matrix) -> Matrix {
    let mut matrix = parent_of(world, node)
        .and_then(|parent| concatenated_matrix(world, parent))
        .unwrap_or(Matrix::IDENTITY);
    matrix.prepend(view);
    matrix
}

/// Render `node` and its subtree. `from_layer` is set when a layer draws
/// its own list.
pub fn render_node(
    world: &mut World,
    node: Entity,
    view: &Matrix,
    parent_alpha: f32,
    surface: &mut dyn DrawSurface,
    from_layer: bool,
) {
    let parent = parent_matrix(world, node, view);
    render_subtree(world, node, &parent, parent_alpha, surface, from_layer);
}

fn render_subtree(
    world: &mut World,
    node: Entity,
    parent: &Matrix,
    parent_alpha: f32,
    surface: &mut dyn DrawSurface,
    from_layer: bool,
) {
    let Some(info) = world.get::<Node>(node) else {
        return;
    };
    if !info.renders() || (info.layer().is_some() && !from_layer) {
        return;
    }
    let alpha = parent_alpha * info.alpha;
    let Some(transform) = world.get::<Transform>(node) else {
        return;
    };
    let mut matrix = transform.matrix();
    matrix.prepend(parent);

    render_hook(world, node, surface, matrix, alpha, RenderHook::PreRender);
    draw_node(world, node, &matrix, alpha, surface);
    render_hook(world, node, surface, matrix, alpha, RenderHook::Render);
    for child in members(world, node) {
        render_subtree(world, child, &matrix, alpha, surface, false);
    }
    render_hook(world, node, surface, matrix, alpha, RenderHook::PostRender);
}

/// Whether `key` resolves in `node`'s state cache or the global store.
fn texture_known(world: &World, node: Entity, key: &str) -> bool {
    let in_cache = world
        .get::<Node>(node)
        .and_then(Node::state)
        .and_then(|state| world.get::<TextureCache>(state))
        .is_some_and(|cache| cache.0.contains(key));
    in_cache
        || world
            .get_resource::<TextureStore>()
            .is_some_and(|store| store.0.contains(key))
}

fn draw_node(world: &World, node: Entity, matrix: &Matrix, alpha: f32, surface: &mut dyn DrawSurface) {
    let Some(transform) = world.get::<Transform>(node) else {
        return;
    };
    let mut draw = *matrix;
    draw.append(&Matrix::translation(-transform.reg_x, -transform.reg_y));

    if let Some(sprite) = world.get::<Sprite>(node) {
        if texture_known(world, node, &sprite.tex_key) {
            let mut m = draw;
            if sprite.flip_h {
                m.append(&Matrix::new(-1.0, 0.0, 0.0, 1.0, sprite.width, 0.0));
            }
            if sprite.flip_v {
                m.append(&Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, sprite.height));
            }
            surface.draw_image(&sprite.tex_key, sprite.source(), &m, alpha);
        } else {
            debug!("Texture '{}' not found for {:?}", sprite.tex_key, node);
        }
    }
    if let Some(text) = world.get::<TextField>(node) {
        surface.fill_text(&text.content, &draw, &text.style, alpha);
    }
}
