//! Texture descriptors keyed by string ids.
//!
//! Pixel data belongs to the drawing backend; the scene only needs a
//! texture's size and the backend handle to pass back to it. The global
//! [`TextureStore`] resource is consulted after the active state's own
//! [`TextureCache`].

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    /// Opaque backend handle.
    pub handle: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TextureLibrary {
    map: FxHashMap<String, TextureInfo>,
}

impl TextureLibrary {
    pub fn insert(&mut self, key: impl Into<String>, info: TextureInfo) {
        self.map.insert(key.into(), info);
    }

    pub fn get(&self, key: &str) -> Option<&TextureInfo> {
        self.map.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<TextureInfo> {
        self.map.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// Global textures.
#[derive(Resource, Debug, Clone, Default)]
pub struct TextureStore(pub TextureLibrary);

/// Textures owned by one state.
#[derive(Component, Debug, Clone, Default)]
pub struct TextureCache(pub TextureLibrary);
