//! Engine configuration resource.
//!
//! Settings loaded from an INI file. Defaults are safe for startup; missing
//! keys keep their current values.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! update_interval = 0.1
//! overlap_bias = 4
//!
//! [render]
//! width = 640
//! height = 360
//!
//! [scene]
//! seed = 0
//! ```
//!
//! A `seed` of 0 means "seed from entropy".

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::arcadephysics::{DEFAULT_UPDATE_INTERVAL, OVERLAP_BIAS, PhysicsSettings};

const DEFAULT_RENDER_WIDTH: u32 = 640;
const DEFAULT_RENDER_HEIGHT: u32 = 360;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct EngineConfig {
    /// Fixed physics step in seconds.
    pub update_interval: f32,
    /// Tunneling tolerance used by separation.
    pub overlap_bias: f32,
    pub render_width: u32,
    pub render_height: u32,
    /// Seed for the [`RandomGenerator`](super::random::RandomGenerator); 0 = random.
    pub seed: u64,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            overlap_bias: OVERLAP_BIAS,
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            seed: 0,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Physics tunables to hand to new bodies.
    pub fn physics(&self) -> PhysicsSettings {
        PhysicsSettings {
            update_interval: self.update_interval,
            overlap_bias: self.overlap_bias,
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Non-positive intervals are
    /// ignored.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [physics] section
        if let Some(interval) = config.getfloat("physics", "update_interval").ok().flatten() {
            if interval > 0.0 && interval.is_finite() {
                self.update_interval = interval as f32;
            }
        }
        if let Some(bias) = config.getfloat("physics", "overlap_bias").ok().flatten() {
            self.overlap_bias = bias as f32;
        }

        // [render] section
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }

        // [scene] section
        if let Some(seed) = config.getuint("scene", "seed").ok().flatten() {
            self.seed = seed;
        }

        info!(
            "Loaded config: interval={}, bias={}, {}x{} render, seed={}",
            self.update_interval,
            self.overlap_bias,
            self.render_width,
            self.render_height,
            self.seed
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("physics", "update_interval", Some(self.update_interval.to_string()));
        config.set("physics", "overlap_bias", Some(self.overlap_bias.to_string()));
        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));
        config.set("scene", "seed", Some(self.seed.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn set_render_size(&mut self, width: u32, height: u32) {
        self.render_width = width;
        self.render_height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("aberredscene_{}_{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.update_interval, 0.1);
        assert_eq!(config.overlap_bias, 4.0);
        assert_eq!(config.physics(), PhysicsSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut config = EngineConfig::with_path(&path);
        config.update_interval = 0.05;
        config.seed = 42;
        config.set_render_size(320, 200);
        config.save_to_file().unwrap();

        let mut loaded = EngineConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert!((loaded.update_interval - 0.05).abs() < 1e-6);
        assert_eq!(loaded.seed, 42);
        assert_eq!((loaded.render_width, loaded.render_height), (320, 200));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[render]\nwidth = 800\n").unwrap();
        let mut config = EngineConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.render_width, 800);
        assert_eq!(config.render_height, 360);
        assert_eq!(config.update_interval, 0.1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut config = EngineConfig::with_path("/nonexistent/dir/config.ini");
        assert!(config.load_from_file().is_err());
    }
}
