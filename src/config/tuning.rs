use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use crate::configurator::idle::IdleMotion;

/// All tunable viewer parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Model path relative to the asset folder.
    pub model_path: String,
    /// Seconds before a model that has not finished loading counts as failed.
    pub load_timeout_secs: f32,
    pub camera_distance: f32,
    pub camera_fov_degrees: f32,
    /// Radians of yaw per pixel of horizontal drag.
    pub orbit_sensitivity: f32,
    pub ambient_brightness: f32,
    pub spot_intensity: f32,
    pub spot_position: [f32; 3],
    /// Outer cone angle of the spot light (radians).
    pub spot_angle: f32,
    pub ground_height: f32,
    pub ground_size: f32,
    pub idle: IdleMotion,
    pub product_name: String,
    pub product_tagline: String,
    /// Checkout drawer slide speed, in drawer widths per second.
    pub drawer_slide_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_title: "Shoe Configurator".into(),
            window_width: 1280,
            window_height: 800,
            model_path: "shoe.glb".into(),
            load_timeout_secs: 30.0,
            camera_distance: 4.0,
            camera_fov_degrees: 50.0,
            orbit_sensitivity: 0.008,
            ambient_brightness: 700.0,
            spot_intensity: 4_000_000.0,
            spot_position: [10.0, 15.0, 10.0],
            spot_angle: 0.1,
            ground_height: -0.8,
            ground_size: 10.0,
            idle: IdleMotion::default(),
            product_name: "Product Name".into(),
            product_tagline: "lorem".into(),
            drawer_slide_speed: 4.0,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("shoe_configurator")
    }

    /// Path to the tuning file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse {}: {e}, using defaults", path.display());
                    }
                },
                Err(e) => {
                    warn!("Failed to read {}: {e}, using defaults", path.display());
                }
            }
            return Self::default();
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    /// The browser build has no writable data directory.
    #[cfg(target_arch = "wasm32")]
    pub fn load_or_default() -> Self {
        Self::default()
    }

    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Save current tuning to file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }

    pub fn spot_translation(&self) -> Vec3 {
        Vec3::from_array(self.spot_position)
    }
}
