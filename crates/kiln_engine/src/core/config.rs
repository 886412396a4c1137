//! # Editor Configuration
//!
//! All configuration structures for the editor and the engine core live here.
//! The top-level [`EditorConfig`] groups window, engine, camera and asset
//! settings and can be loaded from TOML or RON through the [`Config`] trait.
//!
//! ## Configuration Categories
//!
//! - **Window**: title, size and vsync of the editor window
//! - **Engine**: logging and frame pacing
//! - **Camera**: editor camera projection and input tuning
//! - **Assets**: asset root and image loading behavior

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Window properties for the editor viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowProps {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether presentation waits for vertical sync
    pub vsync: bool,
}

impl WindowProps {
    /// Create window properties with a title and size
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            vsync: true,
        }
    }

    /// Width over height, 1.0 for a degenerate window
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for WindowProps {
    fn default() -> Self {
        Self::new("Kiln Editor", 1600, 900)
    }
}

/// # Engine Configuration
///
/// Core engine behavior: logging and frame pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Target FPS for frame rate limiting
    pub target_fps: u32,
    /// Delta time used when stepping frames headlessly (seconds)
    pub fixed_delta: f32,
}

impl EngineConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: 60,
            fixed_delta: 1.0 / 60.0,
        }
    }
}

/// Editor camera projection and input tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorCameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Viewport aspect ratio
    pub aspect_ratio: f32,
    /// Near clip distance
    pub near_clip: f32,
    /// Far clip distance
    pub far_clip: f32,
    /// Initial distance from the focal point
    pub orbit_distance: f32,
    /// Zoom applied per scroll notch
    pub zoom_factor: f32,
    /// Mouse delta scale for rotate and pan
    pub mouse_sensitivity: f32,
    /// Distance moved per frame while flying
    pub fly_step: f32,
}

impl Default for EditorCameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect_ratio: 16.0 / 9.0,
            near_clip: 0.1,
            far_clip: 1000.0,
            orbit_distance: 10.0,
            zoom_factor: 0.5,
            mouse_sensitivity: 0.01,
            fly_step: 0.1,
        }
    }
}

/// # Asset Configuration
///
/// Configuration for asset lookup and image decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory for assets
    pub assets_dir: String,
    /// Flip images vertically on load so row 0 is the bottom
    pub flip_on_load: bool,
}

impl AssetConfig {
    /// Set assets directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            flip_on_load: true,
        }
    }
}

/// # Complete Editor Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor window
    pub window: WindowProps,
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Editor camera configuration
    pub camera: EditorCameraConfig,
    /// Asset system configuration
    pub assets: AssetConfig,
}

impl EditorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.engine.fixed_delta <= 0.0 {
            return Err(ConfigError::Invalid("fixed delta must be positive".to_string()));
        }

        let camera = &self.camera;
        if camera.fov <= 0.0 {
            return Err(ConfigError::Invalid("camera fov must be positive".to_string()));
        }
        if camera.near_clip <= 0.0 {
            return Err(ConfigError::Invalid("camera near clip must be positive".to_string()));
        }
        if camera.far_clip <= camera.near_clip {
            return Err(ConfigError::Invalid(format!(
                "camera far clip {} must exceed near clip {}",
                camera.far_clip, camera.near_clip
            )));
        }

        Ok(())
    }
}

impl Config for EditorConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1600);
        assert_eq!(config.window.height, 900);
    }

    #[test]
    fn test_rejects_inverted_clip_planes() {
        let mut config = EditorConfig::default();
        config.camera.far_clip = 0.05;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");

        let mut config = EditorConfig::default();
        config.window.title = "Sandbox".to_string();
        config.engine = config.engine.with_log_level("debug");
        config.save_to_file(&path).unwrap();

        let loaded = EditorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.ron");
        std::fs::write(&path, "(window: (title: \"Partial\"))").unwrap();

        let loaded = EditorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.window.title, "Partial");
        assert_eq!(loaded.window.width, 1600);
        assert_eq!(loaded.assets, AssetConfig::default());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = EditorConfig::load_from_file("editor.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));
    }
}
