//! Render configuration loaded from YAML

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{cameras::CameraConfig, error::ConfigError, integrator, scenes::SceneConfig};

/// Everything needed to produce one image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub image: ImageConfig,
    /// Falls back to the scene's own viewpoint when absent
    #[serde(default)]
    pub camera: Option<CameraConfig>,
    pub scene: SceneConfig,
    /// Fixed seed for reproducible renders
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Image Config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_depth() -> u32 {
    integrator::MAX_DEPTH
}

impl ImageConfig {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            samples_per_pixel: 100,
            max_depth: integrator::MAX_DEPTH,
        }
    }
}

impl RenderConfig {
    /// Default image settings for `scene`, viewed from the scene's own camera
    pub fn for_scene(scene: SceneConfig) -> Self {
        Self {
            image: ImageConfig::default(),
            camera: None,
            scene,
            seed: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        debug!("{config:?}");
        Ok(config)
    }

    /// The configured camera, or the scene's default viewpoint
    pub fn camera(&self) -> CameraConfig {
        self.camera
            .clone()
            .unwrap_or_else(|| self.scene.default_camera())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let image = &self.image;
        if image.width == 0 || image.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image must have a positive size, got {}x{}",
                image.width, image.height
            )));
        }
        if image.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid(
                "samples_per_pixel must be positive".to_string(),
            ));
        }
        let camera = self.camera();
        if camera.shutter_close < camera.shutter_open {
            return Err(ConfigError::Invalid(format!(
                "shutter closes at {} before it opens at {}",
                camera.shutter_close, camera.shutter_open
            )));
        }
        if !(camera.vertical_fov_deg > 0.0 && camera.vertical_fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "vertical_fov_deg must lie in (0, 180), got {}",
                camera.vertical_fov_deg
            )));
        }
        Ok(())
    }
}
