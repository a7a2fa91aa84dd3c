//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `KEYSTORM_BLEND_DURATION`, `KEYSTORM_FIELD_OF_VIEW`
//! 2. Project-local: `.keystorm/config.toml`
//! 3. Global: `~/.keystorm/config.toml`

use crate::error::{KeystormError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Avatar animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Crossfade duration between two animations, in seconds
    #[serde(default = "default_blend_duration")]
    pub blend_duration: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            blend_duration: default_blend_duration(),
        }
    }
}

fn default_blend_duration() -> f32 {
    0.25
}

/// Initial camera rig settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Field of view in degrees
    #[serde(default = "default_field_of_view")]
    pub field_of_view: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_aspect")]
    pub aspect: f32,
    #[serde(default = "default_position")]
    pub position: [f32; 3],
    #[serde(default = "default_look_at")]
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            field_of_view: default_field_of_view(),
            near: default_near(),
            far: default_far(),
            aspect: default_aspect(),
            position: default_position(),
            look_at: default_look_at(),
        }
    }
}

fn default_field_of_view() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    1000.0
}
fn default_aspect() -> f32 {
    16.0 / 9.0
}
fn default_position() -> [f32; 3] {
    [0.0, 1.5, 5.0]
}
fn default_look_at() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeystormConfig {
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl KeystormConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = KeystormConfig::default();

        // Layer 1: Global config (~/.keystorm/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = Self::load_file(&global_path)?;
            }
        }

        // Layer 2: Project-local config (.keystorm/config.toml)
        let local_path = PathBuf::from(".keystorm/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        // Layer 3: Environment variable overrides
        Self::apply_env_overrides(&mut config)?;

        Ok(config)
    }

    /// Load config from a specific file path only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Parse config from a TOML string, without environment overrides
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: KeystormConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let blend = self.animation.blend_duration;
        if blend.is_nan() || blend < 0.0 {
            return Err(KeystormError::ConfigError(format!(
                "animation.blend_duration must be non-negative, got {}",
                self.animation.blend_duration
            )));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(KeystormError::ConfigError(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                self.camera.near, self.camera.far
            )));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".keystorm").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<KeystormConfig> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            KeystormError::ConfigError(format!("Failed to load config {}: {}", path.display(), e))
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn merge_into(base: &mut KeystormConfig, overlay: KeystormConfig) {
        if overlay.animation.blend_duration != default_blend_duration() {
            base.animation.blend_duration = overlay.animation.blend_duration;
        }

        let defaults = CameraConfig::default();
        if overlay.camera.field_of_view != defaults.field_of_view {
            base.camera.field_of_view = overlay.camera.field_of_view;
        }
        if overlay.camera.near != defaults.near {
            base.camera.near = overlay.camera.near;
        }
        if overlay.camera.far != defaults.far {
            base.camera.far = overlay.camera.far;
        }
        if overlay.camera.aspect != defaults.aspect {
            base.camera.aspect = overlay.camera.aspect;
        }
        if overlay.camera.position != defaults.position {
            base.camera.position = overlay.camera.position;
        }
        if overlay.camera.look_at != defaults.look_at {
            base.camera.look_at = overlay.camera.look_at;
        }
    }

    fn apply_env_overrides(config: &mut KeystormConfig) -> Result<()> {
        if let Some(value) = Self::env_f32("KEYSTORM_BLEND_DURATION")? {
            config.animation.blend_duration = value.max(0.0);
        }
        if let Some(value) = Self::env_f32("KEYSTORM_FIELD_OF_VIEW")? {
            config.camera.field_of_view = value;
        }
        Ok(())
    }

    fn env_f32(key: &str) -> Result<Option<f32>> {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse::<f32>().map(Some).map_err(|e| {
                KeystormError::ConfigError(format!("{} is not a number ({}): {}", key, raw, e))
            }),
            Err(_) => Ok(None),
        }
    }
}
