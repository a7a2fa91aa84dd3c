//! Explicit per-scene state handed to every system

use keystorm_core::{Camera, KeystormConfig};

/// State shared by the systems of one scene.
///
/// Replaces process-wide "active camera" lookups: each camera rig gets its
/// own context, and systems receive it by `&mut` during the update pass.
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// The camera rendered this frame
    pub camera: Camera,
    /// Total scene time in seconds, advanced by `SystemRunner`
    pub time: f64,
}

impl FrameContext {
    pub fn new(camera: Camera) -> Self {
        Self { camera, time: 0.0 }
    }

    pub fn from_config(config: &KeystormConfig) -> Self {
        Self::new(Camera::from_config(&config.camera))
    }
}
