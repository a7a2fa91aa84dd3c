//! Avatar animation clip data: per-bone keyframe tracks plus expression keys

use crate::frame::Expression;
use serde::{Deserialize, Serialize};

/// A complete avatar clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarClip {
    /// Human-readable name
    pub name: String,
    /// Total duration in seconds
    pub duration: f64,
    /// One track per animated bone
    #[serde(default)]
    pub tracks: Vec<BoneTrack>,
    /// Facial expression changes, sorted by time
    #[serde(default)]
    pub expressions: Vec<ExpressionKey>,
}

/// Keyframes driving a single bone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneTrack {
    /// Skeleton bone index
    pub bone: usize,
    /// Sorted keyframes (by time)
    pub keyframes: Vec<BoneKeyframe>,
}

/// A bone's rigid transform at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneKeyframe {
    /// Time in seconds from clip start
    pub time: f64,
    /// Quaternion xyzw
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default)]
    pub translation: [f32; 3],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// Expression that takes effect at `time` and holds until the next key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionKey {
    pub time: f64,
    #[serde(flatten)]
    pub expression: Expression,
}

impl AvatarClip {
    /// A clip with no tracks: every bone stays at identity
    pub fn empty(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks: Vec::new(),
            expressions: Vec::new(),
        }
    }

    /// Highest bone index referenced by any track
    pub fn max_bone(&self) -> Option<usize> {
        self.tracks.iter().map(|t| t.bone).max()
    }
}
