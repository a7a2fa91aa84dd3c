//! Clip-backed animation sources: built-in presets and custom file clips

use crate::clip::AvatarClip;
use crate::frame::{BoneTransformFrame, Expression};
use crate::library::ClipLibrary;
use crate::loader::{validate_clip, validate_clip_bones, ClipAssets};
use crate::preset::AvatarPreset;
use crate::sampler::{expression_at, sample_clip};
use crate::skeleton::Skeleton;
use keystorm_core::{finite_ratio, KeystormError, Result};
use std::sync::Arc;

/// Playback state for one clip: position, finished flag and the sampled frame.
///
/// Until the first `update` the frame is the identity pose.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    clip: Arc<AvatarClip>,
    position: f64,
    finished: bool,
    frame: BoneTransformFrame,
    expression: Expression,
}

impl ClipPlayer {
    pub fn new(clip: Arc<AvatarClip>, bone_count: usize) -> Self {
        Self {
            clip,
            position: 0.0,
            finished: false,
            frame: BoneTransformFrame::identity(bone_count),
            expression: Expression::NEUTRAL,
        }
    }

    /// Advance by `elapsed` seconds and resample.
    ///
    /// Past the end a looping clip wraps around; otherwise it clamps to the
    /// end and reports finished.
    pub fn update(&mut self, elapsed: f64, looping: bool) {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        let length = self.clip.duration;
        self.position += elapsed;

        if self.position >= length {
            if looping {
                self.position = if length > 0.0 {
                    self.position % length
                } else {
                    0.0
                };
                self.finished = false;
            } else {
                self.position = length.max(0.0);
                self.finished = true;
            }
        }

        sample_clip(&self.clip, self.position, &mut self.frame);
        self.expression = expression_at(&self.clip, self.position);
    }

    /// Rewind to the start without resampling
    pub fn restart(&mut self) {
        self.position = 0.0;
        self.finished = false;
    }

    pub fn bone_transforms(&self) -> &BoneTransformFrame {
        &self.frame
    }

    pub fn expression(&self) -> Expression {
        self.expression
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn length(&self) -> f64 {
        self.clip.duration
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the clip played, or `None` for a zero-length clip
    pub fn progress(&self) -> Option<f64> {
        finite_ratio(self.position, self.clip.duration)
    }

    pub fn clip(&self) -> &AvatarClip {
        &self.clip
    }
}

/// A built-in clip from the host's preset library
#[derive(Debug, Clone)]
pub struct PresetAnimation {
    preset: AvatarPreset,
    player: ClipPlayer,
}

impl PresetAnimation {
    pub fn new(preset: AvatarPreset, library: &ClipLibrary, skeleton: &Skeleton) -> Result<Self> {
        let clip = library.preset(preset).ok_or_else(|| {
            KeystormError::AssetNotFound(format!("preset '{}' is not in the library", preset))
        })?;
        validate_clip_bones(&clip, skeleton)?;
        Ok(Self {
            preset,
            player: ClipPlayer::new(clip, skeleton.bone_count()),
        })
    }

    pub fn preset(&self) -> AvatarPreset {
        self.preset
    }

    pub fn player(&self) -> &ClipPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut ClipPlayer {
        &mut self.player
    }
}

/// A custom clip loaded once from the asset collaborator
#[derive(Debug, Clone)]
pub struct CustomFileAnimation {
    key: String,
    player: ClipPlayer,
}

impl CustomFileAnimation {
    /// Load the clip for `key` from `assets`. The clip is never reloaded.
    pub fn load(key: &str, assets: &dyn ClipAssets, skeleton: &Skeleton) -> Result<Self> {
        let clip = assets.load_clip(key)?;
        Self::from_clip(key, Arc::new(clip), skeleton)
    }

    /// Wrap an already-loaded clip
    pub fn from_clip(key: &str, clip: Arc<AvatarClip>, skeleton: &Skeleton) -> Result<Self> {
        validate_clip(&clip)?;
        validate_clip_bones(&clip, skeleton)?;
        Ok(Self {
            key: key.to_string(),
            player: ClipPlayer::new(clip, skeleton.bone_count()),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn player(&self) -> &ClipPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut ClipPlayer {
        &mut self.player
    }
}

/// A single clip-driven animation: either a preset or a custom file
#[derive(Debug, Clone)]
pub enum AnimationSource {
    Preset(PresetAnimation),
    CustomFile(CustomFileAnimation),
}

impl AnimationSource {
    pub fn preset(preset: AvatarPreset, library: &ClipLibrary, skeleton: &Skeleton) -> Result<Self> {
        PresetAnimation::new(preset, library, skeleton).map(AnimationSource::Preset)
    }

    pub fn custom(key: &str, assets: &dyn ClipAssets, skeleton: &Skeleton) -> Result<Self> {
        CustomFileAnimation::load(key, assets, skeleton).map(AnimationSource::CustomFile)
    }

    /// Preset name or custom key
    pub fn name(&self) -> &str {
        match self {
            AnimationSource::Preset(p) => p.preset.name(),
            AnimationSource::CustomFile(c) => c.key.as_str(),
        }
    }

    pub fn player(&self) -> &ClipPlayer {
        match self {
            AnimationSource::Preset(p) => &p.player,
            AnimationSource::CustomFile(c) => &c.player,
        }
    }

    pub fn player_mut(&mut self) -> &mut ClipPlayer {
        match self {
            AnimationSource::Preset(p) => &mut p.player,
            AnimationSource::CustomFile(c) => &mut c.player,
        }
    }

    pub fn update(&mut self, elapsed: f64, looping: bool) {
        self.player_mut().update(elapsed, looping);
    }

    pub fn restart(&mut self) {
        self.player_mut().restart();
    }

    pub fn bone_transforms(&self) -> &BoneTransformFrame {
        self.player().bone_transforms()
    }

    pub fn expression(&self) -> Expression {
        self.player().expression()
    }

    pub fn position(&self) -> f64 {
        self.player().position()
    }

    pub fn length(&self) -> f64 {
        self.player().length()
    }

    pub fn is_finished(&self) -> bool {
        self.player().is_finished()
    }
}
