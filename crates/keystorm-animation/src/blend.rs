//! Crossfade blending between clip sources
//!
//! Rotations are slerped and translations lerped bone by bone, then the
//! parts are recomposed. Lerping whole matrices would shear the skeleton.

use crate::frame::{BoneTransform, BoneTransformFrame, Expression};
use crate::source::AnimationSource;
use keystorm_core::{finite_ratio_f32, AnimationConfig, KeystormError, Result};

/// Blend two frames bone by bone.
///
/// `weight` of 0.0 = fully `a`, 1.0 = fully `b`. Only the bones present in
/// all three frames are written.
pub fn blend_frames(
    a: &BoneTransformFrame,
    b: &BoneTransformFrame,
    weight: f32,
    out: &mut BoneTransformFrame,
) {
    let w = weight.clamp(0.0, 1.0);
    let a = a.transforms();
    let b = b.transforms();
    let out = out.transforms_mut();
    let count = a.len().min(b.len()).min(out.len());

    for i in 0..count {
        out[i] = BoneTransform::interpolate(&a[i], &b[i], w);
    }
}

/// Plays one of several sources, crossfading whenever a different one is requested.
#[derive(Debug, Clone)]
pub struct BlendedAnimation {
    sources: Vec<AnimationSource>,
    current: usize,
    /// Source being faded in; `None` when not blending
    target: Option<usize>,
    blend_elapsed: f32,
    blend_duration: f32,
    frame: BoneTransformFrame,
    expression: Expression,
}

impl BlendedAnimation {
    /// Create a blended animation starting on `sources[initial]`.
    ///
    /// `blend_duration` is in seconds; zero switches instantly.
    pub fn new(sources: Vec<AnimationSource>, initial: usize, blend_duration: f32) -> Result<Self> {
        let Some(first) = sources.first() else {
            return Err(KeystormError::AnimationError(
                "blended animation needs at least one source".into(),
            ));
        };
        if initial >= sources.len() {
            return Err(KeystormError::AnimationError(format!(
                "initial source {} out of range ({} sources)",
                initial,
                sources.len()
            )));
        }
        if !blend_duration.is_finite() || blend_duration < 0.0 {
            return Err(KeystormError::AnimationError(format!(
                "blend duration must be a non-negative number of seconds, got {}",
                blend_duration
            )));
        }
        let bone_count = first.bone_transforms().bone_count();
        if let Some(other) = sources
            .iter()
            .find(|s| s.bone_transforms().bone_count() != bone_count)
        {
            return Err(KeystormError::AnimationError(format!(
                "source '{}' has {} bones, expected {}",
                other.name(),
                other.bone_transforms().bone_count(),
                bone_count
            )));
        }

        Ok(Self {
            sources,
            current: initial,
            target: None,
            blend_elapsed: 0.0,
            blend_duration,
            frame: BoneTransformFrame::identity(bone_count),
            expression: Expression::NEUTRAL,
        })
    }

    /// Create with the configured crossfade duration
    pub fn from_config(
        sources: Vec<AnimationSource>,
        initial: usize,
        config: &AnimationConfig,
    ) -> Result<Self> {
        Self::new(sources, initial, config.blend_duration)
    }

    /// Start fading towards `sources[index]`.
    ///
    /// Requesting the source that is already current does nothing, so an
    /// in-progress clip is not restarted. Any other request rewinds the
    /// requested source and restarts the fade from the current source, even
    /// if a previous fade was still running.
    pub fn play(&mut self, index: usize) -> Result<()> {
        if index >= self.sources.len() {
            return Err(KeystormError::AnimationError(format!(
                "source {} out of range ({} sources)",
                index,
                self.sources.len()
            )));
        }
        if index == self.current {
            return Ok(());
        }
        if self.target.is_some() {
            log::debug!(
                "crossfade to '{}' interrupted by '{}'",
                self.target.map(|t| self.sources[t].name()).unwrap_or_default(),
                self.sources[index].name()
            );
        }
        self.sources[index].restart();
        self.target = Some(index);
        self.blend_elapsed = 0.0;
        Ok(())
    }

    /// `play` by preset name or custom key
    pub fn play_named(&mut self, name: &str) -> Result<()> {
        let index = self
            .sources
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| {
                KeystormError::AnimationError(format!("no source named '{}'", name))
            })?;
        self.play(index)
    }

    pub fn update(&mut self, elapsed: f64, looping: bool) {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };

        // The current source keeps playing underneath the fade
        self.sources[self.current].update(elapsed, looping);

        let Some(target) = self.target else {
            self.frame
                .copy_from(self.sources[self.current].bone_transforms());
            self.expression = self.sources[self.current].expression();
            return;
        };

        self.sources[target].update(elapsed, looping);
        self.blend_elapsed += elapsed as f32;
        let factor = self.blend_factor();

        blend_frames(
            self.sources[self.current].bone_transforms(),
            self.sources[target].bone_transforms(),
            factor,
            &mut self.frame,
        );
        self.expression = if factor < 0.5 {
            self.sources[self.current].expression()
        } else {
            self.sources[target].expression()
        };

        if factor >= 1.0 {
            self.current = target;
            self.target = None;
            self.blend_elapsed = 0.0;
        }
    }

    /// Progress of the running fade in [0, 1]; 0 when not blending
    pub fn blend_factor(&self) -> f32 {
        if self.target.is_none() {
            return 0.0;
        }
        finite_ratio_f32(self.blend_elapsed, self.blend_duration)
            .unwrap_or(1.0)
            .clamp(0.0, 1.0)
    }

    pub fn is_blending(&self) -> bool {
        self.target.is_some()
    }

    pub fn blend_duration(&self) -> f32 {
        self.blend_duration
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target
    }

    pub fn current(&self) -> &AnimationSource {
        &self.sources[self.current]
    }

    pub fn sources(&self) -> &[AnimationSource] {
        &self.sources
    }

    pub fn bone_transforms(&self) -> &BoneTransformFrame {
        &self.frame
    }

    pub fn expression(&self) -> Expression {
        self.expression
    }

    pub fn position(&self) -> f64 {
        self.current().position()
    }

    pub fn length(&self) -> f64 {
        self.current().length()
    }

    pub fn is_finished(&self) -> bool {
        self.target.is_none() && self.current().is_finished()
    }
}
