//! An animated avatar instance and the render sink it draws through

use crate::animation::AvatarAnimation;
use crate::frame::Expression;
use crate::library::ClipLibrary;
use crate::preset::AvatarPreset;
use crate::skeleton::Skeleton;
use crate::source::PresetAnimation;
use glam::Mat4;
use keystorm_core::Result;

/// Skins and draws an avatar. Implemented by the host renderer.
pub trait AvatarRenderer {
    /// False while the avatar's assets are still loading
    fn is_ready(&self) -> bool;

    /// Draw with one matrix per skeleton bone
    fn draw(&mut self, bone_transforms: &[Mat4], expression: Expression, world: Mat4);
}

/// A skinned avatar: world placement plus the animation driving its bones
#[derive(Debug, Clone)]
pub struct Avatar {
    /// World transform of the avatar root
    pub world: Mat4,
    /// Loop flag passed to the animation each frame
    pub looping: bool,
    animation: Option<AvatarAnimation>,
    bone_matrices: Vec<Mat4>,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new()
    }
}

impl Avatar {
    pub fn new() -> Self {
        Self {
            world: Mat4::IDENTITY,
            looping: true,
            animation: None,
            bone_matrices: Vec::new(),
        }
    }

    pub fn with_animation(animation: AvatarAnimation) -> Self {
        let mut avatar = Self::new();
        avatar.set_animation(animation);
        avatar
    }

    /// Replace the animation outright (no crossfade)
    pub fn set_animation(&mut self, animation: AvatarAnimation) {
        animation
            .bone_transforms()
            .write_matrices(&mut self.bone_matrices);
        self.animation = Some(animation);
    }

    /// Switch to a built-in preset; idle presets loop, emotes play once
    pub fn play_preset(
        &mut self,
        preset: AvatarPreset,
        library: &ClipLibrary,
        skeleton: &Skeleton,
    ) -> Result<()> {
        let animation = PresetAnimation::new(preset, library, skeleton)?;
        self.looping = preset.is_idle();
        self.set_animation(AvatarAnimation::Preset(animation));
        Ok(())
    }

    pub fn animation(&self) -> Option<&AvatarAnimation> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut AvatarAnimation> {
        self.animation.as_mut()
    }

    /// Advance the animation and refresh the cached bone matrices
    pub fn update(&mut self, dt: f64) {
        if let Some(animation) = &mut self.animation {
            animation.update(dt, self.looping);
            animation
                .bone_transforms()
                .write_matrices(&mut self.bone_matrices);
        }
    }

    /// Bone matrices from the last update (empty without an animation)
    pub fn bone_matrices(&self) -> &[Mat4] {
        &self.bone_matrices
    }

    /// Draw through `renderer`. Returns false, without drawing, when there is
    /// no animation yet or the renderer isn't ready.
    pub fn draw(&self, renderer: &mut dyn AvatarRenderer) -> bool {
        let Some(animation) = &self.animation else {
            return false;
        };
        if !renderer.is_ready() {
            return false;
        }
        renderer.draw(&self.bone_matrices, animation.expression(), self.world);
        true
    }
}
