//! The closed set of avatar animation kinds

use crate::blend::BlendedAnimation;
use crate::composite::CompositeAnimation;
use crate::frame::{BoneTransformFrame, Expression};
use crate::source::{AnimationSource, CustomFileAnimation, PresetAnimation};

/// Any animation an avatar can play
#[derive(Debug, Clone)]
pub enum AvatarAnimation {
    Preset(PresetAnimation),
    CustomFile(CustomFileAnimation),
    Blended(BlendedAnimation),
    Composite(CompositeAnimation),
}

impl AvatarAnimation {
    /// Advance by `elapsed` seconds
    pub fn update(&mut self, elapsed: f64, looping: bool) {
        match self {
            AvatarAnimation::Preset(p) => p.player_mut().update(elapsed, looping),
            AvatarAnimation::CustomFile(c) => c.player_mut().update(elapsed, looping),
            AvatarAnimation::Blended(b) => b.update(elapsed, looping),
            AvatarAnimation::Composite(c) => c.update(elapsed, looping),
        }
    }

    pub fn bone_transforms(&self) -> &BoneTransformFrame {
        match self {
            AvatarAnimation::Preset(p) => p.player().bone_transforms(),
            AvatarAnimation::CustomFile(c) => c.player().bone_transforms(),
            AvatarAnimation::Blended(b) => b.bone_transforms(),
            AvatarAnimation::Composite(c) => c.bone_transforms(),
        }
    }

    pub fn expression(&self) -> Expression {
        match self {
            AvatarAnimation::Preset(p) => p.player().expression(),
            AvatarAnimation::CustomFile(c) => c.player().expression(),
            AvatarAnimation::Blended(b) => b.expression(),
            AvatarAnimation::Composite(c) => c.expression(),
        }
    }

    /// Playback position in seconds
    pub fn position(&self) -> f64 {
        match self {
            AvatarAnimation::Preset(p) => p.player().position(),
            AvatarAnimation::CustomFile(c) => c.player().position(),
            AvatarAnimation::Blended(b) => b.position(),
            AvatarAnimation::Composite(c) => c.position(),
        }
    }

    /// Length in seconds
    pub fn length(&self) -> f64 {
        match self {
            AvatarAnimation::Preset(p) => p.player().length(),
            AvatarAnimation::CustomFile(c) => c.player().length(),
            AvatarAnimation::Blended(b) => b.length(),
            AvatarAnimation::Composite(c) => c.length(),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            AvatarAnimation::Preset(p) => p.player().is_finished(),
            AvatarAnimation::CustomFile(c) => c.player().is_finished(),
            AvatarAnimation::Blended(b) => b.is_finished(),
            AvatarAnimation::Composite(c) => c.is_finished(),
        }
    }

    pub fn as_blended_mut(&mut self) -> Option<&mut BlendedAnimation> {
        match self {
            AvatarAnimation::Blended(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeAnimation> {
        match self {
            AvatarAnimation::Composite(c) => Some(c),
            _ => None,
        }
    }
}

impl From<AnimationSource> for AvatarAnimation {
    fn from(source: AnimationSource) -> Self {
        match source {
            AnimationSource::Preset(p) => AvatarAnimation::Preset(p),
            AnimationSource::CustomFile(c) => AvatarAnimation::CustomFile(c),
        }
    }
}

impl From<BlendedAnimation> for AvatarAnimation {
    fn from(blended: BlendedAnimation) -> Self {
        AvatarAnimation::Blended(blended)
    }
}

impl From<CompositeAnimation> for AvatarAnimation {
    fn from(composite: CompositeAnimation) -> Self {
        AvatarAnimation::Composite(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::test_support::*;
    use glam::{Quat, Vec3};

    #[test]
    fn dispatch_matches_inner_source() {
        let skeleton = chain_skeleton(2);
        let source = constant_source("a", 1.0, &skeleton, Quat::IDENTITY, Vec3::Y);
        let mut anim = AvatarAnimation::from(source.clone());
        assert!(matches!(anim, AvatarAnimation::CustomFile(_)));

        anim.update(2.0, false);
        assert!(anim.is_finished());
        assert_eq!(anim.length(), 1.0);
        assert_eq!(anim.position(), 1.0);
        assert_eq!(anim.bone_transforms().get(1).unwrap().translation, Vec3::Y);
        assert!(anim.as_blended_mut().is_none());
    }

    #[test]
    fn blended_dispatch() {
        let skeleton = chain_skeleton(2);
        let sources = vec![
            constant_source("a", 1.0, &skeleton, Quat::IDENTITY, Vec3::ZERO),
            constant_source("b", 1.0, &skeleton, Quat::IDENTITY, Vec3::X),
        ];
        let mut anim = AvatarAnimation::from(BlendedAnimation::new(sources, 0, 0.1).unwrap());
        anim.as_blended_mut().unwrap().play(1).unwrap();
        anim.update(0.2, true);
        assert_eq!(anim.bone_transforms().get(0).unwrap().translation, Vec3::X);
    }
}
