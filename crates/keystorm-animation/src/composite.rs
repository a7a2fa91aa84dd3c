//! Bone-masked composition of several independently playing animations
//!
//! Layer 0 is the primary animation and supplies every bone by default.
//! Each layer then overwrites the bones in its influence set, in
//! declaration order, so later layers win where sets overlap.

use crate::animation::AvatarAnimation;
use crate::frame::{BoneTransformFrame, Expression};
use crate::skeleton::{BoneMask, Skeleton};
use keystorm_core::{KeystormError, Result};

/// One animation and the bones it controls
#[derive(Debug, Clone)]
pub struct CompositeLayer {
    animation: AvatarAnimation,
    roots: Vec<usize>,
    influence: BoneMask,
}

impl CompositeLayer {
    pub fn animation(&self) -> &AvatarAnimation {
        &self.animation
    }

    /// Declared root bones
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Roots plus all their descendants
    pub fn influence(&self) -> &BoneMask {
        &self.influence
    }
}

/// Combines several animations by skeleton subtree, e.g. running legs with a shooting arm.
#[derive(Debug, Clone)]
pub struct CompositeAnimation {
    layers: Vec<CompositeLayer>,
    frame: BoneTransformFrame,
}

impl CompositeAnimation {
    /// Combine `animations` with their declared root bones.
    ///
    /// `bone_roots[i]` lists the roots of `animations[i]`. Influence sets are
    /// computed once here; every root must exist in `skeleton`, and every
    /// animation must produce frames for `skeleton`.
    pub fn new(
        skeleton: &Skeleton,
        animations: Vec<AvatarAnimation>,
        bone_roots: Vec<Vec<usize>>,
    ) -> Result<Self> {
        if animations.is_empty() {
            return Err(KeystormError::CompositeError(
                "composite animation needs at least one animation".into(),
            ));
        }
        if animations.len() != bone_roots.len() {
            return Err(KeystormError::CompositeError(format!(
                "{} animations but {} bone-root lists",
                animations.len(),
                bone_roots.len()
            )));
        }

        let bone_count = skeleton.bone_count();
        let mut layers = Vec::with_capacity(animations.len());
        for (index, (animation, roots)) in animations.into_iter().zip(bone_roots).enumerate() {
            let frame_bones = animation.bone_transforms().bone_count();
            if frame_bones != bone_count {
                return Err(KeystormError::CompositeError(format!(
                    "animation {} produces {} bones, skeleton has {}",
                    index, frame_bones, bone_count
                )));
            }
            let influence = skeleton.influence_set_of(&roots)?;
            layers.push(CompositeLayer {
                animation,
                roots,
                influence,
            });
        }

        log::debug!(
            "composite animation with {} layers ({} bones overridden)",
            layers.len(),
            layers.iter().skip(1).map(|l| l.influence.len()).sum::<usize>()
        );

        Ok(Self {
            layers,
            frame: BoneTransformFrame::identity(bone_count),
        })
    }

    /// Advance every layer with the same loop flag
    pub fn update(&mut self, elapsed: f64, looping: bool) {
        self.update_with_flags(elapsed, looping, &[]);
    }

    /// Advance every layer independently and recompose the frame.
    ///
    /// Layer `i` loops according to `loop_flags[i]`, or `default_loop` when
    /// the list is shorter than the layer count.
    pub fn update_with_flags(&mut self, elapsed: f64, default_loop: bool, loop_flags: &[bool]) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            let looping = loop_flags.get(i).copied().unwrap_or(default_loop);
            layer.animation.update(elapsed, looping);
        }
        self.compose();
    }

    fn compose(&mut self) {
        self.frame
            .copy_from(self.layers[0].animation.bone_transforms());

        for layer in &self.layers {
            let source = layer.animation.bone_transforms();
            for &bone in layer.influence.bones() {
                if let Some(transform) = source.get(bone) {
                    self.frame.set(bone, *transform);
                }
            }
        }
    }

    /// Finished flag of layer `index`; an invalid index reports "not finished"
    pub fn is_animation_finished(&self, index: usize) -> bool {
        self.layers
            .get(index)
            .map(|l| l.animation.is_finished())
            .unwrap_or(false)
    }

    pub fn layer(&self, index: usize) -> Option<&CompositeLayer> {
        self.layers.get(index)
    }

    /// Mutable access to a layer's animation, e.g. to start a crossfade on it
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut AvatarAnimation> {
        self.layers.get_mut(index).map(|l| &mut l.animation)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn influence(&self, index: usize) -> Option<&BoneMask> {
        self.layers.get(index).map(|l| &l.influence)
    }

    fn primary(&self) -> &AvatarAnimation {
        &self.layers[0].animation
    }

    pub fn bone_transforms(&self) -> &BoneTransformFrame {
        &self.frame
    }

    /// The primary layer drives the face
    pub fn expression(&self) -> Expression {
        self.primary().expression()
    }

    pub fn position(&self) -> f64 {
        self.primary().position()
    }

    pub fn length(&self) -> f64 {
        self.primary().length()
    }

    pub fn is_finished(&self) -> bool {
        self.primary().is_finished()
    }
}
