//! Avatar animation for the Keystorm engine
//!
//! Every animation produces one `BoneTransformFrame` per tick:
//! - **Sources**: a single clip, either a built-in preset or a custom `.anim.toml` file
//! - **Blended**: crossfades between sources when a different one is requested
//! - **Composite**: layers animations by skeleton subtree (bone influence sets)
//!
//! `AvatarAnimationSystem` owns the scene's avatars and ticks them once per frame.

pub mod animation;
pub mod avatar;
pub mod blend;
pub mod clip;
pub mod composite;
pub mod frame;
pub mod library;
pub mod loader;
pub mod preset;
pub mod sampler;
pub mod skeleton;
pub mod source;

use keystorm_core::Result;
use keystorm_runtime::{FrameContext, RuntimeSystem};
use std::collections::BTreeMap;

pub use animation::AvatarAnimation;
pub use avatar::{Avatar, AvatarRenderer};
pub use blend::BlendedAnimation;
pub use composite::CompositeAnimation;
pub use frame::{BoneTransform, BoneTransformFrame, Expression};
pub use library::ClipLibrary;
pub use preset::AvatarPreset;
pub use skeleton::{BoneMask, Skeleton};
pub use source::AnimationSource;

/// Top-level animation system: the avatars of one scene, keyed by name.
///
/// Avatars are updated in name order and disposed on `shutdown`.
pub struct AvatarAnimationSystem {
    avatars: BTreeMap<String, Avatar>,
}

impl AvatarAnimationSystem {
    pub fn new() -> Self {
        Self {
            avatars: BTreeMap::new(),
        }
    }

    /// Add or replace an avatar
    pub fn add_avatar(&mut self, name: impl Into<String>, avatar: Avatar) {
        self.avatars.insert(name.into(), avatar);
    }

    pub fn remove_avatar(&mut self, name: &str) -> Option<Avatar> {
        self.avatars.remove(name)
    }

    pub fn avatar(&self, name: &str) -> Option<&Avatar> {
        self.avatars.get(name)
    }

    pub fn avatar_mut(&mut self, name: &str) -> Option<&mut Avatar> {
        self.avatars.get_mut(name)
    }

    /// Number of avatars in the scene
    pub fn avatar_count(&self) -> usize {
        self.avatars.len()
    }

    /// Draw every avatar that is ready; returns how many were drawn
    pub fn draw(&self, renderer: &mut dyn AvatarRenderer) -> usize {
        self.avatars
            .values()
            .filter(|avatar| avatar.draw(renderer))
            .count()
    }

    /// Remove all avatars for a scene transition
    pub fn clear(&mut self) {
        self.avatars.clear();
    }
}

impl Default for AvatarAnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeSystem for AvatarAnimationSystem {
    fn initialize(&mut self, _ctx: &mut FrameContext) -> Result<()> {
        log::info!(
            "Avatar animation system initialized ({} avatars)",
            self.avatars.len()
        );
        Ok(())
    }

    fn update(&mut self, _ctx: &mut FrameContext, dt: f64) -> Result<()> {
        for avatar in self.avatars.values_mut() {
            avatar.update(dt);
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.clear();
        log::info!("Avatar animation system shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "avatar_animation"
    }
}
