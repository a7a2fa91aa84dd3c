//! Clip registry: shared clips by preset and by custom key

use crate::clip::AvatarClip;
use crate::loader::{validate_clip, ClipAssets};
use crate::preset::AvatarPreset;
use keystorm_core::{KeystormError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Holds loaded clips so several avatars can share one copy.
#[derive(Default)]
pub struct ClipLibrary {
    presets: HashMap<AvatarPreset, Arc<AvatarClip>>,
    custom: HashMap<String, Arc<AvatarClip>>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in clip for `preset`. Overwrites any existing entry.
    pub fn add_preset(&mut self, preset: AvatarPreset, clip: AvatarClip) -> Result<()> {
        validate_clip(&clip)?;
        self.presets.insert(preset, Arc::new(clip));
        Ok(())
    }

    /// Register a custom clip under `key`. Overwrites any existing entry.
    pub fn add_clip(&mut self, key: impl Into<String>, clip: AvatarClip) -> Result<()> {
        validate_clip(&clip)?;
        self.custom.insert(key.into(), Arc::new(clip));
        Ok(())
    }

    pub fn preset(&self, preset: AvatarPreset) -> Option<Arc<AvatarClip>> {
        self.presets.get(&preset).cloned()
    }

    pub fn clip(&self, key: &str) -> Option<Arc<AvatarClip>> {
        self.custom.get(key).cloned()
    }

    /// Fetch a custom clip, loading and caching it from `assets` on first use
    pub fn load_or_get(&mut self, key: &str, assets: &dyn ClipAssets) -> Result<Arc<AvatarClip>> {
        if let Some(clip) = self.custom.get(key) {
            return Ok(clip.clone());
        }
        let clip = assets.load_clip(key)?;
        validate_clip(&clip)?;
        let clip = Arc::new(clip);
        self.custom.insert(key.to_string(), clip.clone());
        Ok(clip)
    }

    pub fn has_preset(&self, preset: AvatarPreset) -> bool {
        self.presets.contains_key(&preset)
    }

    /// Number of registered clips (presets + custom)
    pub fn clip_count(&self) -> usize {
        self.presets.len() + self.custom.len()
    }
}

impl ClipAssets for ClipLibrary {
    fn load_clip(&self, key: &str) -> Result<AvatarClip> {
        if let Some(clip) = self.custom.get(key) {
            return Ok(clip.as_ref().clone());
        }
        // Preset names resolve too, so a custom slot can reuse a built-in clip
        key.parse::<AvatarPreset>()
            .ok()
            .and_then(|preset| self.presets.get(&preset))
            .map(|clip| clip.as_ref().clone())
            .ok_or_else(|| KeystormError::AssetNotFound(format!("clip '{}'", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingAssets {
        loads: Cell<usize>,
    }

    impl ClipAssets for CountingAssets {
        fn load_clip(&self, key: &str) -> Result<AvatarClip> {
            self.loads.set(self.loads.get() + 1);
            Ok(AvatarClip::empty(key, 1.0))
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut library = ClipLibrary::new();
        library
            .add_preset(AvatarPreset::Wave, AvatarClip::empty("wave", 1.0))
            .unwrap();
        library
            .add_clip("shoot", AvatarClip::empty("shoot", 0.5))
            .unwrap();
        assert!(library.has_preset(AvatarPreset::Wave));
        assert!(library.preset(AvatarPreset::Clap).is_none());
        assert_eq!(library.clip("shoot").unwrap().duration, 0.5);
        assert_eq!(library.clip_count(), 2);
    }

    #[test]
    fn reject_invalid_clip() {
        let mut library = ClipLibrary::new();
        assert!(library
            .add_clip("bad", AvatarClip::empty("bad", 0.0))
            .is_err());
        assert_eq!(library.clip_count(), 0);
    }

    #[test]
    fn load_or_get_loads_once() {
        let mut library = ClipLibrary::new();
        let assets = CountingAssets {
            loads: Cell::new(0),
        };
        let a = library.load_or_get("typing", &assets).unwrap();
        let b = library.load_or_get("typing", &assets).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(assets.loads.get(), 1);
    }

    #[test]
    fn library_serves_as_asset_source() {
        let mut library = ClipLibrary::new();
        library
            .add_preset(AvatarPreset::Clap, AvatarClip::empty("clap", 2.0))
            .unwrap();
        assert_eq!(library.load_clip("clap").unwrap().duration, 2.0);
        assert!(library.load_clip("nothing").is_err());
    }

    #[test]
    fn load_or_get_rejects_invalid_clip() {
        struct StillAssets;
        impl ClipAssets for StillAssets {
            fn load_clip(&self, key: &str) -> Result<AvatarClip> {
                Ok(AvatarClip::empty(key, 0.0))
            }
        }

        let mut library = ClipLibrary::new();
        assert!(library.load_or_get("frozen", &StillAssets).is_err());
        assert!(library.clip("frozen").is_none());
    }
}
