//! TOML-based avatar clip loading and the asset lookup seam

use crate::clip::AvatarClip;
use crate::skeleton::Skeleton;
use keystorm_core::{KeystormError, Result};
use std::path::{Path, PathBuf};

/// Source of custom clips, looked up by string key
pub trait ClipAssets {
    /// Load the clip registered under `key`
    fn load_clip(&self, key: &str) -> Result<AvatarClip>;
}

/// Reads `<root>/<key>.anim.toml`
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path a key resolves to
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.anim.toml", key))
    }
}

impl ClipAssets for DirectoryAssets {
    fn load_clip(&self, key: &str) -> Result<AvatarClip> {
        if key.is_empty() || key.contains("..") {
            return Err(KeystormError::AssetNotFound(format!(
                "invalid clip key '{}'",
                key
            )));
        }
        let path = self.path_for(key);
        if !path.exists() {
            return Err(KeystormError::AssetNotFound(path.display().to_string()));
        }
        load_clip_from_file(&path)
    }
}

/// Load an avatar clip from a `.anim.toml` file.
///
/// The file format mirrors the `AvatarClip` struct:
/// ```toml
/// name = "wave"
/// duration = 1.5
///
/// [[tracks]]
/// bone = 12
///
/// [[tracks.keyframes]]
/// time = 0.0
/// rotation = [0.0, 0.0, 0.0, 1.0]
/// translation = [0.0, 0.0, 0.0]
///
/// [[expressions]]
/// time = 0.0
/// mouth = 4
/// ```
pub fn load_clip_from_file(path: &Path) -> Result<AvatarClip> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        KeystormError::AnimationError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let clip = load_clip_from_str(&content, path)?;
    log::debug!(
        "loaded clip '{}' from {} ({} tracks, {:.2}s)",
        clip.name,
        path.display(),
        clip.tracks.len(),
        clip.duration
    );
    Ok(clip)
}

/// Parse an avatar clip from a TOML string.
pub fn load_clip_from_str(content: &str, path: &Path) -> Result<AvatarClip> {
    let clip: AvatarClip = toml::from_str(content).map_err(|e| {
        KeystormError::AnimationError(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    validate_clip(&clip)?;
    Ok(clip)
}

/// Structural checks that don't need a skeleton
pub fn validate_clip(clip: &AvatarClip) -> Result<()> {
    if !(clip.duration.is_finite() && clip.duration > 0.0) {
        return Err(KeystormError::AnimationError(format!(
            "Clip '{}' has non-positive duration: {}",
            clip.name, clip.duration
        )));
    }

    for (i, track) in clip.tracks.iter().enumerate() {
        if track.keyframes.is_empty() {
            return Err(KeystormError::AnimationError(format!(
                "Clip '{}' track {} has no keyframes",
                clip.name, i
            )));
        }
        if track.keyframes.windows(2).any(|w| w[1].time < w[0].time) {
            return Err(KeystormError::AnimationError(format!(
                "Clip '{}' track {} keyframes are not sorted by time",
                clip.name, i
            )));
        }
    }

    if clip.expressions.windows(2).any(|w| w[1].time < w[0].time) {
        return Err(KeystormError::AnimationError(format!(
            "Clip '{}' expression keys are not sorted by time",
            clip.name
        )));
    }
    Ok(())
}

/// Reject clips whose tracks reference bones outside `skeleton`
pub fn validate_clip_bones(clip: &AvatarClip, skeleton: &Skeleton) -> Result<()> {
    for track in &clip.tracks {
        skeleton.check_bone(track.bone)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAVE: &str = r#"
name = "wave"
duration = 1.0

[[tracks]]
bone = 1

[[tracks.keyframes]]
time = 0.0

[[tracks.keyframes]]
time = 1.0
rotation = [0.0, 0.7071, 0.0, 0.7071]
translation = [0.0, 1.0, 0.0]

[[expressions]]
time = 0.25
mouth = 2
left_eye = 1
"#;

    #[test]
    fn parse_minimal_clip() {
        let clip = load_clip_from_str(WAVE, &PathBuf::from("wave.anim.toml")).unwrap();
        assert_eq!(clip.name, "wave");
        assert_eq!(clip.duration, 1.0);
        assert_eq!(clip.tracks.len(), 1);
        assert_eq!(clip.tracks[0].keyframes.len(), 2);
        assert_eq!(clip.tracks[0].keyframes[0].rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(clip.expressions[0].expression.mouth, 2);
        assert_eq!(clip.expressions[0].expression.left_eye, 1);
        assert_eq!(clip.expressions[0].expression.right_eye, 0);
    }

    #[test]
    fn reject_zero_duration() {
        let toml_str = r#"
name = "bad"
duration = 0.0
"#;
        let result = load_clip_from_str(toml_str, &PathBuf::from("bad.anim.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn reject_empty_track() {
        let toml_str = r#"
name = "empty_track"
duration = 1.0

[[tracks]]
bone = 0
keyframes = []
"#;
        let result = load_clip_from_str(toml_str, &PathBuf::from("empty.anim.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn reject_unsorted_keyframes() {
        let toml_str = r#"
name = "unsorted"
duration = 1.0

[[tracks]]
bone = 0

[[tracks.keyframes]]
time = 0.5

[[tracks.keyframes]]
time = 0.1
"#;
        let result = load_clip_from_str(toml_str, &PathBuf::from("unsorted.anim.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn reject_bones_outside_skeleton() {
        let clip = load_clip_from_str(WAVE, &PathBuf::from("wave.anim.toml")).unwrap();
        let small = Skeleton::new(vec![None]).unwrap();
        assert!(validate_clip_bones(&clip, &small).is_err());
        let big = Skeleton::new(vec![None, Some(0)]).unwrap();
        assert!(validate_clip_bones(&clip, &big).is_ok());
    }

    #[test]
    fn directory_assets_load_by_key() {
        let dir = std::env::temp_dir().join(format!(
            "keystorm_clip_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("wave.anim.toml"), WAVE).unwrap();

        let assets = DirectoryAssets::new(&dir);
        let clip = assets.load_clip("wave").unwrap();
        assert_eq!(clip.name, "wave");

        assert!(matches!(
            assets.load_clip("missing"),
            Err(KeystormError::AssetNotFound(_))
        ));
        assert!(matches!(
            assets.load_clip("../wave"),
            Err(KeystormError::AssetNotFound(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
