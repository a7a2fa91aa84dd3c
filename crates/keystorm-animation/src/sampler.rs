//! Clip sampling: slerp for rotations, lerp for translations

use crate::clip::{AvatarClip, BoneKeyframe, BoneTrack};
use crate::frame::{slerp, BoneTransform, BoneTransformFrame, Expression};
use glam::{Quat, Vec3};

/// Sample every track of `clip` at `time` into `frame`.
///
/// Bones without a track are reset to identity. Tracks that reference bones
/// outside the frame are skipped.
pub fn sample_clip(clip: &AvatarClip, time: f64, frame: &mut BoneTransformFrame) {
    frame.reset();
    for track in &clip.tracks {
        if let Some(transform) = sample_bone_track(track, time) {
            frame.set(track.bone, transform);
        }
    }
}

/// Sample one track at `time`, clamping before the first and after the last keyframe
pub fn sample_bone_track(track: &BoneTrack, time: f64) -> Option<BoneTransform> {
    let keyframes = &track.keyframes;
    let first = keyframes.first()?;
    let last = keyframes.last()?;

    if time <= first.time {
        return Some(keyframe_transform(first));
    }
    if time >= last.time {
        return Some(keyframe_transform(last));
    }

    // First keyframe strictly after `time`; the clamps above keep it in 1..len
    let idx = keyframes.partition_point(|kf| kf.time <= time);
    let prev = &keyframes[idx - 1];
    let next = &keyframes[idx];

    let span = next.time - prev.time;
    if span <= 0.0 {
        return Some(keyframe_transform(prev));
    }
    let t = ((time - prev.time) / span) as f32;

    let a = keyframe_transform(prev);
    let b = keyframe_transform(next);
    Some(BoneTransform {
        rotation: slerp(a.rotation, b.rotation, t),
        translation: a.translation.lerp(b.translation, t),
    })
}

/// The expression in effect at `time`: the last key at or before it
pub fn expression_at(clip: &AvatarClip, time: f64) -> Expression {
    let idx = clip.expressions.partition_point(|key| key.time <= time);
    match idx {
        0 => clip
            .expressions
            .first()
            .map(|key| key.expression)
            .unwrap_or(Expression::NEUTRAL),
        _ => clip.expressions[idx - 1].expression,
    }
}

fn keyframe_transform(kf: &BoneKeyframe) -> BoneTransform {
    let rotation = Quat::from_array(kf.rotation);
    let rotation = if rotation.is_finite() && rotation.length_squared() > 1e-12 {
        rotation.normalize()
    } else {
        Quat::IDENTITY
    };
    BoneTransform {
        rotation,
        translation: Vec3::from_array(kf.translation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ExpressionKey;

    fn key(time: f64, rotation: Quat, translation: [f32; 3]) -> BoneKeyframe {
        BoneKeyframe {
            time,
            rotation: rotation.to_array(),
            translation,
        }
    }

    fn wave_clip() -> AvatarClip {
        AvatarClip {
            name: "wave".into(),
            duration: 2.0,
            tracks: vec![BoneTrack {
                bone: 1,
                keyframes: vec![
                    key(0.0, Quat::IDENTITY, [0.0, 0.0, 0.0]),
                    key(2.0, Quat::from_rotation_z(1.0), [4.0, 6.0, 8.0]),
                ],
            }],
            expressions: vec![
                ExpressionKey {
                    time: 0.5,
                    expression: Expression {
                        mouth: 3,
                        ..Expression::NEUTRAL
                    },
                },
                ExpressionKey {
                    time: 1.5,
                    expression: Expression {
                        mouth: 7,
                        ..Expression::NEUTRAL
                    },
                },
            ],
        }
    }

    #[test]
    fn sample_translation_linear() {
        let clip = wave_clip();
        let t = sample_bone_track(&clip.tracks[0], 1.0).unwrap();
        assert!((t.translation - Vec3::new(2.0, 3.0, 4.0)).length() < 1e-4);
        assert!(t.rotation.dot(Quat::from_rotation_z(0.5)).abs() > 0.9999);
    }

    #[test]
    fn sample_clamps_outside_keys() {
        let clip = wave_clip();
        let before = sample_bone_track(&clip.tracks[0], -1.0).unwrap();
        assert_eq!(before.translation, Vec3::ZERO);
        let after = sample_bone_track(&clip.tracks[0], 5.0).unwrap();
        assert_eq!(after.translation, Vec3::new(4.0, 6.0, 8.0));
    }

    #[test]
    fn untracked_bones_are_identity() {
        let clip = wave_clip();
        let mut frame = BoneTransformFrame::identity(3);
        frame.set(0, BoneTransform::new(Quat::IDENTITY, Vec3::ONE));
        sample_clip(&clip, 2.0, &mut frame);
        assert_eq!(frame.get(0), Some(&BoneTransform::IDENTITY));
        assert_eq!(frame.get(2), Some(&BoneTransform::IDENTITY));
        assert_eq!(frame.get(1).unwrap().translation, Vec3::new(4.0, 6.0, 8.0));
    }

    #[test]
    fn out_of_range_track_is_skipped() {
        let mut clip = wave_clip();
        clip.tracks[0].bone = 10;
        let mut frame = BoneTransformFrame::identity(3);
        sample_clip(&clip, 1.0, &mut frame);
        assert_eq!(frame, BoneTransformFrame::identity(3));
    }

    #[test]
    fn degenerate_rotation_falls_back_to_identity() {
        let track = BoneTrack {
            bone: 0,
            keyframes: vec![BoneKeyframe {
                time: 0.0,
                rotation: [0.0; 4],
                translation: [0.0; 3],
            }],
        };
        let t = sample_bone_track(&track, 0.0).unwrap();
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn empty_track_samples_nothing() {
        let track = BoneTrack {
            bone: 0,
            keyframes: vec![],
        };
        assert!(sample_bone_track(&track, 0.0).is_none());
    }

    #[test]
    fn expression_holds_until_next_key() {
        let clip = wave_clip();
        assert_eq!(expression_at(&clip, 0.0).mouth, 3);
        assert_eq!(expression_at(&clip, 1.0).mouth, 3);
        assert_eq!(expression_at(&clip, 1.5).mouth, 7);
        assert_eq!(expression_at(&clip, 9.0).mouth, 7);
        assert_eq!(expression_at(&AvatarClip::empty("x", 1.0), 0.5), Expression::NEUTRAL);
    }
}
