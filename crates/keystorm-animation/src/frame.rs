//! Per-bone rigid transforms and the facial expression that accompanies them

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid transform for one bone: rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Compose into a matrix: rotation first, then translation
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    /// Interpolate two transforms: slerp for rotation, lerp for translation.
    ///
    /// Interpolating the parts separately keeps the result rigid; lerping the
    /// composed matrices would shear and scale the bone mid-blend.
    pub fn interpolate(a: &BoneTransform, b: &BoneTransform, t: f32) -> BoneTransform {
        if t <= 0.0 {
            return *a;
        }
        if t >= 1.0 {
            return *b;
        }
        BoneTransform {
            rotation: slerp(a.rotation, b.rotation, t),
            translation: a.translation.lerp(b.translation, t),
        }
    }
}

/// Shortest-path slerp that always returns a unit quaternion
pub(crate) fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
    let q = a.slerp(b, t);
    if q.is_finite() && q.length_squared() > 1e-12 {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}

/// Facial expression token: indices into the host's eye, eyebrow and mouth tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Expression {
    #[serde(default)]
    pub left_eye: u8,
    #[serde(default)]
    pub right_eye: u8,
    #[serde(default)]
    pub left_eyebrow: u8,
    #[serde(default)]
    pub right_eyebrow: u8,
    #[serde(default)]
    pub mouth: u8,
}

impl Expression {
    pub const NEUTRAL: Self = Self {
        left_eye: 0,
        right_eye: 0,
        left_eyebrow: 0,
        right_eyebrow: 0,
        mouth: 0,
    };
}

/// One transform per skeleton bone, indexed like the skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct BoneTransformFrame {
    transforms: Vec<BoneTransform>,
}

impl BoneTransformFrame {
    /// A frame with every bone at the identity transform
    pub fn identity(bone_count: usize) -> Self {
        Self {
            transforms: vec![BoneTransform::IDENTITY; bone_count],
        }
    }

    pub fn bone_count(&self) -> usize {
        self.transforms.len()
    }

    pub fn get(&self, bone: usize) -> Option<&BoneTransform> {
        self.transforms.get(bone)
    }

    /// Overwrite one bone. Out-of-range indices are ignored.
    pub fn set(&mut self, bone: usize, transform: BoneTransform) {
        if let Some(slot) = self.transforms.get_mut(bone) {
            *slot = transform;
        }
    }

    pub fn transforms(&self) -> &[BoneTransform] {
        &self.transforms
    }

    pub fn transforms_mut(&mut self) -> &mut [BoneTransform] {
        &mut self.transforms
    }

    /// Reset every bone to identity
    pub fn reset(&mut self) {
        self.transforms.fill(BoneTransform::IDENTITY);
    }

    /// Copy another frame's transforms into this one, bone by bone
    pub fn copy_from(&mut self, other: &BoneTransformFrame) {
        let count = self.transforms.len().min(other.transforms.len());
        self.transforms[..count].copy_from_slice(&other.transforms[..count]);
    }

    /// Write the composed matrix of every bone into `out`, resizing it to fit
    pub fn write_matrices(&self, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(self.transforms.iter().map(BoneTransform::to_matrix));
    }

    pub fn to_matrices(&self) -> Vec<Mat4> {
        let mut out = Vec::with_capacity(self.transforms.len());
        self.write_matrices(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_produces_identity_matrix() {
        assert_eq!(BoneTransform::IDENTITY.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_rotates_then_translates() {
        let t = BoneTransform::new(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 0.0, 5.0),
        );
        // +X rotated 90 degrees about Y lands on -Z, then translation applies
        let p = t.to_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn interpolate_endpoints_are_exact() {
        let a = BoneTransform::new(Quat::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
        let b = BoneTransform::new(Quat::from_rotation_x(1.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(BoneTransform::interpolate(&a, &b, 0.0), a);
        assert_eq!(BoneTransform::interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn interpolate_midpoint() {
        let angle = std::f32::consts::FRAC_PI_2;
        let a = BoneTransform::new(Quat::IDENTITY, Vec3::ZERO);
        let b = BoneTransform::new(Quat::from_rotation_y(angle), Vec3::new(10.0, 0.0, 0.0));
        let mid = BoneTransform::interpolate(&a, &b, 0.5);
        assert!((mid.translation.x - 5.0).abs() < 1e-5);
        let expected = Quat::from_rotation_y(angle / 2.0);
        assert!(mid.rotation.dot(expected).abs() > 0.9999);
        assert!((mid.rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn slerp_takes_shortest_path() {
        let a = Quat::IDENTITY;
        let neg_a = Quat::from_xyzw(0.0, 0.0, 0.0, -1.0);
        let r = slerp(a, neg_a, 0.5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((r.w.abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn frame_set_ignores_out_of_range() {
        let mut frame = BoneTransformFrame::identity(2);
        frame.set(5, BoneTransform::new(Quat::IDENTITY, Vec3::ONE));
        assert_eq!(frame, BoneTransformFrame::identity(2));
    }

    #[test]
    fn frame_matrices_follow_bone_order() {
        let mut frame = BoneTransformFrame::identity(3);
        frame.set(1, BoneTransform::new(Quat::IDENTITY, Vec3::new(0.0, 1.0, 0.0)));
        let m = frame.to_matrices();
        assert_eq!(m.len(), 3);
        assert_eq!(m[0], Mat4::IDENTITY);
        assert!((m[1].w_axis.y - 1.0).abs() < 1e-6);
    }
}
