//! Scene camera shared by the avatar scene and cinematic effects

use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

/// Narrowest field of view the camera accepts, in degrees
pub const MIN_FIELD_OF_VIEW: f32 = 0.5;
/// Widest field of view the camera accepts, in degrees
pub const MAX_FIELD_OF_VIEW: f32 = 120.0;

/// Squared sine below which the view direction counts as parallel to up
const PARALLEL_EPSILON: f32 = 1e-6;

/// A perspective camera with a cached view and projection matrix.
///
/// Effects mutate `position`, `look_at` and the field of view, then call
/// `update_view()` / `update_projection()` so render code can read the
/// matrices once per frame without recomputing them.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Field of view in degrees, always within [MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW]
    field_of_view: f32,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new(position: Vec3, look_at: Vec3, field_of_view: f32) -> Self {
        let mut camera = Self {
            position,
            look_at,
            ..Self::default()
        };
        camera.set_field_of_view(field_of_view);
        camera.update_view();
        camera.update_projection();
        camera
    }

    /// Build a camera from the `[camera]` config section
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            look_at: Vec3::from_array(config.look_at),
            up: Vec3::Y,
            near: config.near,
            far: config.far,
            aspect: config.aspect,
            field_of_view: config
                .field_of_view
                .clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_view();
        camera.update_projection();
        camera
    }

    /// Field of view in degrees
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Set the field of view in degrees, clamped to [0.5, 120].
    ///
    /// The projection matrix is not recomputed; call `update_projection()`.
    pub fn set_field_of_view(&mut self, degrees: f32) {
        if degrees.is_nan() {
            return;
        }
        self.field_of_view = degrees.clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW);
    }

    /// Recompute the view matrix from position, look-at and up.
    ///
    /// When the view direction is parallel to `up` (overhead shots) a
    /// substitute up axis is used for this matrix; `up` itself is untouched.
    pub fn update_view(&mut self) {
        let forward = self.look_at - self.position;
        // A degenerate eye == target would produce NaNs; keep the last good matrix
        if forward.length_squared() < f32::EPSILON {
            return;
        }
        let forward = forward.normalize();
        let Some(up) = [self.up, Vec3::Z, Vec3::X]
            .into_iter()
            .find(|axis| forward.cross(*axis).length_squared() > PARALLEL_EPSILON)
        else {
            return;
        };
        self.view = Mat4::look_at_rh(self.position, self.look_at, up);
    }

    /// Recompute the projection matrix from the field of view and clip planes
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.field_of_view.to_radians(),
            self.aspect.max(0.0001),
            self.near,
            self.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Unit vector from the position towards the look-at point
    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or_zero()
    }

    /// Distance between the position and the look-at point
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.look_at)
    }
}
