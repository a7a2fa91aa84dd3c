//! Timed camera effects
//!
//! Every effect captures the camera it starts from, then each tick computes
//! a normalized step in [0, 1] from its clock and writes
//! `start - step * (start - destination)` into the camera. The step is
//! linear and clamped, so an effect never overshoots its destination.

use glam::{Quat, Vec3};
use keystorm_core::{finite_ratio, Camera};

/// Remaining time, in seconds, that still counts as done.
///
/// Frame deltas summed in floating point fall just short of round
/// durations (ten 0.1 s frames sum to 0.9999999999999999).
const FINISH_TOLERANCE: f64 = 1e-9;

/// Elapsed/remaining bookkeeping shared by all effects
#[derive(Debug, Clone, PartialEq)]
pub struct EffectClock {
    duration: f64,
    elapsed: f64,
    running: bool,
    finished: bool,
}

impl EffectClock {
    /// Negative or non-finite durations count as zero (complete on the first tick)
    pub fn new(duration: f64) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        Self {
            duration,
            elapsed: 0.0,
            running: false,
            finished: false,
        }
    }

    /// Accumulate `dt` seconds and return the normalized step.
    ///
    /// The clock finishes, and stops running, once no time remains.
    pub fn advance(&mut self, dt: f64) -> f32 {
        if !self.finished {
            self.running = true;
            self.elapsed += if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            if self.remaining() <= FINISH_TOLERANCE {
                self.finished = true;
                self.running = false;
            }
        }
        self.step()
    }

    /// (duration - remaining) / duration, clamped; a zero duration yields 1
    pub fn step(&self) -> f32 {
        if self.finished {
            return 1.0;
        }
        finite_ratio(self.duration - self.remaining(), self.duration)
            .unwrap_or(1.0)
            .clamp(0.0, 1.0) as f32
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.running = false;
        self.finished = false;
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        self.duration - self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Where a move or point effect ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destination {
    /// An absolute world position
    To(Vec3),
    /// An offset from wherever the camera starts
    By(Vec3),
}

impl Destination {
    fn resolve(self, start: Vec3) -> Vec3 {
        match self {
            Destination::To(target) => target,
            Destination::By(offset) => start + offset,
        }
    }
}

/// The camera state an effect starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraStart {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub field_of_view: f32,
}

impl CameraStart {
    pub fn capture(camera: &Camera) -> Self {
        Self {
            position: camera.position,
            look_at: camera.look_at,
            up: camera.up,
            field_of_view: camera.field_of_view(),
        }
    }
}

/// What an effect does to the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Move the camera position
    Move { destination: Destination },
    /// Move the look-at point
    Point { destination: Destination },
    /// Orbit the position around the look-at point, about the up axis
    Rotate { degrees: f32 },
    /// Turn the look-at point around the position, about the up axis
    Swivel { degrees: f32 },
    /// Dolly `distance` along the view direction and narrow the field of view by `fov_expansion`
    Zoom { distance: f32, fov_expansion: f32 },
    /// Dolly `distance` towards the look-at point (negative backs away) while
    /// adjusting the field of view so the subject keeps its framed size
    ContraZoom { distance: f32 },
}

impl EffectKind {
    /// Effects that change the field of view and need a new projection every tick
    pub fn is_zoom(&self) -> bool {
        matches!(self, EffectKind::Zoom { .. } | EffectKind::ContraZoom { .. })
    }

    fn apply(&self, step: f32, start: &CameraStart, camera: &mut Camera) {
        match *self {
            EffectKind::Move { destination } => {
                camera.position = approach(start.position, destination.resolve(start.position), step);
            }
            EffectKind::Point { destination } => {
                camera.look_at = approach(start.look_at, destination.resolve(start.look_at), step);
            }
            EffectKind::Rotate { degrees } => {
                let spin = Quat::from_axis_angle(up_axis(start), (degrees * step).to_radians());
                camera.position = start.look_at + spin * (start.position - start.look_at);
            }
            EffectKind::Swivel { degrees } => {
                let spin = Quat::from_axis_angle(up_axis(start), (degrees * step).to_radians());
                camera.look_at = start.position + spin * (start.look_at - start.position);
            }
            EffectKind::Zoom {
                distance,
                fov_expansion,
            } => {
                let direction = (start.look_at - start.position).normalize_or_zero();
                let end = start.position + direction * distance;
                camera.position = approach(start.position, end, step);
                camera.set_field_of_view(approach_scalar(
                    start.field_of_view,
                    start.field_of_view - fov_expansion,
                    step,
                ));
            }
            EffectKind::ContraZoom { distance } => {
                let offset = start.look_at - start.position;
                let start_distance = offset.length();
                if start_distance <= f32::EPSILON {
                    return;
                }
                let direction = offset / start_distance;
                let current = (start_distance - distance * step).max(MIN_CONTRA_ZOOM_DISTANCE);
                camera.position = start.look_at - direction * current;

                // Keep 2 * d * tan(fov / 2) constant
                let half = (start.field_of_view.to_radians() / 2.0).tan();
                let fov = 2.0 * (half * start_distance / current).atan();
                camera.set_field_of_view(fov.to_degrees());
            }
        }

        camera.update_view();
        if self.is_zoom() {
            camera.update_projection();
        }
    }
}

/// Closest the contra-zoom gets to its subject
const MIN_CONTRA_ZOOM_DISTANCE: f32 = 0.01;

fn up_axis(start: &CameraStart) -> Vec3 {
    start.up.try_normalize().unwrap_or(Vec3::Y)
}

/// `start - step * (start - end)`, landing exactly on `end` at step 1
fn approach(start: Vec3, end: Vec3, step: f32) -> Vec3 {
    if step >= 1.0 {
        end
    } else {
        start - (start - end) * step
    }
}

fn approach_scalar(start: f32, end: f32, step: f32) -> f32 {
    if step >= 1.0 {
        end
    } else {
        start - (start - end) * step
    }
}

/// One timed camera motion
#[derive(Debug, Clone, PartialEq)]
pub struct CinematicEffect {
    kind: EffectKind,
    clock: EffectClock,
    /// Captured on the first update, or by `reset`
    start: Option<CameraStart>,
}

impl CinematicEffect {
    /// `duration` in seconds
    pub fn new(kind: EffectKind, duration: f64) -> Self {
        Self {
            kind,
            clock: EffectClock::new(duration),
            start: None,
        }
    }

    pub fn move_to(duration: f64, position: Vec3) -> Self {
        Self::new(
            EffectKind::Move {
                destination: Destination::To(position),
            },
            duration,
        )
    }

    pub fn move_by(duration: f64, offset: Vec3) -> Self {
        Self::new(
            EffectKind::Move {
                destination: Destination::By(offset),
            },
            duration,
        )
    }

    pub fn point_at(duration: f64, look_at: Vec3) -> Self {
        Self::new(
            EffectKind::Point {
                destination: Destination::To(look_at),
            },
            duration,
        )
    }

    pub fn point_by(duration: f64, offset: Vec3) -> Self {
        Self::new(
            EffectKind::Point {
                destination: Destination::By(offset),
            },
            duration,
        )
    }

    pub fn rotate(duration: f64, degrees: f32) -> Self {
        Self::new(EffectKind::Rotate { degrees }, duration)
    }

    pub fn swivel(duration: f64, degrees: f32) -> Self {
        Self::new(EffectKind::Swivel { degrees }, duration)
    }

    pub fn zoom(duration: f64, distance: f32, fov_expansion: f32) -> Self {
        Self::new(
            EffectKind::Zoom {
                distance,
                fov_expansion,
            },
            duration,
        )
    }

    pub fn contra_zoom(duration: f64, distance: f32) -> Self {
        Self::new(EffectKind::ContraZoom { distance }, duration)
    }

    /// Advance by `dt` seconds and write the new camera state.
    ///
    /// The first update captures the camera as the starting point. A
    /// finished effect leaves the camera alone.
    pub fn update(&mut self, dt: f64, camera: &mut Camera) {
        if self.clock.is_finished() {
            return;
        }
        let start = *self
            .start
            .get_or_insert_with(|| CameraStart::capture(camera));
        let step = self.clock.advance(dt);
        self.kind.apply(step, &start, camera);
    }

    /// Recapture the camera as the new starting point and zero the clock
    pub fn reset(&mut self, camera: &Camera) {
        self.clock.reset();
        self.start = Some(CameraStart::capture(camera));
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    pub fn clock(&self) -> &EffectClock {
        &self.clock
    }

    pub fn start(&self) -> Option<&CameraStart> {
        self.start.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }
}
