//! Scene-level control of the camera sequencer

use crate::effect::CinematicEffect;
use crate::sequencer::CinematicSequencer;
use glam::Vec3;
use keystorm_core::Result;
use keystorm_runtime::{FrameContext, RuntimeSystem};

/// Drives the frame context's camera from a sequencer.
///
/// The single-shot actions (`move_to`, `rotate`, ...) only take effect when
/// no effect is running, and report whether they were accepted. `queue`
/// always appends.
#[derive(Debug, Clone, Default)]
pub struct CinematicDirector {
    sequencer: CinematicSequencer,
}

impl CinematicDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequencer(&self) -> &CinematicSequencer {
        &self.sequencer
    }

    /// True while an effect is driving the camera
    pub fn is_busy(&self) -> bool {
        !self.sequencer.is_idle()
    }

    fn start(&mut self, effect: CinematicEffect) -> bool {
        if self.is_busy() {
            log::debug!("camera busy, ignoring {:?}", effect.kind());
            return false;
        }
        self.sequencer.add_effect(effect);
        true
    }

    /// Append an effect after whatever is already queued
    pub fn queue(&mut self, effect: CinematicEffect) {
        self.sequencer.add_effect(effect);
    }

    pub fn move_to(&mut self, duration: f64, position: Vec3) -> bool {
        self.start(CinematicEffect::move_to(duration, position))
    }

    pub fn move_by(&mut self, duration: f64, offset: Vec3) -> bool {
        self.start(CinematicEffect::move_by(duration, offset))
    }

    pub fn point_at(&mut self, duration: f64, look_at: Vec3) -> bool {
        self.start(CinematicEffect::point_at(duration, look_at))
    }

    pub fn point_by(&mut self, duration: f64, offset: Vec3) -> bool {
        self.start(CinematicEffect::point_by(duration, offset))
    }

    pub fn rotate(&mut self, duration: f64, degrees: f32) -> bool {
        self.start(CinematicEffect::rotate(duration, degrees))
    }

    pub fn swivel(&mut self, duration: f64, degrees: f32) -> bool {
        self.start(CinematicEffect::swivel(duration, degrees))
    }

    pub fn zoom(&mut self, duration: f64, distance: f32, fov_expansion: f32) -> bool {
        self.start(CinematicEffect::zoom(duration, distance, fov_expansion))
    }

    pub fn contra_zoom(&mut self, duration: f64, distance: f32) -> bool {
        self.start(CinematicEffect::contra_zoom(duration, distance))
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.sequencer.set_looping(looping);
    }

    /// Stop and drop every queued effect
    pub fn clear(&mut self) {
        self.sequencer.clear();
    }
}

impl RuntimeSystem for CinematicDirector {
    fn initialize(&mut self, _ctx: &mut FrameContext) -> Result<()> {
        log::info!("cinematic director initialized");
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameContext, dt: f64) -> Result<()> {
        self.sequencer.update(dt, &mut ctx.camera);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.sequencer.clear();
        log::info!("cinematic director shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "cinematic_director"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystorm_core::Camera;
    use keystorm_runtime::SystemRunner;

    fn context() -> FrameContext {
        FrameContext::new(Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 45.0))
    }

    #[test]
    fn actions_are_rejected_while_busy() {
        let mut ctx = context();
        let mut director = CinematicDirector::new();
        assert!(director.move_to(1.0, Vec3::new(0.0, 0.0, 5.0)));
        assert!(!director.rotate(1.0, 90.0));
        assert!(director.is_busy());
        assert_eq!(director.sequencer().len(), 1);

        director.update(&mut ctx, 1.0).unwrap();
        assert_eq!(ctx.camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert!(!director.is_busy());
        assert!(director.zoom(1.0, 0.0, 10.0));
    }

    #[test]
    fn queue_always_appends() {
        let mut ctx = context();
        let mut director = CinematicDirector::new();
        director.queue(CinematicEffect::point_at(0.5, Vec3::X));
        director.queue(CinematicEffect::point_by(0.5, Vec3::Y));
        assert_eq!(director.sequencer().len(), 2);

        director.update(&mut ctx, 0.5).unwrap();
        director.update(&mut ctx, 0.5).unwrap();
        assert_eq!(ctx.camera.look_at, Vec3::new(1.0, 1.0, 0.0));
        assert!(!director.is_busy());
    }

    #[test]
    fn drives_frame_context_camera() {
        let mut runner = SystemRunner::new(context());
        let mut director = CinematicDirector::new();
        director.set_looping(true);
        director.queue(CinematicEffect::swivel(0.2, 90.0));
        runner.add_system(Box::new(director)).unwrap();

        let start = runner.context.camera.look_at;
        runner.step(0.1).unwrap();
        assert_ne!(runner.context.camera.look_at, start);
        runner.shutdown().unwrap();
    }

    #[test]
    fn clear_stops_camera() {
        let mut ctx = context();
        let mut director = CinematicDirector::new();
        director.contra_zoom(1.0, 2.0);
        director.update(&mut ctx, 0.5).unwrap();
        director.clear();
        let position = ctx.camera.position;
        director.update(&mut ctx, 0.5).unwrap();
        assert_eq!(ctx.camera.position, position);
        assert!(!director.is_busy());
    }
}
