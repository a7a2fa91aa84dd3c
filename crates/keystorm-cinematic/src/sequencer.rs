//! Ordered playback of camera effects

use crate::effect::CinematicEffect;
use keystorm_core::Camera;

/// Observable sequencer state.
///
/// Advancing to the next effect happens inside `update`, in the same tick
/// the active effect finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No effect is active
    Idle,
    /// An effect is driving the camera
    Running,
}

/// Plays effects one at a time, in insertion order.
///
/// Non-looping sequences consume each effect once it finishes. Looping
/// sequences keep every effect and cycle back to the first after the last.
/// An effect is reset, recapturing the camera it starts from, every time it
/// becomes active.
#[derive(Debug, Clone, Default)]
pub struct CinematicSequencer {
    effects: Vec<CinematicEffect>,
    current: Option<usize>,
    looping: bool,
}

impl CinematicSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect. It becomes active right away if nothing else is.
    pub fn add_effect(&mut self, effect: CinematicEffect) {
        self.effects.push(effect);
        if self.current.is_none() {
            self.current = Some(self.effects.len() - 1);
        }
    }

    /// Tick the active effect by `dt` seconds and advance when it finishes
    pub fn update(&mut self, dt: f64, camera: &mut Camera) {
        let Some(index) = self.current else {
            return;
        };
        let Some(effect) = self.effects.get_mut(index) else {
            self.current = None;
            return;
        };

        if !effect.is_finished() {
            effect.update(dt, camera);
        }
        if effect.is_finished() {
            self.advance(index, camera);
        }
    }

    fn advance(&mut self, finished: usize, camera: &Camera) {
        let next = if self.looping {
            (finished + 1) % self.effects.len()
        } else {
            self.effects.remove(finished);
            if self.effects.is_empty() {
                log::debug!("cinematic sequence complete");
                self.current = None;
                return;
            }
            0
        };

        self.effects[next].reset(camera);
        self.current = Some(next);
    }

    pub fn state(&self) -> SequencerState {
        match self.current {
            Some(_) => SequencerState::Running,
            None => SequencerState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == SequencerState::Idle
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// The effect currently driving the camera
    pub fn active(&self) -> Option<&CinematicEffect> {
        self.current.and_then(|index| self.effects.get(index))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.current
    }

    pub fn effects(&self) -> &[CinematicEffect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Drop every effect; the camera stays where it is
    pub fn clear(&mut self) {
        self.effects.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 45.0)
    }

    #[test]
    fn plays_effects_in_order_then_idles() {
        let mut camera = camera();
        let mut sequencer = CinematicSequencer::new();
        assert_eq!(sequencer.state(), SequencerState::Idle);

        sequencer.add_effect(CinematicEffect::move_to(1.0, Vec3::new(1.0, 0.0, 10.0)));
        sequencer.add_effect(CinematicEffect::move_to(1.0, Vec3::new(1.0, 1.0, 10.0)));
        sequencer.add_effect(CinematicEffect::zoom(1.0, 0.0, 5.0));
        assert_eq!(sequencer.state(), SequencerState::Running);
        assert_eq!(sequencer.active_index(), Some(0));

        sequencer.update(1.0, &mut camera);
        assert_eq!(camera.position, Vec3::new(1.0, 0.0, 10.0));
        assert_eq!(sequencer.len(), 2);
        assert!(sequencer.active().is_some_and(|e| !e.is_running()));

        sequencer.update(1.0, &mut camera);
        assert_eq!(camera.position, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(sequencer.len(), 1);

        sequencer.update(0.5, &mut camera);
        assert!((camera.field_of_view() - 42.5).abs() < 1e-4);
        assert_eq!(sequencer.state(), SequencerState::Running);

        sequencer.update(0.5, &mut camera);
        assert_eq!(camera.field_of_view(), 40.0);
        assert_eq!(sequencer.state(), SequencerState::Idle);
        assert!(sequencer.is_empty());

        // Idle updates leave the camera alone
        sequencer.update(1.0, &mut camera);
        assert_eq!(camera.field_of_view(), 40.0);
    }

    #[test]
    fn added_effect_starts_when_idle() {
        let mut camera = camera();
        let mut sequencer = CinematicSequencer::new();
        sequencer.add_effect(CinematicEffect::move_by(0.5, Vec3::X));
        sequencer.update(1.0, &mut camera);
        assert!(sequencer.is_idle());

        sequencer.add_effect(CinematicEffect::move_by(0.5, Vec3::X));
        assert_eq!(sequencer.state(), SequencerState::Running);
        sequencer.update(1.0, &mut camera);
        assert_eq!(camera.position, Vec3::new(2.0, 0.0, 10.0));
    }

    #[test]
    fn looping_restarts_from_current_camera() {
        let mut camera = camera();
        let mut sequencer = CinematicSequencer::new();
        sequencer.set_looping(true);
        sequencer.add_effect(CinematicEffect::move_by(1.0, Vec3::X));
        sequencer.add_effect(CinematicEffect::move_by(1.0, Vec3::Y));

        sequencer.update(1.0, &mut camera);
        assert_eq!(sequencer.active_index(), Some(1));
        sequencer.update(1.0, &mut camera);
        assert_eq!(camera.position, Vec3::new(1.0, 1.0, 10.0));

        // Back to the first effect, which recaptured where B left the camera
        assert_eq!(sequencer.active_index(), Some(0));
        let active = sequencer.active().unwrap();
        assert_eq!(active.start().unwrap().position, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(active.clock().elapsed(), 0.0);

        sequencer.update(1.0, &mut camera);
        assert_eq!(camera.position, Vec3::new(2.0, 1.0, 10.0));
        assert_eq!(sequencer.len(), 2);
        assert_eq!(sequencer.state(), SequencerState::Running);
    }

    #[test]
    fn promoted_effect_starts_from_camera_at_promotion() {
        let mut camera = camera();
        let mut sequencer = CinematicSequencer::new();
        sequencer.add_effect(CinematicEffect::move_to(1.0, Vec3::new(3.0, 0.0, 10.0)));
        sequencer.add_effect(CinematicEffect::move_by(1.0, Vec3::Z));

        sequencer.update(1.0, &mut camera);
        let start = sequencer.active().unwrap().start().unwrap();
        assert_eq!(start.position, Vec3::new(3.0, 0.0, 10.0));
    }

    #[test]
    fn advances_on_the_frame_the_effect_ends() {
        let mut camera = camera();
        let mut sequencer = CinematicSequencer::new();
        sequencer.add_effect(CinematicEffect::zoom(1.0, 0.0, 10.0));
        sequencer.add_effect(CinematicEffect::rotate(1.0, 90.0));
        for _ in 0..10 {
            sequencer.update(0.1, &mut camera);
        }
        assert_eq!(sequencer.len(), 1);
        assert!(matches!(
            sequencer.active().map(|e| *e.kind()),
            Some(crate::effect::EffectKind::Rotate { .. })
        ));
    }

    #[test]
    fn clear_drops_everything() {
        let mut sequencer = CinematicSequencer::new();
        sequencer.add_effect(CinematicEffect::rotate(1.0, 45.0));
        sequencer.clear();
        assert!(sequencer.is_idle());
        assert!(sequencer.is_empty());
    }
}
