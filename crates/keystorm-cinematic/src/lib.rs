//! Cinematic camera control for the Keystorm engine
//!
//! - `CinematicEffect`: one timed camera motion (move, point, rotate, swivel, zoom, contra-zoom)
//! - `CinematicSequencer`: plays effects in order, optionally looping
//! - `CinematicDirector`: the per-scene runtime system that drives the frame camera

pub mod director;
pub mod effect;
pub mod sequencer;

pub use director::CinematicDirector;
pub use effect::{CameraStart, CinematicEffect, Destination, EffectClock, EffectKind};
pub use sequencer::{CinematicSequencer, SequencerState};
