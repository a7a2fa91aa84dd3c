//! Keystorm Runtime - Frame loop infrastructure
//!
//! Provides the building blocks the host frame loop drives:
//! - `GameClock`: per-frame delta time with a frame-time clamp
//! - `FrameContext`: explicit per-scene state (the active camera) handed to systems
//! - `RuntimeSystem`: trait for systems ticked once per frame

mod clock;
mod context;
mod system;

pub use clock::{GameClock, MAX_FRAME_TIME};
pub use context::FrameContext;
pub use system::{RuntimeSystem, SystemRunner};
