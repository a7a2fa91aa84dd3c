//! Keystorm Core - Foundational types for the Keystorm avatar engine
//!
//! This crate provides the types that all other Keystorm crates depend on:
//! - `Camera` - The shared scene camera driven by cinematic effects
//! - `KeystormConfig` - Layered TOML configuration
//! - `finite_ratio` - Guarded division for progress ratios
//! - Error types and Result alias

mod camera;
mod config;
mod error;
mod numeric;

pub use camera::{Camera, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW};
pub use config::{AnimationConfig, CameraConfig, KeystormConfig};
pub use error::{KeystormError, Result};
pub use numeric::{finite_ratio, finite_ratio_f32};

pub use glam::{Mat4, Quat, Vec3};
