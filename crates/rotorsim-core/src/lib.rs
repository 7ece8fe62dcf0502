//! # rotorsim Core
//!
//! Multirotor flight-dynamics simulation core.
//!
//! This library implements a rigid-body dynamics integrator for multirotor
//! vehicles together with pluggable per-airframe force models and flight
//! controllers. It is single-threaded and deterministic; real-time hosting
//! lives in the companion `rotorsim-flight` crate.
//!
//! ## Modules
//!
//! - [`math`]: Euler-angle rotation utilities and rotor-speed conversions
//! - [`dynamics`]: Vehicle state, parameters, airframe force models, integrator
//! - [`control`]: Flight-controller interface and the native stabilizer
//! - [`simulation`]: Deterministic fixed-step simulation runner

pub mod math;
pub mod dynamics;
pub mod control;
pub mod simulation;

// Common type aliases
use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Earth gravitational acceleration [m/s²]
pub const GRAVITY: f64 = 9.80665;

/// Gravity vector in NED convention: z-down
pub fn gravity_ned() -> Vec3 {
    Vec3::new(0.0, 0.0, GRAVITY)
}
