//! Dynamics models for rotorsim
//!
//! Implements the multirotor rigid-body model:
//! - Vehicle state (12 scalars plus the airborne latch)
//! - Per-airframe physical parameters
//! - Airframe force models (rotor geometry tables)
//! - Forward-Euler state integrator

pub mod state;
pub mod params;
pub mod frame;
pub mod rigid_body;

pub use state::*;
pub use params::*;
pub use frame::*;
pub use rigid_body::*;
