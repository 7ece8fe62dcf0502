//! Mathematical utilities for rotorsim
//!
//! Implements the Euler-angle frame rotation used by the dynamics
//! integrator and small conversion helpers for rotor speeds.

pub mod euler;

pub use euler::*;
