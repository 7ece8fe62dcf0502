//! Simulation environment
//!
//! Fixed-step, single-threaded simulation of one vehicle: serde
//! configuration records plus the runner that couples the integrator with
//! a flight controller and records the trajectory.

pub mod config;
pub mod simulator;

pub use config::*;
pub use simulator::*;
