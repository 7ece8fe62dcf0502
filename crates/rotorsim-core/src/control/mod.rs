//! Control algorithms for rotorsim
//!
//! Implements the pluggable flight-controller layer:
//! - Receiver/joystick demand type
//! - The [`FlightController`] strategy interface
//! - Altitude-hold cascade (climb-rate PI with target capture)
//! - The native stabilizer (rate damping + altitude hold + quad-X mixer)

pub mod demand;
pub mod controller;
pub mod alt_hold;
pub mod stabilizer;

pub use demand::*;
pub use controller::*;
pub use alt_hold::*;
pub use stabilizer::*;
