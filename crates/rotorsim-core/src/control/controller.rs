//! Flight-controller interface
//!
//! A controller reads a state snapshot and the current demand and produces
//! the next actuator command. It never mutates the dynamics; the only
//! state it carries is its own PID/mixer memory. The scheduler hosts any
//! implementation behind this one interface, native or foreign.

use thiserror::Error;

use crate::control::demand::ControlDemand;
use crate::dynamics::{ActuatorCommand, VehicleState};

/// Controller faults
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    #[error("controller produced non-finite actuator values")]
    NonFinite,
}

/// Pluggable control strategy
///
/// Implementations must be deterministic given their own memory plus the
/// inputs, so a run can be replayed step for step.
pub trait FlightController: Send {
    /// Number of actuator values this controller produces
    fn actuator_count(&self) -> usize;

    /// Clear internal PID/mixer memory
    fn reset(&mut self);

    /// Produce the next actuator command
    fn compute(
        &mut self,
        state: &VehicleState,
        demand: &ControlDemand,
        dt: f64,
    ) -> Result<ActuatorCommand, ControlError>;
}
