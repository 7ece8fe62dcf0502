//! Foreign controller bridge
//!
//! Hosts a control routine behind a C calling convention. The whole
//! exchange is one flat `#[repr(C)]` record passed by value: the demand
//! and state snapshots go in, the motor values come back, and the
//! altitude-hold block rides along both ways so a stateless foreign
//! routine can keep its integrator between calls. Every field is plain
//! `f64`/`bool`, so the record crosses the boundary with no marshalling.

use serde::{Deserialize, Serialize};

use rotorsim_core::control::{ControlDemand, ControlError, FlightController};
use rotorsim_core::dynamics::{ActuatorCommand, VehicleState};

/// Four-axis demand as seen by a foreign routine
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandRecord {
    /// Climb command [-1, 1]
    pub throttle: f64,
    /// Roll command [-1, 1], positive right
    pub roll: f64,
    /// Pitch command [-1, 1], positive nose up
    pub pitch: f64,
    /// Yaw command [-1, 1], positive nose right
    pub yaw: f64,
}

/// Twelve-state snapshot, interleaved as value/derivative pairs
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateRecord {
    /// North position [m]
    pub x: f64,
    /// North velocity [m/s]
    pub dx: f64,
    /// East position [m]
    pub y: f64,
    /// East velocity [m/s]
    pub dy: f64,
    /// Down position [m]
    pub z: f64,
    /// Down velocity [m/s]
    pub dz: f64,
    /// Roll angle [rad]
    pub phi: f64,
    /// Roll rate [rad/s]
    pub dphi: f64,
    /// Pitch angle [rad]
    pub theta: f64,
    /// Pitch rate [rad/s]
    pub dtheta: f64,
    /// Yaw angle [rad]
    pub psi: f64,
    /// Yaw rate [rad/s]
    pub dpsi: f64,
}

/// Altitude-hold memory carried across calls on the routine's behalf
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AltHoldRecord {
    /// Accumulated climb-rate error
    pub error_integral: f64,
    /// True once the vehicle has entered the hold band
    pub in_band: bool,
    /// Captured target altitude [m]
    pub target: f64,
}

/// Four motor values [0, 1] returned by the routine
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorRecord {
    pub m1: f64,
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
}

impl MotorRecord {
    pub fn values(&self) -> [f64; 4] {
        [self.m1, self.m2, self.m3, self.m4]
    }
}

/// The complete exchange record for one control call
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlRecord {
    pub demand: DemandRecord,
    pub state: StateRecord,
    pub alt_hold: AltHoldRecord,
    pub motors: MotorRecord,
}

/// Foreign control routine signature
pub type ControlFn = extern "C" fn(ControlRecord) -> ControlRecord;

impl From<&ControlDemand> for DemandRecord {
    fn from(demand: &ControlDemand) -> Self {
        Self {
            throttle: demand.throttle,
            roll: demand.roll,
            pitch: demand.pitch,
            yaw: demand.yaw,
        }
    }
}

impl From<DemandRecord> for ControlDemand {
    fn from(record: DemandRecord) -> Self {
        Self {
            throttle: record.throttle,
            roll: record.roll,
            pitch: record.pitch,
            yaw: record.yaw,
        }
    }
}

impl From<&VehicleState> for StateRecord {
    fn from(state: &VehicleState) -> Self {
        Self {
            x: state.position.x,
            dx: state.velocity.x,
            y: state.position.y,
            dy: state.velocity.y,
            z: state.position.z,
            dz: state.velocity.z,
            phi: state.attitude.x,
            dphi: state.angular_rate.x,
            theta: state.attitude.y,
            dtheta: state.angular_rate.y,
            psi: state.attitude.z,
            dpsi: state.angular_rate.z,
        }
    }
}

/// Flight controller that defers every decision to a foreign routine
///
/// The routine itself stays stateless across calls; this adapter owns the
/// altitude-hold block, hands it over in the request record and takes
/// whatever came back as the memory for the next call.
pub struct RecordController {
    control_fn: ControlFn,
    alt_hold: AltHoldRecord,
}

impl RecordController {
    pub fn new(control_fn: ControlFn) -> Self {
        Self {
            control_fn,
            alt_hold: AltHoldRecord::default(),
        }
    }
}

impl FlightController for RecordController {
    fn actuator_count(&self) -> usize {
        4
    }

    fn reset(&mut self) {
        self.alt_hold = AltHoldRecord::default();
    }

    fn compute(
        &mut self,
        state: &VehicleState,
        demand: &ControlDemand,
        _dt: f64,
    ) -> Result<ActuatorCommand, ControlError> {
        let record = ControlRecord {
            demand: demand.into(),
            state: state.into(),
            alt_hold: self.alt_hold,
            motors: MotorRecord::default(),
        };

        let reply = (self.control_fn)(record);
        self.alt_hold = reply.alt_hold;

        let values = reply.motors.values();
        if values.iter().any(|value| !value.is_finite()) {
            return Err(ControlError::NonFinite);
        }
        Ok(ActuatorCommand::from_slice(&values))
    }
}

/// Built-in hover routine usable as a [`ControlFn`]
///
/// Climbs to two meters and holds there: a proportional altitude loop
/// sets the wanted climb rate, a PI loop on climb-rate error trims the
/// throttle around hover, and all four motors get the same value. The
/// integrator lives in the record's altitude-hold block.
pub extern "C" fn hover_control(mut record: ControlRecord) -> ControlRecord {
    const TARGET_ALTITUDE: f64 = 2.0;
    const HOVER_THROTTLE: f64 = 0.524;

    let altitude = -record.state.z;
    let climb_rate = -record.state.dz;

    let target_climb = (0.6 * (TARGET_ALTITUDE - altitude)).clamp(-1.5, 1.5);
    let error = target_climb - climb_rate;

    record.alt_hold.target = TARGET_ALTITUDE;
    record.alt_hold.in_band = (altitude - TARGET_ALTITUDE).abs() < 0.25;
    record.alt_hold.error_integral = (record.alt_hold.error_integral + error).clamp(-0.4, 0.4);

    let throttle =
        (HOVER_THROTTLE + 0.1 * error + 0.02 * record.alt_hold.error_integral).clamp(0.0, 1.0);

    record.motors = MotorRecord {
        m1: throttle,
        m2: throttle,
        m3: throttle,
        m4: throttle,
    };
    record
}
