//! Native stabilizer controller
//!
//! Rate-damping controller for quad-X airframes: stick demands map to
//! target body rates, proportional corrections on rate error feed the
//! motor mixer around a hover throttle feedforward. Altitude hold, when
//! enabled, replaces the open-loop throttle channel with the climb-rate
//! cascade from [`crate::control::alt_hold`].

use serde::{Deserialize, Serialize};

use crate::control::alt_hold::{AltHoldSettings, AltitudeHold};
use crate::control::controller::{ControlError, FlightController};
use crate::control::demand::ControlDemand;
use crate::dynamics::{ActuatorCommand, VehicleParams, VehicleState};

/// Stabilizer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilizerGains {
    /// Body rate at full roll/pitch stick [rad/s]
    pub max_rate: f64,
    /// Body rate at full yaw stick [rad/s]
    pub max_yaw_rate: f64,
    /// Proportional gain on roll/pitch rate error
    pub rate_kp: f64,
    /// Proportional gain on yaw rate error
    pub yaw_kp: f64,
    /// Throttle authority around hover when altitude hold is off
    pub climb_authority: f64,
}

impl Default for StabilizerGains {
    fn default() -> Self {
        Self {
            max_rate: 1.0,
            max_yaw_rate: 1.0,
            rate_kp: 0.1,
            yaw_kp: 0.1,
            climb_authority: 0.25,
        }
    }
}

/// Mixer signs (roll, pitch, yaw) per rotor, ordered like the quad-X
/// frame table: front-right, rear-left, front-left, rear-right
const QUAD_X_MIXER: [[f64; 3]; 4] = [
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
];

/// Native quad-X flight controller
pub struct StabilizerController {
    gains: StabilizerGains,
    hover_throttle: f64,
    alt_hold: Option<AltitudeHold>,
}

impl StabilizerController {
    /// Stabilizer for a quad-X vehicle with the given parameters
    ///
    /// The hover throttle feedforward comes from the parameter set, so a
    /// neutral demand hovers rather than falling.
    pub fn new(params: &VehicleParams) -> Self {
        Self {
            gains: StabilizerGains::default(),
            hover_throttle: params.hover_fraction(QUAD_X_MIXER.len()),
            alt_hold: None,
        }
    }

    /// Replace the default gains
    pub fn with_gains(mut self, gains: StabilizerGains) -> Self {
        self.gains = gains;
        self
    }

    /// Enable the altitude-hold cascade on the throttle channel
    pub fn with_altitude_hold(mut self, settings: AltHoldSettings) -> Self {
        self.alt_hold = Some(AltitudeHold::new(settings));
        self
    }

    /// Throttle at which commanded thrust equals weight
    pub fn hover_throttle(&self) -> f64 {
        self.hover_throttle
    }

    /// Altitude-hold memory, when enabled
    pub fn altitude_hold(&self) -> Option<&AltitudeHold> {
        self.alt_hold.as_ref()
    }
}

impl FlightController for StabilizerController {
    fn actuator_count(&self) -> usize {
        QUAD_X_MIXER.len()
    }

    fn reset(&mut self) {
        if let Some(hold) = &mut self.alt_hold {
            hold.reset();
        }
    }

    fn compute(
        &mut self,
        state: &VehicleState,
        demand: &ControlDemand,
        _dt: f64,
    ) -> Result<ActuatorCommand, ControlError> {
        let throttle = match &mut self.alt_hold {
            Some(hold) => {
                self.hover_throttle
                    + hold.correction(demand.throttle, state.altitude(), state.climb_rate())
            }
            None => self.hover_throttle + self.gains.climb_authority * demand.throttle,
        };

        let roll_correction = self.gains.rate_kp
            * (self.gains.max_rate * demand.roll - state.angular_rate.x);
        let pitch_correction = self.gains.rate_kp
            * (self.gains.max_rate * demand.pitch - state.angular_rate.y);
        let yaw_correction = self.gains.yaw_kp
            * (self.gains.max_yaw_rate * demand.yaw - state.angular_rate.z);

        let mut values = [0.0; 4];
        for (value, [roll, pitch, yaw]) in values.iter_mut().zip(QUAD_X_MIXER) {
            *value = throttle
                + roll * roll_correction
                + pitch * pitch_correction
                + yaw * yaw_correction;
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ControlError::NonFinite);
        }
        // Construction clamps into [0,1]
        Ok(ActuatorCommand::from_slice(&values))
    }
}
