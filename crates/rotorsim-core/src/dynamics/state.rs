//! Vehicle state
//!
//! The 12-scalar rigid-body state advanced by the integrator, in
//! North-East-Down axes:
//!
//! - u, v, w:       inertial velocity
//! - p, q, r:       body angular rates
//! - φ, θ, ψ:       Euler angles (Z-Y-X convention)
//! - xE, yE, hE:    earth-frame position
//!
//! Euler angles accumulate without wrapping. The airborne flag latches
//! true once net vertical acceleration first goes negative and never
//! reverts within a run.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Vehicle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleState {
    /// Inertial velocity [m/s] (NED)
    pub velocity: Vector3<f64>,
    /// Angular rate [rad/s] (body frame: roll, pitch, yaw)
    pub angular_rate: Vector3<f64>,
    /// Euler angles [rad] (roll φ, pitch θ, yaw ψ)
    pub attitude: Vector3<f64>,
    /// Earth-frame position [m] (NED: north, east, down)
    pub position: Vector3<f64>,
    /// One-way lift-off latch
    pub airborne: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            velocity: Vector3::zeros(),
            angular_rate: Vector3::zeros(),
            attitude: Vector3::zeros(),
            position: Vector3::zeros(),
            airborne: false,
        }
    }
}

impl VehicleState {
    /// Height above the origin [m] (negated down-axis position)
    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    /// Vertical speed, positive up [m/s]
    pub fn climb_rate(&self) -> f64 {
        -self.velocity.z
    }

    /// True when every scalar in the state is finite
    pub fn is_finite(&self) -> bool {
        self.velocity.iter().all(|v| v.is_finite())
            && self.angular_rate.iter().all(|v| v.is_finite())
            && self.attitude.iter().all(|v| v.is_finite())
            && self.position.iter().all(|v| v.is_finite())
    }
}
