//! Vehicle parameters
//!
//! Immutable per-airframe physical constants, supplied once at vehicle
//! construction. Thrust and torque follow the quadratic rotor model
//! F = b·ω² and T = d·ω².

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::rotor_speed;
use crate::GRAVITY;

/// Parameter validation errors
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),
    #[error("inertia must be positive on all axes, got [{0}, {1}, {2}]")]
    NonPositiveInertia(f64, f64, f64),
    #[error("{name} must be positive, got {value}")]
    NonPositiveConstant { name: &'static str, value: f64 },
}

/// Vehicle physical parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleParams {
    /// Thrust coefficient b [N·s²] in F = b·ω²
    pub thrust_coeff: f64,
    /// Rotor drag-torque coefficient d [N·m·s²] in T = d·ω²
    pub torque_coeff: f64,
    /// Mass [kg]
    pub mass: f64,
    /// Inertia diagonal [kg·m²] (body axes)
    pub inertia: Vector3<f64>,
    /// Rotor inertia Jr [kg·m²]
    pub rotor_inertia: f64,
    /// Arm length [m] (center of mass to rotor)
    pub arm_length: f64,
    /// Maximum rotor speed [rpm]
    pub max_rpm: f64,
}

impl VehicleParams {
    /// DJI-Phantom-like parameter set
    pub fn phantom() -> Self {
        Self {
            thrust_coeff: 5.0e-6,
            torque_coeff: 2.0e-6,
            mass: 1.380,
            inertia: Vector3::new(2.0, 2.0, 3.0),
            rotor_inertia: 38.0e-4,
            arm_length: 0.350,
            max_rpm: 15000.0,
        }
    }

    /// Reject non-physical parameter sets before they reach the integrator
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.mass <= 0.0 {
            return Err(ParamsError::NonPositiveMass(self.mass));
        }
        if self.inertia.x <= 0.0 || self.inertia.y <= 0.0 || self.inertia.z <= 0.0 {
            return Err(ParamsError::NonPositiveInertia(
                self.inertia.x,
                self.inertia.y,
                self.inertia.z,
            ));
        }
        let constants = [
            ("thrust coefficient", self.thrust_coeff),
            ("torque coefficient", self.torque_coeff),
            ("rotor inertia", self.rotor_inertia),
            ("arm length", self.arm_length),
            ("max rpm", self.max_rpm),
        ];
        for (name, value) in constants {
            if value <= 0.0 {
                return Err(ParamsError::NonPositiveConstant { name, value });
            }
        }
        Ok(())
    }

    /// Weight of the vehicle [N]
    pub fn hover_thrust(&self) -> f64 {
        self.mass * GRAVITY
    }

    /// Normalized rotor command at which total thrust equals weight
    ///
    /// Inverts F = n·b·ω² at F = m·g. Useful as a throttle feedforward.
    pub fn hover_fraction(&self, rotor_count: usize) -> f64 {
        let omega = (self.hover_thrust() / (rotor_count as f64 * self.thrust_coeff)).sqrt();
        omega / rotor_speed(1.0, self.max_rpm)
    }
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self::phantom()
    }
}
