//! Simulation configuration
//!
//! Defines configuration structures for setting up simulations. Supplied
//! once at construction; runtime components never mutate their parameters.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::{AltHoldSettings, StabilizerController, StabilizerGains};
use crate::dynamics::{FrameKind, IntegratorPolicy, RotorFrame, VehicleParams};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Simulation time step [s]
    pub dt: f64,
    /// Total simulation duration [s]
    pub duration: f64,
    /// Vehicle configuration
    pub vehicle: VehicleConfig,
    /// Controller configuration
    pub control: ControlConfig,
    /// Initial state configuration
    pub initial_state: InitialStateConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01, // 100 Hz control loop
            duration: 10.0,
            vehicle: VehicleConfig::default(),
            control: ControlConfig::default(),
            initial_state: InitialStateConfig::default(),
        }
    }
}

/// Vehicle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Airframe layout
    pub frame: FrameKind,
    /// Physical parameters
    pub params: VehicleParams,
    /// Angular-rate step variant
    pub integrator: IntegratorPolicy,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            frame: FrameKind::QuadX,
            params: VehicleParams::phantom(),
            integrator: IntegratorPolicy::TorqueAsRate,
        }
    }
}

impl VehicleConfig {
    /// Build the airframe force model
    pub fn to_frame(&self) -> RotorFrame {
        self.frame.to_frame()
    }
}

/// Controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Stabilizer gains
    pub gains: StabilizerGains,
    /// Altitude-hold settings; `None` leaves throttle open-loop
    pub altitude_hold: Option<AltHoldSettings>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gains: StabilizerGains::default(),
            altitude_hold: Some(AltHoldSettings::default()),
        }
    }
}

impl ControlConfig {
    /// Build the native stabilizer for this configuration
    pub fn to_controller(&self, params: &VehicleParams) -> StabilizerController {
        let controller = StabilizerController::new(params).with_gains(self.gains.clone());
        match &self.altitude_hold {
            Some(settings) => controller.with_altitude_hold(settings.clone()),
            None => controller,
        }
    }
}

/// Initial state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialStateConfig {
    /// Initial position [m] (NED)
    pub position: Vector3<f64>,
    /// Initial Euler angles [rad]
    pub attitude: Vector3<f64>,
    /// Start with the lift-off latch already tripped
    pub airborne: bool,
}

impl Default for InitialStateConfig {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            attitude: Vector3::zeros(),
            airborne: false,
        }
    }
}

impl InitialStateConfig {
    /// Level and already airborne at `altitude` meters
    pub fn airborne_at(altitude: f64) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, -altitude),
            attitude: Vector3::zeros(),
            airborne: true,
        }
    }
}
