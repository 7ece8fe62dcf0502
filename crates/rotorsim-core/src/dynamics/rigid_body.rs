//! Rigid-body dynamics integrator
//!
//! Advances the 12-scalar vehicle state by forward Euler:
//!
//! 1. Airframe converts the actuator command to net thrust Fz and torques
//!    (L, M, N)
//! 2. Angular rates step per the configured [`IntegratorPolicy`]
//! 3. Euler angles integrate the rates
//! 4. Thrust is rotated to the earth frame, scaled by 1/m, gravity added
//!    on the down axis
//! 5. The airborne latch trips once net vertical acceleration goes negative
//! 6. While airborne, velocity then position integrate per axis
//!
//! The operation order is fixed; trajectory-level tests compare against it
//! step for step.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frame::{ActuatorCommand, VehicleFrame};
use super::params::{ParamsError, VehicleParams};
use super::state::VehicleState;
use crate::math::body_thrust_to_earth;
use crate::GRAVITY;

/// Integration faults
#[derive(Debug, Clone, Error)]
pub enum DynamicsError {
    #[error("vehicle state went non-finite (dt = {dt})")]
    NonFinite { dt: f64 },
}

/// Angular-rate step variants
///
/// `TorqueAsRate` assigns body rates directly from the frame torques, a
/// first-order model where effective inertia is folded into the frame
/// constants. Control gains tuned against it depend on that behavior, so
/// it stays the default. `AngularAcceleration` integrates torque over the
/// per-axis inertia instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorPolicy {
    #[default]
    TorqueAsRate,
    AngularAcceleration,
}

/// Multirotor rigid-body dynamics
///
/// Owns the vehicle state and parameters. Updates are single-threaded;
/// [`RigidBodyDynamics::state`] returns a copy that is never observed
/// mid-integration.
pub struct RigidBodyDynamics {
    params: VehicleParams,
    frame: Box<dyn VehicleFrame>,
    policy: IntegratorPolicy,
    state: VehicleState,
}

impl RigidBodyDynamics {
    /// Create dynamics for a validated parameter set and airframe
    pub fn new(
        params: VehicleParams,
        frame: Box<dyn VehicleFrame>,
    ) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            frame,
            policy: IntegratorPolicy::default(),
            state: VehicleState::default(),
        })
    }

    /// Select the angular-rate step variant
    pub fn with_policy(mut self, policy: IntegratorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reset pose and the airborne latch; rates and velocity zero out
    pub fn init(&mut self, position: Vector3<f64>, attitude: Vector3<f64>, airborne: bool) {
        self.state = VehicleState {
            velocity: Vector3::zeros(),
            angular_rate: Vector3::zeros(),
            attitude,
            position,
            airborne,
        };
    }

    /// Advance the state by `dt` seconds under the given actuator command
    pub fn update(&mut self, actuators: &ActuatorCommand, dt: f64) -> Result<(), DynamicsError> {
        let forces = self.frame.forces(actuators, &self.params);

        match self.policy {
            IntegratorPolicy::TorqueAsRate => {
                self.state.angular_rate = Vector3::new(forces.l, forces.m, forces.n);
            }
            IntegratorPolicy::AngularAcceleration => {
                self.state.angular_rate.x += dt * forces.l / self.params.inertia.x;
                self.state.angular_rate.y += dt * forces.m / self.params.inertia.y;
                self.state.angular_rate.z += dt * forces.n / self.params.inertia.z;
            }
        }

        for j in 0..3 {
            self.state.attitude[j] += dt * self.state.angular_rate[j];
        }

        let mut accel = body_thrust_to_earth(&self.state.attitude, forces.fz / self.params.mass);
        // Motionless maps to zero net acceleration
        accel.z += GRAVITY;

        if !self.state.airborne {
            self.state.airborne = accel.z < 0.0;
        }

        if self.state.airborne {
            for j in 0..3 {
                self.state.velocity[j] += dt * accel[j];
                // Position integrates the already-updated velocity
                self.state.position[j] += dt * self.state.velocity[j];
            }
        }

        if !self.state.is_finite() {
            return Err(DynamicsError::NonFinite { dt });
        }
        Ok(())
    }

    /// Consistent snapshot of the current state
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Physical parameters
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Number of actuators the airframe expects
    pub fn actuator_count(&self) -> usize {
        self.frame.rotor_count()
    }

    /// Active angular-rate step variant
    pub fn policy(&self) -> IntegratorPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::frame::{FrameForces, RotorFrame};
    use approx::assert_relative_eq;

    fn phantom_quad() -> RigidBodyDynamics {
        RigidBodyDynamics::new(VehicleParams::phantom(), Box::new(RotorFrame::quad_x()))
            .expect("phantom params are valid")
    }

    #[test]
    fn test_at_rest_stays_at_rest() {
        let mut dynamics = phantom_quad();
        let idle = ActuatorCommand::zeroed(4);

        for _ in 0..100 {
            dynamics.update(&idle, 0.01).expect("finite");
        }

        let state = dynamics.state();
        assert!(!state.airborne);
        assert_relative_eq!(state.velocity.norm(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(state.position.norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_dt_leaves_velocity_and_position_unchanged() {
        let mut dynamics = phantom_quad();
        dynamics.init(Vector3::new(1.0, 2.0, -3.0), Vector3::zeros(), true);
        let command = ActuatorCommand::from_slice(&[0.6; 4]);

        dynamics.update(&command, 0.01).expect("finite");
        let before = dynamics.state();

        dynamics.update(&command, 0.0).expect("finite");
        dynamics.update(&command, 0.0).expect("finite");
        let after = dynamics.state();

        assert_relative_eq!(after.velocity, before.velocity, epsilon = 1e-15);
        assert_relative_eq!(after.position, before.position, epsilon = 1e-15);
        assert_relative_eq!(after.attitude, before.attitude, epsilon = 1e-15);
    }

    #[test]
    fn test_airborne_latch_is_one_way() {
        let mut dynamics = phantom_quad();
        let idle = ActuatorCommand::zeroed(4);
        let climb = ActuatorCommand::from_slice(&[0.6; 4]);

        dynamics.update(&idle, 0.01).expect("finite");
        assert!(!dynamics.state().airborne);

        // 0.6 on four Phantom rotors comfortably exceeds the weight
        dynamics.update(&climb, 0.01).expect("finite");
        assert!(dynamics.state().airborne);

        // Cutting the motors must not clear the latch
        for _ in 0..50 {
            dynamics.update(&idle, 0.01).expect("finite");
        }
        assert!(dynamics.state().airborne);
    }

    #[test]
    fn test_hover_command_is_a_fixed_point() {
        let mut dynamics = phantom_quad();
        dynamics.init(Vector3::new(0.0, 0.0, -5.0), Vector3::zeros(), true);

        let hover = dynamics.params().hover_fraction(4);
        let command = ActuatorCommand::from_slice(&[hover; 4]);

        for _ in 0..200 {
            dynamics.update(&command, 0.01).expect("finite");
        }

        let state = dynamics.state();
        assert_relative_eq!(state.velocity.norm(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(state.altitude(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_init_resets_rates_and_latch() {
        let mut dynamics = phantom_quad();
        let command = ActuatorCommand::from_slice(&[0.7; 4]);
        for _ in 0..10 {
            dynamics.update(&command, 0.01).expect("finite");
        }

        let pose = Vector3::new(1.0, -2.0, -4.0);
        let attitude = Vector3::new(0.1, 0.0, 0.5);
        dynamics.init(pose, attitude, false);

        let state = dynamics.state();
        assert!(!state.airborne);
        assert_relative_eq!(state.position, pose, epsilon = 1e-12);
        assert_relative_eq!(state.attitude, attitude, epsilon = 1e-12);
        assert_relative_eq!(state.velocity.norm(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(state.angular_rate.norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_angular_acceleration_policy_integrates_torque() {
        let params = VehicleParams::phantom();
        let inertia_x = params.inertia.x;

        let mut first_order = phantom_quad();
        let mut integrated = RigidBodyDynamics::new(params, Box::new(RotorFrame::quad_x()))
            .expect("phantom params are valid")
            .with_policy(IntegratorPolicy::AngularAcceleration);

        // Left-side boost produces a steady roll torque
        let command = ActuatorCommand::from_slice(&[0.4, 0.4, 0.6, 0.4]);
        let dt = 0.01;

        first_order.update(&command, dt).expect("finite");
        integrated.update(&command, dt).expect("finite");

        let rate_direct = first_order.state().angular_rate.x;
        let rate_integrated = integrated.state().angular_rate.x;

        // Direct assignment jumps to the torque value; integration ramps
        assert_relative_eq!(
            rate_integrated,
            dt * rate_direct / inertia_x,
            epsilon = 1e-12
        );
        assert!(rate_integrated.abs() < rate_direct.abs());
    }

    struct BrokenFrame;

    impl VehicleFrame for BrokenFrame {
        fn rotor_count(&self) -> usize {
            4
        }

        fn forces(&self, _actuators: &ActuatorCommand, _params: &VehicleParams) -> FrameForces {
            FrameForces {
                fz: f64::NAN,
                l: 0.0,
                m: 0.0,
                n: 0.0,
            }
        }
    }

    #[test]
    fn test_non_finite_forces_surface_as_error() {
        let mut dynamics =
            RigidBodyDynamics::new(VehicleParams::phantom(), Box::new(BrokenFrame))
                .expect("phantom params are valid");
        dynamics.init(Vector3::zeros(), Vector3::zeros(), true);

        let command = ActuatorCommand::from_slice(&[0.5; 4]);
        let result = dynamics.update(&command, 0.01);

        assert!(matches!(result, Err(DynamicsError::NonFinite { .. })));
    }

    #[test]
    fn test_rejects_invalid_params_at_construction() {
        let mut params = VehicleParams::phantom();
        params.mass = -1.0;

        assert!(RigidBodyDynamics::new(params, Box::new(RotorFrame::quad_x())).is_err());
    }
}
