//! Airframe force models
//!
//! Converts a normalized actuator command into the net vertical thrust and
//! body torques consumed by the integrator. Per-rotor thrust follows the
//! quadratic curve F = b·ω²; roll and pitch torques come from thrust acting
//! on each rotor's moment arm, yaw torque from rotor drag reaction d·ω².
//!
//! Airframe geometry is the swappable piece: a frame is a table of rotor
//! positions and spin directions, selected at vehicle construction and
//! never consulted by the integrator beyond [`VehicleFrame::forces`].

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

use super::params::VehicleParams;
use crate::math::rotor_speed;

/// Normalized actuator command, one value in [0,1] per rotor
///
/// Length is fixed when the command is built. Values are clamped into
/// [0,1] at construction, so consumers never see out-of-range commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    values: Vec<f64>,
}

impl ActuatorCommand {
    /// All-zero command for `count` actuators
    pub fn zeroed(count: usize) -> Self {
        Self {
            values: vec![0.0; count],
        }
    }

    /// Build a command from raw values, clamping each into [0,1]
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            values: values.iter().map(|v| v.clamp(0.0, 1.0)).collect(),
        }
    }

    /// Number of actuators
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the command covers no actuators
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for one actuator; out-of-range indices read as 0.0
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// All values in actuator order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Net forces produced by an airframe for one actuator command
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameForces {
    /// Net vertical thrust along body up [N]
    pub fz: f64,
    /// Roll torque [N·m]
    pub l: f64,
    /// Pitch torque [N·m]
    pub m: f64,
    /// Yaw torque [N·m]
    pub n: f64,
}

/// Capability interface for per-airframe force computation
///
/// Implementations map an actuator command onto `(Fz, L, M, N)` for a
/// specific rotor layout. Swapping frames never touches the integrator.
pub trait VehicleFrame: Send {
    /// Number of rotors this frame drives
    fn rotor_count(&self) -> usize;

    /// Compute net thrust and torques from the current command
    fn forces(&self, actuators: &ActuatorCommand, params: &VehicleParams) -> FrameForces;
}

/// One rotor in a frame table
///
/// `x_arm`/`y_arm` are the rotor position as fractions of the arm length
/// in body axes (x forward, y right). `spin` is the yaw reaction sign:
/// +1 where rotor drag torques the body nose-right.
#[derive(Debug, Clone, Copy)]
struct Rotor {
    x_arm: f64,
    y_arm: f64,
    spin: f64,
}

/// Table-driven airframe
///
/// Covers the standard symmetric multirotor layouts; exotic airframes can
/// implement [`VehicleFrame`] directly.
#[derive(Debug, Clone)]
pub struct RotorFrame {
    rotors: Vec<Rotor>,
}

impl RotorFrame {
    /// Quad-X: rotors on the diagonals, alternating spin
    ///
    /// Rotor order matches the reference Phantom layout: front-right,
    /// rear-left (both nose-right reaction), then front-left, rear-right.
    pub fn quad_x() -> Self {
        let a = FRAC_1_SQRT_2;
        Self {
            rotors: vec![
                Rotor { x_arm: a, y_arm: a, spin: 1.0 },
                Rotor { x_arm: -a, y_arm: -a, spin: 1.0 },
                Rotor { x_arm: a, y_arm: -a, spin: -1.0 },
                Rotor { x_arm: -a, y_arm: a, spin: -1.0 },
            ],
        }
    }

    /// Quad-plus: rotors on the body axes
    pub fn quad_plus() -> Self {
        Self {
            rotors: vec![
                Rotor { x_arm: 1.0, y_arm: 0.0, spin: 1.0 },
                Rotor { x_arm: -1.0, y_arm: 0.0, spin: 1.0 },
                Rotor { x_arm: 0.0, y_arm: 1.0, spin: -1.0 },
                Rotor { x_arm: 0.0, y_arm: -1.0, spin: -1.0 },
            ],
        }
    }

    /// Hex-X: six rotors at 60° spacing, alternating spin
    pub fn hex_x() -> Self {
        let rotors = (0..6)
            .map(|i| {
                let angle = f64::to_radians(30.0 + 60.0 * i as f64);
                Rotor {
                    x_arm: angle.cos(),
                    y_arm: angle.sin(),
                    spin: if i % 2 == 0 { 1.0 } else { -1.0 },
                }
            })
            .collect();
        Self { rotors }
    }
}

impl VehicleFrame for RotorFrame {
    fn rotor_count(&self) -> usize {
        self.rotors.len()
    }

    fn forces(&self, actuators: &ActuatorCommand, params: &VehicleParams) -> FrameForces {
        let mut forces = FrameForces::default();

        for (rotor, value) in self.rotors.iter().zip(actuators.as_slice()) {
            let omega = rotor_speed(*value, params.max_rpm);
            let thrust = params.thrust_coeff * omega * omega;
            let drag = params.torque_coeff * omega * omega;

            forces.fz += thrust;
            // Thrust on a y offset rolls the opposite wing down
            forces.l -= rotor.y_arm * params.arm_length * thrust;
            forces.m += rotor.x_arm * params.arm_length * thrust;
            forces.n += rotor.spin * drag;
        }

        forces
    }
}

/// Airframe selector for the configuration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameKind {
    #[default]
    QuadX,
    QuadPlus,
    HexX,
}

impl FrameKind {
    /// Build the rotor table for this airframe
    pub fn to_frame(self) -> RotorFrame {
        match self {
            FrameKind::QuadX => RotorFrame::quad_x(),
            FrameKind::QuadPlus => RotorFrame::quad_plus(),
            FrameKind::HexX => RotorFrame::hex_x(),
        }
    }

    /// Rotor count for this airframe
    pub fn rotor_count(self) -> usize {
        match self {
            FrameKind::QuadX | FrameKind::QuadPlus => 4,
            FrameKind::HexX => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn phantom() -> VehicleParams {
        VehicleParams::phantom()
    }

    #[test]
    fn test_command_clamps_at_construction() {
        let command = ActuatorCommand::from_slice(&[-0.5, 0.3, 1.7]);

        assert_relative_eq!(command.value(0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(command.value(1), 0.3, epsilon = 1e-12);
        assert_relative_eq!(command.value(2), 1.0, epsilon = 1e-12);
        // Out of range reads as zero
        assert_relative_eq!(command.value(7), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_command_produces_no_torque() {
        let params = phantom();

        for kind in [FrameKind::QuadX, FrameKind::QuadPlus, FrameKind::HexX] {
            let frame = kind.to_frame();
            let command = ActuatorCommand::from_slice(&vec![0.6; frame.rotor_count()]);
            let forces = frame.forces(&command, &params);

            assert!(forces.fz > 0.0, "{:?} should produce thrust", kind);
            assert_relative_eq!(forces.l, 0.0, epsilon = 1e-9);
            assert_relative_eq!(forces.m, 0.0, epsilon = 1e-9);
            assert_relative_eq!(forces.n, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_thrust_curve_is_quadratic() {
        let params = phantom();
        let frame = RotorFrame::quad_x();

        let low = frame.forces(&ActuatorCommand::from_slice(&[0.3; 4]), &params);
        let high = frame.forces(&ActuatorCommand::from_slice(&[0.6; 4]), &params);

        // Doubling the command quadruples the thrust
        assert_relative_eq!(high.fz / low.fz, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quad_x_front_left_boost_signs() {
        let params = phantom();
        let frame = RotorFrame::quad_x();

        // Rotor 2 sits front-left with nose-left drag reaction
        let command = ActuatorCommand::from_slice(&[0.4, 0.4, 0.6, 0.4]);
        let forces = frame.forces(&command, &params);

        assert!(forces.l > 0.0, "left-side boost should roll right");
        assert!(forces.m > 0.0, "front boost should pitch nose up");
        assert!(forces.n < 0.0, "boosted CW rotor should yaw nose left");
    }

    #[test]
    fn test_quad_plus_right_boost_rolls_left() {
        let params = phantom();
        let frame = RotorFrame::quad_plus();

        // Rotor 2 sits on the +y (right) axis
        let command = ActuatorCommand::from_slice(&[0.4, 0.4, 0.6, 0.4]);
        let forces = frame.forces(&command, &params);

        assert!(forces.l < 0.0, "right-side boost should roll left");
        assert_relative_eq!(forces.m, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_roll_torque_scales_with_arm_length() {
        let mut params = phantom();
        let frame = RotorFrame::quad_x();
        let command = ActuatorCommand::from_slice(&[0.4, 0.4, 0.6, 0.4]);

        let short = frame.forces(&command, &params);
        params.arm_length *= 2.0;
        let long = frame.forces(&command, &params);

        assert_relative_eq!(long.l, 2.0 * short.l, epsilon = 1e-9);
        assert_relative_eq!(long.m, 2.0 * short.m, epsilon = 1e-9);
        // Yaw comes from rotor drag, not the arm
        assert_relative_eq!(long.n, short.n, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_kind_rotor_counts() {
        assert_eq!(FrameKind::QuadX.to_frame().rotor_count(), 4);
        assert_eq!(FrameKind::QuadPlus.to_frame().rotor_count(), 4);
        assert_eq!(FrameKind::HexX.to_frame().rotor_count(), 6);
        assert_eq!(FrameKind::HexX.rotor_count(), 6);
    }
}
