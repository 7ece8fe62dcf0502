//! Euler-angle utilities
//!
//! Frame rotation for the dynamics integrator. Attitude is the Euler triple
//! (roll φ, pitch θ, yaw ψ) in Z-Y-X convention with North-East-Down axes.

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Convert a normalized rotor command in [0,1] to angular speed [rad/s]
///
/// ω = value · max_rpm · π/30
pub fn rotor_speed(value: f64, max_rpm: f64) -> f64 {
    value * max_rpm * PI / 30.0
}

/// Rotate a body-frame vertical thrust into earth-frame acceleration axes
///
/// Applies the last column of the Z-Y-X rotation matrix to the body thrust
/// vector [0, 0, -fz]. The leading negative signs map body-up thrust onto
/// NED axes, so a level vehicle sees all of its thrust on the down axis:
///
/// a = [ -fz·(sφ·sψ + cφ·cψ·sθ),
///       -fz·(cφ·sψ·sθ - cψ·sφ),
///       -fz·(cφ·cθ) ]
///
/// `fz` is typically thrust divided by mass, making the result an
/// acceleration; gravity is not included here.
pub fn body_thrust_to_earth(attitude: &Vector3<f64>, fz: f64) -> Vector3<f64> {
    let (phi, theta, psi) = (attitude.x, attitude.y, attitude.z);

    let sphi = phi.sin();
    let spsi = psi.sin();
    let cphi = phi.cos();
    let cpsi = psi.cos();
    let sthe = theta.sin();
    let cthe = theta.cos();

    Vector3::new(
        -fz * (sphi * spsi + cphi * cpsi * sthe),
        -fz * (cphi * spsi * sthe - cpsi * sphi),
        -fz * (cphi * cthe),
    )
}
