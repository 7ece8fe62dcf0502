//! Control demand
//!
//! The four-axis receiver/joystick sample polled once per control
//! iteration. All axes are normalized to [-1, 1] with 0 at stick center;
//! throttle reads as a climb command (0 = hold, +1 = full climb).

use serde::{Deserialize, Serialize};

/// Four-axis pilot demand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlDemand {
    /// Climb command [-1, 1]
    pub throttle: f64,
    /// Roll command [-1, 1], positive right
    pub roll: f64,
    /// Pitch command [-1, 1], positive nose up
    pub pitch: f64,
    /// Yaw command [-1, 1], positive nose right
    pub yaw: f64,
}

impl ControlDemand {
    pub fn new(throttle: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            throttle,
            roll,
            pitch,
            yaw,
        }
    }

    /// Centered sticks
    pub fn neutral() -> Self {
        Self::default()
    }
}
