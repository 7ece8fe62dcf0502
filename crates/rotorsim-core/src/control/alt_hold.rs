//! Altitude hold
//!
//! Climb-rate cascade: while the throttle stick sits in its deadband the
//! target altitude is captured and held, with altitude error commanding a
//! climb rate; outside the band the stick commands climb rate directly.
//! A PI loop on climb-rate error produces a throttle correction around
//! whatever feedforward the caller blends it with.

use serde::{Deserialize, Serialize};

/// Altitude-hold tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltHoldSettings {
    /// Proportional gain on climb-rate error
    pub kp: f64,
    /// Integral gain on climb-rate error
    pub ki: f64,
    /// Throttle stick magnitude treated as centered
    pub stick_deadband: f64,
    /// Altitude below which hold never engages [m]
    pub min_altitude: f64,
    /// Climb rate commanded at full stick [m/s]
    pub max_climb_rate: f64,
    /// Integral accumulator clamp
    pub windup_max: f64,
}

impl Default for AltHoldSettings {
    fn default() -> Self {
        Self {
            kp: 0.75,
            ki: 1.5,
            stick_deadband: 0.2,
            min_altitude: 1.0,
            max_climb_rate: 2.5,
            windup_max: 0.4,
        }
    }
}

/// Altitude-hold controller memory
///
/// Persists across iterations; reset only at controller (re)initialization.
#[derive(Debug, Clone)]
pub struct AltitudeHold {
    settings: AltHoldSettings,
    error_integral: f64,
    in_band: bool,
    target: f64,
}

impl AltitudeHold {
    pub fn new(settings: AltHoldSettings) -> Self {
        Self {
            settings,
            error_integral: 0.0,
            in_band: false,
            target: 0.0,
        }
    }

    /// Throttle correction for the current altitude and climb rate
    ///
    /// The target altitude is captured and the integral cleared on each
    /// entry into the stick deadband; the integral keeps accumulating in
    /// both modes afterwards, clamped to the windup limit.
    pub fn correction(&mut self, throttle_stick: f64, altitude: f64, climb_rate: f64) -> f64 {
        let in_band = throttle_stick.abs() < self.settings.stick_deadband
            && altitude > self.settings.min_altitude;

        if in_band && !self.in_band {
            self.target = altitude;
            self.error_integral = 0.0;
        }
        self.in_band = in_band;

        let target_velocity = if in_band {
            self.target - altitude
        } else {
            self.settings.max_climb_rate * throttle_stick
        };

        let error = target_velocity - climb_rate;
        self.error_integral = (self.error_integral + error)
            .clamp(-self.settings.windup_max, self.settings.windup_max);

        self.settings.kp * error + self.settings.ki * self.error_integral
    }

    /// Clear memory; the next in-band entry recaptures the target
    pub fn reset(&mut self) {
        self.error_integral = 0.0;
        self.in_band = false;
        self.target = 0.0;
    }

    /// Accumulated climb-rate error
    pub fn error_integral(&self) -> f64 {
        self.error_integral
    }

    /// True while holding a captured target
    pub fn in_band(&self) -> bool {
        self.in_band
    }

    /// Captured target altitude [m]
    pub fn target(&self) -> f64 {
        self.target
    }
}

impl Default for AltitudeHold {
    fn default() -> Self {
        Self::new(AltHoldSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_holding_at_target_produces_no_correction() {
        let mut hold = AltitudeHold::default();

        // Centered stick at altitude: enters band, captures 5 m
        let correction = hold.correction(0.0, 5.0, 0.0);

        assert!(hold.in_band());
        assert_relative_eq!(hold.target(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(correction, 0.0, epsilon = 1e-12);

        // No disturbance: integral stays at zero, output stays at zero
        for _ in 0..100 {
            let correction = hold.correction(0.0, 5.0, 0.0);
            assert_relative_eq!(correction, 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(hold.error_integral(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_band_entry_captures_target_and_clears_integral() {
        let mut hold = AltitudeHold::default();

        // Out of band, climbing too slowly: integral builds up
        for _ in 0..10 {
            hold.correction(0.8, 3.0, 0.0);
        }
        assert!(!hold.in_band());
        assert!(hold.error_integral() > 0.0);

        // Stick centered at 7 m: fresh target, fresh integral
        hold.correction(0.0, 7.0, 0.0);
        assert!(hold.in_band());
        assert_relative_eq!(hold.target(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_band_tracks_stick_climb_rate() {
        let mut hold = AltitudeHold::default();
        let settings = AltHoldSettings::default();

        // Climbing exactly as commanded: no error
        let commanded = settings.max_climb_rate * 0.8;
        let correction = hold.correction(0.8, 3.0, commanded);

        assert!(!hold.in_band());
        assert_relative_eq!(correction, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_never_engages_below_minimum_altitude() {
        let mut hold = AltitudeHold::default();

        hold.correction(0.0, 0.5, 0.0);

        assert!(!hold.in_band());
    }

    #[test]
    fn test_integral_clamps_at_windup_limit() {
        let settings = AltHoldSettings::default();
        let windup = settings.windup_max;
        let mut hold = AltitudeHold::new(settings);

        // Large persistent error drives the accumulator to its limit
        for _ in 0..100 {
            hold.correction(1.0, 3.0, -2.0);
        }

        assert_relative_eq!(hold.error_integral(), windup, epsilon = 1e-12);
    }

    #[test]
    fn test_above_target_commands_descent() {
        let mut hold = AltitudeHold::default();

        hold.correction(0.0, 5.0, 0.0);
        // Drifted a meter high while holding
        let correction = hold.correction(0.0, 6.0, 0.0);

        assert!(correction < 0.0);
    }

    #[test]
    fn test_reset_clears_memory() {
        let mut hold = AltitudeHold::default();
        hold.correction(0.0, 5.0, 1.0);

        hold.reset();

        assert!(!hold.in_band());
        assert_relative_eq!(hold.error_integral(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(hold.target(), 0.0, epsilon = 1e-12);
    }
}
