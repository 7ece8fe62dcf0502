//! Threaded Hover Demonstration
//!
//! This example runs the complete flight stack:
//! - Phantom-class quad dynamics integrated on the worker thread
//! - Native stabilizer with altitude hold
//! - Demand fed through a channel, like a receiver would
//! - Actuator commands read back through the published slot
//!
//! Climbs under stick for three seconds, releases to neutral so the
//! altitude hold captures, then watches the hold for three more.

use std::thread::sleep;
use std::time::Duration;

use rotorsim_core::control::{AltHoldSettings, ControlDemand, StabilizerController};
use rotorsim_core::dynamics::{RigidBodyDynamics, RotorFrame, VehicleParams};
use rotorsim_flight::{demand_channel, FlightConfig, FlightManager};

fn main() {
    println!("=== rotorsim Threaded Hover Demonstration ===\n");

    let params = VehicleParams::phantom();
    let dynamics = match RigidBodyDynamics::new(params.clone(), Box::new(RotorFrame::quad_x())) {
        Ok(dynamics) => dynamics,
        Err(e) => {
            println!("Vehicle parameters rejected: {}", e);
            return;
        }
    };

    let controller =
        StabilizerController::new(&params).with_altitude_hold(AltHoldSettings::default());
    println!("Hover throttle: {:.4}", controller.hover_throttle());

    let (sender, source) = demand_channel();
    let mut manager = FlightManager::new(FlightConfig {
        rate_hz: Some(500.0), // 500 Hz flight loop
    });

    let reader = match manager.start(dynamics, controller, source) {
        Ok(reader) => reader,
        Err(e) => {
            println!("Failed to start the flight loop: {}", e);
            return;
        }
    };

    println!("\n=== Climbing ===\n");
    let _ = sender.send(ControlDemand::new(0.6, 0.0, 0.0, 0.0));

    for step in 0..12 {
        sleep(Duration::from_millis(500));

        if step == 5 {
            // Release the stick; the altitude hold captures here
            let _ = sender.send(ControlDemand::neutral());
            println!("\n=== Stick released, holding altitude ===\n");
        }

        let state = manager.state();
        println!(
            "t={:.1}s altitude: {:6.2} m  climb: {:5.2} m/s  motor 1: {:.4}",
            0.5 * (step + 1) as f64,
            state.altitude(),
            state.climb_rate(),
            reader.value(0),
        );
    }

    if let Err(e) = manager.stop() {
        println!("Failed to stop the flight loop: {}", e);
        return;
    }

    let state = manager.state();
    println!("\n=== Flight Complete ===");
    println!("Final altitude: {:.2} m", state.altitude());
    println!("Commands published: {}", reader.publish_count());
    if let Some(fault) = manager.fault() {
        println!("Loop fault: {}", fault);
    }
}
