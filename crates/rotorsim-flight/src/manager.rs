//! Threaded flight manager
//!
//! Runs one vehicle's dynamics and flight controller on a dedicated
//! worker thread. Each iteration: read the elapsed time off a monotonic
//! clock, integrate the dynamics under the current actuator command,
//! poll the demand source, compute the next command, publish it to the
//! shared slot, then optionally sleep out the remainder of the pacing
//! period. Numeric faults stop the loop from inside and are recorded for
//! the host; they never unwind across the thread boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rotorsim_core::control::{ControlDemand, ControlError, FlightController};
use rotorsim_core::dynamics::{
    ActuatorCommand, DynamicsError, RigidBodyDynamics, VehicleState,
};

use crate::input::DemandSource;
use crate::slot::{actuator_slot, ActuatorReader, SharedActuatorSlot};

/// Lifecycle misuse errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("flight loop is already running")]
    AlreadyRunning,
    #[error("flight loop is not running")]
    NotStarted,
    #[error("controller drives {controller} actuators but the airframe has {frame} rotors")]
    ActuatorCountMismatch { controller: usize, frame: usize },
}

/// Fault that stopped the flight loop from inside
#[derive(Debug, Clone, Error)]
pub enum FlightFault {
    #[error("dynamics fault: {0}")]
    Dynamics(#[from] DynamicsError),
    #[error("control fault: {0}")]
    Control(#[from] ControlError),
}

/// Flight loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Target iteration rate [Hz]; `None` runs unpaced
    pub rate_hz: Option<f64>,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            rate_hz: Some(1000.0), // 1 kHz flight loop
        }
    }
}

/// Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Stopping,
}

struct Worker {
    thread: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

/// Threaded flight manager
///
/// Owns the worker lifecycle: `Stopped → Running → Stopping → Stopped`.
/// The dynamics and controller move into the worker at start and are
/// touched by no other thread; the host talks to the loop through the
/// demand source going in and the actuator slot coming out.
pub struct FlightManager {
    config: FlightConfig,
    worker: Option<Worker>,
    slot: Option<SharedActuatorSlot>,
    state: Arc<Mutex<VehicleState>>,
    fault: Arc<Mutex<Option<FlightFault>>>,
}

impl FlightManager {
    pub fn new(config: FlightConfig) -> Self {
        Self {
            config,
            worker: None,
            slot: None,
            state: Arc::new(Mutex::new(VehicleState::default())),
            fault: Arc::new(Mutex::new(None)),
        }
    }

    /// Spawn the flight loop around the given components
    ///
    /// Returns the reader for the published actuator commands. The
    /// controller must drive exactly as many actuators as the airframe
    /// carries; mismatches are rejected here so the loop never observes
    /// one.
    pub fn start<C, D>(
        &mut self,
        dynamics: RigidBodyDynamics,
        controller: C,
        demand: D,
    ) -> Result<ActuatorReader, ManagerError>
    where
        C: FlightController + 'static,
        D: DemandSource + 'static,
    {
        match self.worker.take() {
            Some(worker) if !worker.thread.is_finished() => {
                self.worker = Some(worker);
                return Err(ManagerError::AlreadyRunning);
            }
            // A loop that stopped itself on a fault still needs reaping
            Some(worker) => {
                let _ = worker.thread.join();
            }
            None => {}
        }

        let counts = (controller.actuator_count(), dynamics.actuator_count());
        if counts.0 != counts.1 {
            return Err(ManagerError::ActuatorCountMismatch {
                controller: counts.0,
                frame: counts.1,
            });
        }

        let slot = actuator_slot(counts.1);
        let stop = Arc::new(AtomicBool::new(false));
        *self.fault.lock() = None;
        *self.state.lock() = dynamics.state();

        let thread = {
            let slot = Arc::clone(&slot);
            let stop = Arc::clone(&stop);
            let fault = Arc::clone(&self.fault);
            let state = Arc::clone(&self.state);
            let config = self.config.clone();
            std::thread::spawn(move || {
                flight_loop(dynamics, controller, demand, slot, stop, fault, state, config);
            })
        };

        log::info!("flight loop started ({} actuators)", counts.1);
        self.slot = Some(Arc::clone(&slot));
        self.worker = Some(Worker { thread, stop });
        Ok(ActuatorReader::new(slot))
    }

    /// Request a stop and join the worker before returning
    ///
    /// After this returns no further publications occur; the slot keeps
    /// serving the last published command.
    pub fn stop(&mut self) -> Result<(), ManagerError> {
        let worker = self.worker.take().ok_or(ManagerError::NotStarted)?;
        worker.stop.store(true, Ordering::Release);
        if worker.thread.join().is_err() {
            log::error!("flight loop thread panicked");
        }

        let publications = self.slot.as_ref().map_or(0, |slot| slot.publish_count());
        log::info!("flight loop stopped after {} publications", publications);
        Ok(())
    }

    /// Reader for the published actuator commands, once started
    pub fn reader(&self) -> Option<ActuatorReader> {
        self.slot
            .as_ref()
            .map(|slot| ActuatorReader::new(Arc::clone(slot)))
    }

    /// Latest vehicle state snapshot observed by the loop
    pub fn state(&self) -> VehicleState {
        *self.state.lock()
    }

    /// Fault that stopped the loop, if one did
    pub fn fault(&self) -> Option<FlightFault> {
        self.fault.lock().clone()
    }

    /// Current lifecycle state
    pub fn loop_state(&self) -> LoopState {
        match &self.worker {
            None => LoopState::Stopped,
            Some(worker) if worker.thread.is_finished() => LoopState::Stopped,
            Some(worker) if worker.stop.load(Ordering::Acquire) => LoopState::Stopping,
            Some(_) => LoopState::Running,
        }
    }

    /// True while the worker thread is alive
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.thread.is_finished())
    }
}

impl Default for FlightManager {
    fn default() -> Self {
        Self::new(FlightConfig::default())
    }
}

#[allow(clippy::too_many_arguments)]
fn flight_loop<C, D>(
    mut dynamics: RigidBodyDynamics,
    mut controller: C,
    mut demand_source: D,
    slot: SharedActuatorSlot,
    stop: Arc<AtomicBool>,
    fault: Arc<Mutex<Option<FlightFault>>>,
    state: Arc<Mutex<VehicleState>>,
    config: FlightConfig,
) where
    C: FlightController,
    D: DemandSource,
{
    let period = config
        .rate_hz
        .filter(|hz| hz.is_finite() && *hz > 0.0)
        .map(|hz| Duration::from_secs_f64(1.0 / hz));

    let mut last_tick: Option<Instant> = None;
    let mut demand = ControlDemand::neutral();
    let mut command = ActuatorCommand::zeroed(dynamics.actuator_count());

    loop {
        if stop.load(Ordering::Acquire) {
            break;
        }

        let now = Instant::now();
        // First iteration integrates over zero elapsed time
        let dt = last_tick.map_or(0.0, |tick| now.duration_since(tick).as_secs_f64());
        last_tick = Some(now);

        if let Err(source) = dynamics.update(&command, dt) {
            log::error!("stopping flight loop: {}", source);
            *fault.lock() = Some(FlightFault::from(source));
            break;
        }
        let snapshot = dynamics.state();
        *state.lock() = snapshot;

        // A demand gap is not a fault; keep flying the previous sample
        if let Some(sample) = demand_source.poll() {
            demand = sample;
        }

        match controller.compute(&snapshot, &demand, dt) {
            Ok(next) => {
                slot.publish(next.clone());
                command = next;
            }
            Err(source) => {
                log::error!("stopping flight loop: {}", source);
                *fault.lock() = Some(FlightFault::from(source));
                break;
            }
        }

        if let Some(period) = period {
            let elapsed = now.elapsed();
            if elapsed < period {
                std::thread::sleep(period - elapsed);
            }
        }
    }
}
