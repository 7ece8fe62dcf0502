//! Main simulation runner
//!
//! Couples the rigid-body integrator with a flight controller at a fixed
//! time step and records the trajectory. Single-threaded and
//! deterministic; real-time hosting lives in the companion flight crate.

use thiserror::Error;

use crate::control::{ControlDemand, ControlError, FlightController};
use crate::dynamics::{
    ActuatorCommand, DynamicsError, ParamsError, RigidBodyDynamics, VehicleFrame, VehicleState,
};

use super::SimConfig;

/// Simulation faults
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid vehicle parameters: {0}")]
    Params(#[from] ParamsError),
    #[error("controller drives {controller} actuators but the airframe has {frame} rotors")]
    ActuatorCountMismatch { controller: usize, frame: usize },
    #[error(transparent)]
    Dynamics(#[from] DynamicsError),
    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Simulation output for one timestep
#[derive(Debug, Clone)]
pub struct SimStep {
    /// Simulation time [s]
    pub time: f64,
    /// State the controller observed
    pub state: VehicleState,
    /// Command applied over this step
    pub command: ActuatorCommand,
}

/// Simulation history
#[derive(Debug, Clone, Default)]
pub struct SimHistory {
    /// Time stamps [s]
    pub times: Vec<f64>,
    /// State snapshots
    pub states: Vec<VehicleState>,
    /// Actuator commands applied
    pub commands: Vec<ActuatorCommand>,
}

impl SimHistory {
    /// Record a simulation step
    pub fn record(&mut self, step: &SimStep) {
        self.times.push(step.time);
        self.states.push(step.state);
        self.commands.push(step.command.clone());
    }

    /// Recorded altitudes [m], in step order
    pub fn altitudes(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.altitude()).collect()
    }

    /// Get simulation duration
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Get number of recorded steps
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Main simulator
pub struct Simulator {
    /// Configuration
    pub config: SimConfig,
    /// Vehicle dynamics
    dynamics: RigidBodyDynamics,
    /// Hosted flight controller
    controller: Box<dyn FlightController>,
    /// Command applied on the most recent step
    command: ActuatorCommand,
    /// Current simulation time
    time: f64,
    /// History recorder
    history: SimHistory,
}

impl Simulator {
    /// Create a simulator hosting the native stabilizer from configuration
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        let controller = Box::new(config.control.to_controller(&config.vehicle.params));
        Self::with_controller(config, controller)
    }

    /// Create a simulator hosting a caller-supplied controller
    pub fn with_controller(
        config: SimConfig,
        controller: Box<dyn FlightController>,
    ) -> Result<Self, SimulationError> {
        let frame = config.vehicle.to_frame();
        let rotor_count = frame.rotor_count();
        if controller.actuator_count() != rotor_count {
            return Err(SimulationError::ActuatorCountMismatch {
                controller: controller.actuator_count(),
                frame: rotor_count,
            });
        }

        let mut dynamics =
            RigidBodyDynamics::new(config.vehicle.params.clone(), Box::new(frame))?
                .with_policy(config.vehicle.integrator);
        dynamics.init(
            config.initial_state.position,
            config.initial_state.attitude,
            config.initial_state.airborne,
        );

        Ok(Self {
            config,
            dynamics,
            controller,
            command: ActuatorCommand::zeroed(rotor_count),
            time: 0.0,
            history: SimHistory::default(),
        })
    }

    /// Reset simulation to initial state
    pub fn reset(&mut self) {
        self.dynamics.init(
            self.config.initial_state.position,
            self.config.initial_state.attitude,
            self.config.initial_state.airborne,
        );
        self.controller.reset();
        self.command = ActuatorCommand::zeroed(self.dynamics.actuator_count());
        self.time = 0.0;
        self.history = SimHistory::default();
    }

    /// Advance one control iteration
    ///
    /// The controller observes the current state; the resulting command is
    /// recorded and then drives the dynamics for one `dt`.
    pub fn step(&mut self, demand: &ControlDemand) -> Result<SimStep, SimulationError> {
        let state = self.dynamics.state();
        self.command = self.controller.compute(&state, demand, self.config.dt)?;

        let step = SimStep {
            time: self.time,
            state,
            command: self.command.clone(),
        };
        self.history.record(&step);

        self.dynamics.update(&self.command, self.config.dt)?;
        self.time += self.config.dt;

        Ok(step)
    }

    /// Run for the configured duration with a demand closure
    pub fn run<D>(&mut self, mut demand: D) -> Result<&SimHistory, SimulationError>
    where
        D: FnMut(f64, &VehicleState) -> ControlDemand,
    {
        while self.time < self.config.duration {
            let current = self.dynamics.state();
            let sample = demand(self.time, &current);
            self.step(&sample)?;
        }

        Ok(&self.history)
    }

    /// Run with centered sticks for the configured duration
    pub fn run_neutral(&mut self) -> Result<&SimHistory, SimulationError> {
        self.run(|_time, _state| ControlDemand::neutral())
    }

    /// Get current simulation time
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Get current vehicle state
    pub fn state(&self) -> VehicleState {
        self.dynamics.state()
    }

    /// Command applied on the most recent step
    pub fn command(&self) -> &ActuatorCommand {
        &self.command
    }

    /// Get simulation history
    pub fn history(&self) -> &SimHistory {
        &self.history
    }

    /// Get vehicle dynamics
    pub fn dynamics(&self) -> &RigidBodyDynamics {
        &self.dynamics
    }
}
