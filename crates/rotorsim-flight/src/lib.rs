//! # rotorsim Flight
//!
//! Real-time hosting for the rotorsim core. The flight manager runs one
//! vehicle's dynamics and flight controller on a dedicated worker thread,
//! paced by a monotonic clock, and publishes each actuator command into a
//! slot the host reads at its own rate.
//!
//! ## Modules
//!
//! - [`slot`]: Published actuator slot and the host-facing reader
//! - [`input`]: Demand sources (fixed and channel-backed receiver polling)
//! - [`manager`]: Worker-thread scheduling loop and its lifecycle
//! - [`bridge`]: Flat-record boundary for foreign control algorithms

pub mod slot;
pub mod input;
pub mod manager;
pub mod bridge;

pub use slot::{actuator_slot, ActuatorReader, ActuatorSlot, SharedActuatorSlot};
pub use input::{demand_channel, ChannelDemand, DemandSource, FixedDemand};
pub use manager::{FlightConfig, FlightFault, FlightManager, LoopState, ManagerError};
pub use bridge::{
    hover_control, AltHoldRecord, ControlFn, ControlRecord, DemandRecord, MotorRecord,
    RecordController, StateRecord,
};
