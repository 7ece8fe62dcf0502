//! Demand sources
//!
//! Where the flight loop gets its pilot demand. A source is polled
//! non-blockingly once per iteration; `None` means no fresh sample, and
//! the loop keeps flying on the previous one rather than treating the
//! gap as a fault.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use rotorsim_core::control::ControlDemand;

/// Per-iteration demand supplier
pub trait DemandSource: Send {
    /// Non-blocking poll; `None` when no fresh sample is available
    fn poll(&mut self) -> Option<ControlDemand>;
}

/// Constant demand, for tests and unattended runs
#[derive(Debug, Clone)]
pub struct FixedDemand {
    demand: ControlDemand,
}

impl FixedDemand {
    pub fn new(demand: ControlDemand) -> Self {
        Self { demand }
    }

    /// Centered sticks forever
    pub fn neutral() -> Self {
        Self::new(ControlDemand::neutral())
    }
}

impl DemandSource for FixedDemand {
    fn poll(&mut self) -> Option<ControlDemand> {
        Some(self.demand)
    }
}

/// Channel-backed demand fed by a host thread
///
/// Every poll drains the channel and keeps only the newest sample;
/// anything older is stale the moment a newer one exists. A
/// disconnected sender downgrades the source to permanently quiet, and
/// the loop flies on whatever arrived last.
pub struct ChannelDemand {
    receiver: Receiver<ControlDemand>,
    disconnected: bool,
}

impl ChannelDemand {
    pub fn new(receiver: Receiver<ControlDemand>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }
}

impl DemandSource for ChannelDemand {
    fn poll(&mut self) -> Option<ControlDemand> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(sample) => latest = Some(sample),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        self.disconnected = true;
                        log::warn!("demand channel disconnected, holding last demand");
                    }
                    break;
                }
            }
        }
        latest
    }
}

/// Unbounded demand channel: keep the sender on the host side, hand the
/// source to the flight manager
pub fn demand_channel() -> (Sender<ControlDemand>, ChannelDemand) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (sender, ChannelDemand::new(receiver))
}
