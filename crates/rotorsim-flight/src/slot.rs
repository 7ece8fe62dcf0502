//! Published actuator slot
//!
//! Single-slot exchange carrying the most recent actuator command from
//! the flight loop to the host. The worker overwrites the slot once per
//! iteration; readers clone the whole command under the lock, so every
//! read is one complete publication and never a mix of two. No history
//! accumulates, and a reader faster than the loop sees the same
//! publication repeatedly.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rotorsim_core::dynamics::ActuatorCommand;

/// Single-slot actuator container
///
/// Writer side is the flight loop only; any number of readers may
/// snapshot concurrently. The publish counter supports shutdown checks
/// (no publications after a stop has joined).
pub struct ActuatorSlot {
    current: Mutex<ActuatorCommand>,
    /// Counter for total commands published
    publishes: AtomicU64,
}

impl ActuatorSlot {
    /// Slot reading all-zero for `count` actuators until the first publish
    pub fn new(count: usize) -> Self {
        Self {
            current: Mutex::new(ActuatorCommand::zeroed(count)),
            publishes: AtomicU64::new(0),
        }
    }

    /// Overwrite the slot with a new command
    pub fn publish(&self, command: ActuatorCommand) {
        *self.current.lock() = command;
        self.publishes.fetch_add(1, Ordering::Release);
    }

    /// Clone the most recent publication
    pub fn snapshot(&self) -> ActuatorCommand {
        self.current.lock().clone()
    }

    /// Most recent value for one actuator; out-of-range indices read 0.0
    pub fn value(&self, index: usize) -> f64 {
        self.current.lock().value(index)
    }

    /// Number of publications so far
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::Acquire)
    }
}

/// Thread-safe shared actuator slot
pub type SharedActuatorSlot = Arc<ActuatorSlot>;

/// Create a new shared actuator slot
pub fn actuator_slot(count: usize) -> SharedActuatorSlot {
    Arc::new(ActuatorSlot::new(count))
}

/// Host-facing read handle for the actuator slot
///
/// Cheap to clone and hand to render/engine glue. All reads are
/// non-blocking and infallible; after the loop stops the reader keeps
/// serving the last published command.
#[derive(Clone)]
pub struct ActuatorReader {
    slot: SharedActuatorSlot,
}

impl ActuatorReader {
    pub fn new(slot: SharedActuatorSlot) -> Self {
        Self { slot }
    }

    /// Most recent value for one actuator
    pub fn value(&self, index: usize) -> f64 {
        self.slot.value(index)
    }

    /// Clone of the most recent command
    pub fn snapshot(&self) -> ActuatorCommand {
        self.slot.snapshot()
    }

    /// Number of publications so far
    pub fn publish_count(&self) -> u64 {
        self.slot.publish_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_reads_zero_before_first_publish() {
        let slot = ActuatorSlot::new(4);

        assert_eq!(slot.publish_count(), 0);
        assert_eq!(slot.value(0), 0.0);
        assert_eq!(slot.value(3), 0.0);
        assert_eq!(slot.snapshot().len(), 4);
    }

    #[test]
    fn test_publish_overwrites() {
        let slot = ActuatorSlot::new(4);

        slot.publish(ActuatorCommand::from_slice(&[0.1, 0.2, 0.3, 0.4]));
        slot.publish(ActuatorCommand::from_slice(&[0.5, 0.6, 0.7, 0.8]));

        assert_eq!(slot.publish_count(), 2);
        assert_eq!(slot.value(0), 0.5);
        assert_eq!(slot.value(3), 0.8);
    }

    #[test]
    fn test_out_of_range_value_reads_zero() {
        let slot = ActuatorSlot::new(4);
        slot.publish(ActuatorCommand::from_slice(&[0.9; 4]));

        assert_eq!(slot.value(7), 0.0);
    }

    #[test]
    fn test_reader_clones_share_the_slot() {
        let slot = actuator_slot(4);
        let reader = ActuatorReader::new(Arc::clone(&slot));
        let clone = reader.clone();

        slot.publish(ActuatorCommand::from_slice(&[0.42; 4]));

        assert_eq!(reader.value(0), 0.42);
        assert_eq!(clone.value(0), 0.42);
        assert_eq!(clone.publish_count(), 1);
    }

    #[test]
    fn test_concurrent_snapshots_are_never_torn() {
        let slot = actuator_slot(4);

        // Writer publishes uniform patterns; a torn read would mix levels
        let writer = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                for k in 0..2000u64 {
                    let level = (k % 101) as f64 / 100.0;
                    slot.publish(ActuatorCommand::from_slice(&[level; 4]));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for _ in 0..2000 {
                        let snapshot = slot.snapshot();
                        let first = snapshot.value(0);
                        for i in 1..snapshot.len() {
                            assert_eq!(snapshot.value(i), first, "torn snapshot");
                        }
                    }
                })
            })
            .collect();

        writer.join().expect("writer finishes");
        for reader in readers {
            reader.join().expect("reader finishes");
        }
        assert_eq!(slot.publish_count(), 2000);
    }
}
