//! Recording of preprocess events.
//!
//! An `OperationRecorder` collects events from concurrent workers until it
//! is stopped. The consumer either retrieves the recorded events or
//! discards them; both stop the recorder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::preprocess::events::PreprocessEvent;

/// Collects preprocess events from concurrent workers.
#[derive(Debug, Default)]
pub struct OperationRecorder {
    events: Mutex<Vec<PreprocessEvent>>,
    stopped: AtomicBool,
}

impl OperationRecorder {
    /// Create a new, running recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. Events recorded after stop are dropped.
    pub fn record(&self, event: PreprocessEvent) {
        if self.stopped.load(Ordering::Acquire) {
            return;
        }
        self.events.lock().unwrap().push(event);
    }

    /// Take all recorded events and stop recording.
    pub fn retrieve_events_and_stop(&self) -> Vec<PreprocessEvent> {
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        self.stop();
        events
    }

    /// Drop all recorded events and stop recording.
    pub fn discard_events_and_stop(&self) {
        if !self.stopped.load(Ordering::Acquire) {
            let discarded = {
                let mut events = self.events.lock().unwrap();
                let count = events.len();
                events.clear();
                count
            };
            tracing::debug!("{} preprocess events discarded", discarded);
            self.stop();
        }
    }

    /// Stop recording.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether the recorder has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
