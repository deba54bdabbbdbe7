use crate::status::{PhilosopherStatus, StatusEvent, StatusSink};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A sink that just collects events for testing with bounded storage
#[derive(Debug)]
pub struct CollectorSink {
    /// Bounded event queue; oldest events are dropped first
    events: Mutex<VecDeque<StatusEvent>>,
    max_events: usize,
}

impl CollectorSink {
    /// Create a new collector sink with default capacity
    pub fn new() -> Self {
        Self::with_capacity(100_000)
    }

    /// Create a new collector sink with specific capacity
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(1024))),
            max_events,
        }
    }

    /// Get all received events in emission order
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().iter().copied().collect()
    }

    /// Get the count of received events
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Events of one 1-based philosopher
    pub fn events_for(&self, philosopher: usize) -> Vec<StatusEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.philosopher == philosopher)
            .copied()
            .collect()
    }

    /// All death announcements
    pub fn deaths(&self) -> Vec<StatusEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.status == PhilosopherStatus::Died)
            .copied()
            .collect()
    }
}

impl Default for CollectorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for CollectorSink {
    fn emit(&self, event: StatusEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}
