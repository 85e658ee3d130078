// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for approval state changes.

use shep_core::Event;
use tokio::sync::broadcast;

/// Fire-and-forget event publication.
///
/// Publishing never fails from the caller's point of view: a bus with no
/// subscribers simply drops the event.
pub trait EventBus: Send + Sync + 'static {
    fn publish(&self, event: Event);
}

/// In-process bus backed by a tokio broadcast channel.
///
/// Slow subscribers that fall more than `capacity` events behind observe a
/// `Lagged` error on their receiver and skip ahead.
#[derive(Clone, Debug)]
pub struct BroadcastBus {
    tx: broadcast::Sender<Event>,
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus for BroadcastBus {
    fn publish(&self, event: Event) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            tracing::debug!(event = name, "no bus subscribers, event dropped");
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::EventBus;
    use parking_lot::Mutex;
    use shep_core::Event;
    use std::sync::Arc;

    /// Recording bus for tests
    #[derive(Clone, Default)]
    pub struct FakeEventBus {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl FakeEventBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }

        /// Type tags of every published event, in order
        pub fn names(&self) -> Vec<&'static str> {
            self.events.lock().iter().map(Event::name).collect()
        }
    }

    impl EventBus for FakeEventBus {
        fn publish(&self, event: Event) {
            self.events.lock().push(event);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEventBus;

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
