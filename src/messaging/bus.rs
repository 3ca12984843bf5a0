/// Event bus for pub/sub messaging
///
/// Carries wizard events from the controller to every view-layer subscriber.
/// The bus remembers the latest snapshot, so a view that subscribes after the
/// session started renders the current state right away instead of waiting
/// for the next change.
use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::events::Event;
use crate::wizard::WizardSnapshot;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

#[derive(Default)]
struct BusInner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicUsize,
    latest_snapshot: Mutex<Option<Box<WizardSnapshot>>>,
}

/// Broadcasts events to subscribers; clones share the same subscriber list
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, returns a receiver and subscription ID.
    /// The latest snapshot, if any, is queued first.
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        // Hold the list lock so no publish lands between replay and registration
        let mut subscribers = self.inner.subscribers.write();
        if let Some(snapshot) = self.inner.latest_snapshot.lock().clone() {
            let _ = tx.send(Event::SnapshotChanged(snapshot));
        }
        subscribers.push(Subscriber { id, sender: tx });

        (rx, id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers, returns how many received it.
    ///
    /// Subscribers whose receiver has been dropped are removed.
    pub fn publish(&self, event: Event) -> usize {
        if let Event::SnapshotChanged(snapshot) = &event {
            *self.inner.latest_snapshot.lock() = Some(snapshot.clone());
        }

        let mut delivered = 0;
        let mut disconnected = Vec::new();
        for subscriber in self.inner.subscribers.read().iter() {
            match subscriber.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Disconnected(_)) => disconnected.push(subscriber.id),
                Err(TrySendError::Full(_)) => {}
            }
        }

        if !disconnected.is_empty() {
            tracing::debug!("Pruning {} closed subscriber(s)", disconnected.len());
            self.inner
                .subscribers
                .write()
                .retain(|s| !disconnected.contains(&s.id));
        }
        delivered
    }

    /// Snapshot most recently published, if any
    pub fn latest_snapshot(&self) -> Option<WizardSnapshot> {
        self.inner
            .latest_snapshot
            .lock()
            .as_deref()
            .cloned()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::WizardConfig;
    use crate::wizard::{WizardController, WizardStage};

    #[test]
    fn test_event_bus_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let (rx1, _id1) = bus.subscribe();
        let (rx2, _id2) = bus.subscribe();

        assert_eq!(bus.publish(Event::AmountTick { value: 33 }), 2);

        for rx in [rx1, rx2] {
            match rx.try_recv().unwrap() {
                Event::AmountTick { value } => assert_eq!(value, 33),
                other => panic!("Wrong event type received: {:?}", other),
            }
        }
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();
        let (_kept, _id2) = bus.subscribe();
        drop(rx);

        assert_eq!(bus.publish(Event::SessionClosed), 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_late_subscriber_gets_current_snapshot() {
        let bus = EventBus::new();
        assert!(bus.latest_snapshot().is_none());

        let clock = ManualClock::new();
        let mut controller =
            WizardController::new(WizardConfig::default(), Arc::new(clock.clone()), bus.clone());
        clock.advance_ms(2500);
        controller.poll();

        let (rx, _id) = bus.subscribe();
        match rx.try_recv().unwrap() {
            Event::SnapshotChanged(snapshot) => {
                assert_eq!(snapshot.stage, WizardStage::ClaimQuestion)
            }
            other => panic!("Expected a snapshot first, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(
            bus.latest_snapshot().map(|snapshot| snapshot.stage),
            Some(WizardStage::ClaimQuestion)
        );
    }

    #[test]
    fn test_event_bus_clone() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let (_rx, _id) = bus1.subscribe();
        assert_eq!(bus1.subscriber_count(), 1);
        assert_eq!(bus2.subscriber_count(), 1); // Shared state
    }
}
