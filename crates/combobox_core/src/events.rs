//! Notifications emitted by a widget.

use parking_lot::Mutex;
use std::sync::Arc;

/// Events emitted by a combobox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComboboxEvent {
    /// The committed selection changed. Carries the selected values in
    /// backing-store order.
    Changed {
        /// Selected values after the change.
        values: Vec<String>,
    },
    /// The dropdown was opened.
    Opened,
    /// The dropdown was closed.
    Closed,
    /// A created option was rolled back by the confirmation channel.
    CreateRejected {
        /// Value that was removed.
        value: String,
        /// Message shown in the error banner.
        message: String,
    },
}

impl ComboboxEvent {
    /// Whether this is a selection change notification.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Handle returned by [`EventEmitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&ComboboxEvent)>;

/// Subscriber list for widget events.
#[derive(Default)]
pub struct EventEmitter {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl EventEmitter {
    /// Register a subscriber.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&ComboboxEvent) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber, in subscription order.
    pub fn emit(&mut self, event: ComboboxEvent) {
        tracing::trace!(event = ?event, subscribers = self.subscribers.len(), "Emitting event");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// Number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Shared log of events, usable as a subscriber.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ComboboxEvent>>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber closure that appends to this recorder.
    pub fn subscriber(&self) -> impl FnMut(&ComboboxEvent) + 'static {
        let events = Arc::clone(&self.events);
        move |event| events.lock().push(event.clone())
    }

    /// Snapshot of every recorded event.
    pub fn events(&self) -> Vec<ComboboxEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded change notifications.
    pub fn change_count(&self) -> usize {
        self.events.lock().iter().filter(|e| e.is_change()).count()
    }

    /// Values carried by the most recent change notification.
    pub fn last_values(&self) -> Option<Vec<String>> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ComboboxEvent::Changed { values } => Some(values.clone()),
            _ => None,
        })
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let mut emitter = EventEmitter::default();
        let first = EventRecorder::new();
        let second = EventRecorder::new();
        emitter.subscribe(first.subscriber());
        let id = emitter.subscribe(second.subscriber());

        emitter.emit(ComboboxEvent::Opened);
        assert!(emitter.unsubscribe(id));
        emitter.emit(ComboboxEvent::Changed { values: vec!["a".into()] });

        assert_eq!(first.events().len(), 2);
        assert_eq!(second.events(), vec![ComboboxEvent::Opened]);
        assert_eq!(first.change_count(), 1);
        assert_eq!(first.last_values(), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_recorder_clear() {
        let recorder = EventRecorder::new();
        let mut subscriber = recorder.subscriber();
        subscriber(&ComboboxEvent::Closed);
        recorder.clear();
        assert!(recorder.events().is_empty());
    }
}
