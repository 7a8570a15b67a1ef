use crate::custom::CustomInputEvent;
use std::collections::BTreeMap;

/// Trait for reacting to custom input events.
pub trait CustomInputListener: Send {
    fn on_custom_input(&mut self, event: &CustomInputEvent);
}

impl<F> CustomInputListener for F
where
    F: FnMut(&CustomInputEvent) + Send,
{
    fn on_custom_input(&mut self, event: &CustomInputEvent) {
        self(event)
    }
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    AxisOnly,
    ButtonsOnly,
    Custom(fn(&CustomInputEvent) -> bool),
}

impl EventFilter {
    fn passes(&self, event: &CustomInputEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::AxisOnly => event.is_axis(),
            EventFilter::ButtonsOnly => event.is_button(),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Listener id returned by [`CustomInputBus::add_listener`].
pub type ListenerId = u64;

/// Metadata-wrapped listener with filters and control flags.
struct ListenerEntry {
    listener: Box<dyn CustomInputListener>,
    enabled: bool,
    filter: EventFilter,
    tag: Option<String>, // only events for this custom input name
}

/// Observer list for custom inputs. Listeners are called in registration order.
#[derive(Default)]
pub struct CustomInputBus {
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, ListenerEntry>,
}

impl CustomInputBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener with optional filtering and name tag.
    pub fn add_listener(
        &mut self,
        listener: impl CustomInputListener + 'static,
        filter: EventFilter,
        tag: Option<String>,
    ) -> ListenerId {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                tag,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits one event to all active and matching listeners.
    pub fn emit(&mut self, event: &CustomInputEvent) {
        for entry in self.listeners.values_mut() {
            if !entry.enabled {
                continue;
            }

            if let Some(ref wanted) = entry.tag {
                if event.name != *wanted {
                    continue;
                }
            }

            if entry.filter.passes(event) {
                entry.listener.on_custom_input(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[CustomInputEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::CustomValue;
    use std::sync::{Arc, Mutex};

    fn event(name: &str, value: CustomValue) -> CustomInputEvent {
        CustomInputEvent {
            name: name.to_string(),
            value,
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl CustomInputListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener = move |e: &CustomInputEvent| sink.lock().unwrap().push(e.name.clone());
        (seen, listener)
    }

    #[test]
    fn filters_and_tags_select_events() {
        let mut bus = CustomInputBus::new();
        let (all, l1) = recorder();
        let (axes, l2) = recorder();
        let (zoom, l3) = recorder();
        bus.add_listener(l1, EventFilter::All, None);
        bus.add_listener(l2, EventFilter::AxisOnly, None);
        bus.add_listener(l3, EventFilter::All, Some("zoom".into()));

        bus.emit_all(&[
            event("zoom", CustomValue::Axis(0.5)),
            event("lights", CustomValue::Button(true)),
        ]);

        assert_eq!(*all.lock().unwrap(), vec!["zoom", "lights"]);
        assert_eq!(*axes.lock().unwrap(), vec!["zoom"]);
        assert_eq!(*zoom.lock().unwrap(), vec!["zoom"]);
    }

    #[test]
    fn disabled_and_removed_listeners_are_skipped() {
        let mut bus = CustomInputBus::new();
        let (seen, listener) = recorder();
        let id = bus.add_listener(listener, EventFilter::ButtonsOnly, None);

        bus.disable(id);
        bus.emit(&event("horn", CustomValue::Button(true)));
        assert!(seen.lock().unwrap().is_empty());

        bus.enable(id);
        bus.emit(&event("horn", CustomValue::Button(true)));
        assert_eq!(seen.lock().unwrap().len(), 1);

        bus.remove_listener(id);
        assert!(bus.is_empty());
    }

    #[test]
    fn custom_predicate() {
        let mut bus = CustomInputBus::new();
        let (seen, listener) = recorder();
        bus.add_listener(
            listener,
            EventFilter::Custom(|e| matches!(e.value, CustomValue::Axis(v) if v < 0.0)),
            None,
        );
        bus.emit(&event("a", CustomValue::Axis(0.5)));
        bus.emit(&event("b", CustomValue::Axis(-0.5)));
        assert_eq!(*seen.lock().unwrap(), vec!["b"]);
    }
}
