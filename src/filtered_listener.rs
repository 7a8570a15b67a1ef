use crate::custom::CustomInputEvent;
use crate::eventbus::CustomInputListener;

/// Wraps a listener and filters events based on a user-supplied predicate.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&CustomInputEvent) -> bool + Send + Sync>,
    inner: Box<dyn CustomInputListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&CustomInputEvent) -> bool + Send + Sync + 'static,
        inner: impl CustomInputListener + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl CustomInputListener for FilteredListener {
    fn on_custom_input(&mut self, event: &CustomInputEvent) {
        if (self.predicate)(event) {
            self.inner.on_custom_input(event);
        }
    }
}
