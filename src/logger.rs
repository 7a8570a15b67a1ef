use crate::custom::{CustomInputEvent, CustomValue};
use crate::eventbus::CustomInputListener;

/// A listener that logs every custom input event at `info` level.
#[derive(Debug, Default)]
pub struct LogListener;

impl LogListener {
    pub fn new() -> Self {
        LogListener
    }
}

impl CustomInputListener for LogListener {
    fn on_custom_input(&mut self, event: &CustomInputEvent) {
        match event.value {
            CustomValue::Button(pressed) => log::info!("[custom] {} pressed={}", event.name, pressed),
            CustomValue::Axis(value) => log::info!("[custom] {} = {:.3}", event.name, value),
        }
    }
}
