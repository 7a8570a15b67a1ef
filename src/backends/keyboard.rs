//! Keyboard and mouse backend.
//!
//! Keys (and mouse buttons, which the host reports as keys like `"Mouse0"`) are
//! level states: a held key reads `1.0` as an axis and `true` as a button.
//! Mouse motion and scroll are per-tick deltas, cleared by
//! [`DeviceSource::end_frame`].

use crate::device::{DeviceSource, MouseAxis, RawId, SourceKind};
use crate::event::RawEvent;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct KeyboardMouse {
    held: HashSet<String>,
    mouse_x: f32,
    mouse_y: f32,
    scroll: f32,
}

impl KeyboardMouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        self.held.insert(code.to_string());
    }

    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }
}

impl DeviceSource for KeyboardMouse {
    fn name(&self) -> &str {
        "keyboard/mouse"
    }

    fn kinds(&self) -> &[SourceKind] {
        &[SourceKind::KeyboardMouse]
    }

    fn read_axis(&self, id: &RawId) -> Option<f32> {
        match id {
            RawId::Key { code } => Some(if self.is_held(code) { 1.0 } else { 0.0 }),
            RawId::MouseAxis { axis } => Some(match axis {
                MouseAxis::X => self.mouse_x,
                MouseAxis::Y => self.mouse_y,
                MouseAxis::ScrollWheel => self.scroll,
            }),
            _ => None,
        }
    }

    fn read_button(&self, id: &RawId) -> Option<bool> {
        match id {
            RawId::Key { code } => Some(self.is_held(code)),
            _ => None,
        }
    }

    fn apply(&mut self, event: &RawEvent) -> bool {
        match event {
            RawEvent::KeyDown { code } => self.press(code),
            RawEvent::KeyUp { code } => self.release(code),
            RawEvent::MouseMoved { dx, dy } => {
                self.mouse_x += dx;
                self.mouse_y += dy;
            }
            RawEvent::MouseScrolled { delta } => self.scroll += delta,
            _ => return false,
        }
        true
    }

    fn end_frame(&mut self) {
        self.mouse_x = 0.0;
        self.mouse_y = 0.0;
        self.scroll = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_levels() {
        let mut kb = KeyboardMouse::new();
        assert!(kb.apply(&RawEvent::KeyDown { code: "W".into() }));
        assert_eq!(kb.read_axis(&RawId::key("W")), Some(1.0));
        assert_eq!(kb.read_button(&RawId::key("W")), Some(true));
        kb.end_frame();
        assert_eq!(kb.read_button(&RawId::key("W")), Some(true));
        kb.apply(&RawEvent::KeyUp { code: "W".into() });
        assert_eq!(kb.read_axis(&RawId::key("W")), Some(0.0));
    }

    #[test]
    fn mouse_deltas_accumulate_then_clear() {
        let mut kb = KeyboardMouse::new();
        kb.apply(&RawEvent::MouseMoved { dx: 0.25, dy: -0.1 });
        kb.apply(&RawEvent::MouseMoved { dx: 0.25, dy: 0.0 });
        let x = RawId::MouseAxis { axis: MouseAxis::X };
        assert_eq!(kb.read_axis(&x), Some(0.5));
        kb.end_frame();
        assert_eq!(kb.read_axis(&x), Some(0.0));
    }

    #[test]
    fn foreign_ids_and_events_are_rejected() {
        let mut kb = KeyboardMouse::new();
        assert_eq!(kb.read_axis(&RawId::axis("Horizontal")), None);
        assert!(!kb.apply(&RawEvent::RemapperReady { ready: true }));
    }
}
