//! Input backends for `stickflow`.
//!
//! Implementations of [`DeviceSource`](crate::device::DeviceSource), one per
//! backend family. All of them are state stores fed by the host through
//! [`RawEvent`](crate::event::RawEvent)s; none of them talks to hardware.
//!
//! | Backend          | Source kinds                                            |
//! |------------------|---------------------------------------------------------|
//! | [`KeyboardMouse`] | `KeyboardMouse`                                        |
//! | [`LegacyAxes`]    | `LegacyAxis`                                           |
//! | [`ActionMap`]     | `ActionBinding`                                        |
//! | [`VrRig`]         | `VrControllerAxis`, `VrControllerButton`, `VrPose`     |
//! | [`Remapper`]      | `RemappedAction`                                       |

use crate::device::DeviceSource;

pub mod action;
pub mod keyboard;
pub mod legacy;
pub mod remap;
pub mod vr;

pub use action::{ActionMap, ActionValue};
pub use keyboard::KeyboardMouse;
pub use legacy::LegacyAxes;
pub use remap::Remapper;
pub use vr::VrRig;

/// One instance of every backend, for hosts that do not curate their own set.
pub fn default_sources() -> Vec<Box<dyn DeviceSource>> {
    vec![
        Box::new(KeyboardMouse::new()),
        Box::new(LegacyAxes::new()),
        Box::new(ActionMap::new()),
        Box::new(VrRig::new()),
        Box::new(Remapper::new()),
    ]
}
