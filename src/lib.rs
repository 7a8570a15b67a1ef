//! stickflow: frame-based input normalization.
//!
//! Reads heterogeneous raw input (keyboard/mouse, named axes, action bindings,
//! VR controllers and poses, a remapping layer), shapes and smooths it, and
//! hands one canonical [`InputFrame`] per tick to a [`Consumer`].
//!
//! ```no_run
//! use stickflow::{
//!     AxisBinding, AxisChannel, BindingProfile, InputFrame, InputModule, RawEvent, RawId,
//!     SourceKind,
//! };
//!
//! let profile = BindingProfile::new("ship").with_axis(
//!     AxisChannel::Horizontal,
//!     AxisBinding::combined(SourceKind::KeyboardMouse, RawId::key("D"), RawId::key("A"))
//!         .with_smoothing(3.0, 3.0),
//! );
//! let mut module = InputModule::with_default_sources(profile);
//! module.initialize().expect("valid profile");
//!
//! module.dispatch(&RawEvent::KeyDown { code: "D".into() });
//! module.tick(1.0 / 60.0, &mut |frame: &InputFrame| {
//!     println!("horizontal = {:.2}", frame.horizontal());
//! });
//! ```

pub mod backends;
pub mod binding;
pub mod custom;
pub mod device;
pub mod discovery;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod frame;
pub mod logger;
pub mod manager;
pub mod module;
pub mod pose;
pub mod smoother;
pub mod trigger;

pub use binding::*;
pub use custom::{CustomBinding, CustomControl, CustomInputEvent, CustomValue};
pub use device::*;
pub use error::{InputError, Result};
pub use event::*;
pub use eventbus::*;
pub use frame::*;
pub use manager::*;
pub use module::*;
pub use pose::{angle_to_axis, quat_to_axis, AxisSign, EulerAxis, PoseMapping, WrapMode};
pub use smoother::{smooth, AxisState};
