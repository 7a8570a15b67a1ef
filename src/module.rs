//! The tick-driven input module.
//!
//! [`InputModule`] owns the backends, the binding profile, the smoothing memory
//! and the [`InputFrame`]. The host drives it explicitly:
//!
//! ```text
//! new ──initialize──▶ Enabled ◀──enable_input──┐
//!                       │                      │
//!                       └──disable_input──▶ DisabledFull / DisabledCustomOnly
//! ```
//!
//! Each frame the host pushes raw events ([`InputModule::dispatch`]), then calls
//! [`InputModule::tick`] and, if it tracks VR poses, [`InputModule::late_tick`].
//!
//! Nothing in the tick path fails: unresolvable channels and missing backends
//! are logged once and read neutral.

use crate::binding::{AxisBinding, AxisMode, BindingProfile, ButtonBinding, StartState};
use crate::custom::CustomChannel;
use crate::device::{DeviceSource, SourceKind};
use crate::discovery::{AvailabilityProbe, ProbeState};
use crate::error::{InputError, Result};
use crate::event::RawEvent;
use crate::eventbus::{CustomInputBus, CustomInputListener, EventFilter, ListenerId};
use crate::frame::{AxisChannel, ButtonChannel, InputFrame};
use crate::manager::SourceManager;
use crate::smoother::AxisState;
use crate::trigger::ButtonLatch;
use std::collections::{BTreeMap, BTreeSet};

/// Receives the assembled frame once per delivery.
pub trait Consumer {
    fn accept(&mut self, frame: &InputFrame);
}

impl<F> Consumer for F
where
    F: FnMut(&InputFrame),
{
    fn accept(&mut self, frame: &InputFrame) {
        self(frame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Uninitialized,
    Enabled,
    /// Ticks are no-ops.
    DisabledFull,
    /// Only custom inputs are evaluated.
    DisabledCustomOnly,
}

#[derive(Debug, Default)]
struct AxisSlot {
    binding: Option<AxisBinding>,
    source: Option<usize>,
    state: AxisState,
    warned: bool,
}

#[derive(Debug, Default)]
struct ButtonSlot {
    binding: Option<ButtonBinding>,
    source: Option<usize>,
    latch: ButtonLatch,
    warned: bool,
}

#[derive(Debug)]
struct CustomSlot {
    channel: CustomChannel,
    source: Option<usize>,
    warned: bool,
}

/// Availability bookkeeping for one bound backend.
#[derive(Debug)]
struct BackendStatus {
    kind: SourceKind,
    probe: Option<AvailabilityProbe>,
    gave_up_logged: bool,
    /// Set while the backend reports unavailable; cleared when it comes back.
    unavailable_logged: bool,
}

impl BackendStatus {
    fn is_ready(&self) -> bool {
        self.probe.as_ref().map_or(true, AvailabilityProbe::is_ready)
    }
}

/// Resolve a bound source index to a readable source, or `None` if it should read neutral.
fn usable<'a>(
    sources: &'a SourceManager,
    backends: &BTreeMap<usize, BackendStatus>,
    index: Option<usize>,
) -> Option<&'a dyn DeviceSource> {
    let index = index?;
    if !backends.get(&index).is_some_and(BackendStatus::is_ready) {
        return None;
    }
    sources.get(index).filter(|s| s.is_available())
}

fn warn_unresolved(warned: &mut bool, channel: &str, detail: String) {
    if !*warned {
        *warned = true;
        let err = InputError::UnconfiguredChannel {
            channel: channel.to_string(),
            reason: detail,
        };
        log::warn!("{err}; reading neutral");
    }
}

pub struct InputModule {
    profile: BindingProfile,
    sources: SourceManager,
    state: ModuleState,
    frame: InputFrame,
    axes: [AxisSlot; 6],
    buttons: [ButtonSlot; 5],
    custom: Vec<CustomSlot>,
    backends: BTreeMap<usize, BackendStatus>,
    bus: CustomInputBus,
}

impl InputModule {
    pub fn new(profile: BindingProfile, sources: SourceManager) -> Self {
        Self {
            profile,
            sources,
            state: ModuleState::Uninitialized,
            frame: InputFrame::default(),
            axes: Default::default(),
            buttons: Default::default(),
            custom: Vec::new(),
            backends: BTreeMap::new(),
            bus: CustomInputBus::new(),
        }
    }

    /// Module over one instance of every built-in backend.
    pub fn with_default_sources(profile: BindingProfile) -> Self {
        Self::new(profile, SourceManager::with_defaults())
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != ModuleState::Uninitialized
    }

    /// Last assembled frame.
    pub fn frame(&self) -> &InputFrame {
        &self.frame
    }

    pub fn profile(&self) -> &BindingProfile {
        &self.profile
    }

    pub fn sources(&self) -> &SourceManager {
        &self.sources
    }

    /// Whether any channel is evaluated in [`late_tick`](Self::late_tick).
    pub fn has_pose_channels(&self) -> bool {
        self.axes
            .iter()
            .any(|s| s.binding.as_ref().is_some_and(AxisBinding::is_pose))
    }

    /// Whether channels bound to `kind` read their backend this tick.
    ///
    /// `None` if no channel is bound to `kind` or no backend serves it. `Some(false)`
    /// while the backend is still being probed, was given up, or reports unavailable.
    pub fn backend_ready(&self, kind: SourceKind) -> Option<bool> {
        let index = self.sources.index_of(kind)?;
        let status = self.backends.get(&index)?;
        Some(status.is_ready() && self.sources.get(index).is_some_and(|s| s.is_available()))
    }

    /// Availability of the backend serving `kind`, if it is bound and probed.
    pub fn probe_state(&self, kind: SourceKind) -> Option<ProbeState> {
        let index = self.sources.index_of(kind)?;
        self.backends
            .get(&index)?
            .probe
            .as_ref()
            .map(AvailabilityProbe::state)
    }

    /// Bind channels to backends and enter the configured start state.
    /// Calling it again is a no-op.
    ///
    /// Identifiers a backend cannot resolve are warned about on the first tick
    /// that reads them. [`LegacyAxes`](crate::backends::LegacyAxes) only knows
    /// names the host has reported or declared with
    /// [`declare_axis`](crate::backends::LegacyAxes::declare_axis), so declare
    /// the names a profile uses before the first tick.
    pub fn initialize(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }
        self.profile.validate()?;
        self.bind();
        self.state = match self.profile.settings.start_state {
            StartState::Enabled => ModuleState::Enabled,
            StartState::CustomOnly => ModuleState::DisabledCustomOnly,
        };
        log::info!(
            "Input module '{}' initialized ({:?})",
            self.profile.name,
            self.state
        );
        Ok(())
    }

    /// Force [`ModuleState::Enabled`], initializing first if needed.
    pub fn enable_input(&mut self) -> Result<()> {
        self.initialize()?;
        if self.state != ModuleState::Enabled {
            log::info!("Input module '{}' enabled", self.profile.name);
        }
        self.state = ModuleState::Enabled;
        Ok(())
    }

    /// Reset the frame to neutral and stop reading the vehicle channels.
    /// With `allow_custom_only`, custom inputs keep running.
    pub fn disable_input(&mut self, allow_custom_only: bool) {
        if !self.is_initialized() {
            log::debug!("disable_input on an uninitialized module ignored");
            return;
        }
        self.reset_channels();
        self.state = if allow_custom_only {
            ModuleState::DisabledCustomOnly
        } else {
            ModuleState::DisabledFull
        };
        log::info!(
            "Input module '{}' disabled ({:?})",
            self.profile.name,
            self.state
        );
    }

    /// Swap in a new profile. The module keeps its state; smoothing memory resets.
    pub fn reconfigure(&mut self, profile: BindingProfile) -> Result<()> {
        profile.validate()?;
        self.profile = profile;
        if self.is_initialized() {
            self.rebind();
        }
        log::info!("Input module reconfigured with '{}'", self.profile.name);
        Ok(())
    }

    /// Back to [`ModuleState::Uninitialized`]; listeners stay registered.
    pub fn shutdown(&mut self) {
        self.reset_channels();
        self.axes = Default::default();
        self.buttons = Default::default();
        self.custom.clear();
        self.backends.clear();
        self.frame = InputFrame::default();
        self.state = ModuleState::Uninitialized;
    }

    /// Register (or replace) a backend; bindings are re-resolved if initialized.
    pub fn add_source<S: DeviceSource + 'static>(&mut self, source: S) {
        self.sources.add_source(source);
        if self.is_initialized() {
            self.rebind();
        }
    }

    /// Push one host event into the backend that consumes it.
    pub fn dispatch(&mut self, event: &RawEvent) -> bool {
        self.sources.dispatch(event)
    }

    pub fn dispatch_all(&mut self, events: &[RawEvent]) {
        self.sources.dispatch_all(events);
    }

    pub fn add_listener(
        &mut self,
        listener: impl CustomInputListener + 'static,
        filter: EventFilter,
        tag: Option<String>,
    ) -> ListenerId {
        self.bus.add_listener(listener, filter, tag)
    }

    pub fn bus_mut(&mut self) -> &mut CustomInputBus {
        &mut self.bus
    }

    /// Main per-frame pass: custom inputs, then every non-pose channel, then delivery.
    pub fn tick<C: Consumer + ?Sized>(&mut self, dt: f32, consumer: &mut C) {
        match self.state {
            ModuleState::Uninitialized | ModuleState::DisabledFull => {}
            ModuleState::DisabledCustomOnly => {
                self.refresh_backends(dt);
                self.update_custom(dt);
            }
            ModuleState::Enabled => {
                self.refresh_backends(dt);
                self.update_custom(dt);
                self.update_axes(dt, false);
                self.update_buttons();

                #[cfg(all(feature = "debug-log", debug_assertions))]
                log::trace!("[frame] {:?}", self.frame);

                consumer.accept(&self.frame);
            }
        }
        self.sources.end_frame();
    }

    /// Late pass for pose-derived channels; re-delivers the frame when any exist.
    pub fn late_tick<C: Consumer + ?Sized>(&mut self, dt: f32, consumer: &mut C) {
        if self.state != ModuleState::Enabled || !self.has_pose_channels() {
            return;
        }
        self.update_axes(dt, true);
        consumer.accept(&self.frame);
    }

    fn reset_channels(&mut self) {
        self.frame.reset();
        for slot in self.axes.iter_mut() {
            slot.state.reset();
        }
        self.seed_latches();
    }

    /// Re-resolve bindings on a running module without re-firing held buttons.
    fn rebind(&mut self) {
        self.bind();
        self.seed_latches();
    }

    /// Seed every button latch from the current raw state, so a press held
    /// across a reset or rebind does not fire again until released.
    fn seed_latches(&mut self) {
        let Self {
            sources,
            backends,
            buttons,
            custom,
            ..
        } = self;
        for slot in buttons.iter_mut() {
            let held = match (&slot.binding, usable(sources, backends, slot.source)) {
                (Some(binding), Some(source)) => binding.read(source),
                _ => false,
            };
            slot.latch.seed(held);
        }
        for slot in custom.iter_mut() {
            slot.channel.reset(usable(sources, backends, slot.source));
        }
    }

    /// Resolve every binding in the profile against the registered backends.
    fn bind(&mut self) {
        let settings = self.profile.settings.clone();
        let mut missing: BTreeSet<SourceKind> = BTreeSet::new();
        let mut backends: BTreeMap<usize, BackendStatus> = BTreeMap::new();

        let mut resolve = |kind: SourceKind, sources: &SourceManager| -> Option<usize> {
            let Some(index) = sources.index_of(kind) else {
                if missing.insert(kind) {
                    log::warn!(
                        "{}; channels bound to it read neutral",
                        InputError::BackendUnavailable { kind }
                    );
                }
                return None;
            };
            backends.entry(index).or_insert_with(|| {
                let needs_probe = sources.get(index).is_some_and(|s| s.needs_probe());
                BackendStatus {
                    kind,
                    probe: needs_probe.then(|| {
                        AvailabilityProbe::new(settings.probe_interval_secs, settings.probe_attempts)
                    }),
                    gave_up_logged: false,
                    unavailable_logged: false,
                }
            });
            Some(index)
        };

        let mut frame = InputFrame::default();

        for channel in AxisChannel::ALL {
            let binding = self.profile.axes.get(channel).cloned();
            let source = binding.as_ref().and_then(|b| resolve(b.source, &self.sources));
            let mut warned = false;
            if let Some(b) = &binding {
                frame.set_axis_enabled(channel, !b.discard);
                if b.mode != AxisMode::NoInput && b.positive.is_none() {
                    warn_unresolved(&mut warned, channel.name(), "no identifier assigned".into());
                }
            }
            self.axes[channel.index()] = AxisSlot {
                binding,
                source,
                state: AxisState::default(),
                warned,
            };
        }

        for channel in ButtonChannel::ALL {
            let binding = self.profile.buttons.get(channel).cloned();
            let source = binding.as_ref().and_then(|b| resolve(b.source, &self.sources));
            let mut warned = false;
            if let Some(b) = &binding {
                frame.set_button_enabled(channel, !b.discard);
                if !b.is_configured() {
                    warn_unresolved(&mut warned, channel.name(), "no identifier assigned".into());
                }
            }
            self.buttons[channel.index()] = ButtonSlot {
                binding,
                source,
                latch: ButtonLatch::default(),
                warned,
            };
        }

        self.custom = self
            .profile
            .custom
            .iter()
            .map(|binding| {
                let source = resolve(binding.source(), &self.sources);
                let mut warned = false;
                if !binding.is_configured() {
                    warn_unresolved(
                        &mut warned,
                        &format!("custom:{}", binding.name),
                        "no identifier assigned".into(),
                    );
                }
                CustomSlot {
                    channel: CustomChannel::new(binding.clone()),
                    source,
                    warned,
                }
            })
            .collect();

        self.backends = backends;
        self.frame = frame;
    }

    /// Advance availability probes, then warn once per backend that stops
    /// serving reads.
    fn refresh_backends(&mut self, dt: f32) {
        let Self {
            sources, backends, ..
        } = self;
        for (index, status) in backends.iter_mut() {
            let Some(source) = sources.get_mut(*index) else {
                continue;
            };
            if let Some(probe) = status.probe.as_mut() {
                match probe.step(dt, &mut *source) {
                    ProbeState::Searching => continue,
                    ProbeState::GaveUp => {
                        if !status.gave_up_logged {
                            status.gave_up_logged = true;
                            log::warn!(
                                "{} after {} probe(s); channels bound to it read neutral",
                                InputError::BackendUnavailable { kind: status.kind },
                                probe.attempts()
                            );
                        }
                        continue;
                    }
                    ProbeState::Ready => {}
                }
            }

            if source.is_available() {
                if status.unavailable_logged {
                    status.unavailable_logged = false;
                    log::info!("Backend '{}' available again", source.name());
                }
            } else if !status.unavailable_logged {
                status.unavailable_logged = true;
                log::warn!(
                    "{} ('{}' reports unavailable); channels bound to it read neutral",
                    InputError::BackendUnavailable { kind: status.kind },
                    source.name()
                );
            }
        }
    }

    fn update_custom(&mut self, dt: f32) {
        let Self {
            sources,
            backends,
            custom,
            bus,
            ..
        } = self;
        for slot in custom.iter_mut() {
            let source = usable(sources, backends, slot.source);
            let read = slot.channel.evaluate(source, dt);
            if !read.resolved {
                let name = format!("custom:{}", slot.channel.binding.name);
                warn_unresolved(&mut slot.warned, &name, "identifier not resolved".into());
            }
            if let Some(event) = read.event {
                bus.emit(&event);
            }
        }
    }

    /// `pose_pass` selects pose-derived channels (late pass) or all others.
    fn update_axes(&mut self, dt: f32, pose_pass: bool) {
        let Self {
            sources,
            backends,
            axes,
            frame,
            ..
        } = self;
        for channel in AxisChannel::ALL {
            let slot = &mut axes[channel.index()];
            let Some(binding) = &slot.binding else {
                if !pose_pass {
                    frame.set_axis(channel, 0.0);
                }
                continue;
            };
            if binding.is_pose() != pose_pass {
                continue;
            }
            if binding.discard {
                slot.state.reset();
                frame.set_axis(channel, 0.0);
                continue;
            }

            let raw = match usable(sources, backends, slot.source) {
                Some(source) => binding.try_read(source),
                None => Some(0.0),
            };
            let target = match raw {
                Some(v) => v,
                None => {
                    warn_unresolved(
                        &mut slot.warned,
                        channel.name(),
                        "identifier not resolved by its backend".into(),
                    );
                    0.0
                }
            };
            let value = if binding.smooths() {
                slot.state
                    .advance(target, binding.sensitivity, binding.gravity, dt)
            } else {
                slot.state.set(target)
            };
            frame.set_axis(channel, value);
        }
    }

    fn update_buttons(&mut self) {
        let Self {
            sources,
            backends,
            buttons,
            frame,
            ..
        } = self;
        for channel in ButtonChannel::ALL {
            let slot = &mut buttons[channel.index()];
            let Some(binding) = &slot.binding else {
                frame.set_button(channel, false);
                continue;
            };
            if binding.discard {
                slot.latch.reset();
                frame.set_button(channel, false);
                continue;
            }

            let raw = match usable(sources, backends, slot.source) {
                Some(source) => binding.try_read(source),
                None => Some(false),
            };
            let down = match raw {
                Some(pressed) => pressed,
                None => {
                    warn_unresolved(
                        &mut slot.warned,
                        channel.name(),
                        "identifier not resolved by its backend".into(),
                    );
                    false
                }
            };
            let fired = slot.latch.update(down, binding.can_be_held);
            frame.set_button(channel, fired);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RawId;

    /// Host backend that never needs probing but can drop out at runtime.
    struct Flaky {
        online: bool,
    }

    impl DeviceSource for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn kinds(&self) -> &[SourceKind] {
            &[SourceKind::LegacyAxis]
        }

        fn read_axis(&self, id: &RawId) -> Option<f32> {
            matches!(id, RawId::Axis { .. }).then_some(0.8)
        }

        fn read_button(&self, _id: &RawId) -> Option<bool> {
            None
        }

        fn apply(&mut self, event: &RawEvent) -> bool {
            match event {
                RawEvent::ButtonChanged { name, pressed } if name == "online" => {
                    self.online = *pressed;
                    true
                }
                _ => false,
            }
        }

        fn is_available(&self) -> bool {
            self.online
        }
    }

    fn online(pressed: bool) -> RawEvent {
        RawEvent::ButtonChanged {
            name: "online".into(),
            pressed,
        }
    }

    fn flaky_module() -> InputModule {
        let profile = BindingProfile::new("flaky").with_axis(
            AxisChannel::Vertical,
            AxisBinding::single(SourceKind::LegacyAxis, RawId::axis("Lift")),
        );
        let mut sources = SourceManager::new();
        sources.add_source(Flaky { online: true });
        let mut module = InputModule::new(profile, sources);
        module.initialize().expect("valid");
        module
    }

    fn status(module: &InputModule) -> &BackendStatus {
        let index = module
            .sources
            .index_of(SourceKind::LegacyAxis)
            .expect("bound");
        &module.backends[&index]
    }

    #[test]
    fn unavailable_backend_is_flagged_once_and_rearmed() {
        let mut module = flaky_module();
        let mut sink = |_: &InputFrame| {};

        module.tick(0.1, &mut sink);
        assert_eq!(module.frame().vertical(), 0.8);
        assert!(!status(&module).unavailable_logged);

        module.dispatch(&online(false));
        module.tick(0.1, &mut sink);
        assert_eq!(module.frame().vertical(), 0.0);
        assert!(status(&module).unavailable_logged);
        assert_eq!(module.backend_ready(SourceKind::LegacyAxis), Some(false));

        module.tick(0.1, &mut sink);
        assert!(status(&module).unavailable_logged);

        module.dispatch(&online(true));
        module.tick(0.1, &mut sink);
        assert_eq!(module.frame().vertical(), 0.8);
        assert!(!status(&module).unavailable_logged);
        assert_eq!(module.backend_ready(SourceKind::LegacyAxis), Some(true));
    }

    #[test]
    fn unbound_kind_has_no_status() {
        let module = flaky_module();
        assert_eq!(module.backend_ready(SourceKind::KeyboardMouse), None);
        assert_eq!(module.probe_state(SourceKind::LegacyAxis), None);
    }
}
