use glam::Quat;
use stickflow::backends::{ActionMap, ActionValue, KeyboardMouse, LegacyAxes};
use stickflow::discovery::ProbeState;
use stickflow::{
    quat_to_axis, AxisBinding, AxisChannel, BindingProfile, ButtonBinding, ButtonChannel,
    AxisSign, Component, Consumer, CustomBinding, CustomInputEvent, CustomValue, EulerAxis, EventFilter,
    InputError, InputFrame, InputModule, ModuleState, PoseMapping, RawEvent, RawId, SourceKind,
    SourceManager, StartState, TrackedRole, WrapMode,
};
use std::sync::{Arc, Mutex};

const DT: f32 = 1.0 / 60.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct Recorder {
    frames: Vec<InputFrame>,
}

impl Consumer for Recorder {
    fn accept(&mut self, frame: &InputFrame) {
        self.frames.push(frame.clone());
    }
}

fn key_down(code: &str) -> RawEvent {
    RawEvent::KeyDown { code: code.into() }
}

fn key_up(code: &str) -> RawEvent {
    RawEvent::KeyUp { code: code.into() }
}

fn ship_profile() -> BindingProfile {
    BindingProfile::new("ship")
        .with_axis(
            AxisChannel::Horizontal,
            AxisBinding::combined(SourceKind::KeyboardMouse, RawId::key("A"), RawId::key("D"))
                .with_smoothing(3.0, 3.0),
        )
        .with_axis(
            AxisChannel::Longitudinal,
            AxisBinding::combined(SourceKind::KeyboardMouse, RawId::key("W"), RawId::key("S")),
        )
        .with_button(
            ButtonChannel::PrimaryFire,
            ButtonBinding::new(SourceKind::KeyboardMouse, RawId::key("Space")),
        )
        .with_button(
            ButtonChannel::Dock,
            ButtonBinding::new(SourceKind::KeyboardMouse, RawId::key("G")).edge_triggered(),
        )
}

fn keyboard_module(profile: BindingProfile) -> InputModule {
    let mut sources = SourceManager::new();
    sources.add_source(KeyboardMouse::new());
    let mut module = InputModule::new(profile, sources);
    module.initialize().expect("profile is valid");
    module
}

#[test]
fn held_key_ramps_horizontal_to_one() {
    init_logging();
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    module.dispatch(&key_down("A"));
    for _ in 0..30 {
        module.tick(DT, &mut rec);
    }

    let values: Vec<f32> = rec.frames.iter().map(|f| f.horizontal()).collect();
    assert_eq!(values.len(), 30);
    assert!(values[0] > 0.0 && values[0] < 0.1);
    assert!(values.windows(2).all(|w| w[1] >= w[0]), "{values:?}");

    // 3 units/s from rest: elapsed * 3 reaches 1 on tick 20 of 1/60 s.
    let first_full = values.iter().position(|v| *v == 1.0).expect("reaches 1") + 1;
    assert_eq!(first_full, 20, "{values:?}");
    assert!(values[19..].iter().all(|v| *v == 1.0));
}

#[test]
fn release_decays_toward_zero() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    module.dispatch(&key_down("D"));
    for _ in 0..30 {
        module.tick(DT, &mut rec);
    }
    assert_eq!(module.frame().horizontal(), -1.0);

    module.dispatch(&key_up("D"));
    module.tick(DT, &mut rec);
    let after_one = module.frame().horizontal();
    assert!(after_one > -1.0 && after_one < 0.0);
    for _ in 0..30 {
        module.tick(DT, &mut rec);
    }
    assert_eq!(module.frame().horizontal(), 0.0);
}

#[test]
fn unsmoothed_axis_snaps() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();
    module.dispatch(&key_down("S"));
    module.tick(DT, &mut rec);
    assert_eq!(rec.frames[0].longitudinal(), -1.0);
}

#[test]
fn edge_triggered_dock_fires_once_per_press() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    module.dispatch(&key_down("G"));
    module.dispatch(&key_down("Space"));
    for _ in 0..10 {
        module.tick(DT, &mut rec);
    }
    module.dispatch(&key_up("G"));
    module.tick(DT, &mut rec);
    module.dispatch(&key_down("G"));
    module.tick(DT, &mut rec);

    let docks = rec.frames.iter().filter(|f| f.dock()).count();
    let fires = rec.frames.iter().filter(|f| f.primary_fire()).count();
    assert_eq!(docks, 2);
    assert_eq!(fires, rec.frames.len());
}

#[test]
fn disable_zeroes_frame_and_stops_ticks() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    module.dispatch_all(&[key_down("A"), key_down("Space"), key_down("W")]);
    for _ in 0..5 {
        module.tick(DT, &mut rec);
    }
    assert!(!module.frame().is_neutral());

    module.disable_input(false);
    assert_eq!(module.state(), ModuleState::DisabledFull);
    assert!(module.frame().is_neutral());

    let delivered = rec.frames.len();
    for _ in 0..5 {
        module.tick(DT, &mut rec);
    }
    assert_eq!(rec.frames.len(), delivered);
    assert!(module.frame().is_neutral());

    module.enable_input().expect("already initialized");
    module.tick(DT, &mut rec);
    assert_eq!(rec.frames.len(), delivered + 1);
    let frame = module.frame();
    // Smoothing restarted from rest.
    assert!(frame.horizontal() > 0.0 && frame.horizontal() < 0.1);
    assert_eq!(frame.longitudinal(), 1.0);
    assert!(frame.primary_fire());
}

#[test]
fn custom_inputs_run_while_custom_only() {
    let profile = ship_profile().with_custom(CustomBinding::button(
        "lights",
        ButtonBinding::new(SourceKind::KeyboardMouse, RawId::key("L")).edge_triggered(),
    ));
    let mut module = keyboard_module(profile);

    let seen: Arc<Mutex<Vec<CustomInputEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    module.add_listener(
        move |e: &CustomInputEvent| sink.lock().unwrap().push(e.clone()),
        EventFilter::ButtonsOnly,
        Some("lights".into()),
    );

    module.disable_input(true);
    assert_eq!(module.state(), ModuleState::DisabledCustomOnly);

    let mut rec = Recorder::default();
    module.dispatch_all(&[key_down("L"), key_down("A")]);
    for _ in 0..4 {
        module.tick(DT, &mut rec);
    }

    assert!(rec.frames.is_empty());
    assert!(module.frame().is_neutral());
    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].value, CustomValue::Button(true));
}

#[test]
fn custom_only_start_state() {
    let mut profile = ship_profile();
    profile.settings.start_state = StartState::CustomOnly;
    let module = keyboard_module(profile);
    assert_eq!(module.state(), ModuleState::DisabledCustomOnly);
}

#[test]
fn discarded_channel_is_flagged_and_neutral() {
    let profile = BindingProfile::new("autopilot-yaw").with_axis(
        AxisChannel::Yaw,
        AxisBinding::combined(SourceKind::KeyboardMouse, RawId::key("E"), RawId::key("Q"))
            .with_smoothing(3.0, 3.0)
            .discarded(),
    );
    let mut module = keyboard_module(profile);
    let mut rec = Recorder::default();
    module.dispatch(&key_down("E"));
    module.tick(DT, &mut rec);

    let frame = &rec.frames[0];
    assert!(!frame.is_axis_enabled(AxisChannel::Yaw));
    assert_eq!(frame.enabled_axis(AxisChannel::Yaw), None);
    assert_eq!(frame.yaw(), 0.0);
    assert!(frame.is_axis_enabled(AxisChannel::Pitch));
}

#[test]
fn unresolved_and_missing_backends_read_neutral() {
    init_logging();
    let profile = ship_profile()
        .with_axis(
            AxisChannel::Pitch,
            AxisBinding::single(SourceKind::LegacyAxis, RawId::axis("Missing")),
        )
        .with_axis(
            AxisChannel::Roll,
            AxisBinding::single(SourceKind::ActionBinding, RawId::action("roll", Default::default())),
        )
        .with_button(ButtonChannel::Jump, ButtonBinding {
            source: SourceKind::KeyboardMouse,
            id: None,
            can_be_held: true,
            discard: false,
        });

    let mut sources = SourceManager::new();
    sources.add_source(KeyboardMouse::new());
    sources.add_source(LegacyAxes::new());
    let mut module = InputModule::new(profile, sources);
    module.initialize().expect("valid");

    let mut rec = Recorder::default();
    module.dispatch_all(&[key_down("W"), key_down("Space")]);
    for _ in 0..3 {
        module.tick(DT, &mut rec);
    }

    let frame = module.frame();
    assert_eq!(frame.pitch(), 0.0);
    assert_eq!(frame.roll(), 0.0);
    assert!(!frame.jump());
    assert_eq!(frame.longitudinal(), 1.0);
    assert!(frame.primary_fire());
    assert_eq!(rec.frames.len(), 3);
}

#[test]
fn initialize_is_idempotent_and_validates() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();
    module.dispatch(&key_down("A"));
    module.tick(DT, &mut rec);
    let before = module.frame().horizontal();
    module.initialize().expect("no-op");
    assert_eq!(module.frame().horizontal(), before);

    let bad = BindingProfile::new("bad").with_axis(
        AxisChannel::Roll,
        AxisBinding::single(SourceKind::KeyboardMouse, RawId::key("R"))
            .with_smoothing(3.0, f32::NAN),
    );
    let mut module = InputModule::with_default_sources(bad);
    assert!(matches!(
        module.initialize(),
        Err(InputError::InvalidRange { field: "gravity", .. })
    ));
    assert_eq!(module.state(), ModuleState::Uninitialized);
    assert!(module.enable_input().is_err());
}

#[test]
fn uninitialized_module_does_nothing() {
    let mut module = InputModule::with_default_sources(ship_profile());
    let mut rec = Recorder::default();
    module.disable_input(false);
    module.tick(DT, &mut rec);
    assert!(rec.frames.is_empty());
    assert_eq!(module.state(), ModuleState::Uninitialized);

    module.enable_input().expect("valid");
    assert_eq!(module.state(), ModuleState::Enabled);
    module.shutdown();
    assert_eq!(module.state(), ModuleState::Uninitialized);
}

#[test]
fn reconfigure_swaps_bindings() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    let arrows = BindingProfile::new("arrows").with_axis(
        AxisChannel::Horizontal,
        AxisBinding::combined(
            SourceKind::KeyboardMouse,
            RawId::key("Right"),
            RawId::key("Left"),
        ),
    );
    module.reconfigure(arrows).expect("valid");
    assert_eq!(module.profile().name, "arrows");

    module.dispatch_all(&[key_down("A"), key_down("Right")]);
    module.tick(DT, &mut rec);
    assert_eq!(module.frame().horizontal(), 1.0);
    assert!(!module.frame().primary_fire());
}

#[test]
fn head_pose_drives_yaw_in_late_pass() {
    let mapping = PoseMapping::new(EulerAxis::Y, AxisSign::Positive, WrapMode::Bipolar);
    let profile = BindingProfile::new("vr-look").with_axis(
        AxisChannel::Yaw,
        AxisBinding::pose(RawId::Pose { role: TrackedRole::Head }, mapping),
    );
    let mut module = InputModule::with_default_sources(profile);
    module.initialize().expect("valid");
    assert!(module.has_pose_channels());

    let turn = Quat::from_rotation_y(45f32.to_radians());
    let mut rec = Recorder::default();

    module.dispatch(&RawEvent::PoseChanged {
        role: TrackedRole::Head,
        rotation: turn,
    });
    module.tick(DT, &mut rec);
    module.late_tick(DT, &mut rec);
    assert_eq!(module.frame().yaw(), 0.0, "headset not found yet");
    assert_eq!(module.probe_state(SourceKind::VrPose), Some(ProbeState::Searching));

    module.dispatch_all(&[
        RawEvent::HeadsetConnected { connected: true },
        RawEvent::PoseChanged {
            role: TrackedRole::Head,
            rotation: turn,
        },
    ]);
    for _ in 0..10 {
        module.tick(DT, &mut rec);
        module.late_tick(DT, &mut rec);
    }
    assert_eq!(module.probe_state(SourceKind::VrPose), Some(ProbeState::Ready));

    let expected = quat_to_axis(turn, &mapping);
    assert!((expected - 0.25).abs() < 1e-3);
    assert!((module.frame().yaw() - expected).abs() < 1e-6);
    // Both passes deliver.
    assert_eq!(rec.frames.len(), 22);
}

#[test]
fn late_tick_without_pose_channels_is_silent() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();
    module.late_tick(DT, &mut rec);
    assert!(rec.frames.is_empty());
}

#[test]
fn remapper_that_never_loads_is_given_up() {
    init_logging();
    let profile = BindingProfile::new("remapped").with_axis(
        AxisChannel::Longitudinal,
        AxisBinding::single(
            SourceKind::RemappedAction,
            RawId::Remapped {
                player: 0,
                action: "Throttle".into(),
            },
        ),
    );
    let mut module = InputModule::with_default_sources(profile);
    module.initialize().expect("valid");

    let mut rec = Recorder::default();
    for _ in 0..(4 * 60) {
        module.tick(DT, &mut rec);
    }
    assert_eq!(
        module.probe_state(SourceKind::RemappedAction),
        Some(ProbeState::GaveUp)
    );
    assert_eq!(module.frame().longitudinal(), 0.0);
    assert_eq!(rec.frames.len(), 4 * 60);
}

#[test]
fn profile_file_loads_into_module() {
    let text = r#"
        name = "from-disk"

        [settings]
        start_state = "enabled"

        [axes.vertical]
        source = "legacy_axis"
        positive = { kind = "axis", name = "Vertical" }
        deadzone = 0.1

        [[custom]]
        name = "zoom"
        [custom.control]
        type = "axis"
        source = "legacy_axis"
        positive = { kind = "axis", name = "Zoom" }
    "#;
    let path = std::env::temp_dir().join(format!("stickflow-{}.toml", std::process::id()));
    std::fs::write(&path, text).expect("write profile");
    let profile = BindingProfile::load(&path).expect("load profile");
    let _ = std::fs::remove_file(&path);

    let mut module = InputModule::with_default_sources(profile);
    module.initialize().expect("valid");

    let zooms = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&zooms);
    module.add_listener(
        move |e: &CustomInputEvent| sink.lock().unwrap().push(e.value),
        EventFilter::AxisOnly,
        None,
    );

    let mut rec = Recorder::default();
    module.dispatch_all(&[
        RawEvent::AxisChanged {
            name: "Vertical".into(),
            value: 0.05,
        },
        RawEvent::AxisChanged {
            name: "Zoom".into(),
            value: 0.5,
        },
    ]);
    module.tick(DT, &mut rec);
    assert_eq!(module.frame().vertical(), 0.0);

    module.dispatch(&RawEvent::AxisChanged {
        name: "Vertical".into(),
        value: -0.6,
    });
    module.tick(DT, &mut rec);
    assert!((module.frame().vertical() + 0.6).abs() < 1e-6);
    assert_eq!(
        *zooms.lock().unwrap(),
        vec![CustomValue::Axis(0.5), CustomValue::Axis(0.5)]
    );
}

#[test]
fn held_dock_does_not_refire_after_reenable() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    module.dispatch(&key_down("G"));
    module.tick(DT, &mut rec);
    assert!(module.frame().dock());

    module.disable_input(false);
    module.enable_input().expect("initialized");
    for _ in 0..3 {
        module.tick(DT, &mut rec);
    }
    assert_eq!(rec.frames.iter().filter(|f| f.dock()).count(), 1);

    module.reconfigure(ship_profile()).expect("valid");
    module.tick(DT, &mut rec);
    assert_eq!(rec.frames.iter().filter(|f| f.dock()).count(), 1);

    module.dispatch(&key_up("G"));
    module.tick(DT, &mut rec);
    module.dispatch(&key_down("G"));
    module.tick(DT, &mut rec);
    assert_eq!(rec.frames.iter().filter(|f| f.dock()).count(), 2);
}

#[test]
fn press_after_disable_still_fires() {
    let mut module = keyboard_module(ship_profile());
    let mut rec = Recorder::default();

    module.disable_input(false);
    module.dispatch(&key_down("G"));
    module.enable_input().expect("initialized");
    module.tick(DT, &mut rec);
    assert!(module.frame().dock());
}

#[test]
fn action_quaternion_drives_yaw_in_main_pass() {
    let mapping = PoseMapping::new(EulerAxis::Y, AxisSign::Positive, WrapMode::Bipolar);
    let yaw = AxisBinding {
        pose: Some(mapping),
        ..AxisBinding::single(SourceKind::ActionBinding, RawId::action("head", Component::X))
    };
    let profile = BindingProfile::new("action-look").with_axis(AxisChannel::Yaw, yaw);

    let mut sources = SourceManager::new();
    sources.add_source(ActionMap::new());
    let mut module = InputModule::new(profile, sources);
    module.initialize().expect("valid");
    assert!(!module.has_pose_channels());

    module.dispatch(&RawEvent::ActionChanged {
        id: "head".into(),
        value: ActionValue::Quat(Quat::from_rotation_y(90f32.to_radians())),
    });
    let mut rec = Recorder::default();
    module.tick(DT, &mut rec);
    assert!((module.frame().yaw() - 0.5).abs() < 1e-4, "{}", module.frame().yaw());

    module.late_tick(DT, &mut rec);
    assert_eq!(rec.frames.len(), 1, "late pass has nothing to update");
}

#[test]
fn headset_dropping_out_reads_neutral() {
    init_logging();
    let mapping = PoseMapping::new(EulerAxis::Y, AxisSign::Positive, WrapMode::Bipolar);
    let profile = BindingProfile::new("vr-look").with_axis(
        AxisChannel::Yaw,
        AxisBinding::pose(RawId::Pose { role: TrackedRole::Head }, mapping),
    );
    let mut module = InputModule::with_default_sources(profile);
    module.initialize().expect("valid");

    let turn = Quat::from_rotation_y(45f32.to_radians());
    module.dispatch_all(&[
        RawEvent::HeadsetConnected { connected: true },
        RawEvent::PoseChanged {
            role: TrackedRole::Head,
            rotation: turn,
        },
    ]);
    let mut rec = Recorder::default();
    module.tick(DT, &mut rec);
    module.late_tick(DT, &mut rec);
    assert_eq!(module.backend_ready(SourceKind::VrPose), Some(true));
    assert!((module.frame().yaw() - 0.25).abs() < 1e-4);

    module.dispatch(&RawEvent::HeadsetConnected { connected: false });
    module.tick(DT, &mut rec);
    module.late_tick(DT, &mut rec);
    assert_eq!(module.probe_state(SourceKind::VrPose), Some(ProbeState::Ready));
    assert_eq!(module.backend_ready(SourceKind::VrPose), Some(false));
    assert_eq!(module.frame().yaw(), 0.0);
}
