use stickflow::backends::KeyboardMouse;
use stickflow::logger::LogListener;
use stickflow::{
    AxisBinding, AxisChannel, BindingProfile, ButtonBinding, ButtonChannel, CustomBinding,
    EventFilter, InputFrame, InputModule, RawEvent, RawId, SourceKind, SourceManager,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let profile = BindingProfile::new("keyboard-ship")
        .with_axis(
            AxisChannel::Horizontal,
            AxisBinding::combined(SourceKind::KeyboardMouse, RawId::key("D"), RawId::key("A"))
                .with_smoothing(3.0, 3.0),
        )
        .with_axis(
            AxisChannel::Longitudinal,
            AxisBinding::combined(SourceKind::KeyboardMouse, RawId::key("W"), RawId::key("S"))
                .with_smoothing(2.0, 4.0),
        )
        .with_button(
            ButtonChannel::Dock,
            ButtonBinding::new(SourceKind::KeyboardMouse, RawId::key("G")).edge_triggered(),
        )
        .with_custom(CustomBinding::button(
            "headlights",
            ButtonBinding::new(SourceKind::KeyboardMouse, RawId::key("L")).edge_triggered(),
        ));

    let mut sources = SourceManager::new();
    sources.add_source(KeyboardMouse::new());

    let mut module = InputModule::new(profile, sources);
    module.add_listener(LogListener::new(), EventFilter::All, None);
    if let Err(e) = module.initialize() {
        eprintln!("profile rejected: {e}");
        return;
    }

    // Scripted key presses: (tick, event)
    let script = [
        (0, RawEvent::KeyDown { code: "D".into() }),
        (5, RawEvent::KeyDown { code: "W".into() }),
        (10, RawEvent::KeyDown { code: "L".into() }),
        (12, RawEvent::KeyUp { code: "L".into() }),
        (20, RawEvent::KeyUp { code: "D".into() }),
        (25, RawEvent::KeyDown { code: "G".into() }),
        (40, RawEvent::KeyUp { code: "W".into() }),
    ];

    let dt = 1.0 / 60.0;
    for tick in 0..60 {
        for (_, event) in script.iter().filter(|(at, _)| *at == tick) {
            module.dispatch(event);
        }
        module.tick(dt, &mut |frame: &InputFrame| {
            if tick % 5 == 0 || frame.dock() {
                println!(
                    "tick {tick:02}: horizontal={:+.3} longitudinal={:+.3} dock={}",
                    frame.horizontal(),
                    frame.longitudinal(),
                    frame.dock()
                );
            }
        });
    }

    module.disable_input(false);
    println!("disabled: neutral={}", module.frame().is_neutral());
}
