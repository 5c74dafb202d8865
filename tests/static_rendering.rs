//! Static rendering: render once, never subscribe.

mod common;

use spark_observer::{
    decorate_with, is_static_rendering, mount, observer, reset_all, set_static_rendering, tick,
    ComponentDef, Node, ObserverConfig, Props,
};
use spark_signals::signal;

use common::{bump, capture_warnings, counter, warnings};

#[test]
fn test_static_mode_scenario() {
    reset_all();
    let (warned, _guard) = capture_warnings();

    set_static_rendering(true);
    assert!(is_static_rendering());

    let count = signal(0);
    let renders = counter();
    let (read, seen) = (count.clone(), renders.clone());
    let def = observer(ComponentDef::stateful("Counter", move |_| {
        bump(&seen);
        Ok(Node::text(read.get().to_string()))
    }));

    let handle = mount(def, Props::new()).unwrap();
    assert_eq!(handle.output(), Node::text("0"));
    assert!(!handle.instance().is_reactive());

    count.set(1);
    tick().unwrap();
    assert_eq!(renders.get(), 1);
    assert_eq!(warnings(&warned), 0);

    // Explicit host update goes through the gate, which warns
    assert_eq!(handle.set_props(Props::new()), Ok(false));
    assert_eq!(warnings(&warned), 1);

    handle.unmount();
    set_static_rendering(false);
}

#[test]
fn test_static_override_per_binding() {
    reset_all();

    let count = signal(0);
    let renders = counter();
    let (read, seen) = (count.clone(), renders.clone());
    let def = decorate_with(
        Some(ComponentDef::stateful("OneShot", move |_| {
            bump(&seen);
            Ok(Node::text(read.get().to_string()))
        })),
        (),
        ObserverConfig::new().static_rendering(true),
    )
    .unwrap();

    let _handle = mount(def, Props::new()).unwrap();
    count.set(1);
    tick().unwrap();

    assert!(!is_static_rendering());
    assert_eq!(renders.get(), 1);
}

#[test]
fn test_flag_read_at_mount() {
    reset_all();

    let count = signal(0);
    let renders = counter();
    let (read, seen) = (count.clone(), renders.clone());
    let def = observer(ComponentDef::stateful("Late", move |_| {
        bump(&seen);
        Ok(Node::text(read.get().to_string()))
    }));

    // Decorated before the flag flips; mount still sees it
    set_static_rendering(true);
    let handle = mount(def, Props::new()).unwrap();
    set_static_rendering(false);

    count.set(1);
    tick().unwrap();
    assert_eq!(renders.get(), 1);

    handle.unmount();
}
