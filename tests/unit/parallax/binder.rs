use super::*;
use crate::{
    foundation::core::{ElementId, Rect},
    host::sim::SimHost,
    render::effect::EffectLog,
    scroll::tracker::TrackerConfig,
};

fn setup() -> (Rc<SimHost>, ScrollTracker, Rc<EffectLog>, ParallaxBinder) {
    let host = SimHost::new(800.0);
    host.place(ElementId::new("page"), Rect::new(0.0, 0.0, 1280.0, 4000.0));
    let tracker = ScrollTracker::new(host.clone(), TrackerConfig::default());
    let log = Rc::new(EffectLog::new());
    let binder = ParallaxBinder::new(tracker.clone(), log.clone(), FrameClock::new());
    (host, tracker, log, binder)
}

fn speed(v: f64) -> SpeedFactor {
    SpeedFactor::new(v).unwrap()
}

#[test]
fn offset_is_scroll_times_speed() {
    for s in [0.0, 1.0, 199.5, 200.0, 12_345.0] {
        for f in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(parallax_offset(s, speed(f)), s * f);
        }
    }
}

#[test]
fn two_layers_report_independent_offsets() {
    let (_host, tracker, log, binder) = setup();
    let slow = LayerId::new("slow");
    let fast = LayerId::new("fast");
    let _a = binder.bind(slow.clone(), speed(0.5));
    let _b = binder.bind(fast.clone(), speed(1.0));

    tracker.publish(200.0);
    assert_eq!(log.last_parallax(&slow), Some(100.0));
    assert_eq!(log.last_parallax(&fast), Some(200.0));
}

#[test]
fn bind_applies_current_offset_immediately() {
    let (host, tracker, log, binder) = setup();
    let first = binder.bind(LayerId::new("fg"), speed(1.0));
    host.scroll_to(80.0);
    assert_eq!(tracker.offset(), 80.0);
    let layer = LayerId::new("bg");
    let handle = binder.bind(layer.clone(), speed(0.5));
    assert_eq!(log.last_parallax(&layer), Some(40.0));
    assert_eq!(handle.current_offset(), 40.0);
    drop(first);
}

#[test]
fn first_bind_paints_host_offset_scrolled_before_attach() {
    let (host, tracker, log, binder) = setup();
    host.scroll_to(300.0);
    assert!(!tracker.is_listening());

    let layer = LayerId::new("bg");
    let handle = binder.bind(layer.clone(), speed(0.5));
    assert_eq!(tracker.offset(), 300.0);
    assert_eq!(log.last_parallax(&layer), Some(150.0));
    assert_eq!(handle.current_offset(), 150.0);
}

#[test]
fn no_drift_after_many_updates() {
    let (_host, tracker, log, binder) = setup();
    let layer = LayerId::new("bg");
    let _h = binder.bind(layer.clone(), speed(0.3));
    for i in 0..1000 {
        tracker.publish(f64::from(i) * 7.0);
    }
    tracker.publish(300.0);
    assert_eq!(log.last_parallax(&layer), Some(300.0 * 0.3));
}

#[test]
fn unbind_stops_updates_and_releases_listener() {
    let (host, tracker, log, binder) = setup();
    let layer = LayerId::new("bg");
    let handle = binder.bind(layer.clone(), speed(1.0));
    assert_eq!(host.listener_count(), 1);
    tracker.publish(10.0);
    handle.unbind();
    assert_eq!(host.listener_count(), 0);

    let before = log.len();
    tracker.publish(20.0);
    assert_eq!(log.len(), before);
    assert_eq!(log.last_parallax(&layer), Some(10.0));
}

#[test]
fn rebinding_reproduces_same_offset() {
    let (host, _tracker, log, binder) = setup();
    let layer = LayerId::new("bg");
    host.scroll_to(240.0);
    let first = binder.bind(layer.clone(), speed(0.5));
    assert_eq!(log.last_parallax(&layer), Some(120.0));
    drop(first);
    let _second = binder.bind(layer.clone(), speed(0.5));
    assert_eq!(log.last_parallax(&layer), Some(120.0));
}

#[test]
fn snap_scroll_inside_a_callback_leaves_layer_at_final_offset() {
    let (host, tracker, log, binder) = setup();
    let snap = host.clone();
    let _snapper = tracker.subscribe(move |s| {
        if s.offset == 100.0 {
            snap.scroll_to(200.0);
        }
        Ok(())
    });
    let layer = LayerId::new("bg");
    let _h = binder.bind(layer.clone(), speed(1.0));

    host.scroll_to(100.0);
    assert_eq!(tracker.offset(), 200.0);
    assert_eq!(log.last_parallax(&layer), Some(200.0));
}
