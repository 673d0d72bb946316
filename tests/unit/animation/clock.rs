use super::*;

#[test]
fn clock_is_monotonic_and_shared() {
    let clock = FrameClock::new();
    let view = clock.clone();
    assert_eq!(clock.advance_to(0.5), 0.5);
    assert_eq!(clock.advance_to(0.25), 0.5);
    assert_eq!(clock.advance_to(f64::NAN), 0.5);
    assert_eq!(view.now_s(), 0.5);
}

#[test]
fn starting_at_sets_initial_time() {
    assert_eq!(FrameClock::starting_at(3.0).now_s(), 3.0);
}
