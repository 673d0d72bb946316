use super::*;

#[test]
fn fade_up_holds_initial_during_delay() {
    let p = AnimationParams::fade_up(0.2);
    let s = p.sample(0.1);
    assert_eq!(s.translate, Vec2::new(0.0, 50.0));
    assert_eq!(s.opacity, 0.0);
}

#[test]
fn sample_settles_after_total_time() {
    let p = AnimationParams::fade_up(0.4);
    assert!((p.total_s() - 1.2).abs() < 1e-9);
    assert_ne!(p.sample(1.1), VisualState::SETTLED);
    assert_eq!(p.sample(1.25), VisualState::SETTLED);
    assert_eq!(p.sample(10.0), VisualState::SETTLED);
}

#[test]
fn linear_midpoint_is_halfway() {
    let p = AnimationParams::fade_up(0.0).with_ease(Ease::Linear);
    let s = p.sample(0.4);
    assert!((s.translate.y - 25.0).abs() < 1e-9);
    assert!((s.opacity - 0.5).abs() < 1e-9);
}

#[test]
fn zero_duration_jumps_to_settled() {
    let p = AnimationParams::fade_in(0.0);
    assert_eq!(p.progress(0.0), 1.0);
    assert_eq!(p.sample(0.0), VisualState::SETTLED);
}

#[test]
fn zero_duration_waits_out_its_delay() {
    let p = AnimationParams::fade_in(0.0).with_delay(0.3);
    assert_eq!(p.progress(0.2), 0.0);
    assert_eq!(p.sample(0.2), p.initial());
    assert_eq!(p.sample(0.3), VisualState::SETTLED);
}

#[test]
fn scale_in_interpolates_scale() {
    let p = AnimationParams::scale_in(0.5, 1.0).with_ease(Ease::Linear);
    assert!((p.sample(0.5).scale - 0.75).abs() < 1e-9);
}

#[test]
fn validate_rejects_bad_values() {
    let mut p = AnimationParams::fade_in(1.0);
    p.duration_s = -1.0;
    assert!(p.validate().is_err());

    let mut p = AnimationParams::fade_in(1.0);
    p.initial_opacity = 1.5;
    assert!(p.validate().is_err());

    let mut p = AnimationParams::fade_in(1.0);
    p.delay_s = f64::INFINITY;
    assert!(p.validate().is_err());

    assert!(AnimationParams::fade_up(0.2).validate().is_ok());
}

#[test]
fn params_deserialize_with_defaults() {
    let p: AnimationParams = serde_json::from_str(r#"{"duration_s":0.8}"#).unwrap();
    assert_eq!(p.initial_opacity, 0.0);
    assert_eq!(p.initial_scale, 1.0);
    assert_eq!(p.delay_s, 0.0);
    assert_eq!(p.ease, Ease::OutCubic);
}

#[test]
fn visual_state_affine_translates() {
    let s = VisualState {
        translate: Vec2::new(0.0, 50.0),
        opacity: 0.0,
        scale: 1.0,
    };
    assert_eq!(s.to_affine(), Affine::translate(Vec2::new(0.0, 50.0)));
}
