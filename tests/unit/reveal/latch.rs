use super::*;

#[test]
fn latch_fires_once() {
    let latch = RevealLatch::new();
    assert_eq!(latch.state(), RevealState::Pending);
    assert!(latch.trigger());
    assert!(!latch.trigger());
    assert!(latch.is_triggered());
}

#[test]
fn clones_share_state() {
    let a = RevealLatch::new();
    let b = a.clone();
    assert!(b.trigger());
    assert_eq!(a.state(), RevealState::Triggered);
}
