use std::collections::HashMap;

use super::*;

#[derive(Default)]
struct MapProbe {
    ratios: RefCell<HashMap<ElementId, f64>>,
}

impl MapProbe {
    fn set(&self, id: &str, ratio: f64) {
        self.ratios.borrow_mut().insert(ElementId::new(id), ratio);
    }

    fn remove(&self, id: &str) {
        self.ratios.borrow_mut().remove(&ElementId::new(id));
    }
}

impl VisibilityProbe for MapProbe {
    fn visible_ratio(&self, element: &ElementId) -> Option<f64> {
        self.ratios.borrow().get(element).copied()
    }
}

fn setup() -> (Rc<MapProbe>, ViewportRevealController) {
    let probe = Rc::new(MapProbe::default());
    let controller = ViewportRevealController::new(Some(probe.clone()), RevealConfig::default());
    (probe, controller)
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    (hits, move || h.set(h.get() + 1))
}

fn t(v: f64) -> Threshold {
    Threshold::new(v).unwrap()
}

#[test]
fn fires_once_at_threshold_and_never_resets() {
    let (probe, controller) = setup();
    probe.set("about", 0.0);
    let (hits, cb) = counter();
    let obs = controller.observe(ElementId::new("about"), t(0.1), cb);
    assert_eq!(obs.state(), RevealState::Pending);

    probe.set("about", 0.15);
    assert_eq!(controller.refresh(), 1);
    assert_eq!(hits.get(), 1);

    probe.set("about", 1.0);
    controller.refresh();
    probe.set("about", 0.0);
    controller.refresh();
    assert_eq!(hits.get(), 1);
    assert_eq!(obs.state(), RevealState::Triggered);
}

#[test]
fn rapid_back_and_forth_fires_once() {
    let (probe, controller) = setup();
    probe.set("card", 0.0);
    let (hits, cb) = counter();
    let _obs = controller.observe(ElementId::new("card"), t(0.5), cb);
    for i in 0..200 {
        let ratio = if i % 2 == 0 { 0.49 } else { 0.51 };
        probe.set("card", ratio);
        controller.refresh();
    }
    assert_eq!(hits.get(), 1);
}

#[test]
fn below_threshold_stays_pending() {
    let (probe, controller) = setup();
    probe.set("x", 0.05);
    let (hits, cb) = counter();
    let obs = controller.observe(ElementId::new("x"), t(0.1), cb);
    controller.refresh();
    assert_eq!(hits.get(), 0);
    assert_eq!(obs.state(), RevealState::Pending);
    assert_eq!(controller.pending_count(), 1);
}

#[test]
fn already_visible_triggers_on_observe() {
    let (probe, controller) = setup();
    probe.set("hero", 1.0);
    let (hits, cb) = counter();
    let obs = controller.observe(ElementId::new("hero"), t(0.1), cb);
    assert_eq!(hits.get(), 1);
    assert_eq!(obs.state(), RevealState::Triggered);
    assert_eq!(controller.pending_count(), 0);
}

#[test]
fn cancelled_before_trigger_never_fires() {
    let (probe, controller) = setup();
    probe.set("gallery", 0.0);
    let (hits, cb) = counter();
    let obs = controller.observe(ElementId::new("gallery"), t(0.1), cb);
    obs.cancel();
    assert_eq!(controller.pending_count(), 0);
    probe.set("gallery", 1.0);
    controller.refresh();
    assert_eq!(hits.get(), 0);
}

#[test]
fn unknown_element_stays_pending() {
    let (probe, controller) = setup();
    let (hits, cb) = counter();
    let _obs = controller.observe(ElementId::new("ghost"), t(0.1), cb);
    probe.remove("ghost");
    controller.refresh();
    assert_eq!(hits.get(), 0);
}

#[test]
fn missing_probe_triggers_immediately() {
    let controller = ViewportRevealController::new(None, RevealConfig::default());
    let (hits, cb) = counter();
    let obs = controller.observe(ElementId::new("cta"), t(0.1), cb);
    assert_eq!(hits.get(), 1);
    assert_eq!(obs.state(), RevealState::Triggered);
    assert_eq!(controller.refresh(), 0);
    assert_eq!(hits.get(), 1);
}

#[test]
fn callback_cancelling_a_sibling_suppresses_it() {
    let (probe, controller) = setup();
    probe.set("a", 0.0);
    probe.set("b", 0.0);

    let sibling: Rc<RefCell<Option<Observation>>> = Rc::new(RefCell::new(None));
    let s = sibling.clone();
    let _a = controller.observe(ElementId::new("a"), t(0.1), move || {
        s.borrow_mut().take();
    });
    let (hits, cb) = counter();
    *sibling.borrow_mut() = Some(controller.observe(ElementId::new("b"), t(0.1), cb));

    probe.set("a", 1.0);
    probe.set("b", 1.0);
    controller.refresh();
    assert_eq!(hits.get(), 0);
}

#[test]
fn elements_latch_independently() {
    let (probe, controller) = setup();
    probe.set("a", 0.0);
    probe.set("b", 0.0);
    let (a_hits, a_cb) = counter();
    let (b_hits, b_cb) = counter();
    let _a = controller.observe(ElementId::new("a"), t(0.1), a_cb);
    let _b = controller.observe(ElementId::new("b"), t(0.1), b_cb);

    probe.set("a", 0.5);
    controller.refresh();
    assert_eq!((a_hits.get(), b_hits.get()), (1, 0));
    probe.set("b", 0.5);
    controller.refresh();
    assert_eq!((a_hits.get(), b_hits.get()), (1, 1));
}
