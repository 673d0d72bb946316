//! One-shot viewport reveal triggers.
//!
//! Each [`Observation`] moves `Pending -> Triggered` the first time the host reports that the
//! element's visible ratio meets its threshold, and never back. Without a visibility primitive
//! every observation triggers as soon as it is registered, so content is never left hidden.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    foundation::core::{ElementId, Threshold},
    reveal::latch::{RevealLatch, RevealState},
};

/// Host-side viewport intersection primitive.
pub trait VisibilityProbe {
    /// Visible fraction of `element` in `[0, 1]`, or `None` when the host does not know the
    /// element (not laid out, or already removed).
    fn visible_ratio(&self, element: &ElementId) -> Option<f64>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealConfig {
    #[serde(default)]
    pub default_threshold: Threshold,
}

type EnterCallback = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(u64);

/// Shared between a registration and its [`Observation`] handle.
#[derive(Debug, Default)]
struct Slot {
    latch: RevealLatch,
    cancelled: Cell<bool>,
}

struct Registration {
    id: ObservationId,
    element: ElementId,
    threshold: Threshold,
    slot: Rc<Slot>,
    on_enter: Option<EnterCallback>,
}

struct ControllerInner {
    probe: Option<Rc<dyn VisibilityProbe>>,
    config: RevealConfig,
    registrations: RefCell<Vec<Registration>>,
    next_id: Cell<u64>,
}

#[derive(Clone)]
pub struct ViewportRevealController {
    inner: Rc<ControllerInner>,
}

impl fmt::Debug for ViewportRevealController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportRevealController")
            .field("has_probe", &self.inner.probe.is_some())
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl ViewportRevealController {
    /// `probe = None` means the host has no visibility detection.
    pub fn new(probe: Option<Rc<dyn VisibilityProbe>>, config: RevealConfig) -> Self {
        if probe.is_none() {
            tracing::warn!("visibility detection unavailable, reveals trigger on registration");
        }
        Self {
            inner: Rc::new(ControllerInner {
                probe,
                config,
                registrations: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn default_threshold(&self) -> Threshold {
        self.inner.config.default_threshold
    }

    pub fn has_probe(&self) -> bool {
        self.inner.probe.is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.registrations.borrow().len()
    }

    /// Register `element`. `on_enter` runs at most once, and never after the returned
    /// [`Observation`] is cancelled or dropped.
    ///
    /// The element is checked once right away, so content already in view triggers without
    /// waiting for the next scroll.
    pub fn observe(
        &self,
        element: ElementId,
        threshold: Threshold,
        on_enter: impl FnOnce() + 'static,
    ) -> Observation {
        let id = ObservationId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        let slot = Rc::new(Slot::default());
        let handle = Observation {
            id,
            element: element.clone(),
            slot: slot.clone(),
            controller: Rc::downgrade(&self.inner),
        };

        if self.inner.probe.is_none() {
            let first = slot.latch.trigger();
            assert!(first, "fresh reveal latch for '{element}' was already triggered");
            tracing::debug!(%element, "reveal triggered without visibility detection");
            on_enter();
            return handle;
        }

        self.inner.registrations.borrow_mut().push(Registration {
            id,
            element,
            threshold,
            slot,
            on_enter: Some(Box::new(on_enter)),
        });
        self.inner.check(Some(id));
        handle
    }

    /// Re-check every pending registration against the probe.
    ///
    /// Returns how many registrations triggered.
    pub fn refresh(&self) -> usize {
        self.inner.check(None)
    }
}

impl ControllerInner {
    fn check(&self, only: Option<ObservationId>) -> usize {
        let Some(probe) = self.probe.as_ref() else {
            return 0;
        };

        let fired: Vec<(ElementId, Rc<Slot>, EnterCallback)> = {
            let mut fired = Vec::new();
            let mut regs = self.registrations.borrow_mut();
            regs.retain_mut(|reg| {
                if only.is_some_and(|id| id != reg.id) {
                    return true;
                }
                let Some(ratio) = probe.visible_ratio(&reg.element) else {
                    return true;
                };
                if !reg.threshold.is_met_by(ratio) {
                    return true;
                }
                let first = reg.slot.latch.trigger();
                assert!(first, "reveal for '{}' would fire twice", reg.element);
                if let Some(on_enter) = reg.on_enter.take() {
                    fired.push((reg.element.clone(), reg.slot.clone(), on_enter));
                }
                false
            });
            fired
        };

        let count = fired.len();
        for (element, slot, on_enter) in fired {
            // An earlier callback in this batch may have torn this element down.
            if slot.cancelled.get() {
                continue;
            }
            tracing::debug!(%element, "reveal triggered");
            on_enter();
        }
        count
    }

    fn cancel(&self, id: ObservationId) {
        let removed = {
            let mut regs = self.registrations.borrow_mut();
            regs.iter()
                .position(|r| r.id == id)
                .map(|pos| regs.remove(pos))
        };
        // Dropped outside the borrow: the callback may own handles back into this controller.
        drop(removed);
    }
}

/// Handle for one registration. Dropping it cancels a pending reveal without firing.
#[must_use = "dropping an Observation cancels it"]
pub struct Observation {
    id: ObservationId,
    element: ElementId,
    slot: Rc<Slot>,
    controller: Weak<ControllerInner>,
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("element", &self.element)
            .field("state", &self.state())
            .finish()
    }
}

impl Observation {
    pub fn element(&self) -> &ElementId {
        &self.element
    }

    pub fn state(&self) -> RevealState {
        self.slot.latch.state()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.slot.cancelled.set(true);
        if let Some(inner) = self.controller.upgrade() {
            inner.cancel(self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/controller.rs"]
mod tests;
