//! Headless host: a vertical document of laid-out elements seen through a fixed-height viewport.
//!
//! [`SimHost`] provides both host primitives the orchestration layer needs (scroll events and
//! viewport intersection) without a browser, and exposes a listener-count probe so callers can
//! verify the single-registration contract.

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use crate::{
    composition::model::PageSpec,
    foundation::core::{ElementId, Rect, visible_ratio},
    foundation::error::{RevealError, RevealResult},
    reveal::controller::VisibilityProbe,
    scroll::tracker::{ScrollSink, ScrollSource},
};

const VIEWPORT_WIDTH: f64 = 1280.0;

#[derive(Default)]
struct SimState {
    offset: f64,
    elements: BTreeMap<ElementId, Rect>,
    sink: Option<ScrollSink>,
    listeners: usize,
    attach_calls: usize,
}

pub struct SimHost {
    viewport_height: f64,
    scroll_events: bool,
    intersection: bool,
    state: RefCell<SimState>,
}

impl fmt::Debug for SimHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SimHost")
            .field("viewport_height", &self.viewport_height)
            .field("offset", &state.offset)
            .field("elements", &state.elements.len())
            .field("listeners", &state.listeners)
            .finish()
    }
}

impl SimHost {
    pub fn new(viewport_height: f64) -> Rc<Self> {
        Self::with_capabilities(viewport_height, true, true)
    }

    /// A host that lacks one or both primitives.
    pub fn with_capabilities(
        viewport_height: f64,
        scroll_events: bool,
        intersection: bool,
    ) -> Rc<Self> {
        Rc::new(Self {
            viewport_height,
            scroll_events,
            intersection,
            state: RefCell::new(SimState::default()),
        })
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Visibility primitive for [`ViewportRevealController::new`], or `None` when disabled.
    ///
    /// [`ViewportRevealController::new`]: crate::ViewportRevealController::new
    pub fn visibility(self: &Rc<Self>) -> Option<Rc<dyn VisibilityProbe>> {
        if self.intersection {
            Some(self.clone() as Rc<dyn VisibilityProbe>)
        } else {
            None
        }
    }

    /// Place `element` at `rect` in document coordinates.
    pub fn place(&self, element: ElementId, rect: Rect) {
        self.state.borrow_mut().elements.insert(element, rect);
    }

    pub fn remove(&self, element: &ElementId) -> bool {
        self.state.borrow_mut().elements.remove(element).is_some()
    }

    pub fn rect_of(&self, element: &ElementId) -> Option<Rect> {
        self.state.borrow().elements.get(element).copied()
    }

    /// Stack every section one viewport tall, top to bottom, and split each section's height
    /// evenly between its items.
    pub fn layout_page(&self, page: &PageSpec) {
        let h = self.viewport_height;
        for (i, section) in page.sections.iter().enumerate() {
            let top = h * i as f64;
            self.place(section.id.clone(), Rect::new(0.0, top, VIEWPORT_WIDTH, top + h));

            let n = section.items.len();
            if n == 0 {
                continue;
            }
            let band = h / n as f64;
            for (j, item) in section.items.iter().enumerate() {
                let y0 = top + band * j as f64;
                self.place(item.id.clone(), Rect::new(0.0, y0, VIEWPORT_WIDTH, y0 + band));
            }
        }
    }

    /// Largest reachable scroll offset for the current layout.
    pub fn max_offset(&self) -> f64 {
        let bottom = self
            .state
            .borrow()
            .elements
            .values()
            .map(|r| r.y1)
            .fold(0.0_f64, f64::max);
        (bottom - self.viewport_height).max(0.0)
    }

    /// Scroll the document, clamped to the reachable range, and fire the host scroll event.
    pub fn scroll_to(&self, offset: f64) -> f64 {
        let clamped = offset.clamp(0.0, self.max_offset());
        let sink = {
            let mut state = self.state.borrow_mut();
            state.offset = clamped;
            state.sink.clone()
        };
        // Delivered without holding the borrow: subscribers query visibility synchronously.
        if let Some(sink) = sink {
            sink.deliver(clamped);
        }
        clamped
    }

    pub fn offset(&self) -> f64 {
        self.state.borrow().offset
    }

    pub fn viewport_rect(&self) -> Rect {
        let top = self.offset();
        Rect::new(0.0, top, VIEWPORT_WIDTH, top + self.viewport_height)
    }

    /// Number of scroll listeners currently registered with this host.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners
    }

    /// Total `attach` calls over the host's lifetime.
    pub fn attach_calls(&self) -> usize {
        self.state.borrow().attach_calls
    }
}

impl ScrollSource for SimHost {
    fn attach(&self, sink: ScrollSink) -> RevealResult<()> {
        if !self.scroll_events {
            return Err(RevealError::missing_capability(
                "host does not deliver scroll events",
            ));
        }
        let mut state = self.state.borrow_mut();
        state.sink = Some(sink);
        state.listeners += 1;
        state.attach_calls += 1;
        Ok(())
    }

    fn detach(&self) {
        let mut state = self.state.borrow_mut();
        state.sink = None;
        state.listeners = state.listeners.saturating_sub(1);
    }

    fn current_offset(&self) -> Option<f64> {
        Some(self.offset())
    }
}

impl VisibilityProbe for SimHost {
    fn visible_ratio(&self, element: &ElementId) -> Option<f64> {
        let rect = self.rect_of(element)?;
        Some(visible_ratio(rect, self.viewport_rect()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/sim.rs"]
mod tests;
