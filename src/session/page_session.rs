use std::{fmt, rc::Rc};

use crate::{
    animation::clock::FrameClock,
    composition::composer::{MountedSection, SectionComposer},
    composition::model::{PageSpec, SectionSpec},
    foundation::core::ElementId,
    foundation::error::{RevealError, RevealResult},
    parallax::binder::ParallaxBinder,
    render::effect::EffectSink,
    reveal::controller::{ViewportRevealController, VisibilityProbe},
    scroll::tracker::{ScrollSource, ScrollTracker, Subscription},
};

/// Per-frame summary returned by [`PageSession::advance_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameStats {
    pub now_s: f64,
    /// Whether a coalesced scroll offset was delivered this frame.
    pub scroll_flushed: bool,
    pub entrance_effects: usize,
}

/// One mounted page: the scroll tracker, reveal controller, parallax binder and composer wired
/// together, plus the sections currently on screen.
///
/// Every published scroll offset re-checks pending reveals. Dropping the session unmounts all
/// sections first and then releases the host scroll listener.
pub struct PageSession {
    sections: Vec<MountedSection>,
    reveal_refresh: Option<Subscription>,
    composer: SectionComposer,
    controller: ViewportRevealController,
    tracker: ScrollTracker,
    clock: FrameClock,
}

impl fmt::Debug for PageSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSession")
            .field("sections", &self.sections.len())
            .field("tracker", &self.tracker)
            .field("controller", &self.controller)
            .field("now_s", &self.clock.now_s())
            .finish()
    }
}

impl PageSession {
    /// Mount `page` against the host primitives. `visibility = None` means the host cannot
    /// detect intersections; every reveal then fires at mount.
    #[tracing::instrument(skip_all, fields(sections = page.sections.len()))]
    pub fn mount(
        page: &PageSpec,
        scroll: Rc<dyn ScrollSource>,
        visibility: Option<Rc<dyn VisibilityProbe>>,
        sink: Rc<dyn EffectSink>,
    ) -> RevealResult<Self> {
        page.validate()?;

        let clock = FrameClock::new();
        let tracker = ScrollTracker::new(scroll, page.tracker);
        let controller = ViewportRevealController::new(visibility, page.reveal);
        let binder = ParallaxBinder::new(tracker.clone(), sink.clone(), clock.clone());
        let composer = SectionComposer::new(controller.clone(), binder, sink, clock.clone());

        // Registered before any parallax binding so reveals are decided first on each event.
        let refresh = {
            let controller = controller.clone();
            tracker.subscribe(move |_| {
                controller.refresh();
                Ok(())
            })
        };

        let mut session = Self {
            sections: Vec::with_capacity(page.sections.len()),
            reveal_refresh: Some(refresh),
            composer,
            controller,
            tracker,
            clock,
        };
        for spec in &page.sections {
            session.mount_section(spec)?;
        }
        tracing::info!(
            offset = session.tracker.offset(),
            pending = session.controller.pending_count(),
            "page mounted"
        );
        Ok(session)
    }

    /// Compose and append one more section.
    ///
    /// Element ids and the parallax layer must not collide with any mounted section.
    pub fn mount_section(&mut self, spec: &SectionSpec) -> RevealResult<&MountedSection> {
        if self.section(&spec.id).is_some() {
            return Err(RevealError::validation(format!(
                "section '{}' is already mounted",
                spec.id
            )));
        }
        for id in spec.element_ids() {
            if let Some(owner) = self.sections.iter().find(|s| s.targets().any(|t| t == id)) {
                return Err(RevealError::validation(format!(
                    "section '{}': element '{id}' is already mounted by section '{}'",
                    spec.id,
                    owner.id()
                )));
            }
        }
        if let Some(binding) = &spec.parallax
            && let Some(owner) = self
                .sections
                .iter()
                .find(|s| s.parallax().is_some_and(|p| p.layer() == &binding.layer))
        {
            return Err(RevealError::validation(format!(
                "section '{}': layer '{}' is already bound by section '{}'",
                spec.id,
                binding.layer,
                owner.id()
            )));
        }
        let mounted = self.composer.compose(spec)?;
        self.sections.push(mounted);
        Ok(&self.sections[self.sections.len() - 1])
    }

    /// Unmount one section synchronously. Returns `false` if it was not mounted.
    pub fn unmount_section(&mut self, id: &ElementId) -> bool {
        let Some(pos) = self.sections.iter().position(|s| s.id() == id) else {
            return false;
        };
        self.sections.remove(pos).unmount();
        true
    }

    /// Advance the presentation clock to `now_s`, deliver any coalesced scroll offset, and emit
    /// the state of every running entrance.
    pub fn advance_frame(&self, now_s: f64) -> FrameStats {
        let now_s = self.clock.advance_to(now_s);
        let scroll_flushed = self.tracker.flush_frame();
        let entrance_effects = self.composer.tick();
        FrameStats {
            now_s,
            scroll_flushed,
            entrance_effects,
        }
    }

    pub fn sections(&self) -> &[MountedSection] {
        &self.sections
    }

    pub fn section(&self, id: &ElementId) -> Option<&MountedSection> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    pub fn controller(&self) -> &ViewportRevealController {
        &self.controller
    }

    pub fn now_s(&self) -> f64 {
        self.clock.now_s()
    }

    /// Entrance transitions still in flight.
    pub fn running_entrances(&self) -> usize {
        self.composer.running_count()
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        let count = self.sections.len();
        self.sections.clear();
        self.reveal_refresh.take();
        tracing::info!(sections = count, "page unmounted");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/page_session.rs"]
mod tests;
