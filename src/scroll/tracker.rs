//! Process-wide scroll offset tracking with publish/subscribe fan-out.
//!
//! A [`ScrollTracker`] owns the single host scroll registration. The host listener is attached
//! when the first subscriber arrives and detached when the last one leaves; every subscriber
//! shares it. Notifications run in registration order on the calling thread.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    foundation::core::ScrollState,
    foundation::error::{RevealError, RevealResult},
};

/// Host-side scroll primitive.
///
/// Implementations register one scroll listener on `attach` and forward every scroll event to
/// the provided [`ScrollSink`] until `detach` is called.
pub trait ScrollSource {
    /// Register the host listener. Returns [`RevealError::MissingCapability`] when the host has
    /// no scroll events.
    fn attach(&self, sink: ScrollSink) -> RevealResult<()>;

    /// Remove the listener registered by `attach`.
    fn detach(&self);

    /// Current document scroll offset, if the host can report it.
    fn current_offset(&self) -> Option<f64>;
}

/// When subscribers are notified relative to incoming scroll events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoalescePolicy {
    /// Notify on every scroll event.
    #[default]
    Immediate,
    /// Buffer offsets and notify at most once per [`ScrollTracker::flush_frame`], with only the
    /// latest offset. Parallax then moves in per-frame steps rather than per-event steps.
    PerAnimationFrame,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub coalesce: CoalescePolicy,
}

/// Scroll callback. An `Err` is logged and the subscriber stays registered.
pub type ScrollCallback = Box<dyn FnMut(ScrollState) -> anyhow::Result<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    active: Cell<bool>,
    callback: RefCell<ScrollCallback>,
}

struct TrackerInner {
    source: Rc<dyn ScrollSource>,
    config: TrackerConfig,
    state: Cell<ScrollState>,
    pending: Cell<Option<f64>>,
    subscribers: RefCell<Vec<Rc<Subscriber>>>,
    next_id: Cell<u64>,
    attached: Cell<bool>,
    /// Bumped by every dispatch so an outer pass can tell a nested one has run.
    generation: Cell<u64>,
}

/// Shared handle to the page's scroll state. Cloning shares the same tracker.
#[derive(Clone)]
pub struct ScrollTracker {
    inner: Rc<TrackerInner>,
}

impl fmt::Debug for ScrollTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollTracker")
            .field("state", &self.inner.state.get())
            .field("subscribers", &self.subscriber_count())
            .field("attached", &self.inner.attached.get())
            .finish()
    }
}

impl ScrollTracker {
    pub fn new(source: Rc<dyn ScrollSource>, config: TrackerConfig) -> Self {
        let initial = source.current_offset().unwrap_or(0.0);
        Self {
            inner: Rc::new(TrackerInner {
                source,
                config,
                state: Cell::new(ScrollState::new(initial)),
                pending: Cell::new(None),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                attached: Cell::new(false),
                generation: Cell::new(0),
            }),
        }
    }

    /// Last published offset. Never blocks.
    pub fn offset(&self) -> f64 {
        self.inner.state.get().offset
    }

    pub fn state(&self) -> ScrollState {
        self.inner.state.get()
    }

    pub fn config(&self) -> TrackerConfig {
        self.inner.config
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether the host scroll listener is currently registered.
    pub fn is_listening(&self) -> bool {
        self.inner.attached.get()
    }

    pub fn subscribe(
        &self,
        callback: impl FnMut(ScrollState) -> anyhow::Result<()> + 'static,
    ) -> Subscription {
        let id = SubscriberId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let first = {
            let mut subs = self.inner.subscribers.borrow_mut();
            subs.push(Rc::new(Subscriber {
                id,
                active: Cell::new(true),
                callback: RefCell::new(Box::new(callback)),
            }));
            subs.len() == 1
        };
        if first {
            self.inner.attach();
        }

        Subscription {
            id,
            tracker: Rc::downgrade(&self.inner),
        }
    }

    /// Remove a subscriber. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.unsubscribe(id);
    }

    /// Entry point for host scroll events.
    pub fn publish(&self, offset: f64) {
        self.inner.publish(offset);
    }

    /// Deliver the buffered offset under [`CoalescePolicy::PerAnimationFrame`].
    ///
    /// Returns whether subscribers were notified.
    pub fn flush_frame(&self) -> bool {
        match self.inner.pending.take() {
            Some(offset) => {
                self.inner.dispatch(offset);
                true
            }
            None => false,
        }
    }
}

impl TrackerInner {
    fn attach(self: &Rc<Self>) {
        let sink = ScrollSink {
            tracker: Rc::downgrade(self),
        };
        match self.source.attach(sink) {
            Ok(()) => {
                self.attached.set(true);
                if let Some(offset) = self.source.current_offset() {
                    self.state.set(ScrollState::new(offset));
                }
                tracing::debug!(offset = self.state.get().offset, "scroll listener attached");
            }
            Err(err) => {
                // Offsets stay at their last known value; subscribers just never hear back.
                tracing::warn!(error = %err, "scroll events unavailable");
            }
        }
    }

    fn detach(&self) {
        if self.attached.replace(false) {
            self.source.detach();
            tracing::debug!("scroll listener detached");
        }
    }

    fn unsubscribe(&self, id: SubscriberId) {
        let now_empty = {
            let mut subs = self.subscribers.borrow_mut();
            let Some(pos) = subs.iter().position(|s| s.id == id) else {
                return;
            };
            let sub = subs.remove(pos);
            sub.active.set(false);
            subs.is_empty()
        };
        if now_empty {
            self.pending.set(None);
            self.detach();
        }
    }

    fn publish(&self, offset: f64) {
        if !offset.is_finite() {
            tracing::warn!(offset, "ignoring non-finite scroll offset");
            return;
        }
        match self.config.coalesce {
            CoalescePolicy::Immediate => self.dispatch(offset),
            CoalescePolicy::PerAnimationFrame => self.pending.set(Some(offset)),
        }
    }

    fn dispatch(&self, offset: f64) {
        let state = ScrollState::new(offset);
        self.state.set(state);
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        // Snapshot so callbacks may subscribe or unsubscribe while we iterate.
        let subs: Vec<Rc<Subscriber>> = self.subscribers.borrow().clone();
        for sub in subs {
            if self.generation.get() != generation {
                // A callback scrolled the host; the nested pass already delivered the newer
                // offset to everyone after it.
                tracing::debug!(stale = offset, "scroll notification superseded");
                return;
            }
            if !sub.active.get() {
                continue;
            }
            let Ok(mut callback) = sub.callback.try_borrow_mut() else {
                tracing::debug!(subscriber = sub.id.0, "skipping re-entrant scroll notification");
                continue;
            };
            if let Err(err) = (*callback)(state) {
                let fault = RevealError::subscriber(format!("{err:#}"));
                tracing::warn!(subscriber = sub.id.0, error = %fault, "scroll subscriber failed");
            }
        }
    }
}

impl Drop for TrackerInner {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Weak handle given to a [`ScrollSource`] to forward host scroll events.
#[derive(Clone)]
pub struct ScrollSink {
    tracker: Weak<TrackerInner>,
}

impl fmt::Debug for ScrollSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSink")
            .field("live", &(self.tracker.strong_count() > 0))
            .finish()
    }
}

impl ScrollSink {
    /// Forward one scroll event. A no-op once the tracker is gone.
    pub fn deliver(&self, offset: f64) {
        if let Some(inner) = self.tracker.upgrade() {
            inner.publish(offset);
        }
    }
}

/// Handle returned by [`ScrollTracker::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriberId,
    tracker: Weak<TrackerInner>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.tracker.upgrade() {
            inner.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
