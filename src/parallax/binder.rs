use std::{fmt, rc::Rc};

use crate::{
    animation::clock::FrameClock,
    foundation::core::{LayerId, SpeedFactor},
    render::effect::{Effect, EffectSink},
    scroll::tracker::{ScrollTracker, Subscription},
};

/// Vertical layer offset for a scroll offset. Pure: no accumulated state.
#[inline]
pub fn parallax_offset(scroll_offset: f64, speed: SpeedFactor) -> f64 {
    scroll_offset * speed.get()
}

/// Binds background layers to the page's [`ScrollTracker`].
#[derive(Clone)]
pub struct ParallaxBinder {
    tracker: ScrollTracker,
    sink: Rc<dyn EffectSink>,
    clock: FrameClock,
}

impl fmt::Debug for ParallaxBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallaxBinder")
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

impl ParallaxBinder {
    pub fn new(tracker: ScrollTracker, sink: Rc<dyn EffectSink>, clock: FrameClock) -> Self {
        Self {
            tracker,
            sink,
            clock,
        }
    }

    /// Start driving `layer`. The current offset is applied right away, then again on every
    /// scroll notification until the returned handle is dropped.
    pub fn bind(&self, layer: LayerId, speed: SpeedFactor) -> ParallaxHandle {
        let sink = self.sink.clone();
        let clock = self.clock.clone();
        let bound = layer.clone();
        let subscription = self.tracker.subscribe(move |state| {
            emit(&*sink, &bound, clock.now_s(), state.offset, speed);
            Ok(())
        });
        // Read after subscribing: the first subscriber attaches the tracker, which resyncs its
        // offset from the host.
        emit(&*self.sink, &layer, self.clock.now_s(), self.tracker.offset(), speed);
        tracing::debug!(%layer, speed = speed.get(), "parallax layer bound");

        ParallaxHandle {
            layer,
            speed,
            tracker: self.tracker.clone(),
            _subscription: subscription,
        }
    }
}

fn emit(sink: &dyn EffectSink, layer: &LayerId, at_s: f64, scroll_offset: f64, speed: SpeedFactor) {
    sink.apply(Effect::Parallax {
        layer: layer.clone(),
        at_s,
        translate_y: parallax_offset(scroll_offset, speed),
    });
}

/// A live layer binding. Dropping it unsubscribes from the tracker.
#[must_use = "dropping a ParallaxHandle unbinds the layer"]
pub struct ParallaxHandle {
    layer: LayerId,
    speed: SpeedFactor,
    tracker: ScrollTracker,
    _subscription: Subscription,
}

impl fmt::Debug for ParallaxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallaxHandle")
            .field("layer", &self.layer)
            .field("speed", &self.speed)
            .finish()
    }
}

impl ParallaxHandle {
    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    pub fn speed(&self) -> SpeedFactor {
        self.speed
    }

    /// Offset for the tracker's current scroll position.
    pub fn current_offset(&self) -> f64 {
        parallax_offset(self.tracker.offset(), self.speed)
    }

    pub fn unbind(self) {
        tracing::debug!(layer = %self.layer, "parallax layer unbound");
        drop(self);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/parallax/binder.rs"]
mod tests;
