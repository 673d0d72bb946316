use std::{cell::Cell, rc::Rc};

/// Shared presentation clock in seconds, advanced once per animation frame by the host.
///
/// Time never moves backwards; an older timestamp is ignored.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    now_s: Rc<Cell<f64>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_s: f64) -> Self {
        Self {
            now_s: Rc::new(Cell::new(now_s)),
        }
    }

    pub fn now_s(&self) -> f64 {
        self.now_s.get()
    }

    /// Move to `now_s`. Returns the time actually in effect.
    pub fn advance_to(&self, now_s: f64) -> f64 {
        let current = self.now_s.get();
        if now_s.is_finite() && now_s > current {
            self.now_s.set(now_s);
            return now_s;
        }
        if now_s < current {
            tracing::debug!(now_s, current, "ignoring clock step backwards");
        }
        current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
