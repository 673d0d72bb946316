use std::{cell::Cell, rc::Rc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealState {
    Pending,
    Triggered,
}

/// One-way `Pending -> Triggered` latch shared between a registration and its handle.
#[derive(Clone, Debug)]
pub struct RevealLatch {
    state: Rc<Cell<RevealState>>,
}

impl Default for RevealLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealLatch {
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(RevealState::Pending)),
        }
    }

    pub fn state(&self) -> RevealState {
        self.state.get()
    }

    pub fn is_triggered(&self) -> bool {
        self.state.get() == RevealState::Triggered
    }

    /// Flip to `Triggered`. Returns `false` if the latch had already fired.
    pub fn trigger(&self) -> bool {
        self.state.replace(RevealState::Triggered) == RevealState::Pending
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/latch.rs"]
mod tests;
