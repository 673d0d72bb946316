use std::{cell::RefCell, fmt};

use crate::{
    animation::entrance::VisualState,
    foundation::core::{ElementId, LayerId},
    foundation::error::RevealResult,
};

/// One instruction for the rendering layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Paint `target` with `visual` as of `at_s` seconds.
    Entrance {
        target: ElementId,
        at_s: f64,
        visual: VisualState,
    },
    /// Shift background `layer` vertically by `translate_y` px.
    Parallax {
        layer: LayerId,
        at_s: f64,
        translate_y: f64,
    },
}

impl Effect {
    pub fn at_s(&self) -> f64 {
        match self {
            Self::Entrance { at_s, .. } | Self::Parallax { at_s, .. } => *at_s,
        }
    }
}

/// Consumer of the effect stream. Called on the event thread, so keep it short.
pub trait EffectSink {
    fn apply(&self, effect: Effect);
}

/// In-memory [`EffectSink`] that records everything it is given.
#[derive(Default)]
pub struct EffectLog {
    effects: RefCell<Vec<Effect>>,
}

impl fmt::Debug for EffectLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectLog")
            .field("len", &self.effects.borrow().len())
            .finish()
    }
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.effects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.borrow().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Effect> {
        self.effects.borrow().clone()
    }

    pub fn take(&self) -> Vec<Effect> {
        std::mem::take(&mut *self.effects.borrow_mut())
    }

    pub fn clear(&self) {
        self.effects.borrow_mut().clear();
    }

    /// Entrance states recorded for `target`, in order.
    pub fn entrances_for(&self, target: &ElementId) -> Vec<VisualState> {
        self.effects
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Effect::Entrance {
                    target: t, visual, ..
                } if t == target => Some(*visual),
                _ => None,
            })
            .collect()
    }

    /// Most recent parallax offset recorded for `layer`.
    pub fn last_parallax(&self, layer: &LayerId) -> Option<f64> {
        self.effects.borrow().iter().rev().find_map(|e| match e {
            Effect::Parallax {
                layer: l,
                translate_y,
                ..
            } if l == layer => Some(*translate_y),
            _ => None,
        })
    }

    pub fn to_json_pretty(&self) -> RevealResult<String> {
        Ok(serde_json::to_string_pretty(&*self.effects.borrow())?)
    }
}

impl EffectSink for EffectLog {
    fn apply(&self, effect: Effect) {
        self.effects.borrow_mut().push(effect);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/effect.rs"]
mod tests;
