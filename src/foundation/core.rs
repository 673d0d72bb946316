use std::fmt;

use crate::foundation::error::{RevealError, RevealResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Identifier of an observed element (a section root or one of its items).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub String);

/// Identifier of a background layer driven by parallax.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vertical scroll distance from the top of the document, in px.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollState {
    pub offset: f64,
}

impl ScrollState {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }
}

/// Fraction of an element's area that must be visible, in `(0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Self = Self(0.1);

    pub fn new(fraction: f64) -> RevealResult<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(RevealError::validation(format!(
                "threshold must be in (0, 1], got {fraction}"
            )));
        }
        Ok(Self(fraction))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_met_by(self, visible_ratio: f64) -> bool {
        visible_ratio >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Threshold {
    type Error = RevealError;

    fn try_from(value: f64) -> RevealResult<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

/// Parallax speed multiplier in `[0, 1]`. `1` tracks the scroll, `0` stays fixed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub fn new(factor: f64) -> RevealResult<Self> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(RevealError::validation(format!(
                "speed factor must be in [0, 1], got {factor}"
            )));
        }
        Ok(Self(factor))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for SpeedFactor {
    type Error = RevealError;

    fn try_from(value: f64) -> RevealResult<Self> {
        Self::new(value)
    }
}

impl From<SpeedFactor> for f64 {
    fn from(value: SpeedFactor) -> Self {
        value.0
    }
}

/// Fraction of `element` covered by `viewport`, in `[0, 1]`.
///
/// Zero-area elements count as fully visible once they sit inside the viewport.
pub fn visible_ratio(element: Rect, viewport: Rect) -> f64 {
    let overlap = element.intersect(viewport);
    let area = element.area();
    if area <= 0.0 {
        let inside = viewport.contains(element.origin());
        return if inside { 1.0 } else { 0.0 };
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
