use crate::{
    animation::ease::Ease,
    foundation::core::{Affine, Vec2},
    foundation::error::{RevealError, RevealResult},
};

/// Visual properties a rendering layer applies to one element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualState {
    pub translate: Vec2,
    pub opacity: f64, // 0..1
    pub scale: f64,
}

impl VisualState {
    /// Resting state: no offset, fully opaque, unscaled.
    pub const SETTLED: Self = Self {
        translate: Vec2::ZERO,
        opacity: 1.0,
        scale: 1.0,
    };

    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            translate: a.translate.lerp(b.translate, t),
            opacity: (a.opacity + (b.opacity - a.opacity) * t).clamp(0.0, 1.0),
            scale: a.scale + (b.scale - a.scale) * t,
        }
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::SETTLED
    }
}

/// Entrance transition from an initial visual state to [`VisualState::SETTLED`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationParams {
    #[serde(default)]
    pub initial_offset: Vec2,
    #[serde(default)]
    pub initial_opacity: f64,
    #[serde(default = "one")]
    pub initial_scale: f64,
    pub duration_s: f64,
    #[serde(default)]
    pub delay_s: f64,
    #[serde(default)]
    pub ease: Ease,
}

fn one() -> f64 {
    1.0
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self::fade_up(0.0)
    }
}

impl AnimationParams {
    /// Slide up 50px while fading in over 0.8s.
    pub fn fade_up(delay_s: f64) -> Self {
        Self {
            initial_offset: Vec2::new(0.0, 50.0),
            initial_opacity: 0.0,
            initial_scale: 1.0,
            duration_s: 0.8,
            delay_s,
            ease: Ease::OutCubic,
        }
    }

    pub fn fade_in(duration_s: f64) -> Self {
        Self {
            initial_offset: Vec2::ZERO,
            initial_opacity: 0.0,
            initial_scale: 1.0,
            duration_s,
            delay_s: 0.0,
            ease: Ease::OutCubic,
        }
    }

    pub fn scale_in(from_scale: f64, duration_s: f64) -> Self {
        Self {
            initial_offset: Vec2::ZERO,
            initial_opacity: 0.0,
            initial_scale: from_scale,
            duration_s,
            delay_s: 0.0,
            ease: Ease::OutCubic,
        }
    }

    pub fn with_delay(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn validate(&self) -> RevealResult<()> {
        if !self.duration_s.is_finite() || self.duration_s < 0.0 {
            return Err(RevealError::validation(
                "entrance duration must be finite and >= 0",
            ));
        }
        if !self.delay_s.is_finite() || self.delay_s < 0.0 {
            return Err(RevealError::validation(
                "entrance delay must be finite and >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_opacity) {
            return Err(RevealError::validation(
                "entrance initial opacity must be in [0, 1]",
            ));
        }
        if !self.initial_scale.is_finite() || self.initial_scale < 0.0 {
            return Err(RevealError::validation(
                "entrance initial scale must be finite and >= 0",
            ));
        }
        if !self.initial_offset.is_finite() {
            return Err(RevealError::validation(
                "entrance initial offset must be finite",
            ));
        }
        Ok(())
    }

    pub fn initial(&self) -> VisualState {
        VisualState {
            translate: self.initial_offset,
            opacity: self.initial_opacity,
            scale: self.initial_scale,
        }
    }

    /// Seconds from trigger until the settled state is reached.
    pub fn total_s(&self) -> f64 {
        self.delay_s + self.duration_s
    }

    /// Progress in `[0, 1]` at `elapsed_s` seconds after the trigger.
    pub fn progress(&self, elapsed_s: f64) -> f64 {
        let active = elapsed_s - self.delay_s;
        if self.duration_s <= 0.0 {
            return if active >= 0.0 { 1.0 } else { 0.0 };
        }
        if active <= 0.0 {
            return 0.0;
        }
        if active >= self.duration_s {
            return 1.0;
        }
        active / self.duration_s
    }

    pub fn sample(&self, elapsed_s: f64) -> VisualState {
        let p = self.progress(elapsed_s);
        if p >= 1.0 {
            return VisualState::SETTLED;
        }
        VisualState::lerp(self.initial(), VisualState::SETTLED, self.ease.apply(p))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/entrance.rs"]
mod tests;
