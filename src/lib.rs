//! Scroll-driven reveal and parallax orchestration for single-page presentations.
//!
//! A page is a list of [`SectionSpec`]s. Mounting it produces a stream of [`Effect`]s (entrance
//! visual states and parallax offsets) for an external rendering layer to paint.
//!
//! # Components
//!
//! - [`ScrollTracker`]: owns the single host scroll registration and fans offsets out to
//!   subscribers in registration order.
//! - [`ViewportRevealController`]: one-shot `Pending -> Triggered` reveal per observed element.
//! - [`ParallaxBinder`]: layer offset `scroll * speed_factor`, recomputed on every update.
//! - [`SectionComposer`]: wires a [`SectionSpec`] into the two above and runs entrance
//!   transitions frame by frame.
//! - [`PageSession`]: mounts a whole [`PageSpec`] and drives it from host events.
//!
//! Everything runs on one thread. Host capabilities come in through [`ScrollSource`] and
//! [`VisibilityProbe`]; [`SimHost`] implements both for headless use.
//!
//! # Design constraints
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **One-shot reveals**: a triggered element never replays its entrance.
//! - **Pure parallax**: offsets carry no state beyond the current scroll position.
//! - **Silent degradation**: missing host capabilities fall back to the static final state.
#![forbid(unsafe_code)]

mod animation;
mod composition;
mod foundation;
mod host;
mod parallax;
mod render;
mod reveal;
mod scroll;
mod session;

pub use animation::clock::FrameClock;
pub use animation::ease::Ease;
pub use animation::entrance::{AnimationParams, VisualState};
pub use composition::composer::{InstanceId, MountedSection, SectionComposer};
pub use composition::dsl::{PageBuilder, SectionBuilder, item, mount_item, staggered_items};
pub use composition::model::{
    ItemSpec, PageSpec, ParallaxBinding, RevealTrigger, SectionSpec,
};
pub use foundation::core::{
    Affine, ElementId, LayerId, Point, Rect, ScrollState, SpeedFactor, Threshold, Vec2,
    visible_ratio,
};
pub use foundation::error::{RevealError, RevealResult};
pub use host::sim::SimHost;
pub use parallax::binder::{ParallaxBinder, ParallaxHandle, parallax_offset};
pub use render::effect::{Effect, EffectLog, EffectSink};
pub use reveal::controller::{
    Observation, ObservationId, RevealConfig, ViewportRevealController, VisibilityProbe,
};
pub use reveal::latch::{RevealLatch, RevealState};
pub use scroll::tracker::{
    CoalescePolicy, ScrollCallback, ScrollSink, ScrollSource, ScrollTracker, SubscriberId,
    Subscription, TrackerConfig,
};
pub use session::page_session::{FrameStats, PageSession};
