//! Turns [`SectionSpec`]s into mounted, animating sections.
//!
//! Each entrance target (the section root and every item) is hidden at mount by emitting its
//! initial visual state. When its trigger fires, an entrance run is queued and
//! [`SectionComposer::tick`] interpolates it towards the settled state on every frame until it
//! completes. Parallax bindings are held for as long as the section is mounted.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    animation::clock::FrameClock,
    animation::entrance::{AnimationParams, VisualState},
    composition::model::{RevealTrigger, SectionSpec},
    foundation::core::{ElementId, Threshold},
    foundation::error::RevealResult,
    parallax::binder::{ParallaxBinder, ParallaxHandle},
    render::effect::{Effect, EffectSink},
    reveal::controller::{Observation, ViewportRevealController},
    reveal::latch::RevealState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

/// An entrance transition in flight.
#[derive(Clone, Debug)]
struct EntranceRun {
    instance: InstanceId,
    target: ElementId,
    params: AnimationParams,
    started_s: f64,
}

type RunQueue = Rc<RefCell<Vec<EntranceRun>>>;

pub struct SectionComposer {
    controller: ViewportRevealController,
    binder: ParallaxBinder,
    sink: Rc<dyn EffectSink>,
    clock: FrameClock,
    runs: RunQueue,
    next_instance: Cell<u64>,
}

impl fmt::Debug for SectionComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionComposer")
            .field("controller", &self.controller)
            .field("running", &self.running_count())
            .finish_non_exhaustive()
    }
}

impl SectionComposer {
    pub fn new(
        controller: ViewportRevealController,
        binder: ParallaxBinder,
        sink: Rc<dyn EffectSink>,
        clock: FrameClock,
    ) -> Self {
        Self {
            controller,
            binder,
            sink,
            clock,
            runs: Rc::new(RefCell::new(Vec::new())),
            next_instance: Cell::new(0),
        }
    }

    /// Entrance transitions currently in flight.
    pub fn running_count(&self) -> usize {
        self.runs.borrow().len()
    }

    #[tracing::instrument(skip(self, spec), fields(section = %spec.id))]
    pub fn compose(&self, spec: &SectionSpec) -> RevealResult<MountedSection> {
        spec.validate()?;

        let instance = InstanceId(self.next_instance.get());
        self.next_instance.set(instance.0 + 1);

        let targets = std::iter::once((&spec.id, spec.entrance, spec.trigger, spec.threshold))
            .chain(
                spec.items
                    .iter()
                    .map(|i| (&i.id, i.entrance, i.trigger, i.threshold)),
            );

        let mut entrances = Vec::new();
        for (id, params, trigger, threshold) in targets {
            let threshold = threshold.unwrap_or(self.controller.default_threshold());
            entrances.push(self.mount_entrance(instance, id, params, trigger, threshold));
        }

        let parallax = spec
            .parallax
            .as_ref()
            .map(|p| self.binder.bind(p.layer.clone(), p.speed_factor));

        tracing::debug!(
            targets = entrances.len(),
            parallax = parallax.is_some(),
            "section mounted"
        );
        Ok(MountedSection {
            id: spec.id.clone(),
            instance,
            entrances,
            parallax,
            runs: Rc::downgrade(&self.runs),
        })
    }

    fn mount_entrance(
        &self,
        instance: InstanceId,
        target: &ElementId,
        params: AnimationParams,
        trigger: RevealTrigger,
        threshold: Threshold,
    ) -> MountedEntrance {
        let now = self.clock.now_s();
        self.sink.apply(Effect::Entrance {
            target: target.clone(),
            at_s: now,
            visual: params.initial(),
        });

        let run = EntranceRun {
            instance,
            target: target.clone(),
            params,
            started_s: now,
        };
        let handle = match trigger {
            RevealTrigger::OnMount => {
                self.runs.borrow_mut().push(run);
                TriggerHandle::Mounted
            }
            RevealTrigger::InView => {
                let runs = Rc::downgrade(&self.runs);
                let clock = self.clock.clone();
                let observation = self.controller.observe(target.clone(), threshold, move || {
                    start_run(&runs, run, clock.now_s());
                });
                TriggerHandle::Observed(observation)
            }
        };
        MountedEntrance {
            target: target.clone(),
            handle,
        }
    }

    /// Emit the current visual state of every running entrance at the clock's time.
    ///
    /// Completed runs emit [`VisualState::SETTLED`] once and are dropped. Returns how many
    /// effects were emitted.
    pub fn tick(&self) -> usize {
        let now = self.clock.now_s();
        let effects: Vec<Effect> = {
            let mut out = Vec::new();
            self.runs.borrow_mut().retain(|run| {
                let elapsed = now - run.started_s;
                let done = elapsed >= run.params.total_s();
                let visual = if done {
                    VisualState::SETTLED
                } else {
                    run.params.sample(elapsed)
                };
                out.push(Effect::Entrance {
                    target: run.target.clone(),
                    at_s: now,
                    visual,
                });
                !done
            });
            out
        };

        let count = effects.len();
        for effect in effects {
            self.sink.apply(effect);
        }
        count
    }
}

fn start_run(runs: &Weak<RefCell<Vec<EntranceRun>>>, mut run: EntranceRun, now_s: f64) {
    let Some(runs) = runs.upgrade() else {
        return;
    };
    run.started_s = now_s;
    tracing::debug!(element = %run.target, at_s = now_s, "entrance started");
    runs.borrow_mut().push(run);
}

enum TriggerHandle {
    Mounted,
    Observed(Observation),
}

struct MountedEntrance {
    target: ElementId,
    handle: TriggerHandle,
}

impl MountedEntrance {
    fn state(&self) -> RevealState {
        match &self.handle {
            TriggerHandle::Mounted => RevealState::Triggered,
            TriggerHandle::Observed(obs) => obs.state(),
        }
    }
}

/// A composed section. Dropping it (or calling [`MountedSection::unmount`]) cancels pending
/// reveals, stops in-flight entrances and unbinds parallax before returning.
#[must_use = "dropping a MountedSection unmounts it"]
pub struct MountedSection {
    id: ElementId,
    instance: InstanceId,
    entrances: Vec<MountedEntrance>,
    parallax: Option<ParallaxHandle>,
    runs: Weak<RefCell<Vec<EntranceRun>>>,
}

impl fmt::Debug for MountedSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedSection")
            .field("id", &self.id)
            .field("instance", &self.instance)
            .field("targets", &self.entrances.len())
            .field("parallax", &self.parallax)
            .finish()
    }
}

impl MountedSection {
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Reveal state of the section root or one of its items.
    pub fn reveal_state(&self, target: &ElementId) -> Option<RevealState> {
        self.entrances
            .iter()
            .find(|e| &e.target == target)
            .map(MountedEntrance::state)
    }

    /// Section root first, then items.
    pub fn targets(&self) -> impl Iterator<Item = &ElementId> {
        self.entrances.iter().map(|e| &e.target)
    }

    /// Section root first, then items.
    pub fn reveal_states(&self) -> Vec<(ElementId, RevealState)> {
        self.entrances
            .iter()
            .map(|e| (e.target.clone(), e.state()))
            .collect()
    }

    pub fn parallax(&self) -> Option<&ParallaxHandle> {
        self.parallax.as_ref()
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountedSection {
    fn drop(&mut self) {
        // Observations cancel on drop; do it before the run queue is purged so no trigger can
        // slip a new run in afterwards.
        self.entrances.clear();
        self.parallax.take();
        if let Some(runs) = self.runs.upgrade() {
            let instance = self.instance;
            runs.borrow_mut().retain(|r| r.instance != instance);
        }
        tracing::debug!(section = %self.id, "section unmounted");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/composer.rs"]
mod tests;
