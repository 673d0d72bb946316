use crate::{
    animation::entrance::AnimationParams,
    composition::model::{ItemSpec, PageSpec, ParallaxBinding, RevealTrigger, SectionSpec},
    foundation::core::{ElementId, LayerId, SpeedFactor, Threshold},
    foundation::error::RevealResult,
    reveal::controller::RevealConfig,
    scroll::tracker::{CoalescePolicy, TrackerConfig},
};

pub struct PageBuilder {
    sections: Vec<SectionSpec>,
    tracker: TrackerConfig,
    reveal: RevealConfig,
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            tracker: TrackerConfig::default(),
            reveal: RevealConfig::default(),
        }
    }

    pub fn section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    pub fn coalesce(mut self, policy: CoalescePolicy) -> Self {
        self.tracker.coalesce = policy;
        self
    }

    pub fn default_threshold(mut self, fraction: f64) -> RevealResult<Self> {
        self.reveal.default_threshold = Threshold::new(fraction)?;
        Ok(self)
    }

    pub fn build(self) -> RevealResult<PageSpec> {
        let page = PageSpec {
            sections: self.sections,
            tracker: self.tracker,
            reveal: self.reveal,
        };
        page.validate()?;
        Ok(page)
    }
}

pub struct SectionBuilder {
    id: ElementId,
    content: serde_json::Value,
    entrance: AnimationParams,
    trigger: RevealTrigger,
    threshold: Option<f64>,
    parallax: Option<(LayerId, f64)>,
    items: Vec<ItemSpec>,
}

impl SectionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(id),
            content: serde_json::Value::Null,
            entrance: AnimationParams::fade_in(0.8),
            trigger: RevealTrigger::InView,
            threshold: None,
            parallax: None,
            items: Vec::new(),
        }
    }

    pub fn content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    pub fn entrance(mut self, params: AnimationParams) -> Self {
        self.entrance = params;
        self
    }

    pub fn on_mount(mut self) -> Self {
        self.trigger = RevealTrigger::OnMount;
        self
    }

    pub fn threshold(mut self, fraction: f64) -> Self {
        self.threshold = Some(fraction);
        self
    }

    pub fn parallax(mut self, layer: impl Into<String>, speed_factor: f64) -> Self {
        self.parallax = Some((LayerId::new(layer), speed_factor));
        self
    }

    pub fn item(mut self, item: ItemSpec) -> Self {
        self.items.push(item);
        self
    }

    pub fn build(self) -> RevealResult<SectionSpec> {
        let threshold = self.threshold.map(Threshold::new).transpose()?;
        let parallax = match self.parallax {
            Some((layer, speed)) => Some(ParallaxBinding {
                layer,
                speed_factor: SpeedFactor::new(speed)?,
            }),
            None => None,
        };
        let section = SectionSpec {
            id: self.id,
            content: self.content,
            entrance: self.entrance,
            trigger: self.trigger,
            threshold,
            parallax,
            items: self.items,
        };
        section.validate()?;
        Ok(section)
    }
}

/// In-view item with the given entrance.
pub fn item(id: impl Into<String>, entrance: AnimationParams) -> ItemSpec {
    ItemSpec {
        id: ElementId::new(id),
        content: serde_json::Value::Null,
        entrance,
        trigger: RevealTrigger::InView,
        threshold: None,
    }
}

/// Item that animates as soon as its section mounts.
pub fn mount_item(id: impl Into<String>, entrance: AnimationParams) -> ItemSpec {
    ItemSpec {
        trigger: RevealTrigger::OnMount,
        ..item(id, entrance)
    }
}

/// Items sharing one entrance, delayed by `step_s` each (0, step, 2*step, ...).
pub fn staggered_items<I, S>(ids: I, entrance: AnimationParams, step_s: f64) -> Vec<ItemSpec>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter()
        .enumerate()
        .map(|(i, id)| item(id, entrance.with_delay(entrance.delay_s + step_s * i as f64)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
