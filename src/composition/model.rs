use std::collections::BTreeSet;

use crate::{
    animation::entrance::AnimationParams,
    foundation::core::{ElementId, LayerId, SpeedFactor, Threshold},
    foundation::error::{RevealError, RevealResult},
    reveal::controller::RevealConfig,
    scroll::tracker::TrackerConfig,
};

/// Whole-page configuration: the sections in document order plus orchestration settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSpec {
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

/// Declarative description of one full-viewport section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionSpec {
    pub id: ElementId,
    /// Opaque payload for the rendering layer.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub content: serde_json::Value,
    pub entrance: AnimationParams,
    #[serde(default)]
    pub trigger: RevealTrigger,
    /// Overrides the page's default threshold for this section root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallax: Option<ParallaxBinding>,
    /// Children with their own entrance, revealed independently of the section root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemSpec {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub content: serde_json::Value,
    pub entrance: AnimationParams,
    #[serde(default)]
    pub trigger: RevealTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
}

/// Background layer bound to scroll.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallaxBinding {
    pub layer: LayerId,
    pub speed_factor: SpeedFactor,
}

/// What starts an entrance transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealTrigger {
    /// First time the element is visible past its threshold.
    #[default]
    InView,
    /// As soon as the section mounts.
    OnMount,
}

impl PageSpec {
    pub fn from_json(s: &str) -> RevealResult<Self> {
        let page: Self = serde_json::from_str(s)?;
        page.validate()?;
        Ok(page)
    }

    pub fn validate(&self) -> RevealResult<()> {
        let mut elements = BTreeSet::new();
        let mut layers = BTreeSet::new();
        for section in &self.sections {
            section.validate()?;
            for id in section.element_ids() {
                if !elements.insert(id.clone()) {
                    return Err(RevealError::validation(format!(
                        "duplicate element id '{id}'"
                    )));
                }
            }
            if let Some(p) = &section.parallax
                && !layers.insert(p.layer.clone())
            {
                return Err(RevealError::validation(format!(
                    "layer '{}' is bound by more than one section",
                    p.layer
                )));
            }
        }
        Ok(())
    }
}

impl SectionSpec {
    pub fn validate(&self) -> RevealResult<()> {
        validate_id(&self.id)?;
        self.entrance
            .validate()
            .map_err(|e| in_context(e, "section", &self.id))?;
        if let Some(p) = &self.parallax
            && p.layer.as_str().trim().is_empty()
        {
            return Err(RevealError::validation(format!(
                "section '{}': parallax layer id must be non-empty",
                self.id
            )));
        }
        for item in &self.items {
            validate_id(&item.id)?;
            item.entrance
                .validate()
                .map_err(|e| in_context(e, "item", &item.id))?;
        }
        Ok(())
    }

    /// Section root first, then items in order.
    pub fn element_ids(&self) -> impl Iterator<Item = &ElementId> {
        std::iter::once(&self.id).chain(self.items.iter().map(|i| &i.id))
    }
}

fn in_context(err: RevealError, kind: &str, id: &ElementId) -> RevealError {
    match err {
        RevealError::Validation(msg) => RevealError::validation(format!("{kind} '{id}': {msg}")),
        other => other,
    }
}

fn validate_id(id: &ElementId) -> RevealResult<()> {
    if id.as_str().trim().is_empty() {
        return Err(RevealError::validation("element id must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
