//! Clickable regions read from the rendered scenes.

use std::collections::HashMap;

use pinchcard_core::{Rect, Region, RegionProvider, SceneId};
use web_sys::Element;
use yew::NodeRef;

use crate::content::SceneContent;

/// Node refs of every card and pinchable button, keyed by element id.
///
/// Components attach the refs while rendering; the frame loop reads the
/// bounding rects back. A hidden scene lays out to empty rects and so
/// never produces a hit.
#[derive(Debug, PartialEq)]
pub struct DomLayout {
    scenes: &'static [SceneContent],
    nodes: HashMap<&'static str, NodeRef>,
}

impl DomLayout {
    pub fn new(scenes: &'static [SceneContent]) -> Self {
        let nodes = scenes
            .iter()
            .flat_map(|scene| scene.region_ids())
            .map(|id| (id, NodeRef::default()))
            .collect();
        Self { scenes, nodes }
    }

    /// Ref to attach to the element rendering `id`.
    pub fn node(&self, id: &str) -> NodeRef {
        self.nodes.get(id).cloned().unwrap_or_default()
    }
}

impl RegionProvider for DomLayout {
    fn regions(&self, scene: SceneId) -> Vec<Region> {
        let Some(content) = self.scenes.iter().find(|content| content.scene == scene) else {
            return Vec::new();
        };
        content
            .region_ids()
            .enumerate()
            .filter_map(|(index, id)| {
                let element = self.nodes.get(id)?.cast::<Element>()?;
                Some(region_for(&element, scene.dom_id(), index))
            })
            .collect()
    }
}

/// Region for one rendered element.
///
/// `.card-container` elements are cards (`data-correct="true"` marks the
/// correct one); anything else is a trigger button.
#[allow(clippy::cast_possible_truncation)]
pub fn region_for(element: &Element, scene_id: &str, index: usize) -> Region {
    if element.id().is_empty() {
        element.set_id(&format!("{scene_id}-region-{index}"));
    }
    let bounds = element.get_bounding_client_rect();
    let rect = Rect::new(
        bounds.left() as f32,
        bounds.top() as f32,
        bounds.right() as f32,
        bounds.bottom() as f32,
    );
    if element.class_list().contains("card-container") {
        let correct = element.get_attribute("data-correct").as_deref() == Some("true");
        Region::card(element.id(), rect, correct)
    } else {
        Region::button(element.id(), rect)
    }
}
