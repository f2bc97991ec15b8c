//! What the page shows, derived from interaction events.

use std::collections::BTreeMap;
use std::rc::Rc;

use pinchcard_core::{InteractionEvent, IntroCue, RegionId, SceneId, TransitionCause};
use yew::prelude::*;

/// Rendered state of the story page.
///
/// The session decides; this only mirrors its events, plus the fade
/// choreography that lags behind a scene change.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Hand cursor position in viewport pixels; hidden until a hand is seen.
    pub cursor: Option<(f32, f32)>,
    pub pinching: bool,
    pub hovered: Option<RegionId>,
    /// The hovered region also carries the pinch outline.
    pub outlined: bool,
    /// Clicked cards, with the scene they belong to.
    pub clicked: BTreeMap<RegionId, SceneId>,
    /// Scene currently on screen. Trails the session's scene by the fade.
    pub shown: SceneId,
    pub fading: bool,
    pub phone_visible: bool,
    pub ending_title: bool,
    /// Startup failure text shown over the page.
    pub notice: Option<&'static str>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            cursor: None,
            pinching: false,
            hovered: None,
            outlined: false,
            clicked: BTreeMap::new(),
            shown: SceneId::Start,
            fading: false,
            phone_visible: false,
            ending_title: false,
            notice: None,
        }
    }
}

impl ViewState {
    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_ref().is_some_and(|hovered| hovered.as_str() == id)
    }

    pub fn is_outlined(&self, id: &str) -> bool {
        self.outlined && self.is_hovered(id)
    }

    pub fn is_clicked(&self, id: &str) -> bool {
        self.clicked.contains_key(&RegionId::new(id))
    }
}

#[derive(Debug, Clone)]
pub enum ViewAction {
    Interaction(InteractionEvent),
    FadeOut,
    /// Swap the visible scene, starting it with nothing clicked.
    Show(SceneId),
    FadeIn,
    ShowEndingTitle,
    Notice(Option<&'static str>),
}

impl Reducible for ViewState {
    type Action = ViewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ViewAction::Interaction(event) => match event {
                InteractionEvent::CursorMoved { x, y } => next.cursor = Some((x, y)),
                InteractionEvent::PinchChanged { pinching } => next.pinching = pinching,
                InteractionEvent::HighlightsChanged {
                    hovered, outlined, ..
                } => {
                    next.outlined = outlined && hovered.is_some();
                    next.hovered = hovered;
                }
                InteractionEvent::CardMarked { scene, card, .. } => {
                    next.clicked.insert(card, scene);
                }
                InteractionEvent::SceneChanged {
                    cause: TransitionCause::Restart,
                    ..
                } => {
                    next.phone_visible = false;
                    next.ending_title = false;
                }
                InteractionEvent::SceneChanged { .. } => return self,
                InteractionEvent::IntroCue(IntroCue::ShowPhone) => next.phone_visible = true,
                InteractionEvent::IntroCue(IntroCue::HidePhone) => next.phone_visible = false,
                InteractionEvent::IntroCue(_) => return self,
            },
            ViewAction::FadeOut => next.fading = true,
            ViewAction::Show(scene) => {
                next.shown = scene;
                next.clicked.retain(|_, owner| *owner != scene);
                next.hovered = None;
                next.outlined = false;
            }
            ViewAction::FadeIn => next.fading = false,
            ViewAction::ShowEndingTitle => next.ending_title = true,
            ViewAction::Notice(notice) => next.notice = notice,
        }

        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn reduce_all(actions: impl IntoIterator<Item = ViewAction>) -> Rc<ViewState> {
        actions
            .into_iter()
            .fold(Rc::new(ViewState::default()), |state, action| state.reduce(action))
    }

    fn marked(scene: SceneId, card: &str) -> ViewAction {
        ViewAction::Interaction(InteractionEvent::CardMarked {
            scene,
            card: RegionId::new(card),
            newly: true,
        })
    }

    #[wasm_bindgen_test]
    fn test_highlight_follows_latest_event() {
        let state = reduce_all([
            ViewAction::Interaction(InteractionEvent::HighlightsChanged {
                cleared: vec![],
                hovered: Some(RegionId::new("scene-2-card-1")),
                outlined: true,
            }),
            ViewAction::Interaction(InteractionEvent::HighlightsChanged {
                cleared: vec![RegionId::new("scene-2-card-1")],
                hovered: Some(RegionId::new("scene-2-card-2")),
                outlined: false,
            }),
        ]);
        assert!(!state.is_hovered("scene-2-card-1"));
        assert!(state.is_hovered("scene-2-card-2"));
        assert!(!state.is_outlined("scene-2-card-2"));
    }

    #[wasm_bindgen_test]
    fn test_showing_a_scene_clears_only_its_marks() {
        let state = reduce_all([
            marked(SceneId::Scene1, "scene-1-card-2"),
            marked(SceneId::Scene2, "scene-2-card-1"),
            ViewAction::Show(SceneId::Scene2),
        ]);
        assert_eq!(state.shown, SceneId::Scene2);
        assert!(state.is_clicked("scene-1-card-2"));
        assert!(!state.is_clicked("scene-2-card-1"));
    }

    #[wasm_bindgen_test]
    fn test_restart_hides_phone_and_title() {
        let state = reduce_all([
            ViewAction::Interaction(InteractionEvent::IntroCue(IntroCue::ShowPhone)),
            ViewAction::ShowEndingTitle,
            ViewAction::Interaction(InteractionEvent::SceneChanged {
                from: SceneId::End,
                to: SceneId::Start,
                cause: TransitionCause::Restart,
            }),
        ]);
        assert!(!state.phone_visible);
        assert!(!state.ending_title);
    }

    #[wasm_bindgen_test]
    fn test_unchanged_state_is_reused() {
        let state = Rc::new(ViewState::default());
        let same = Rc::clone(&state).reduce(ViewAction::FadeIn);
        assert!(Rc::ptr_eq(&state, &same));

        let cue = ViewAction::Interaction(InteractionEvent::IntroCue(IntroCue::PlayVibration));
        assert!(Rc::ptr_eq(&state, &Rc::clone(&state).reduce(cue)));
    }
}
