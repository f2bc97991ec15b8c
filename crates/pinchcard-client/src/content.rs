//! Scene copy and the elements each scene renders.

use pinchcard_core::SceneId;

/// What a scene button does when clicked with the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Advances the story and, the first time, brings up camera and detector.
    Start,
    Next,
    Restart,
}

#[derive(Debug, PartialEq)]
pub struct CardContent {
    pub id: &'static str,
    pub label: &'static str,
    pub correct: bool,
}

#[derive(Debug, PartialEq)]
pub struct ButtonContent {
    pub id: &'static str,
    pub label: &'static str,
    pub action: ButtonAction,
}

impl ButtonContent {
    /// Start and next buttons can also be pinched.
    pub fn is_pinchable(&self) -> bool {
        self.action != ButtonAction::Restart
    }
}

#[derive(Debug, PartialEq)]
pub struct SceneContent {
    pub scene: SceneId,
    pub title: &'static str,
    pub cards: &'static [CardContent],
    pub button: Option<ButtonContent>,
}

impl SceneContent {
    /// Ids of the hit-testable elements, in document order.
    pub fn region_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cards.iter().map(|card| card.id).chain(
            self.button
                .iter()
                .filter(|button| button.is_pinchable())
                .map(|button| button.id),
        )
    }
}

const fn card(id: &'static str, label: &'static str) -> CardContent {
    CardContent {
        id,
        label,
        correct: false,
    }
}

const fn button(id: &'static str, label: &'static str, action: ButtonAction) -> Option<ButtonContent> {
    Some(ButtonContent { id, label, action })
}

pub static SCENES: [SceneContent; 8] = [
    SceneContent {
        scene: SceneId::Start,
        title: "pinchcard",
        cards: &[],
        button: button("start-button", "Start", ButtonAction::Start),
    },
    SceneContent {
        scene: SceneId::Tutorial,
        title: "Point with your index finger. Pinch thumb and index to choose.",
        cards: &[],
        button: button("tutorial-next", "Got it", ButtonAction::Next),
    },
    SceneContent {
        scene: SceneId::Scene1,
        title: "Who called last night?",
        cards: &[
            card("scene-1-card-1", "The landlord"),
            card("scene-1-card-2", "Your sister"),
            CardContent {
                id: "scene-1-card-3",
                label: "An unknown number",
                correct: true,
            },
        ],
        button: None,
    },
    SceneContent {
        scene: SceneId::Scene2,
        title: "Pick the three memories you kept.",
        cards: &[
            card("scene-2-card-1", "The harbour"),
            card("scene-2-card-2", "The red umbrella"),
            card("scene-2-card-3", "The last train"),
        ],
        button: None,
    },
    SceneContent {
        scene: SceneId::Scene3,
        title: "What did the message say?",
        cards: &[
            card("scene-3-card-1", "\"Come home\""),
            card("scene-3-card-2", "\"I am sorry\""),
            card("scene-3-card-3", "\"Do not wait\""),
        ],
        button: None,
    },
    SceneContent {
        scene: SceneId::Scene4,
        title: "Where will you go now?",
        cards: &[
            card("scene-4-card-1", "North"),
            card("scene-4-card-2", "The sea"),
            card("scene-4-card-3", "Nowhere"),
        ],
        button: None,
    },
    SceneContent {
        scene: SceneId::Summary,
        title: "That is everything you kept.",
        cards: &[],
        button: button("summary-next", "Continue", ButtonAction::Next),
    },
    SceneContent {
        scene: SceneId::End,
        title: "The End",
        cards: &[],
        button: button("restart-button", "Play again", ButtonAction::Restart),
    },
];
