//! Scene state machine and storyline.
//!
//! The storyline is an ordered list of steps. Each step shows one scene and
//! says how the user leaves it: by clicking cards, by an explicit "next"
//! trigger, by finishing the intro, or not at all.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hit_test::{Region, RegionId, RegionKind};

/// Cards that must be clicked in each counting scene.
pub const DEFAULT_REQUIRED_CLICKS: usize = 3;

/// Identifier of a narrative scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SceneId {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "tutorial")]
    Tutorial,
    #[serde(rename = "scene-1")]
    Scene1,
    #[serde(rename = "scene-2")]
    Scene2,
    #[serde(rename = "scene-3")]
    Scene3,
    #[serde(rename = "scene-4")]
    Scene4,
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "end")]
    End,
}

impl SceneId {
    pub const ALL: [SceneId; 8] = [
        SceneId::Start,
        SceneId::Tutorial,
        SceneId::Scene1,
        SceneId::Scene2,
        SceneId::Scene3,
        SceneId::Scene4,
        SceneId::Summary,
        SceneId::End,
    ];

    /// Short name used in configs and logs.
    pub fn name(self) -> &'static str {
        match self {
            SceneId::Start => "start",
            SceneId::Tutorial => "tutorial",
            SceneId::Scene1 => "scene-1",
            SceneId::Scene2 => "scene-2",
            SceneId::Scene3 => "scene-3",
            SceneId::Scene4 => "scene-4",
            SceneId::Summary => "summary",
            SceneId::End => "end",
        }
    }

    /// Id of the scene's container element in the page.
    pub fn dom_id(self) -> &'static str {
        match self {
            SceneId::Start => "scene-start",
            SceneId::Tutorial => "scene-tutorial",
            SceneId::Scene1 => "scene-1",
            SceneId::Scene2 => "scene-2",
            SceneId::Scene3 => "scene-3",
            SceneId::Scene4 => "scene-4",
            SceneId::Summary => "scene-summary",
            SceneId::End => "scene-end",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown scene: {0}")]
pub struct UnknownScene(pub String);

impl FromStr for SceneId {
    type Err = UnknownScene;

    /// Accepts both the short name and the DOM id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneId::ALL
            .into_iter()
            .find(|id| id.name() == s || id.dom_id() == s)
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}

/// Which card satisfies a [`TransitionRule::FirstMatching`] rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPredicate {
    /// The card flagged as correct.
    Correct,
    /// Any card.
    Any,
    /// One specific card.
    Id(RegionId),
}

impl CardPredicate {
    pub fn matches(&self, region: &Region) -> bool {
        match (self, region.kind) {
            (_, RegionKind::Button) => false,
            (CardPredicate::Correct, RegionKind::Card { correct }) => correct,
            (CardPredicate::Any, RegionKind::Card { .. }) => true,
            (CardPredicate::Id(id), RegionKind::Card { .. }) => *id == region.id,
        }
    }
}

/// How card clicks complete a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRule {
    /// Leave on the first clicked card matching the predicate.
    FirstMatching(CardPredicate),
    /// Leave once this many distinct cards have been clicked.
    CountThreshold(usize),
}

/// How a step is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advance {
    OnClick(TransitionRule),
    /// Explicit "next": a pinched button or a direct trigger.
    OnTrigger,
    /// Intro playback finished.
    OnIntroComplete,
    Terminal,
}

/// One entry of the storyline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub scene: SceneId,
    pub advance: Advance,
}

impl Step {
    pub fn new(scene: SceneId, advance: Advance) -> Self {
        Self { scene, advance }
    }
}

/// Ordered list of steps the experience walks through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Storyline(pub Vec<Step>);

impl Default for Storyline {
    fn default() -> Self {
        let count = || Advance::OnClick(TransitionRule::CountThreshold(DEFAULT_REQUIRED_CLICKS));
        Self(vec![
            Step::new(SceneId::Start, Advance::OnTrigger),
            Step::new(SceneId::Tutorial, Advance::OnTrigger),
            Step::new(SceneId::Start, Advance::OnIntroComplete),
            Step::new(
                SceneId::Scene1,
                Advance::OnClick(TransitionRule::FirstMatching(CardPredicate::Correct)),
            ),
            Step::new(SceneId::Scene2, count()),
            Step::new(SceneId::Scene3, count()),
            Step::new(SceneId::Scene4, count()),
            Step::new(SceneId::Summary, Advance::OnTrigger),
            Step::new(SceneId::End, Advance::Terminal),
        ])
    }
}

impl Storyline {
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Clicked cards per scene. Reset whenever a scene is entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneProgress {
    clicked: BTreeMap<SceneId, BTreeSet<RegionId>>,
}

impl SceneProgress {
    pub fn enter(&mut self, scene: SceneId) {
        self.clicked.insert(scene, BTreeSet::new());
    }

    /// Records a click; returns true if the card was not clicked before.
    pub fn mark(&mut self, scene: SceneId, card: &RegionId) -> bool {
        self.clicked.entry(scene).or_default().insert(card.clone())
    }

    pub fn clicked(&self, scene: SceneId) -> Option<&BTreeSet<RegionId>> {
        self.clicked.get(&scene)
    }

    pub fn count(&self, scene: SceneId) -> usize {
        self.clicked.get(&scene).map_or(0, BTreeSet::len)
    }

    pub fn is_clicked(&self, scene: SceneId, card: &RegionId) -> bool {
        self.clicked.get(&scene).is_some_and(|set| set.contains(card))
    }

    pub fn clear(&mut self) {
        self.clicked.clear();
    }
}

/// A completed move from one step to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SceneId,
    pub to: SceneId,
    /// Index of the step that was entered.
    pub step: usize,
}

/// Why a click had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The active step has no click rule (start, intro, end).
    NoRule,
    /// A button in a card scene, or a card in a button scene.
    WrongKind,
}

/// Result of routing one pinch-click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored(IgnoreReason),
    /// A card was marked clicked; `newly` is false for repeat clicks.
    Marked {
        scene: SceneId,
        card: RegionId,
        newly: bool,
        transition: Option<Transition>,
    },
    /// A button advanced the story.
    Triggered(Transition),
}

impl ClickOutcome {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            ClickOutcome::Ignored(_) => None,
            ClickOutcome::Marked { transition, .. } => *transition,
            ClickOutcome::Triggered(transition) => Some(*transition),
        }
    }
}

/// Tracks the active step and per-scene click progress.
#[derive(Debug, Clone)]
pub struct SceneMachine {
    storyline: Storyline,
    step: usize,
    progress: SceneProgress,
}

impl Default for SceneMachine {
    fn default() -> Self {
        Self::new(Storyline::default())
    }
}

impl SceneMachine {
    /// Creates a machine positioned on the first step.
    ///
    /// An empty storyline is replaced by the default one.
    pub fn new(storyline: Storyline) -> Self {
        let storyline = if storyline.is_empty() {
            Storyline::default()
        } else {
            storyline
        };
        let mut machine = Self {
            storyline,
            step: 0,
            progress: SceneProgress::default(),
        };
        machine.progress.enter(machine.current_scene());
        machine
    }

    pub fn current_step(&self) -> &Step {
        &self.storyline.0[self.step]
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn current_scene(&self) -> SceneId {
        self.current_step().scene
    }

    pub fn is_terminal(&self) -> bool {
        self.current_step().advance == Advance::Terminal
    }

    pub fn is_intro(&self) -> bool {
        self.current_step().advance == Advance::OnIntroComplete
    }

    pub fn progress(&self) -> &SceneProgress {
        &self.progress
    }

    /// Routes a pinch-click on a hovered region.
    pub fn click(&mut self, region: &Region) -> ClickOutcome {
        let scene = self.current_scene();
        match self.current_step().advance.clone() {
            Advance::OnClick(rule) => {
                if !region.is_card() {
                    return ClickOutcome::Ignored(IgnoreReason::WrongKind);
                }
                let newly = self.progress.mark(scene, &region.id);
                let complete = match rule {
                    TransitionRule::FirstMatching(predicate) => predicate.matches(region),
                    TransitionRule::CountThreshold(required) => {
                        newly && self.progress.count(scene) >= required
                    }
                };
                tracing::debug!(
                    scene = %scene,
                    card = %region.id,
                    newly,
                    clicked = self.progress.count(scene),
                    "card clicked"
                );
                let transition = if complete { self.advance() } else { None };
                ClickOutcome::Marked {
                    scene,
                    card: region.id.clone(),
                    newly,
                    transition,
                }
            }
            Advance::OnTrigger => {
                if region.is_card() {
                    return ClickOutcome::Ignored(IgnoreReason::WrongKind);
                }
                match self.advance() {
                    Some(transition) => ClickOutcome::Triggered(transition),
                    None => ClickOutcome::Ignored(IgnoreReason::NoRule),
                }
            }
            Advance::OnIntroComplete | Advance::Terminal => {
                ClickOutcome::Ignored(IgnoreReason::NoRule)
            }
        }
    }

    /// Explicit "next" trigger. Only honoured on trigger steps.
    pub fn trigger_next(&mut self) -> Option<Transition> {
        if self.current_step().advance == Advance::OnTrigger {
            self.advance()
        } else {
            None
        }
    }

    /// Intro playback finished. Only honoured on the intro step.
    pub fn complete_intro(&mut self) -> Option<Transition> {
        if self.is_intro() {
            self.advance()
        } else {
            None
        }
    }

    /// Back to the first step with all progress discarded.
    pub fn restart(&mut self) -> Transition {
        let from = self.current_scene();
        self.progress.clear();
        self.step = 0;
        let to = self.current_scene();
        self.progress.enter(to);
        Transition { from, to, step: 0 }
    }

    fn advance(&mut self) -> Option<Transition> {
        let next = self.step + 1;
        let to = self.storyline.get(next)?.scene;
        let from = self.current_scene();
        self.step = next;
        self.progress.enter(to);
        tracing::info!(from = %from, to = %to, step = next, "scene transition");
        Some(Transition { from, to, step: next })
    }
}
