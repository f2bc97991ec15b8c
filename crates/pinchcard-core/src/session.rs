//! Per-frame interaction context.
//!
//! A [`Session`] owns every piece of mutable interaction state and is driven
//! by one call to [`Session::tick`] per animation frame. External services
//! (video, detector, page layout) are reached through traits so the same
//! session runs in the browser and in tests.

use crate::config::AppConfig;
use crate::event::{EventBus, InteractionEvent, TransitionCause};
use crate::frame::{FrameGate, FrameSource, SkipReason};
use crate::gesture::{GestureFrame, GestureInterpreter, Viewport};
use crate::hit_test::{CursorShape, Highlights, HitTester, Region, RegionId};
use crate::intro::IntroSequence;
use crate::landmark::{LandmarkError, LandmarkSet};
use crate::scene::{ClickOutcome, SceneId, SceneMachine, Transition};

/// Error type for landmark detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("malformed detector output: {0}")]
    Output(String),
    #[error(transparent)]
    Landmarks(#[from] LandmarkError),
}

/// The external hand-landmark detector.
pub trait LandmarkDetector {
    /// Detects at most one hand in the current frame.
    fn detect(&mut self, timestamp_ms: f64) -> Result<Option<LandmarkSet>, DetectorError>;
}

/// A detector that has not finished loading sees no hand.
impl<D: LandmarkDetector> LandmarkDetector for Option<D> {
    fn detect(&mut self, timestamp_ms: f64) -> Result<Option<LandmarkSet>, DetectorError> {
        match self {
            Some(detector) => detector.detect(timestamp_ms),
            None => Ok(None),
        }
    }
}

/// Supplies the interactive regions of a scene as currently laid out.
pub trait RegionProvider {
    fn regions(&self, scene: SceneId) -> Vec<Region>;
}

/// What happened in a processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub gesture: GestureFrame,
    pub hovered: Option<RegionId>,
    pub click: Option<ClickOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    Processed(FrameReport),
}

/// Owns gesture, hover, scene and intro state for one run of the experience.
#[derive(Debug)]
pub struct Session {
    gate: FrameGate,
    gestures: GestureInterpreter,
    hit_tester: HitTester,
    highlights: Highlights,
    machine: SceneMachine,
    intro: IntroSequence,
    bus: EventBus,
    published_cursor: Option<(f32, f32)>,
    published_pinch: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            gate: FrameGate::default(),
            gestures: GestureInterpreter::new(config.interaction.pinch_threshold),
            hit_tester: HitTester::new(config.interaction.cursor),
            highlights: Highlights::default(),
            machine: SceneMachine::new(config.storyline.clone()),
            intro: IntroSequence::new(&config.timings),
            bus: EventBus::default(),
            published_cursor: None,
            published_pinch: false,
        }
    }

    /// Registers a presentation listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&InteractionEvent) + 'static) {
        self.bus.subscribe(listener);
    }

    pub fn current_scene(&self) -> SceneId {
        self.machine.current_scene()
    }

    pub fn machine(&self) -> &SceneMachine {
        &self.machine
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn intro(&self) -> &IntroSequence {
        &self.intro
    }

    /// Replaces the cursor hit shape, e.g. when the drawn cursor is resized.
    pub fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.hit_tester.set_shape(shape);
    }

    /// Runs one animation frame.
    ///
    /// Never fails: a detector error is logged and the frame is treated as
    /// having no hand.
    pub fn tick(
        &mut self,
        now_ms: f64,
        source: &impl FrameSource,
        detector: &mut impl LandmarkDetector,
        layout: &impl RegionProvider,
        viewport: Viewport,
    ) -> TickOutcome {
        self.poll_intro(now_ms);

        if let Err(reason) = self.gate.admit(source) {
            return TickOutcome::Skipped(reason);
        }

        let hand = match detector.detect(now_ms) {
            Ok(hand) => hand,
            Err(e) => {
                tracing::warn!(error = %e, "hand detection failed");
                None
            }
        };

        let gesture = self.gestures.update(hand.as_ref(), viewport);
        self.publish_gesture(&gesture);

        let mut report = FrameReport {
            gesture,
            hovered: None,
            click: None,
        };
        if !gesture.hand_present {
            return TickOutcome::Processed(report);
        }
        let Some(cursor) = gesture.cursor else {
            return TickOutcome::Processed(report);
        };

        let regions = layout.regions(self.machine.current_scene());
        let hovered = self.hit_tester.hovered(cursor, &regions).cloned();
        let update = self.highlights.apply(
            &regions,
            hovered.as_ref().map(|region| &region.id),
            gesture.pinching,
        );
        self.bus.publish(&InteractionEvent::HighlightsChanged {
            cleared: update.cleared,
            hovered: update.hovered,
            outlined: update.outlined,
        });
        report.hovered = hovered.as_ref().map(|region| region.id.clone());

        if gesture.clicked {
            if let Some(region) = hovered {
                report.click = Some(self.route_click(&region, now_ms));
            }
        }

        TickOutcome::Processed(report)
    }

    /// Explicit "next" (start button, tutorial or summary button).
    pub fn trigger_next(&mut self, now_ms: f64) -> Option<Transition> {
        let transition = self.machine.trigger_next()?;
        self.enter(transition, TransitionCause::Trigger, now_ms);
        Some(transition)
    }

    /// Back to the start with all scene progress discarded.
    pub fn restart(&mut self, now_ms: f64) -> Transition {
        let transition = self.machine.restart();
        self.enter(transition, TransitionCause::Restart, now_ms);
        transition
    }

    pub fn voicemail_ended(&mut self, now_ms: f64) {
        if let Some(cue) = self.intro.voicemail_ended(now_ms) {
            self.bus.publish(&InteractionEvent::IntroCue(cue));
        }
    }

    pub fn voicemail_failed(&mut self, now_ms: f64) {
        tracing::debug!(now_ms, "voicemail unavailable, using fallback delay");
        self.intro.voicemail_failed(now_ms);
    }

    fn route_click(&mut self, region: &Region, now_ms: f64) -> ClickOutcome {
        let outcome = self.machine.click(region);
        match &outcome {
            ClickOutcome::Ignored(reason) => {
                tracing::debug!(region = %region.id, ?reason, "click ignored");
            }
            ClickOutcome::Marked {
                scene,
                card,
                newly,
                transition,
            } => {
                self.bus.publish(&InteractionEvent::CardMarked {
                    scene: *scene,
                    card: card.clone(),
                    newly: *newly,
                });
                if let Some(transition) = transition {
                    self.enter(*transition, TransitionCause::Click, now_ms);
                }
            }
            ClickOutcome::Triggered(transition) => {
                self.enter(*transition, TransitionCause::Trigger, now_ms);
            }
        }
        outcome
    }

    fn poll_intro(&mut self, now_ms: f64) {
        let progress = self.intro.poll(now_ms);
        for cue in progress.cues {
            self.bus.publish(&InteractionEvent::IntroCue(cue));
        }
        if progress.completed {
            if let Some(transition) = self.machine.complete_intro() {
                self.enter(transition, TransitionCause::IntroComplete, now_ms);
            }
        }
    }

    fn enter(&mut self, transition: Transition, cause: TransitionCause, now_ms: f64) {
        let cleared = self.highlights.clear();
        if !cleared.is_empty() {
            self.bus.publish(&InteractionEvent::HighlightsChanged {
                cleared,
                hovered: None,
                outlined: false,
            });
        }

        self.bus.publish(&InteractionEvent::SceneChanged {
            from: transition.from,
            to: transition.to,
            cause,
        });

        if self.machine.is_intro() {
            for cue in self.intro.start(now_ms) {
                self.bus.publish(&InteractionEvent::IntroCue(cue));
            }
        } else if self.intro.is_running() {
            self.intro.cancel();
        }
    }

    fn publish_gesture(&mut self, gesture: &GestureFrame) {
        if gesture.hand_present && gesture.cursor != self.published_cursor {
            if let Some((x, y)) = gesture.cursor {
                self.bus.publish(&InteractionEvent::CursorMoved { x, y });
            }
            self.published_cursor = gesture.cursor;
        }
        if gesture.pinching != self.published_pinch {
            self.published_pinch = gesture.pinching;
            self.bus.publish(&InteractionEvent::PinchChanged {
                pinching: gesture.pinching,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit_test::Rect;
    use crate::intro::IntroCue;
    use crate::landmark::Landmark;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

    struct Video {
        time: f64,
    }

    impl FrameSource for Video {
        fn is_active(&self) -> bool {
            true
        }

        fn current_time(&self) -> f64 {
            self.time
        }
    }

    /// Replays scripted detection results.
    #[derive(Default)]
    struct Script {
        frames: VecDeque<Result<Option<LandmarkSet>, DetectorError>>,
        calls: usize,
    }

    impl LandmarkDetector for Script {
        fn detect(&mut self, _timestamp_ms: f64) -> Result<Option<LandmarkSet>, DetectorError> {
            self.calls += 1;
            self.frames.pop_front().unwrap_or(Ok(None))
        }
    }

    /// Three cards side by side; card-b is the correct one.
    struct Layout;

    impl RegionProvider for Layout {
        fn regions(&self, scene: SceneId) -> Vec<Region> {
            match scene {
                SceneId::Tutorial | SceneId::Summary => {
                    vec![Region::button("next", Rect::new(540.0, 300.0, 740.0, 420.0))]
                }
                SceneId::Start | SceneId::End => Vec::new(),
                _ => vec![
                    Region::card("card-a", Rect::new(100.0, 200.0, 300.0, 500.0), false),
                    Region::card("card-b", Rect::new(540.0, 200.0, 740.0, 500.0), true),
                    Region::card("card-c", Rect::new(980.0, 200.0, 1180.0, 500.0), false),
                ],
            }
        }
    }

    /// A hand whose mirrored index tip lands on viewport `(x, y)`.
    fn hand_at(x: f32, y: f32, pinching: bool) -> LandmarkSet {
        let tip = Landmark::new(1.0 - x / VIEWPORT.width, y / VIEWPORT.height);
        let offset = if pinching { 0.01 } else { 0.2 };
        LandmarkSet::with_tips(tip, Landmark::new(tip.x + offset, tip.y))
    }

    struct Harness {
        session: Session,
        video: Video,
        detector: Script,
        now: f64,
        events: Rc<RefCell<Vec<InteractionEvent>>>,
    }

    impl Harness {
        fn new() -> Self {
            let mut session = Session::default();
            let events = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&events);
            session.subscribe(move |event| sink.borrow_mut().push(event.clone()));
            Self {
                session,
                video: Video { time: 0.0 },
                detector: Script::default(),
                now: 0.0,
                events,
            }
        }

        fn frame(&mut self, hand: Option<LandmarkSet>) -> TickOutcome {
            self.detector.frames.push_back(Ok(hand));
            self.video.time += 1.0 / 30.0;
            self.now += 33.0;
            self.session
                .tick(self.now, &self.video, &mut self.detector, &Layout, VIEWPORT)
        }

        /// Hover, pinch, release on a viewport point.
        fn pinch_at(&mut self, x: f32, y: f32) {
            self.frame(Some(hand_at(x, y, false)));
            self.frame(Some(hand_at(x, y, true)));
            self.frame(Some(hand_at(x, y, false)));
        }

        fn into_scene1(&mut self) {
            self.session.trigger_next(self.now);
            self.session.trigger_next(self.now);
            self.now += 60_000.0;
            self.frame(None);
            assert_eq!(self.session.current_scene(), SceneId::Scene1);
        }

        fn scene_changes(&self) -> Vec<(SceneId, TransitionCause)> {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    InteractionEvent::SceneChanged { to, cause, .. } => Some((*to, *cause)),
                    _ => None,
                })
                .collect()
        }
    }

    /// Camera not granted or not yet playing.
    struct IdleCamera;

    impl FrameSource for IdleCamera {
        fn is_active(&self) -> bool {
            false
        }

        fn current_time(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_intro_progresses_while_camera_is_inactive() {
        let mut session = Session::default();
        let cues = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&cues);
        session.subscribe(move |event| {
            if let InteractionEvent::IntroCue(cue) = event {
                sink.borrow_mut().push(*cue);
            }
        });
        session.trigger_next(0.0);
        session.trigger_next(0.0);
        assert_eq!(cues.borrow_mut().drain(..).collect::<Vec<_>>(), vec![IntroCue::PlayVibration]);

        let mut detector: Option<Script> = None;
        let mut timeline = Vec::new();
        let mut now = 0.0;
        while session.current_scene() == SceneId::Start {
            now += 16.0;
            assert!(now < 20_000.0, "intro stalled");
            let outcome = session.tick(now, &IdleCamera, &mut detector, &Layout, VIEWPORT);
            assert_eq!(outcome, TickOutcome::Skipped(SkipReason::SourceInactive));
            for cue in cues.borrow_mut().drain(..) {
                timeline.push((now, cue));
            }
        }

        // Each phase lands on the first frame after its deadline.
        assert_eq!(
            timeline,
            vec![
                (5008.0, IntroCue::ShowPhone),
                (5008.0, IntroCue::PlayVoicemail),
                (15_008.0, IntroCue::HidePhone),
            ]
        );
        assert!((now - 16_512.0).abs() < f64::EPSILON);
        assert_eq!(session.current_scene(), SceneId::Scene1);
    }

    #[test]
    fn test_unloaded_detector_reports_no_hand() {
        let mut session = Session::default();
        let mut detector: Option<Script> = None;
        let outcome = session.tick(16.0, &Video { time: 0.5 }, &mut detector, &Layout, VIEWPORT);

        let TickOutcome::Processed(report) = outcome else {
            panic!("active source should be processed");
        };
        assert!(!report.gesture.hand_present);
        assert_eq!(report.gesture.cursor, None);
    }

    #[test]
    fn test_stale_frame_is_not_detected_twice() {
        let mut h = Harness::new();
        h.frame(None);
        let calls = h.detector.calls;

        for _ in 0..3 {
            h.now += 16.0;
            let outcome = h.session.tick(h.now, &h.video, &mut h.detector, &Layout, VIEWPORT);
            assert_eq!(outcome, TickOutcome::Skipped(SkipReason::StaleFrame));
        }
        assert_eq!(h.detector.calls, calls);
    }

    #[test]
    fn test_detector_error_is_treated_as_no_hand() {
        let mut h = Harness::new();
        h.frame(Some(hand_at(200.0, 360.0, false)));

        h.detector
            .frames
            .push_back(Err(DetectorError::Inference("gpu lost".to_string())));
        h.video.time += 1.0;
        h.now += 33.0;
        let outcome = h.session.tick(h.now, &h.video, &mut h.detector, &Layout, VIEWPORT);

        let TickOutcome::Processed(report) = outcome else {
            panic!("frame should be processed");
        };
        assert!(!report.gesture.hand_present);
        assert_eq!(report.gesture.cursor, Some((200.0, 360.0)));
    }

    #[test]
    fn test_intro_runs_to_scene1_without_voicemail_signal() {
        let mut h = Harness::new();
        h.session.trigger_next(h.now);
        h.session.trigger_next(h.now);
        assert!(h.session.intro().is_running());

        // Ring (5s) + voicemail timeout (10s) + exit (1.5s).
        h.now += 16_400.0;
        h.frame(None);
        assert_eq!(h.session.current_scene(), SceneId::Start);
        h.frame(None);
        h.frame(None);
        h.frame(None);
        assert_eq!(h.session.current_scene(), SceneId::Scene1);

        let cues: Vec<IntroCue> = h
            .events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                InteractionEvent::IntroCue(cue) => Some(*cue),
                _ => None,
            })
            .collect();
        assert_eq!(
            cues,
            vec![
                IntroCue::PlayVibration,
                IntroCue::ShowPhone,
                IntroCue::PlayVoicemail,
                IntroCue::HidePhone
            ]
        );
    }

    #[test]
    fn test_intro_advances_on_voicemail_end() {
        let mut h = Harness::new();
        h.session.trigger_next(0.0);
        h.session.trigger_next(0.0);
        h.now = 5000.0;
        h.frame(None);
        h.session.voicemail_ended(h.now);
        h.now += 1500.0;
        h.frame(None);
        assert_eq!(h.session.current_scene(), SceneId::Scene1);
    }

    #[test]
    fn test_pinch_on_correct_card_advances_scene1() {
        let mut h = Harness::new();
        h.into_scene1();

        h.pinch_at(200.0, 360.0);
        assert_eq!(h.session.current_scene(), SceneId::Scene1);

        h.pinch_at(640.0, 360.0);
        assert_eq!(h.session.current_scene(), SceneId::Scene2);
        assert_eq!(
            h.scene_changes().last(),
            Some(&(SceneId::Scene2, TransitionCause::Click))
        );
    }

    #[test]
    fn test_held_pinch_counts_once() {
        let mut h = Harness::new();
        h.into_scene1();
        h.pinch_at(640.0, 360.0);
        assert_eq!(h.session.current_scene(), SceneId::Scene2);

        // Pinch on card-a and drag across card-c while holding.
        h.frame(Some(hand_at(200.0, 360.0, false)));
        h.frame(Some(hand_at(200.0, 360.0, true)));
        h.frame(Some(hand_at(1080.0, 360.0, true)));
        h.frame(Some(hand_at(640.0, 360.0, true)));

        assert_eq!(h.session.machine().progress().count(SceneId::Scene2), 1);
    }

    #[test]
    fn test_click_without_hover_is_noop() {
        let mut h = Harness::new();
        h.into_scene1();
        h.frame(Some(hand_at(640.0, 50.0, false)));
        let outcome = h.frame(Some(hand_at(640.0, 50.0, true)));
        let TickOutcome::Processed(report) = outcome else {
            panic!("frame should be processed");
        };
        assert!(report.gesture.clicked);
        assert_eq!(report.click, None);
        assert_eq!(h.session.current_scene(), SceneId::Scene1);
    }

    #[test]
    fn test_hand_lost_for_five_frames() {
        let mut h = Harness::new();
        h.into_scene1();
        h.frame(Some(hand_at(200.0, 360.0, true)));
        let before = h.events.borrow().len();

        for _ in 0..5 {
            let TickOutcome::Processed(report) = h.frame(None) else {
                panic!("frame should be processed");
            };
            assert_eq!(report.gesture.cursor, Some((200.0, 360.0)));
            assert!(!report.gesture.clicked);
        }
        // Nothing at all is published while the hand is gone.
        assert_eq!(h.events.borrow().len(), before);
    }

    #[test]
    fn test_highlight_moves_between_cards() {
        let mut h = Harness::new();
        h.into_scene1();
        h.frame(Some(hand_at(200.0, 360.0, false)));
        assert_eq!(
            h.session.highlights().hovered(),
            Some(&RegionId::from("card-a"))
        );
        h.frame(Some(hand_at(1080.0, 360.0, false)));
        assert_eq!(
            h.session.highlights().hovered(),
            Some(&RegionId::from("card-c"))
        );

        let last = h.events.borrow().last().cloned();
        let Some(InteractionEvent::HighlightsChanged { cleared, hovered, .. }) = last else {
            panic!("expected a highlight update");
        };
        assert!(cleared.contains(&RegionId::from("card-a")));
        assert_eq!(hovered, Some(RegionId::from("card-c")));
    }

    #[test]
    fn test_summary_button_pinch_ends() {
        let mut h = Harness::new();
        h.into_scene1();
        h.pinch_at(640.0, 360.0);
        for _ in 0..3 {
            for x in [200.0, 640.0, 1080.0] {
                h.pinch_at(x, 360.0);
            }
        }
        assert_eq!(h.session.current_scene(), SceneId::Summary);

        h.pinch_at(640.0, 360.0);
        assert_eq!(h.session.current_scene(), SceneId::End);
        assert!(h.session.machine().is_terminal());
    }

    #[test]
    fn test_restart_cancels_intro() {
        let mut h = Harness::new();
        h.session.trigger_next(0.0);
        h.session.trigger_next(0.0);
        assert!(h.session.intro().is_running());

        let t = h.session.restart(10.0);
        assert_eq!(t.to, SceneId::Start);
        assert!(!h.session.intro().is_running());
        assert_eq!(
            h.scene_changes().last(),
            Some(&(SceneId::Start, TransitionCause::Restart))
        );
    }
}
