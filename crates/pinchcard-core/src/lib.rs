//! Pinchcard Core Library
//!
//! Interaction logic for a camera-driven card story: hand landmarks become a
//! cursor and pinch clicks, clicks are hit-tested against the cards of the
//! active scene, and a scene state machine walks the storyline.
//!
//! The crate is target independent. The browser shell supplies video frames,
//! detector output and layout through the traits in [`frame`] and
//! [`session`], and subscribes to [`event::InteractionEvent`]s.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod event;
pub mod frame;
pub mod gesture;
pub mod intro;
pub mod landmark;
pub mod scene;
pub mod session;

pub use config::{AppConfig, CameraConfig, ConfigError, Delegate, DetectorConfig, InteractionConfig, Timings};
pub use event::{EventBus, InteractionEvent, TransitionCause};
pub use frame::{FrameGate, FrameSource, SkipReason};
pub use gesture::{CursorState, GestureFrame, GestureInterpreter, Viewport};
pub use hit_test::{CursorShape, Highlights, HitTester, Rect, Region, RegionId, RegionKind};
pub use intro::{IntroCue, IntroSequence};
pub use landmark::{DetectionResult, Landmark, LandmarkError, LandmarkSet};
pub use scene::{
    Advance, CardPredicate, ClickOutcome, SceneId, SceneMachine, SceneProgress, Step, Storyline,
    Transition, TransitionRule,
};
pub use session::{DetectorError, FrameReport, LandmarkDetector, RegionProvider, Session, TickOutcome};
