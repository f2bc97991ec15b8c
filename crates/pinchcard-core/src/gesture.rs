//! Gesture interpretation: landmarks → cursor position and pinch state.
//!
//! The interpreter mirrors the index fingertip horizontally so the cursor
//! follows the user's real hand in front of a selfie camera, and reports a
//! click only on the frame where a pinch begins.

use crate::landmark::LandmarkSet;

/// Default distance (normalized units) under which index and thumb tips pinch.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.04;

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Cursor and pinch state carried between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    /// Last known cursor position in viewport pixels. `None` until a hand
    /// has been seen at least once.
    pub position: Option<(f32, f32)>,
    /// Whether the current (or last known) hand pose is a pinch.
    pub pinching: bool,
    /// Pinch state of the previous processed frame, for edge detection.
    pub pinch_was_active: bool,
}

/// Result of interpreting one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFrame {
    pub cursor: Option<(f32, f32)>,
    pub pinching: bool,
    /// True only on the not-pinching → pinching edge.
    pub clicked: bool,
    pub hand_present: bool,
    /// Normalized tip distance, when a hand was present.
    pub pinch_distance: Option<f32>,
}

/// Converts landmark sets into cursor updates and pinch edges.
///
/// When a frame carries no hand the last known state is frozen: the cursor
/// stays where it was and the pinch flags are left untouched, so a hand that
/// disappears mid-pinch and comes back still pinching does not click twice.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    threshold: f32,
    state: CursorState,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(DEFAULT_PINCH_THRESHOLD)
    }
}

impl GestureInterpreter {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            state: CursorState::default(),
        }
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Maps the index fingertip to mirrored viewport coordinates.
    pub fn cursor_position(hand: &LandmarkSet, viewport: Viewport) -> (f32, f32) {
        let tip = hand.index_tip();
        ((1.0 - tip.x) * viewport.width, tip.y * viewport.height)
    }

    /// Normalized distance between index fingertip and thumb tip.
    pub fn pinch_distance(hand: &LandmarkSet) -> f32 {
        hand.index_tip().planar_distance(hand.thumb_tip())
    }

    /// Processes one frame's detection result.
    pub fn update(&mut self, hand: Option<&LandmarkSet>, viewport: Viewport) -> GestureFrame {
        let Some(hand) = hand else {
            return GestureFrame {
                cursor: self.state.position,
                pinching: self.state.pinching,
                clicked: false,
                hand_present: false,
                pinch_distance: None,
            };
        };

        let position = Self::cursor_position(hand, viewport);
        let distance = Self::pinch_distance(hand);
        let pinching = distance < self.threshold;
        let clicked = pinching && !self.state.pinch_was_active;

        self.state = CursorState {
            position: Some(position),
            pinching,
            pinch_was_active: pinching,
        };

        GestureFrame {
            cursor: Some(position),
            pinching,
            clicked,
            hand_present: true,
            pinch_distance: Some(distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

    fn pinched() -> LandmarkSet {
        LandmarkSet::with_tips(Landmark::new(0.5, 0.5), Landmark::new(0.52, 0.52))
    }

    fn open() -> LandmarkSet {
        LandmarkSet::with_tips(Landmark::new(0.5, 0.5), Landmark::new(0.6, 0.6))
    }

    #[test]
    fn test_pinch_scenario_at_720p() {
        let mut gestures = GestureInterpreter::default();
        let frame = gestures.update(Some(&pinched()), VIEWPORT);

        let distance = frame.pinch_distance.unwrap();
        assert!((distance - 0.028_28).abs() < 1e-3);
        assert!(frame.pinching);
        assert_eq!(frame.cursor, Some((640.0, 360.0)));
    }

    #[test]
    fn test_cursor_is_mirrored() {
        let hand = LandmarkSet::with_tips(Landmark::new(0.25, 0.1), Landmark::new(0.9, 0.9));
        let (x, y) = GestureInterpreter::cursor_position(&hand, VIEWPORT);
        assert!((x - 960.0).abs() < 1e-3);
        assert!((y - 72.0).abs() < 1e-3);
    }

    #[test]
    fn test_click_fires_once_per_pinch() {
        let mut gestures = GestureInterpreter::default();

        assert!(!gestures.update(Some(&open()), VIEWPORT).clicked);
        assert!(gestures.update(Some(&pinched()), VIEWPORT).clicked);
        for _ in 0..10 {
            assert!(!gestures.update(Some(&pinched()), VIEWPORT).clicked);
        }
        assert!(!gestures.update(Some(&open()), VIEWPORT).clicked);
        assert!(gestures.update(Some(&pinched()), VIEWPORT).clicked);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut gestures = GestureInterpreter::new(0.1);
        let hand = LandmarkSet::with_tips(Landmark::new(0.5, 0.5), Landmark::new(0.5, 0.6));
        let frame = gestures.update(Some(&hand), VIEWPORT);
        // 0.6 - 0.5 is not exactly 0.1 in f32, so compare against the computed distance.
        assert_eq!(frame.pinching, frame.pinch_distance.unwrap() < 0.1);
    }

    #[test]
    fn test_missing_hand_freezes_state() {
        let mut gestures = GestureInterpreter::default();
        gestures.update(Some(&pinched()), VIEWPORT);
        let before = *gestures.state();

        for _ in 0..5 {
            let frame = gestures.update(None, VIEWPORT);
            assert!(!frame.clicked);
            assert!(!frame.hand_present);
            assert_eq!(frame.cursor, Some((640.0, 360.0)));
        }
        assert_eq!(*gestures.state(), before);

        // Hand comes back still pinching: no second click.
        assert!(!gestures.update(Some(&pinched()), VIEWPORT).clicked);
    }

    #[test]
    fn test_no_cursor_before_first_hand() {
        let mut gestures = GestureInterpreter::default();
        let frame = gestures.update(None, VIEWPORT);
        assert_eq!(frame.cursor, None);
        assert!(!frame.pinching);
    }
}
