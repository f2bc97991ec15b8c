//! Hand landmark types produced by the external detector.
//!
//! A detected hand is always 21 joints in a fixed anatomical order, with
//! coordinates normalized to `[0, 1]` relative to the video frame.

use serde::{Deserialize, Serialize};

/// Number of joints in one detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Index of the thumb tip joint.
pub const THUMB_TIP: usize = 4;

/// Index of the index fingertip joint.
pub const INDEX_FINGER_TIP: usize = 8;

/// Error type for landmark decoding.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A single normalized joint position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance to another landmark, ignoring depth.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detected hand: exactly [`LANDMARK_COUNT`] landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Builds a set from detector output.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self { points })
    }

    /// A resting hand with only the index tip and thumb tip placed.
    ///
    /// Every other joint sits at the frame centre. Handy for simulated input.
    pub fn with_tips(index_tip: Landmark, thumb_tip: Landmark) -> Self {
        let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        points[INDEX_FINGER_TIP] = index_tip;
        points[THUMB_TIP] = thumb_tip;
        Self { points }
    }

    pub fn index_tip(&self) -> &Landmark {
        &self.points[INDEX_FINGER_TIP]
    }

    pub fn thumb_tip(&self) -> &Landmark {
        &self.points[THUMB_TIP]
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points.to_vec()
    }
}

/// Result object returned by the detector for one video frame.
///
/// Only the image-space landmarks are used; handedness and world landmarks
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub landmarks: Vec<Vec<Landmark>>,
}

impl DetectionResult {
    /// The first detected hand, if any.
    pub fn first_hand(&self) -> Result<Option<LandmarkSet>, LandmarkError> {
        self.landmarks
            .first()
            .map(|points| LandmarkSet::from_slice(points))
            .transpose()
    }
}
