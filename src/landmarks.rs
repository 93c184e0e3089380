//! Hand landmark data delivered by the landmark detector.
//!
//! Coordinates are normalized to the image: `x` in `[0, 1]` from left to
//! right, `y` in `[0, 1]` from top to bottom. Point order follows the
//! MediaPipe hand model (see [`crate::constants::landmarks`]).

use crate::clock::Timestamp;
use crate::constants::{landmarks, NUM_HAND_LANDMARKS};
use crate::utils::centroid;
use serde::{Deserialize, Serialize};

/// A single normalized 2D landmark
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

impl LandmarkPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn as_tuple(self) -> (f64, f64) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which hand the detector believes it saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    /// Parse the detector's label ("Left" / "Right"); anything else is unknown
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Which point of the hand feeds the motion analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPoint {
    /// Index fingertip; deliberate finger motion, little whole-arm noise
    #[default]
    IndexTip,
    Wrist,
    /// Mean of all landmarks
    Centroid,
}

/// All landmarks of one detected hand in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    #[serde(default)]
    pub handedness: Handedness,
    pub landmarks: Vec<LandmarkPoint>,
}

impl HandLandmarks {
    #[must_use]
    pub fn new(handedness: Handedness, landmarks: Vec<LandmarkPoint>) -> Self {
        Self { handedness, landmarks }
    }

    /// True when every landmark is present and finite
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == NUM_HAND_LANDMARKS && self.landmarks.iter().all(|p| p.is_finite())
    }

    /// Landmark by MediaPipe index
    #[must_use]
    pub fn point(&self, index: usize) -> Option<LandmarkPoint> {
        self.landmarks.get(index).copied()
    }

    /// Mean position of all landmarks
    #[must_use]
    pub fn centroid(&self) -> Option<(f64, f64)> {
        centroid(self.landmarks.iter().map(|p| p.as_tuple()))
    }

    /// Position of the chosen tracking point
    #[must_use]
    pub fn tracking_position(&self, tracking: TrackingPoint) -> Option<(f64, f64)> {
        match tracking {
            TrackingPoint::IndexTip => self.point(landmarks::INDEX_TIP).map(LandmarkPoint::as_tuple),
            TrackingPoint::Wrist => self.point(landmarks::WRIST).map(LandmarkPoint::as_tuple),
            TrackingPoint::Centroid => self.centroid(),
        }
    }
}

/// Everything the landmark detector reported for one camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time in seconds
    pub timestamp: Timestamp,
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl LandmarkFrame {
    #[must_use]
    pub fn new(timestamp: Timestamp, hands: Vec<HandLandmarks>) -> Self {
        Self { timestamp, hands }
    }

    /// Frame with no hands in view
    #[must_use]
    pub fn empty(timestamp: Timestamp) -> Self {
        Self { timestamp, hands: Vec::new() }
    }
}
