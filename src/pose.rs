//! Per-frame finger pose classification.
//!
//! Pure functions of one frame's landmarks: no history, no side effects.

use crate::config::PoseConfig;
use crate::constants::landmarks;
use crate::landmarks::{HandLandmarks, Handedness};
use crate::utils::distance;

/// Extended flags in order thumb, index, middle, ring, pinky
pub type FingerStates = [bool; 5];

/// Discrete hand pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// No finger extended
    Fist,
    /// All five fingers extended
    OpenPalm,
    /// Exactly three fingers extended
    ThreeFingers,
    /// Any other count of extended fingers
    Other(u8),
}

impl Pose {
    /// Classify a finger-state vector
    #[must_use]
    pub fn from_fingers(fingers: &FingerStates) -> Self {
        match fingers.iter().filter(|&&f| f).count() {
            0 => Self::Fist,
            5 => Self::OpenPalm,
            3 => Self::ThreeFingers,
            n => Self::Other(n as u8),
        }
    }

    /// Number of extended fingers
    #[must_use]
    pub const fn finger_count(self) -> u8 {
        match self {
            Self::Fist => 0,
            Self::OpenPalm => 5,
            Self::ThreeFingers => 3,
            Self::Other(n) => n,
        }
    }

    /// Poses that map to a playback command of their own
    #[must_use]
    pub const fn is_command(self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// Everything the classifier read from one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseReading {
    pub fingers: FingerStates,
    pub pose: Pose,
    pub pinch_distance: f64,
    pub is_pinch: bool,
}

/// Stateless pose classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseClassifier {
    pinch_threshold: f64,
    mirrored: bool,
}

impl PoseClassifier {
    #[must_use]
    pub fn new(config: &PoseConfig) -> Self {
        Self {
            pinch_threshold: config.pinch_threshold,
            mirrored: config.mirrored,
        }
    }

    /// Read fingers, pose and pinch; `None` for incomplete landmarks
    #[must_use]
    pub fn classify(&self, hand: &HandLandmarks) -> Option<PoseReading> {
        if !hand.is_complete() {
            return None;
        }
        let fingers = finger_states(hand, self.mirrored)?;
        let pinch_distance = pinch_distance(hand)?;
        Some(PoseReading {
            fingers,
            pose: Pose::from_fingers(&fingers),
            pinch_distance,
            is_pinch: self.is_pinch_distance(pinch_distance),
        })
    }

    /// True when thumb and index tips touch
    #[must_use]
    pub fn is_pinch(&self, hand: &HandLandmarks) -> bool {
        pinch_distance(hand).is_some_and(|d| self.is_pinch_distance(d))
    }

    /// True when a thumb-to-index distance counts as a pinch
    #[must_use]
    pub fn is_pinch_distance(&self, distance: f64) -> bool {
        distance < self.pinch_threshold
    }
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self::new(&PoseConfig::default())
    }
}

/// Extended flags for the five fingers.
///
/// A finger other than the thumb is extended when its tip sits above its PIP
/// joint (smaller y). The thumb is extended when its tip lies outward of its
/// IP joint; outward is toward smaller x for a right hand in a mirrored image
/// and flips with either handedness or mirroring. Unknown hands are treated as
/// right hands.
#[must_use]
pub fn finger_states(hand: &HandLandmarks, mirrored: bool) -> Option<FingerStates> {
    let y = |i: usize| hand.point(i).map(|p| p.y);
    let x = |i: usize| hand.point(i).map(|p| p.x);

    let thumb_tip = x(landmarks::THUMB_TIP)?;
    let thumb_ip = x(landmarks::THUMB_IP)?;
    let outward_is_left = matches!(hand.handedness, Handedness::Left) != mirrored;
    let thumb = if outward_is_left { thumb_tip < thumb_ip } else { thumb_tip > thumb_ip };

    Some([
        thumb,
        y(landmarks::INDEX_TIP)? < y(landmarks::INDEX_PIP)?,
        y(landmarks::MIDDLE_TIP)? < y(landmarks::MIDDLE_PIP)?,
        y(landmarks::RING_TIP)? < y(landmarks::RING_PIP)?,
        y(landmarks::PINKY_TIP)? < y(landmarks::PINKY_PIP)?,
    ])
}

/// Distance between thumb tip and index tip
#[must_use]
pub fn pinch_distance(hand: &HandLandmarks) -> Option<f64> {
    let thumb = hand.point(landmarks::THUMB_TIP)?;
    let index = hand.point(landmarks::INDEX_TIP)?;
    Some(distance(thumb.as_tuple(), index.as_tuple()))
}

/// Midpoint of thumb tip and index tip, the handle of a pinch drag
#[must_use]
pub fn pinch_point(hand: &HandLandmarks) -> Option<(f64, f64)> {
    let thumb = hand.point(landmarks::THUMB_TIP)?;
    let index = hand.point(landmarks::INDEX_TIP)?;
    Some(((thumb.x + index.x) / 2.0, (thumb.y + index.y) / 2.0))
}
