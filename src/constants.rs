//! Constants used throughout the library

/// Number of landmarks per hand (MediaPipe hand model)
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Hand landmark indices (MediaPipe hand landmark convention)
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Default analyzer history capacity
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Default window for velocity averaging (seconds)
pub const DEFAULT_VELOCITY_WINDOW: f64 = 0.3;

/// Default swipe speed threshold (normalized units per second)
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 0.3;

/// Cross-axis velocity must stay below this fraction of the swipe axis
pub const DEFAULT_SWIPE_AXIS_RATIO: f64 = 0.5;

/// Number of trailing samples inspected for circular motion
pub const DEFAULT_CIRCULAR_WINDOW: usize = 8;

/// Fewer samples than this never count as circular motion
pub const MIN_CIRCULAR_SAMPLES: usize = 3;

/// Default minimum mean radius of a circular gesture
pub const DEFAULT_CIRCULAR_MIN_RADIUS: f64 = 0.05;

/// Radius variance must stay below this fraction of the mean radius
pub const DEFAULT_CIRCULAR_RADIUS_SPREAD: f64 = 0.3;

/// Net rotation sign count must exceed this fraction of the sample count
pub const DEFAULT_CIRCULAR_CONSISTENCY: f64 = 0.5;

/// Default maximum drift for a static hold
pub const DEFAULT_STATIC_MAX_MOVEMENT: f64 = 0.02;

/// Default duration a hold must last (seconds)
pub const DEFAULT_STATIC_MIN_DURATION: f64 = 1.0;

/// Minimum samples inside the hold window
pub const MIN_STATIC_SAMPLES: usize = 3;

/// Speed that maps to full gesture intensity is twice this value
pub const DEFAULT_INTENSITY_SPEED_SCALE: f64 = 2.0;

/// Default thumb-to-index distance for a pinch
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.04;

/// Default number of consecutive frames a pose must be held
pub const DEFAULT_POSE_CONFIRM_FRAMES: u32 = 3;

/// Default cooldown for gesture kinds without an override (seconds)
pub const DEFAULT_COOLDOWN: f64 = 0.5;

/// Volume change per unit of vertical pinch travel
pub const DEFAULT_VOLUME_DRAG_GAIN: f64 = 2.0;

/// Volume changes at or below this are treated as jitter
pub const DEFAULT_VOLUME_MIN_CHANGE: f64 = 0.01;

/// Volume step of a full-intensity crescendo or diminuendo
pub const DEFAULT_DYNAMICS_STEP: f64 = 0.15;

/// Tempo step of a full-intensity circle
pub const DEFAULT_TEMPO_STEP: f64 = 0.1;

/// Consecutive missing frames after which a hand's history is dropped
pub const DEFAULT_LOST_AFTER_FRAMES: u32 = 15;

/// Playback volume bounds
pub const VOLUME_MIN: f64 = 0.0;
pub const VOLUME_MAX: f64 = 1.0;

/// Playback tempo bounds (playback-rate multiplier)
pub const TEMPO_MIN: f64 = 0.5;
pub const TEMPO_MAX: f64 = 2.0;

/// Default playback parameters
pub const DEFAULT_VOLUME: f64 = 0.5;
pub const DEFAULT_TEMPO: f64 = 1.0;

/// Audio file extensions accepted into a playlist
pub const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "m4a", "flac"];
