//! Configuration management for the gesture engine

use crate::constants::*;
use crate::events::GestureKind;
use crate::landmarks::TrackingPoint;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Motion analyzer configuration
    pub analyzer: AnalyzerConfig,

    /// Pose classifier configuration
    pub pose: PoseConfig,

    /// Gesture dispatcher configuration
    pub dispatcher: DispatcherConfig,

    /// Tracked-point smoothing configuration
    pub smoothing: SmoothingConfig,
}

/// Motion analyzer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Capacity of the position and velocity histories
    pub history_size: usize,

    /// Window for velocity averaging (seconds)
    pub velocity_window: f64,

    /// Minimum swipe speed (normalized units per second)
    pub swipe_threshold: f64,

    /// Maximum cross-axis to swipe-axis velocity ratio
    pub swipe_axis_ratio: f64,

    /// Trailing samples inspected for circular motion
    pub circular_window: usize,

    /// Minimum mean radius of a circle
    pub circular_min_radius: f64,

    /// Maximum radius variance relative to the mean radius
    pub circular_radius_spread: f64,

    /// Required net rotation sign count relative to sample count
    pub circular_consistency: f64,

    /// Maximum distance from the centroid during a static hold
    pub static_max_movement: f64,

    /// Duration a static hold must cover (seconds)
    pub static_min_duration: f64,

    /// Half the speed that maps to full intensity
    pub intensity_speed_scale: f64,
}

/// Pose classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Thumb-tip to index-tip distance below which the hand pinches
    pub pinch_threshold: f64,

    /// Image is flipped horizontally before landmark detection (selfie view)
    pub mirrored: bool,

    /// Consecutive frames a pose must be held before it fires
    pub confirm_frames: u32,
}

/// How hands map onto commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Every hand drives poses, pinch volume and swipe navigation
    #[default]
    Basic,
    /// Left hand conducts dynamics, right hand conducts tempo and navigation
    Conductor,
}

/// Gesture dispatcher parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Hand-to-command mapping
    pub mode: DispatchMode,

    /// Landmark fed to the motion analyzer
    pub tracking_point: TrackingPoint,

    /// Volume change per unit of vertical pinch travel
    pub volume_drag_gain: f64,

    /// Smallest applied volume change that fires
    pub volume_min_change: f64,

    /// Volume step of a full-intensity crescendo or diminuendo
    pub dynamics_step: f64,

    /// Tempo step of a full-intensity circle
    pub tempo_step: f64,

    /// Consecutive missing frames before a hand's motion history is dropped
    pub lost_after_frames: u32,

    /// Cooldown for kinds missing from `cooldowns` (seconds)
    pub default_cooldown: f64,

    /// Per-kind cooldowns (seconds)
    pub cooldowns: BTreeMap<GestureKind, f64>,
}

/// Smoothing of the tracked point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter spec: `none`, `moving_average[:window]`, `exponential[:alpha]`
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            pose: PoseConfig::default(),
            dispatcher: DispatcherConfig::default(),
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            velocity_window: DEFAULT_VELOCITY_WINDOW,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            swipe_axis_ratio: DEFAULT_SWIPE_AXIS_RATIO,
            circular_window: DEFAULT_CIRCULAR_WINDOW,
            circular_min_radius: DEFAULT_CIRCULAR_MIN_RADIUS,
            circular_radius_spread: DEFAULT_CIRCULAR_RADIUS_SPREAD,
            circular_consistency: DEFAULT_CIRCULAR_CONSISTENCY,
            static_max_movement: DEFAULT_STATIC_MAX_MOVEMENT,
            static_min_duration: DEFAULT_STATIC_MIN_DURATION,
            intensity_speed_scale: DEFAULT_INTENSITY_SPEED_SCALE,
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            mirrored: true,
            confirm_frames: DEFAULT_POSE_CONFIRM_FRAMES,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Basic,
            tracking_point: TrackingPoint::IndexTip,
            volume_drag_gain: DEFAULT_VOLUME_DRAG_GAIN,
            volume_min_change: DEFAULT_VOLUME_MIN_CHANGE,
            dynamics_step: DEFAULT_DYNAMICS_STEP,
            tempo_step: DEFAULT_TEMPO_STEP,
            lost_after_frames: DEFAULT_LOST_AFTER_FRAMES,
            default_cooldown: DEFAULT_COOLDOWN,
            cooldowns: GestureKind::ALL
                .iter()
                .map(|&kind| (kind, kind.default_cooldown()))
                .collect(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "none".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Serialize configuration to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Create the smoothing filter named in the configuration
    pub fn create_filter(&self) -> Result<Box<dyn crate::filters::PositionFilter>> {
        crate::filters::create_filter(&self.smoothing.filter)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let a = &self.analyzer;
        if a.history_size < 2 {
            return Err(Error::ConfigError("History size must be at least 2".to_string()));
        }
        if a.circular_window < MIN_CIRCULAR_SAMPLES {
            return Err(Error::ConfigError(format!(
                "Circular window must be at least {}",
                MIN_CIRCULAR_SAMPLES
            )));
        }
        for (name, value) in [
            ("Velocity window", a.velocity_window),
            ("Swipe threshold", a.swipe_threshold),
            ("Circular minimum radius", a.circular_min_radius),
            ("Static hold max movement", a.static_max_movement),
            ("Static hold min duration", a.static_min_duration),
            ("Intensity speed scale", a.intensity_speed_scale),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(Error::ConfigError(format!("{} must be a positive number", name)));
            }
        }
        if !(a.swipe_axis_ratio > 0.0 && a.swipe_axis_ratio <= 1.0) {
            return Err(Error::ConfigError("Swipe axis ratio must be in (0, 1]".to_string()));
        }
        if !(0.0..=1.0).contains(&a.circular_consistency) {
            return Err(Error::ConfigError(
                "Circular consistency must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(a.circular_radius_spread > 0.0 && a.circular_radius_spread.is_finite()) {
            return Err(Error::ConfigError("Circular radius spread must be a positive number".to_string()));
        }

        if !(self.pose.pinch_threshold > 0.0 && self.pose.pinch_threshold < 1.0) {
            return Err(Error::ConfigError("Pinch threshold must be between 0.0 and 1.0".to_string()));
        }
        if self.pose.confirm_frames == 0 {
            return Err(Error::ConfigError("Pose confirm frames must be at least 1".to_string()));
        }

        let d = &self.dispatcher;
        if !(d.default_cooldown >= 0.0 && d.default_cooldown.is_finite()) {
            return Err(Error::ConfigError("Default cooldown must be a non-negative number".to_string()));
        }
        if let Some((kind, _)) = d.cooldowns.iter().find(|(_, &c)| c < 0.0 || !c.is_finite()) {
            return Err(Error::ConfigError(format!("Cooldown for {} must be a non-negative number", kind)));
        }
        if d.volume_drag_gain <= 0.0 || d.dynamics_step <= 0.0 || d.tempo_step <= 0.0 {
            return Err(Error::ConfigError("Volume gain and step sizes must be positive".to_string()));
        }
        if d.lost_after_frames == 0 {
            return Err(Error::ConfigError("Lost-after frame count must be at least 1".to_string()));
        }
        if d.volume_min_change < 0.0 {
            return Err(Error::ConfigError("Volume minimum change must not be negative".to_string()));
        }

        crate::filters::create_filter(&self.smoothing.filter)
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {}", e)))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture Conductor Configuration

# Motion analysis of the tracked point
analyzer:
  history_size: 10
  velocity_window: 0.3
  swipe_threshold: 0.3
  swipe_axis_ratio: 0.5
  circular_window: 8
  circular_min_radius: 0.05
  circular_radius_spread: 0.3
  circular_consistency: 0.5
  static_max_movement: 0.02
  static_min_duration: 1.0
  intensity_speed_scale: 2.0

# Finger pose classification
pose:
  pinch_threshold: 0.04
  mirrored: true
  confirm_frames: 3

# Gesture to command mapping
dispatcher:
  mode: basic
  tracking_point: index_tip
  volume_drag_gain: 2.0
  volume_min_change: 0.01
  dynamics_step: 0.15
  tempo_step: 0.1
  lost_after_frames: 15
  default_cooldown: 0.5
  cooldowns:
    play: 1.0
    pause: 1.0
    toggle_shuffle: 1.0
    volume_drag: 0.05
    next_track: 1.2
    previous_track: 1.2
    crescendo: 0.5
    diminuendo: 0.5
    tempo_up: 0.8
    tempo_down: 0.8
    fermata: 1.5

# Smoothing of the tracked point
smoothing:
  filter: "none"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let parsed = Config::from_yaml("dispatcher:\n  mode: conductor\n").unwrap();
        assert_eq!(parsed.dispatcher.mode, DispatchMode::Conductor);
        assert_eq!(parsed.analyzer, AnalyzerConfig::default());
        assert_eq!(parsed.dispatcher.cooldowns[&GestureKind::NextTrack], 1.2);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.analyzer.history_size = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pose.pinch_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dispatcher.cooldowns.insert(GestureKind::Play, -1.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.filter = "kalman".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_yaml() {
        match Config::from_yaml("analyzer: [1, 2") {
            Err(Error::ConfigError(msg)) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }
}
