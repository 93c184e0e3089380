//! Configuration loading, saving and validation

use gesture_conductor::config::{Config, DispatchMode, EXAMPLE_CONFIG};
use gesture_conductor::constants::{
    DEFAULT_CIRCULAR_MIN_RADIUS, DEFAULT_HISTORY_SIZE, DEFAULT_PINCH_THRESHOLD, DEFAULT_STATIC_MAX_MOVEMENT,
    DEFAULT_STATIC_MIN_DURATION, DEFAULT_SWIPE_THRESHOLD,
};
use gesture_conductor::events::GestureKind;
use gesture_conductor::landmarks::TrackingPoint;
use gesture_conductor::session::GestureSession;
use gesture_conductor::Error;
use std::env;
use std::fs;

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.analyzer.history_size, DEFAULT_HISTORY_SIZE);
    assert_eq!(config.analyzer.swipe_threshold, DEFAULT_SWIPE_THRESHOLD);
    assert_eq!(config.analyzer.circular_min_radius, DEFAULT_CIRCULAR_MIN_RADIUS);
    assert_eq!(config.analyzer.static_max_movement, DEFAULT_STATIC_MAX_MOVEMENT);
    assert_eq!(config.analyzer.static_min_duration, DEFAULT_STATIC_MIN_DURATION);
    assert_eq!(config.pose.pinch_threshold, DEFAULT_PINCH_THRESHOLD);
    assert_eq!(config.dispatcher.mode, DispatchMode::Basic);
    assert_eq!(config.dispatcher.tracking_point, TrackingPoint::IndexTip);
    assert_eq!(config.smoothing.filter, "none");

    for kind in GestureKind::ALL {
        assert_eq!(config.dispatcher.cooldowns[&kind], kind.default_cooldown());
    }
    // navigation cools down longer than pose and dynamics gestures
    assert!(config.dispatcher.cooldowns[&GestureKind::NextTrack] > config.dispatcher.cooldowns[&GestureKind::Crescendo]);
}

#[test]
fn test_example_config_parses_and_validates() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_file_round_trip() {
    let path = env::temp_dir().join(format!("gesture_conductor_config_{}.yaml", std::process::id()));
    let mut config = Config::default();
    config.dispatcher.mode = DispatchMode::Conductor;
    config.dispatcher.tracking_point = TrackingPoint::Wrist;
    config.smoothing.filter = "exponential:0.4".to_string();
    config.dispatcher.cooldowns.insert(GestureKind::TempoUp, 1.25);

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_partial_cooldown_map() {
    let yaml = "dispatcher:\n  default_cooldown: 0.7\n  cooldowns:\n    next_track: 1.2\n";
    let config = Config::from_yaml(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.dispatcher.cooldowns.len(), 1);
    assert_eq!(config.dispatcher.cooldowns[&GestureKind::NextTrack], 1.2);
    assert_eq!(config.dispatcher.default_cooldown, 0.7);
}

#[test]
fn test_unknown_gesture_kind_rejected() {
    let yaml = "dispatcher:\n  cooldowns:\n    wave: 1.0\n";
    assert!(matches!(Config::from_yaml(yaml), Err(Error::ConfigError(_))));
}

#[test]
fn test_missing_file() {
    assert!(Config::from_file("/nonexistent/gesture.yaml").is_err());
}

#[test]
fn test_invalid_values_rejected() {
    let cases: Vec<(&str, Box<dyn Fn(&mut Config)>)> = vec![
        ("history", Box::new(|c| c.analyzer.history_size = 1)),
        ("circular window", Box::new(|c| c.analyzer.circular_window = 2)),
        ("swipe threshold", Box::new(|c| c.analyzer.swipe_threshold = 0.0)),
        ("axis ratio", Box::new(|c| c.analyzer.swipe_axis_ratio = 1.5)),
        ("consistency", Box::new(|c| c.analyzer.circular_consistency = -0.1)),
        ("hold duration", Box::new(|c| c.analyzer.static_min_duration = f64::NAN)),
        ("pinch", Box::new(|c| c.pose.pinch_threshold = 1.0)),
        ("confirm", Box::new(|c| c.pose.confirm_frames = 0)),
        ("default cooldown", Box::new(|c| c.dispatcher.default_cooldown = -0.5)),
        ("nan default cooldown", Box::new(|c| c.dispatcher.default_cooldown = f64::NAN)),
        ("radius spread", Box::new(|c| c.analyzer.circular_radius_spread = 0.0)),
        ("nan radius spread", Box::new(|c| c.analyzer.circular_radius_spread = f64::NAN)),
        ("gain", Box::new(|c| c.dispatcher.volume_drag_gain = 0.0)),
        ("lost frames", Box::new(|c| c.dispatcher.lost_after_frames = 0)),
        ("filter", Box::new(|c| c.smoothing.filter = "median".to_string())),
    ];
    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "{} should be rejected", name);
        assert!(GestureSession::new(config).is_err(), "{} should not start a session", name);
    }
}

#[test]
fn test_nan_from_yaml_rejected() {
    let yaml = "analyzer:\n  circular_radius_spread: .nan\ndispatcher:\n  default_cooldown: .nan\n";
    let config = Config::from_yaml(yaml).unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
}

#[test]
fn test_zero_cooldowns_allowed() {
    let mut config = Config::default();
    config.dispatcher.default_cooldown = 0.0;
    for kind in GestureKind::ALL {
        config.dispatcher.cooldowns.insert(kind, 0.0);
    }
    assert!(config.validate().is_ok());
}
