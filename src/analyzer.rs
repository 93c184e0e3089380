//! Motion analysis of one tracked hand.
//!
//! The analyzer keeps a short history of the tracked point, derives velocity
//! samples from consecutive positions and answers shape questions about the
//! recent trajectory: swipes, circles, holds and how hard the hand is moving.
//! Every detector answers with a neutral result when the history is too short.

use crate::clock::{SharedClock, SystemClock, Timestamp};
use crate::config::AnalyzerConfig;
use crate::constants::{MIN_CIRCULAR_SAMPLES, MIN_STATIC_SAMPLES};
use crate::debounce::Debouncer;
use crate::events::GestureKind;
use crate::utils::{centroid, cross, distance, mean_std};
use log::trace;
use std::collections::VecDeque;

/// Tracked position at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: Timestamp,
}

/// Velocity between two consecutive hand samples, stamped with the later one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocitySample {
    pub vx: f64,
    pub vy: f64,
    pub timestamp: Timestamp,
}

/// Screen-space rotation sense (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Result of circular motion detection
///
/// `direction` is the net count of rotation signs across the window:
/// positive means clockwise as seen on screen, negative counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircularMotion {
    pub is_circular: bool,
    pub direction: i32,
}

impl CircularMotion {
    /// Rotation sense, only when the motion was classified circular
    #[must_use]
    pub fn rotation(&self) -> Option<Rotation> {
        if !self.is_circular {
            return None;
        }
        match self.direction.signum() {
            1 => Some(Rotation::Clockwise),
            -1 => Some(Rotation::CounterClockwise),
            _ => None,
        }
    }
}

/// Swipe direction in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Motion analyzer for a single hand
pub struct GestureAnalyzer {
    config: AnalyzerConfig,
    clock: SharedClock,
    positions: VecDeque<HandSample>,
    velocities: VecDeque<VelocitySample>,
    debouncer: Debouncer,
}

impl GestureAnalyzer {
    /// Create an analyzer timed by the system clock
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_clock(config, SystemClock::shared())
    }

    /// Create an analyzer timed by `clock`
    #[must_use]
    pub fn with_clock(config: AnalyzerConfig, clock: SharedClock) -> Self {
        let capacity = config.history_size.max(1);
        Self {
            config,
            clock,
            positions: VecDeque::with_capacity(capacity),
            velocities: VecDeque::with_capacity(capacity),
            debouncer: Debouncer::default(),
        }
    }

    /// Replace the cooldown table, e.g. with per-kind cooldowns
    #[must_use]
    pub fn with_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Current time as seen by this analyzer
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Record the tracked point at the current time
    pub fn add_position(&mut self, x: f64, y: f64) {
        let now = self.clock.now();
        self.add_position_at(x, y, now);
    }

    /// Record the tracked point at an explicit time.
    ///
    /// A velocity sample is derived from the previous position unless the
    /// time step is zero or negative (duplicate or out-of-order frame).
    pub fn add_position_at(&mut self, x: f64, y: f64, timestamp: Timestamp) {
        let capacity = self.config.history_size.max(1);
        // one velocity per adjacent pair of retained positions
        let velocity_capacity = capacity - 1;

        if let Some(prev) = self.positions.back() {
            let dt = timestamp - prev.timestamp;
            if dt > 0.0 && velocity_capacity > 0 {
                if self.velocities.len() >= velocity_capacity {
                    self.velocities.pop_front();
                }
                self.velocities.push_back(VelocitySample {
                    vx: (x - prev.x) / dt,
                    vy: (y - prev.y) / dt,
                    timestamp,
                });
            } else if dt <= 0.0 {
                trace!("Dropping velocity sample with dt={:.4}", dt);
            }
        }

        if self.positions.len() >= capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(HandSample { x, y, timestamp });
    }

    pub fn positions(&self) -> &VecDeque<HandSample> {
        &self.positions
    }

    pub fn velocities(&self) -> &VecDeque<VelocitySample> {
        &self.velocities
    }

    /// Mean velocity over samples no older than `time_window` seconds.
    /// `(0, 0)` when no sample qualifies.
    #[must_use]
    pub fn average_velocity(&self, time_window: f64) -> (f64, f64) {
        let now = self.clock.now();
        let (mut sx, mut sy, mut count) = (0.0, 0.0, 0usize);
        for v in self.velocities.iter().filter(|v| now - v.timestamp <= time_window) {
            sx += v.vx;
            sy += v.vy;
            count += 1;
        }
        if count == 0 {
            return (0.0, 0.0);
        }
        (sx / count as f64, sy / count as f64)
    }

    /// Mean velocity over the configured window
    #[must_use]
    pub fn recent_velocity(&self) -> (f64, f64) {
        self.average_velocity(self.config.velocity_window)
    }

    /// Upward swipe (y decreasing on screen)
    #[must_use]
    pub fn detect_swipe_up(&self) -> bool {
        self.detect_swipe() == Some(SwipeDirection::Up)
    }

    /// Downward swipe
    #[must_use]
    pub fn detect_swipe_down(&self) -> bool {
        self.detect_swipe() == Some(SwipeDirection::Down)
    }

    /// Leftward swipe in image coordinates
    #[must_use]
    pub fn detect_swipe_left(&self) -> bool {
        self.detect_swipe() == Some(SwipeDirection::Left)
    }

    /// Rightward swipe in image coordinates
    #[must_use]
    pub fn detect_swipe_right(&self) -> bool {
        self.detect_swipe() == Some(SwipeDirection::Right)
    }

    /// Classify the recent velocity as at most one swipe direction
    #[must_use]
    pub fn detect_swipe(&self) -> Option<SwipeDirection> {
        let (vx, vy) = self.recent_velocity();
        classify_swipe(vx, vy, self.config.swipe_threshold, self.config.swipe_axis_ratio)
    }

    /// Look for a consistent rotation in the last few positions
    #[must_use]
    pub fn detect_circular_motion(&self) -> CircularMotion {
        let window = self.config.circular_window.max(MIN_CIRCULAR_SAMPLES);
        let skip = self.positions.len().saturating_sub(window);
        let recent: Vec<(f64, f64)> = self.positions.iter().skip(skip).map(|s| (s.x, s.y)).collect();

        if recent.len() < MIN_CIRCULAR_SAMPLES {
            return CircularMotion::default();
        }
        let Some(center) = centroid(recent.iter().copied()) else {
            return CircularMotion::default();
        };

        let radii: Vec<f64> = recent.iter().map(|&p| distance(p, center)).collect();
        let (mean_radius, radius_std) = mean_std(&radii);

        let mut direction = 0i32;
        for pair in recent.windows(2) {
            let prev = (pair[0].0 - center.0, pair[0].1 - center.1);
            let curr = (pair[1].0 - center.0, pair[1].1 - center.1);
            let c = cross(prev, curr);
            if c > 0.0 {
                direction += 1;
            } else if c < 0.0 {
                direction -= 1;
            }
        }

        let is_circular = mean_radius > self.config.circular_min_radius
            && radius_std * radius_std < mean_radius * self.config.circular_radius_spread
            && f64::from(direction.abs()) > recent.len() as f64 * self.config.circular_consistency;

        CircularMotion { is_circular, direction }
    }

    /// True when the hand stayed within a small radius for the hold duration
    #[must_use]
    pub fn detect_static_hold(&self) -> bool {
        if self.positions.len() < MIN_STATIC_SAMPLES {
            return false;
        }
        let now = self.clock.now();
        let recent: Vec<(f64, f64)> = self
            .positions
            .iter()
            .filter(|s| now - s.timestamp <= self.config.static_min_duration)
            .map(|s| (s.x, s.y))
            .collect();

        if recent.len() < MIN_STATIC_SAMPLES {
            return false;
        }
        let Some(center) = centroid(recent.iter().copied()) else {
            return false;
        };

        let max_distance = recent.iter().map(|&p| distance(p, center)).fold(0.0, f64::max);
        max_distance < self.config.static_max_movement
    }

    /// Normalized motion strength in `[0, 1]`
    #[must_use]
    pub fn gesture_intensity(&self) -> f64 {
        let (vx, vy) = self.recent_velocity();
        let speed = (vx * vx + vy * vy).sqrt();
        (speed / self.config.intensity_speed_scale).min(1.0)
    }

    /// Mean speed (magnitude of each velocity sample) over `time_window`.
    ///
    /// Unlike [`Self::average_velocity`] this does not cancel out along a
    /// curved path, so it measures how fast a circle is being drawn.
    #[must_use]
    pub fn average_speed(&self, time_window: f64) -> f64 {
        let now = self.clock.now();
        let speeds: Vec<f64> = self
            .velocities
            .iter()
            .filter(|v| now - v.timestamp <= time_window)
            .map(|v| (v.vx * v.vx + v.vy * v.vy).sqrt())
            .collect();
        mean_std(&speeds).0
    }

    /// Strength of a rotating gesture in `[0, 1]`
    #[must_use]
    pub fn rotation_intensity(&self) -> f64 {
        (self.average_speed(self.config.velocity_window) / self.config.intensity_speed_scale).min(1.0)
    }

    /// True if `kind` is outside its cooldown
    #[must_use]
    pub fn can_trigger(&self, kind: GestureKind) -> bool {
        self.debouncer.can_trigger(kind, self.clock.now())
    }

    /// Start the cooldown of `kind` now
    pub fn mark_triggered(&mut self, kind: GestureKind) {
        let now = self.clock.now();
        self.debouncer.mark_triggered(kind, now);
    }

    /// Check and start the cooldown of `kind` in one step
    pub fn try_trigger(&mut self, kind: GestureKind) -> bool {
        let now = self.clock.now();
        self.debouncer.try_trigger(kind, now)
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Drop all motion history; cooldowns are kept
    pub fn clear_history(&mut self) {
        self.positions.clear();
        self.velocities.clear();
    }
}

/// Swipe classification of one velocity. Vertical and horizontal swipes are
/// mutually exclusive because each requires its axis to dominate the other.
#[must_use]
pub fn classify_swipe(vx: f64, vy: f64, threshold: f64, axis_ratio: f64) -> Option<SwipeDirection> {
    if vy.abs() > threshold && vx.abs() < vy.abs() * axis_ratio {
        return Some(if vy < 0.0 { SwipeDirection::Up } else { SwipeDirection::Down });
    }
    if vx.abs() > threshold && vy.abs() < vx.abs() * axis_ratio {
        return Some(if vx < 0.0 { SwipeDirection::Left } else { SwipeDirection::Right });
    }
    None
}
