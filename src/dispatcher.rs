//! Per-hand gesture dispatch.
//!
//! Each frame the dispatcher feeds the tracked point to its analyzer, reads
//! the pose, then walks the detectors in a fixed priority order:
//!
//! 1. pose gestures (open palm, fist, three fingers)
//! 2. pinch-drag volume
//! 3. swipe navigation
//! 4. conductor dynamics, fermata and tempo circles
//!
//! Every path gates on the cooldown of its own gesture kind, so different
//! kinds may fire in the same frame while one kind never fires twice.

use crate::analyzer::{GestureAnalyzer, Rotation, SwipeDirection};
use crate::clock::SharedClock;
use crate::config::{Config, DispatchMode, DispatcherConfig};
use crate::constants::{TEMPO_MAX, TEMPO_MIN, VOLUME_MAX, VOLUME_MIN};
use crate::debounce::Debouncer;
use crate::events::{Command, GestureEvent, GestureKind, PlaybackParams};
use crate::filters::PositionFilter;
use crate::landmarks::{HandLandmarks, Handedness};
use crate::pose::{pinch_point, Pose, PoseClassifier, PoseReading};
use crate::Result;
use log::debug;

/// What a hand is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandRole {
    /// Poses, pinch volume and swipe navigation
    General,
    /// Conductor left hand: crescendo, diminuendo and fermata
    Dynamics,
    /// Conductor right hand: tempo circles and navigation
    Tempo,
}

impl HandRole {
    /// Role of a hand under the given mode
    #[must_use]
    pub fn for_hand(mode: DispatchMode, hand: Handedness) -> Self {
        match (mode, hand) {
            (DispatchMode::Conductor, Handedness::Left) => Self::Dynamics,
            (DispatchMode::Conductor, Handedness::Right) => Self::Tempo,
            _ => Self::General,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PoseStreak {
    pose: Pose,
    frames: u32,
    fired: bool,
}

/// Gesture dispatcher owning the analyzer and state of one hand
pub struct HandDispatcher {
    hand: Handedness,
    role: HandRole,
    config: DispatcherConfig,
    analyzer: GestureAnalyzer,
    classifier: PoseClassifier,
    filter: Box<dyn PositionFilter>,
    confirm_frames: u32,
    streak: Option<PoseStreak>,
    last_pinch_y: Option<f64>,
    fermata_armed: bool,
    missing_frames: u32,
}

impl HandDispatcher {
    /// Create a dispatcher for `hand`, timed by `clock`
    pub fn new(hand: Handedness, config: &Config, clock: SharedClock) -> Result<Self> {
        let d = &config.dispatcher;
        let debouncer = Debouncer::with_cooldowns(
            d.default_cooldown,
            d.cooldowns.iter().map(|(&k, &v)| (k, v)).collect(),
        );
        Ok(Self {
            hand,
            role: HandRole::for_hand(d.mode, hand),
            config: d.clone(),
            analyzer: GestureAnalyzer::with_clock(config.analyzer.clone(), clock).with_debouncer(debouncer),
            classifier: PoseClassifier::new(&config.pose),
            filter: config.create_filter()?,
            confirm_frames: config.pose.confirm_frames.max(1),
            streak: None,
            last_pinch_y: None,
            fermata_armed: true,
            missing_frames: 0,
        })
    }

    pub fn hand(&self) -> Handedness {
        self.hand
    }

    pub fn role(&self) -> HandRole {
        self.role
    }

    pub fn analyzer(&self) -> &GestureAnalyzer {
        &self.analyzer
    }

    /// Consecutive frames this hand has been absent
    pub fn missing_frames(&self) -> u32 {
        self.missing_frames
    }

    /// Process this hand's landmarks for the current frame.
    ///
    /// Incomplete landmarks count as an absent hand.
    pub fn process(&mut self, landmarks: &HandLandmarks, params: &PlaybackParams) -> Vec<GestureEvent> {
        let Some(reading) = self.classifier.classify(landmarks) else {
            debug!("{} hand: incomplete landmarks, skipping frame", self.hand);
            self.mark_missing();
            return Vec::new();
        };
        let Some((x, y)) = landmarks.tracking_position(self.config.tracking_point) else {
            self.mark_missing();
            return Vec::new();
        };

        self.missing_frames = 0;
        let (sx, sy) = self.filter.apply(x, y);
        self.analyzer.add_position(sx, sy);

        let mut params = *params;
        let mut events = Vec::new();

        self.dispatch_pose(&reading, &mut events);
        self.dispatch_pinch(landmarks, &reading, &mut params, &mut events);

        if !reading.is_pinch {
            match self.role {
                HandRole::General => self.dispatch_navigation(&mut events),
                HandRole::Dynamics => self.dispatch_dynamics(&reading, &mut params, &mut events),
                HandRole::Tempo => {
                    if !self.dispatch_tempo(&params, &mut events) {
                        self.dispatch_navigation(&mut events);
                    }
                }
            }
        }

        for event in &events {
            debug!("{} hand fired {}: {}", self.hand, event.kind, event.status);
        }
        events
    }

    /// Note that the hand was not seen this frame.
    ///
    /// Motion history survives short gaps; after `lost_after_frames`
    /// consecutive misses it is dropped so a re-acquired hand starts fresh.
    pub fn mark_missing(&mut self) {
        self.missing_frames = self.missing_frames.saturating_add(1);
        self.streak = None;
        self.last_pinch_y = None;
        self.fermata_armed = true;
        if self.missing_frames == self.config.lost_after_frames {
            debug!("{} hand lost for {} frames, clearing motion history", self.hand, self.missing_frames);
            self.analyzer.clear_history();
            self.filter.reset();
        }
    }

    fn fire(&mut self, kind: GestureKind, command: Command, intensity: f64, status: String, events: &mut Vec<GestureEvent>) -> bool {
        if !self.analyzer.try_trigger(kind) {
            return false;
        }
        events.push(GestureEvent::new(kind, command, intensity, self.hand, status));
        true
    }

    fn dispatch_pose(&mut self, reading: &PoseReading, events: &mut Vec<GestureEvent>) {
        let mut streak = match self.streak {
            Some(s) if s.pose == reading.pose => PoseStreak {
                frames: s.frames.saturating_add(1),
                ..s
            },
            _ => PoseStreak {
                pose: reading.pose,
                frames: 1,
                fired: false,
            },
        };

        if streak.frames >= self.confirm_frames && !streak.fired {
            let action = match streak.pose {
                Pose::OpenPalm => Some((GestureKind::Play, Command::Play, "Gesture: Play")),
                Pose::Fist => Some((GestureKind::Pause, Command::Pause, "Gesture: Pause")),
                Pose::ThreeFingers => Some((GestureKind::ToggleShuffle, Command::ToggleShuffle, "Gesture: Toggle Shuffle")),
                Pose::Other(_) => None,
            };
            if let Some((kind, command, status)) = action {
                streak.fired = self.fire(kind, command, 1.0, status.to_string(), events);
            }
        }
        self.streak = Some(streak);
    }

    fn dispatch_pinch(
        &mut self,
        landmarks: &HandLandmarks,
        reading: &PoseReading,
        params: &mut PlaybackParams,
        events: &mut Vec<GestureEvent>,
    ) {
        let pinch_y = if reading.is_pinch { pinch_point(landmarks).map(|p| p.1) } else { None };
        let Some(curr_y) = pinch_y else {
            self.last_pinch_y = None;
            return;
        };

        // first pinching frame only sets the anchor
        if let Some(prev_y) = self.last_pinch_y.replace(curr_y) {
            let raw = (prev_y - curr_y) * self.config.volume_drag_gain;
            let target = (params.volume + raw).clamp(VOLUME_MIN, VOLUME_MAX);
            let change = target - params.volume;
            if change.abs() > self.config.volume_min_change {
                let intensity = self.analyzer.gesture_intensity();
                let status = format!("Volume: {:.0}%", target * 100.0);
                if self.fire(GestureKind::VolumeDrag, Command::SetVolume(change), intensity, status, events) {
                    params.volume = target;
                }
            }
        }
    }

    fn dispatch_navigation(&mut self, events: &mut Vec<GestureEvent>) {
        let intensity = self.analyzer.gesture_intensity();
        match self.analyzer.detect_swipe() {
            Some(SwipeDirection::Right) => {
                self.fire(GestureKind::NextTrack, Command::NextTrack, intensity, "Gesture: Next Track".to_string(), events);
            }
            Some(SwipeDirection::Left) => {
                self.fire(
                    GestureKind::PreviousTrack,
                    Command::PreviousTrack,
                    intensity,
                    "Gesture: Previous Track".to_string(),
                    events,
                );
            }
            _ => {}
        }
    }

    /// Crescendo and diminuendo on vertical swipes, fermata on a still hand.
    ///
    /// A fermata fires once per hold and re-arms when the hand moves again. It
    /// never fires while the hand shows a command pose, which owns the frame.
    fn dispatch_dynamics(&mut self, reading: &PoseReading, params: &mut PlaybackParams, events: &mut Vec<GestureEvent>) {
        let intensity = self.analyzer.gesture_intensity();
        let step = self.config.dynamics_step * intensity;
        let swipe = self.analyzer.detect_swipe();
        let holding = swipe.is_none() && self.analyzer.detect_static_hold();
        if !holding {
            self.fermata_armed = true;
        }

        match swipe {
            Some(SwipeDirection::Up) => {
                let target = (params.volume + step).clamp(VOLUME_MIN, VOLUME_MAX);
                let status = format!("Crescendo! Volume: {:.0}%", target * 100.0);
                if self.fire(GestureKind::Crescendo, Command::SetVolume(step), intensity, status, events) {
                    params.volume = target;
                }
            }
            Some(SwipeDirection::Down) => {
                let target = (params.volume - step).clamp(VOLUME_MIN, VOLUME_MAX);
                let status = format!("Diminuendo... Volume: {:.0}%", target * 100.0);
                if self.fire(GestureKind::Diminuendo, Command::SetVolume(-step), intensity, status, events) {
                    params.volume = target;
                }
            }
            Some(_) => {}
            None => {
                if holding && self.fermata_armed && !reading.pose.is_command() {
                    let fired = self.fire(GestureKind::Fermata, Command::Pause, 1.0, "Fermata: Pause".to_string(), events);
                    self.fermata_armed = !fired;
                }
            }
        }
    }

    /// Returns true when a circle was recognized, which suppresses navigation
    fn dispatch_tempo(&mut self, params: &PlaybackParams, events: &mut Vec<GestureEvent>) -> bool {
        let motion = self.analyzer.detect_circular_motion();
        let Some(rotation) = motion.rotation() else {
            return false;
        };

        let intensity = self.analyzer.rotation_intensity();
        let step = self.config.tempo_step * intensity;
        let (kind, delta, label) = match rotation {
            Rotation::Clockwise => (GestureKind::TempoUp, step, "Tempo up"),
            Rotation::CounterClockwise => (GestureKind::TempoDown, -step, "Tempo down"),
        };
        let target = (params.tempo + delta).clamp(TEMPO_MIN, TEMPO_MAX);
        let status = format!("{}: {:.2}x", label, target);
        self.fire(kind, Command::SetTempo(delta), intensity, status, events);
        true
    }
}
