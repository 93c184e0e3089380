//! Frame-level gesture processing across all tracked hands.

use crate::clock::{Clock, ManualClock, Timestamp};
use crate::config::Config;
use crate::dispatcher::HandDispatcher;
use crate::events::{GestureEvent, PlaybackParams};
use crate::landmarks::{HandLandmarks, Handedness, LandmarkFrame};
use crate::{Error, Result};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One gesture-control session: a dispatcher per hand, timed by frame timestamps.
///
/// A session is owned by exactly one thread; nothing in it is shared.
pub struct GestureSession {
    config: Config,
    clock: Arc<ManualClock>,
    dispatchers: HashMap<Handedness, HandDispatcher>,
    frames: u64,
}

impl GestureSession {
    /// Create a session, validating the configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: ManualClock::shared(0.0),
            dispatchers: HashMap::new(),
            frames: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Frames processed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Time of the most recent frame
    pub fn current_time(&self) -> Timestamp {
        self.clock.now()
    }

    /// Dispatcher for `hand`, if that hand has been seen
    pub fn dispatcher(&self, hand: Handedness) -> Option<&HandDispatcher> {
        self.dispatchers.get(&hand)
    }

    /// Process one frame and return the gestures it fired.
    ///
    /// Hands are processed in the order the detector listed them. A second
    /// hand with the same handedness label in one frame is ignored. Events are
    /// de-duplicated by kind; the first hand to fire a kind wins.
    pub fn process_frame(&mut self, frame: &LandmarkFrame, params: &PlaybackParams) -> Result<Vec<GestureEvent>> {
        if !frame.timestamp.is_finite() {
            return Err(Error::InvalidInput(format!("Frame timestamp {} is not finite", frame.timestamp)));
        }
        self.clock.set(frame.timestamp);
        self.frames += 1;

        let mut seen = HashSet::new();
        let mut fired = HashSet::new();
        let mut events = Vec::new();

        for hand in &frame.hands {
            if !seen.insert(hand.handedness) {
                trace!("Duplicate {} hand in frame {}, ignoring", hand.handedness, self.frames);
                continue;
            }
            let dispatcher = self.dispatcher_for(hand.handedness)?;
            for event in Self::process_hand(dispatcher, hand, params) {
                if fired.insert(event.kind) {
                    events.push(event);
                } else {
                    debug!("Dropping duplicate {} from {} hand", event.kind, event.hand);
                }
            }
        }

        for (hand, dispatcher) in &mut self.dispatchers {
            if !seen.contains(hand) {
                dispatcher.mark_missing();
            }
        }

        Ok(events)
    }

    /// Forget every hand; the next frame starts from scratch
    pub fn reset(&mut self) {
        self.dispatchers.clear();
        self.frames = 0;
    }

    fn process_hand(dispatcher: &mut HandDispatcher, hand: &HandLandmarks, params: &PlaybackParams) -> Vec<GestureEvent> {
        if !hand.is_complete() {
            trace!("{} hand has {} landmarks, skipping", hand.handedness, hand.landmarks.len());
            dispatcher.mark_missing();
            return Vec::new();
        }
        dispatcher.process(hand, params)
    }

    fn dispatcher_for(&mut self, hand: Handedness) -> Result<&mut HandDispatcher> {
        if !self.dispatchers.contains_key(&hand) {
            debug!("Tracking new {} hand", hand);
            let dispatcher = HandDispatcher::new(hand, &self.config, self.clock.clone())?;
            self.dispatchers.insert(hand, dispatcher);
        }
        self.dispatchers
            .get_mut(&hand)
            .ok_or_else(|| Error::Pipeline(format!("no dispatcher for {} hand", hand)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame_fires_nothing() {
        let mut session = GestureSession::new(Config::default()).unwrap();
        let events = session.process_frame(&LandmarkFrame::empty(1.0), &PlaybackParams::default()).unwrap();
        assert!(events.is_empty());
        assert_eq!(session.frame_count(), 1);
        assert_eq!(session.current_time(), 1.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.analyzer.history_size = 0;
        assert!(GestureSession::new(config).is_err());
    }

    #[test]
    fn test_incomplete_hand_creates_dispatcher_without_history() {
        let mut session = GestureSession::new(Config::default()).unwrap();
        let frame = LandmarkFrame::new(0.0, vec![HandLandmarks::new(Handedness::Left, Vec::new())]);
        let events = session.process_frame(&frame, &PlaybackParams::default()).unwrap();
        assert!(events.is_empty());
        let dispatcher = session.dispatcher(Handedness::Left).unwrap();
        assert!(dispatcher.analyzer().positions().is_empty());
        assert_eq!(dispatcher.missing_frames(), 1);
    }

    #[test]
    fn test_non_finite_timestamp_rejected() {
        let mut session = GestureSession::new(Config::default()).unwrap();
        let result = session.process_frame(&LandmarkFrame::empty(f64::NAN), &PlaybackParams::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(session.frame_count(), 0);
    }
}
