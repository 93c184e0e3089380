//! Gesture recognition engine for hands-free music control.
//!
//! This library turns a stream of 2D hand landmarks into debounced playback
//! commands:
//! - Motion analysis of a tracked hand point (swipes, circles, static holds)
//! - Stateless finger pose classification (fist, open palm, three fingers, pinch)
//! - Per-gesture cooldowns so a 30 Hz stream fires each gesture once
//! - A background pipeline delivering events over a channel
//!
//! The processing chain for each frame is:
//! 1. A landmark source yields the hands seen in the frame
//! 2. Each hand's tracked point is smoothed and appended to its analyzer
//! 3. The pose classifier reads the finger pattern and pinch distance
//! 4. The dispatcher evaluates detectors in priority order and fires events
//!
//! # Examples
//!
//! ## Motion analysis
//!
//! ```
//! use gesture_conductor::analyzer::GestureAnalyzer;
//! use gesture_conductor::clock::ManualClock;
//! use gesture_conductor::config::AnalyzerConfig;
//!
//! let clock = ManualClock::shared(0.0);
//! let mut analyzer = GestureAnalyzer::with_clock(AnalyzerConfig::default(), clock.clone());
//!
//! for y in [0.8, 0.6, 0.4] {
//!     analyzer.add_position(0.5, y);
//!     clock.advance(0.1);
//! }
//! assert!(analyzer.detect_swipe_up());
//! assert!(!analyzer.detect_swipe_down());
//! ```
//!
//! ## Running a session over recorded frames
//!
//! ```no_run
//! use gesture_conductor::{
//!     config::Config,
//!     events::PlaybackParams,
//!     session::GestureSession,
//!     source::{LandmarkSource, ReplaySource},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = ReplaySource::from_path("recording.jsonl")?;
//! let mut session = GestureSession::new(Config::default())?;
//! let params = PlaybackParams::default();
//!
//! while let Some(frame) = source.next_frame()? {
//!     for event in session.process_frame(&frame, &params)? {
//!         println!("{}", event.status);
//!     }
//! }
//! source.release();
//! # Ok(())
//! # }
//! ```
//!
//! ## Background pipeline
//!
//! ```no_run
//! use gesture_conductor::{
//!     config::Config,
//!     events::PlaybackParams,
//!     pipeline::{shared_params, GesturePipeline, PipelineMessage},
//!     session::GestureSession,
//!     source::ReplaySource,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = GesturePipeline::new();
//! let params = shared_params(PlaybackParams::default());
//! let rx = pipeline.start(
//!     ReplaySource::stdin(),
//!     GestureSession::new(Config::default())?,
//!     params.clone(),
//! )?;
//!
//! for message in rx {
//!     if let PipelineMessage::Gesture(event) = message {
//!         println!("{:?}", event.command);
//!     }
//! }
//! pipeline.stop();
//! # Ok(())
//! # }
//! ```

/// Per-hand motion history and shape detectors
pub mod analyzer;

/// Time sources for detector timing
pub mod clock;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Per-gesture cooldown table
pub mod debounce;

/// Per-hand gesture dispatch
pub mod dispatcher;

/// Error types and result handling
pub mod error;

/// Gesture kinds, commands and events
pub mod events;

/// Position smoothing filters
pub mod filters;

/// Hand landmark data model
pub mod landmarks;

/// Background processing thread and lifecycle
pub mod pipeline;

/// Playlist and transport model applying commands
pub mod playback;

/// Finger pose classification
pub mod pose;

/// Frame-level processing across hands
pub mod session;

/// Landmark sources
pub mod source;

/// Geometry helpers
pub mod utils;

pub use error::{Error, Result};
