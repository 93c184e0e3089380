//! Landmark sources feeding the gesture pipeline.
//!
//! The hand-landmark detector is an external collaborator. Anything that can
//! produce [`LandmarkFrame`]s implements [`LandmarkSource`]: a live detector
//! bridge, a recorded JSON-lines stream, or a scripted sequence in tests.

use crate::clock::Timestamp;
use crate::error::{Error, Result};
use crate::landmarks::LandmarkFrame;
use log::{debug, info, trace};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Per-frame producer of hand landmarks.
///
/// `next_frame` blocks until a frame is available. `Ok(None)` means the
/// stream ended normally; an error is fatal for the reading loop.
pub trait LandmarkSource: Send {
    /// Read the next frame
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;

    /// Release the underlying device or stream. Called exactly once when the
    /// reading loop exits.
    fn release(&mut self) {}

    /// Short description for logs
    fn name(&self) -> &str;
}

/// Replays landmark frames recorded as one JSON object per line:
///
/// ```json
/// {"timestamp": 0.033, "hands": [{"handedness": "Right", "landmarks": [{"x": 0.5, "y": 0.4}, ...]}]}
/// ```
///
/// Blank lines are skipped. With real-time pacing enabled the source sleeps
/// so frames are delivered at the rate their timestamps describe.
pub struct ReplaySource<R: BufRead + Send> {
    reader: Option<R>,
    name: String,
    realtime: bool,
    line_number: usize,
    start: Option<(Instant, Timestamp)>,
    line: String,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::LandmarkSource(format!("Failed to open {}: {}", path.display(), e)))?;
        info!("Replaying landmarks from {}", path.display());
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl ReplaySource<BufReader<io::Stdin>> {
    /// Read a recording piped on standard input
    #[must_use]
    pub fn stdin() -> Self {
        info!("Replaying landmarks from stdin");
        Self::new(BufReader::new(io::stdin()), "stdin".to_string())
    }
}

impl<R: BufRead + Send> ReplaySource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader: Some(reader),
            name: name.into(),
            realtime: false,
            line_number: 0,
            start: None,
            line: String::new(),
        }
    }

    /// Pace delivery by frame timestamps
    #[must_use]
    pub fn realtime(mut self, enabled: bool) -> Self {
        self.realtime = enabled;
        self
    }

    /// True once the stream has been released
    pub fn is_released(&self) -> bool {
        self.reader.is_none()
    }

    fn pace(&mut self, timestamp: Timestamp) -> Result<()> {
        let (origin, first) = *self.start.get_or_insert((Instant::now(), timestamp));
        let due = timestamp - first;
        if due <= 0.0 {
            return Ok(());
        }
        let elapsed = origin.elapsed().as_secs_f64();
        if due > elapsed {
            let wait = Duration::try_from_secs_f64(due - elapsed).map_err(|e| {
                Error::LandmarkSource(format!(
                    "{} line {}: cannot pace timestamp {}: {}",
                    self.name, self.line_number, timestamp, e
                ))
            })?;
            thread::sleep(wait);
        }
        Ok(())
    }
}

impl<R: BufRead + Send> LandmarkSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(Error::LandmarkSource(format!("{} has been released", self.name)));
        };

        loop {
            self.line.clear();
            let read = reader
                .read_line(&mut self.line)
                .map_err(|e| Error::LandmarkSource(format!("Failed to read {}: {}", self.name, e)))?;
            if read == 0 {
                debug!("End of {} after {} lines", self.name, self.line_number);
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let frame: LandmarkFrame = serde_json::from_str(trimmed).map_err(|e| {
                Error::LandmarkSource(format!("{} line {}: invalid frame: {}", self.name, self.line_number, e))
            })?;
            trace!("{} line {}: {} hand(s) at {:.3}s", self.name, self.line_number, frame.hands.len(), frame.timestamp);

            if self.realtime {
                self.pace(frame.timestamp)?;
            }
            return Ok(Some(frame));
        }
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            debug!("Released {}", self.name);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory source delivering a fixed script of frames and failures
pub struct ScriptedSource {
    script: VecDeque<Result<LandmarkFrame>>,
    frame_delay: Option<Duration>,
    idle_tail: Option<(Timestamp, f64)>,
    released: Arc<AtomicBool>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            script: frames.into_iter().map(Ok).collect(),
            frame_delay: None,
            idle_tail: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Append a read failure after the scripted frames
    #[must_use]
    pub fn then_fail(mut self, reason: impl Into<String>) -> Self {
        self.script.push_back(Err(Error::LandmarkSource(reason.into())));
        self
    }

    /// Sleep before delivering each frame
    #[must_use]
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Once the script runs out, keep producing empty frames `interval`
    /// seconds apart instead of ending the stream
    #[must_use]
    pub fn with_idle_tail(mut self, interval: f64) -> Self {
        let last = self
            .script
            .iter()
            .rev()
            .find_map(|item| item.as_ref().ok().map(|f| f.timestamp))
            .unwrap_or(0.0);
        self.idle_tail = Some((last, interval));
        self
    }

    /// Flag set when the pipeline releases this source
    #[must_use]
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl LandmarkSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        if let Some(delay) = self.frame_delay {
            thread::sleep(delay);
        }
        match self.script.pop_front() {
            Some(item) => item.map(Some),
            None => match self.idle_tail.as_mut() {
                Some((timestamp, interval)) => {
                    *timestamp += *interval;
                    Ok(Some(LandmarkFrame::empty(*timestamp)))
                }
                None => Ok(None),
            },
        }
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
