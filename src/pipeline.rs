//! Background gesture pipeline.
//!
//! The pipeline owns a [`GestureSession`] and a [`LandmarkSource`] on a
//! dedicated worker thread. Each frame is read, processed to completion and
//! its events are handed to the consumer over an `mpsc` channel; the consumer
//! (UI or playback thread) drains the channel at its own pace.
//!
//! Lifecycle:
//!
//! ```text
//! Idle --start--> Running --stop--> Stopping --> Stopped
//!                    |
//!                    +--end of stream--> Stopped
//!                    +--source error---> Failed(reason)
//! ```
//!
//! The worker checks the shared active flag at the top of every frame, so a
//! stop request takes effect within one frame. The source is released on
//! every exit path, including a panic inside the session.

use crate::error::{Error, Result};
use crate::events::{GestureEvent, PlaybackParams};
use crate::session::GestureSession;
use crate::source::LandmarkSource;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

/// Pipeline lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Running,
    Stopping,
    Stopped,
    Failed(String),
}

impl PipelineState {
    /// True for `Stopped` and `Failed`
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed(_))
    }
}

/// Message from the worker to the consumer
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineMessage {
    /// A fired gesture
    Gesture(GestureEvent),
    /// Human-readable status line
    Status(String),
    /// Lifecycle transition
    StateChanged(PipelineState),
}

/// Playback parameters written by the consumer and read once per frame by the worker
pub type SharedPlaybackParams = Arc<RwLock<PlaybackParams>>;

/// Create a shared parameter cell
#[must_use]
pub fn shared_params(params: PlaybackParams) -> SharedPlaybackParams {
    Arc::new(RwLock::new(params))
}

/// Snapshot of the shared parameters
#[must_use]
pub fn read_params(params: &SharedPlaybackParams) -> PlaybackParams {
    *params.read().unwrap_or_else(PoisonError::into_inner)
}

/// Overwrite the shared parameters
pub fn write_params(params: &SharedPlaybackParams, value: PlaybackParams) {
    *params.write().unwrap_or_else(PoisonError::into_inner) = value;
}

type SharedState = Arc<Mutex<PipelineState>>;

fn load_state(state: &SharedState) -> PipelineState {
    state.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn store_state(state: &SharedState, value: PipelineState) {
    *state.lock().unwrap_or_else(PoisonError::into_inner) = value;
}

/// Gesture-processing worker with cooperative cancellation
#[derive(Default)]
pub struct GesturePipeline {
    state: SharedState,
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GesturePipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        load_state(&self.state)
    }

    /// True while the worker is processing frames
    pub fn is_running(&self) -> bool {
        self.state() == PipelineState::Running
    }

    /// Spawn the worker and return the message channel.
    ///
    /// Fails if a worker is already running. A pipeline that stopped or failed
    /// may be started again with a fresh source.
    pub fn start<S>(&mut self, source: S, session: GestureSession, params: SharedPlaybackParams) -> Result<Receiver<PipelineMessage>>
    where
        S: LandmarkSource + 'static,
    {
        match self.state() {
            PipelineState::Running | PipelineState::Stopping => {
                return Err(Error::Pipeline("Gesture pipeline is already running".to_string()));
            }
            _ => {}
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Previous gesture worker had panicked");
            }
        }

        let (tx, rx) = mpsc::channel();
        self.active.store(true, Ordering::SeqCst);
        store_state(&self.state, PipelineState::Running);
        // Receiver is still in hand, this cannot fail
        let _ = tx.send(PipelineMessage::StateChanged(PipelineState::Running));
        info!("Starting gesture pipeline on {}", source.name());

        let worker = Worker {
            session,
            params,
            active: Arc::clone(&self.active),
            state: Arc::clone(&self.state),
            tx,
        };
        let handle = thread::Builder::new()
            .name("gesture-pipeline".to_string())
            .spawn(move || worker.run(source))
            .map_err(|e| {
                store_state(&self.state, PipelineState::Failed(e.to_string()));
                Error::Pipeline(format!("Failed to spawn gesture worker: {}", e))
            })?;
        self.handle = Some(handle);
        Ok(rx)
    }

    /// Request cancellation and wait for the worker to exit.
    ///
    /// Returns the final state. Stopping an idle pipeline is a no-op.
    pub fn stop(&mut self) -> PipelineState {
        self.active.store(false, Ordering::SeqCst);
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == PipelineState::Running {
                info!("Stopping gesture pipeline");
                *state = PipelineState::Stopping;
            }
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Gesture worker panicked");
            }
        }
        self.state()
    }
}

impl Drop for GesturePipeline {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

/// Releases the source when the worker exits, however it exits
struct SourceGuard<S: LandmarkSource>(S);

impl<S: LandmarkSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        debug!("Releasing landmark source {}", self.0.name());
        self.0.release();
    }
}

/// Marks the pipeline failed if the worker unwinds
struct PanicGuard {
    state: SharedState,
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            store_state(&self.state, PipelineState::Failed("gesture worker panicked".to_string()));
        }
    }
}

struct Worker {
    session: GestureSession,
    params: SharedPlaybackParams,
    active: Arc<AtomicBool>,
    state: SharedState,
    tx: Sender<PipelineMessage>,
}

impl Worker {
    fn run<S: LandmarkSource>(mut self, source: S) {
        let _panic_guard = PanicGuard {
            state: Arc::clone(&self.state),
        };
        let final_state = {
            let mut source = SourceGuard(source);
            self.send(PipelineMessage::Status("Gesture control started".to_string()));
            self.process(&mut source.0)
        };

        match &final_state {
            PipelineState::Failed(reason) => {
                error!("Gesture pipeline failed: {}", reason);
                self.send(PipelineMessage::Status(format!("Gesture error: {}", reason)));
            }
            _ => {
                info!("Gesture pipeline stopped after {} frames", self.session.frame_count());
                self.send(PipelineMessage::Status("Gesture control stopped".to_string()));
            }
        }
        self.active.store(false, Ordering::SeqCst);
        store_state(&self.state, final_state.clone());
        self.send(PipelineMessage::StateChanged(final_state));
    }

    fn process(&mut self, source: &mut dyn LandmarkSource) -> PipelineState {
        loop {
            if !self.active.load(Ordering::SeqCst) {
                debug!("Cancellation requested");
                return PipelineState::Stopped;
            }

            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("Landmark stream from {} ended", source.name());
                    return PipelineState::Stopped;
                }
                Err(e) => return PipelineState::Failed(e.to_string()),
            };

            let params = read_params(&self.params);
            let events = match self.session.process_frame(&frame, &params) {
                Ok(events) => events,
                Err(e) => return PipelineState::Failed(e.to_string()),
            };
            for event in events {
                if !self.send(PipelineMessage::Gesture(event)) {
                    warn!("Gesture consumer disconnected, stopping");
                    return PipelineState::Stopped;
                }
            }
        }
    }

    fn send(&self, message: PipelineMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::landmarks::LandmarkFrame;
    use crate::source::ScriptedSource;

    #[test]
    fn test_new_pipeline_is_idle() {
        let mut pipeline = GesturePipeline::new();
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(!pipeline.is_running());
        assert_eq!(pipeline.stop(), PipelineState::Idle);
    }

    #[test]
    fn test_runs_to_end_of_stream() {
        let mut pipeline = GesturePipeline::new();
        let source = ScriptedSource::new(vec![LandmarkFrame::empty(0.0), LandmarkFrame::empty(0.1)]);
        let released = source.release_flag();
        let session = GestureSession::new(Config::default()).unwrap();
        let rx = pipeline.start(source, session, shared_params(PlaybackParams::default())).unwrap();

        let messages: Vec<_> = rx.iter().collect();
        assert_eq!(messages.first(), Some(&PipelineMessage::StateChanged(PipelineState::Running)));
        assert_eq!(messages.last(), Some(&PipelineMessage::StateChanged(PipelineState::Stopped)));
        assert_eq!(pipeline.stop(), PipelineState::Stopped);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_poisoned_params_still_readable() {
        let params = shared_params(PlaybackParams::default());
        let clone = Arc::clone(&params);
        let _ = thread::spawn(move || {
            let _guard = clone.write().unwrap();
            panic!("poison");
        })
        .join();
        assert_eq!(read_params(&params), PlaybackParams::default());
    }
}
