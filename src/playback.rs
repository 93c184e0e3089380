//! Playback state driven by gesture commands.
//!
//! Audio decoding and output are external; [`PlaybackModel`] keeps the
//! transport, playlist, volume, tempo, shuffle and loop state that the audio
//! backend mirrors, and applies gesture [`Command`]s to it.

use crate::constants::{AUDIO_EXTENSIONS, DEFAULT_TEMPO, DEFAULT_VOLUME, TEMPO_MAX, TEMPO_MIN, VOLUME_MAX, VOLUME_MIN};
use crate::error::{Error, Result};
use crate::events::{Command, PlaybackParams};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};

/// Receiver of gesture commands
pub trait CommandSink {
    /// Apply a command and return a status line describing the result
    fn apply(&mut self, command: &Command) -> Result<String>;

    /// Current volume and tempo
    fn params(&self) -> PlaybackParams;
}

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What happens when a track ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Off,
    One,
    All,
}

impl LoopMode {
    /// Off -> One -> All -> Off
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Off"),
            Self::One => write!(f, "One"),
            Self::All => write!(f, "All"),
        }
    }
}

/// Information about the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub name: String,
    pub path: PathBuf,
    pub index: usize,
    pub total: usize,
}

/// True if the path has a supported audio extension (case-insensitive)
#[must_use]
pub fn is_audio_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

fn track_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Playlist and transport model
pub struct PlaybackModel {
    playlist: Vec<PathBuf>,
    current: usize,
    transport: Transport,
    volume: f64,
    tempo: f64,
    shuffle: bool,
    shuffle_history: Vec<usize>,
    loop_mode: LoopMode,
    rng: StdRng,
}

impl PlaybackModel {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic shuffle order
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            playlist: Vec::new(),
            current: 0,
            transport: Transport::Stopped,
            volume: DEFAULT_VOLUME,
            tempo: DEFAULT_TEMPO,
            shuffle: false,
            shuffle_history: Vec::new(),
            loop_mode: LoopMode::Off,
            rng,
        }
    }

    /// Replace the playlist, keeping only audio files. Returns the number kept.
    pub fn load_playlist<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.playlist = paths
            .into_iter()
            .filter_map(|p| {
                let path = p.as_ref();
                if is_audio_file(path) {
                    Some(path.to_path_buf())
                } else {
                    warn!("Skipping non-audio file {}", path.display());
                    None
                }
            })
            .collect();
        self.current = 0;
        self.transport = Transport::Stopped;
        self.shuffle_history.clear();
        info!("Loaded {} track(s)", self.playlist.len());
        self.playlist.len()
    }

    pub fn playlist(&self) -> &[PathBuf] {
        &self.playlist
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport == Transport::Playing
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn current_track_info(&self) -> Option<TrackInfo> {
        let path = self.playlist.get(self.current)?;
        Some(TrackInfo {
            name: track_name(path),
            path: path.clone(),
            index: self.current,
            total: self.playlist.len(),
        })
    }

    fn current_name(&self) -> String {
        self.current_track_info().map(|t| t.name).unwrap_or_default()
    }

    /// Start or resume playback
    pub fn play(&mut self) -> Result<String> {
        if self.playlist.is_empty() {
            return Err(Error::Playback("Playlist is empty".to_string()));
        }
        self.transport = Transport::Playing;
        Ok(format!("Playing: {}", self.current_name()))
    }

    pub fn pause(&mut self) -> String {
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
        "Paused".to_string()
    }

    /// Resume when paused; start when stopped with a track loaded
    pub fn resume(&mut self) -> Result<String> {
        self.play()
    }

    pub fn stop(&mut self) -> String {
        self.transport = Transport::Stopped;
        "Stopped".to_string()
    }

    /// Set absolute volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.volume = volume.clamp(VOLUME_MIN, VOLUME_MAX);
        self.volume
    }

    pub fn adjust_volume(&mut self, delta: f64) -> f64 {
        self.set_volume(self.volume + delta)
    }

    /// Set absolute tempo multiplier, clamped to `[0.5, 2.0]`
    pub fn set_tempo(&mut self, tempo: f64) -> f64 {
        self.tempo = tempo.clamp(TEMPO_MIN, TEMPO_MAX);
        self.tempo
    }

    pub fn adjust_tempo(&mut self, delta: f64) -> f64 {
        self.set_tempo(self.tempo + delta)
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        if !self.shuffle {
            self.shuffle_history.clear();
        }
        self.shuffle
    }

    pub fn cycle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.next();
        self.loop_mode
    }

    /// Advance to the next track, random when shuffling.
    ///
    /// Keeps the transport state; with fewer than two tracks nothing changes.
    pub fn next_track(&mut self) -> Result<String> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(Error::Playback("Playlist is empty".to_string()));
        }
        if len == 1 {
            return Ok(format!("Only one track: {}", self.current_name()));
        }

        if self.shuffle {
            self.shuffle_history.push(self.current);
            // pick from the other len - 1 tracks
            let pick = self.rng.gen_range(0..len - 1);
            self.current = if pick >= self.current { pick + 1 } else { pick };
        } else {
            self.current = (self.current + 1) % len;
        }
        debug!("Next track index {}", self.current);
        Ok(format!("Next: {}", self.current_name()))
    }

    /// Go back one track; when shuffling, back through the shuffle history
    pub fn previous_track(&mut self) -> Result<String> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(Error::Playback("Playlist is empty".to_string()));
        }
        if len == 1 {
            return Ok(format!("Only one track: {}", self.current_name()));
        }

        match self.shuffle_history.pop().filter(|_| self.shuffle) {
            Some(index) if index < len => self.current = index,
            _ => self.current = (self.current + len - 1) % len,
        }
        debug!("Previous track index {}", self.current);
        Ok(format!("Previous: {}", self.current_name()))
    }

    /// Handle the end of the current track according to the loop mode
    pub fn on_track_finished(&mut self) -> Result<String> {
        if self.playlist.is_empty() {
            return Ok(self.stop());
        }
        match self.loop_mode {
            LoopMode::One => Ok("Replaying track (Loop One)".to_string()),
            LoopMode::All => self.next_track(),
            LoopMode::Off => {
                if self.playlist.len() > 1 && self.current + 1 < self.playlist.len() {
                    self.next_track()
                } else {
                    self.stop();
                    Ok("Playback finished".to_string())
                }
            }
        }
    }
}

impl Default for PlaybackModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSink for PlaybackModel {
    fn apply(&mut self, command: &Command) -> Result<String> {
        match *command {
            Command::Play => self.play(),
            Command::Pause => Ok(self.pause()),
            Command::ToggleShuffle => {
                let on = self.toggle_shuffle();
                Ok(format!("Shuffle: {}", if on { "On" } else { "Off" }))
            }
            Command::NextTrack => self.next_track(),
            Command::PreviousTrack => self.previous_track(),
            Command::SetVolume(delta) => {
                let volume = self.adjust_volume(delta);
                Ok(format!("Volume: {:.0}%", volume * 100.0))
            }
            Command::SetTempo(delta) => {
                let tempo = self.adjust_tempo(delta);
                Ok(format!("Tempo: {:.2}x", tempo))
            }
        }
    }

    fn params(&self) -> PlaybackParams {
        PlaybackParams {
            volume: self.volume,
            tempo: self.tempo,
        }
    }
}
