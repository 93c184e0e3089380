//! Gesture kinds, playback commands and the events that carry them.

use crate::landmarks::Handedness;
use serde::{Deserialize, Serialize};

/// Every gesture the dispatcher can fire. Each kind has its own cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Open palm
    Play,
    /// Closed fist
    Pause,
    /// Three fingers raised
    ToggleShuffle,
    /// Vertical drag while pinching
    VolumeDrag,
    /// Swipe right
    NextTrack,
    /// Swipe left
    PreviousTrack,
    /// Conductor swipe up
    Crescendo,
    /// Conductor swipe down
    Diminuendo,
    /// Conductor clockwise circle
    TempoUp,
    /// Conductor counterclockwise circle
    TempoDown,
    /// Conductor static hold
    Fermata,
}

impl GestureKind {
    pub const ALL: [Self; 11] = [
        Self::Play,
        Self::Pause,
        Self::ToggleShuffle,
        Self::VolumeDrag,
        Self::NextTrack,
        Self::PreviousTrack,
        Self::Crescendo,
        Self::Diminuendo,
        Self::TempoUp,
        Self::TempoDown,
        Self::Fermata,
    ];

    /// Built-in refractory period in seconds
    #[must_use]
    pub const fn default_cooldown(self) -> f64 {
        match self {
            Self::Play | Self::Pause | Self::ToggleShuffle => 1.0,
            Self::VolumeDrag => 0.05,
            Self::NextTrack | Self::PreviousTrack => 1.2,
            Self::Crescendo | Self::Diminuendo => 0.5,
            Self::TempoUp | Self::TempoDown => 0.8,
            Self::Fermata => 1.5,
        }
    }

    /// Stable snake_case name, as used in configuration files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::ToggleShuffle => "toggle_shuffle",
            Self::VolumeDrag => "volume_drag",
            Self::NextTrack => "next_track",
            Self::PreviousTrack => "previous_track",
            Self::Crescendo => "crescendo",
            Self::Diminuendo => "diminuendo",
            Self::TempoUp => "tempo_up",
            Self::TempoDown => "tempo_down",
            Self::Fermata => "fermata",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command delivered to the playback sink.
///
/// Volume and tempo carry raw deltas; the sink clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Play,
    Pause,
    ToggleShuffle,
    NextTrack,
    PreviousTrack,
    SetVolume(f64),
    SetTempo(f64),
}

/// Read-only view of playback state used to size deltas and word status text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackParams {
    pub volume: f64,
    pub tempo: f64,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            volume: crate::constants::DEFAULT_VOLUME,
            tempo: crate::constants::DEFAULT_TEMPO,
        }
    }
}

/// One fired gesture
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub command: Command,
    /// Normalized motion strength in `[0, 1]`; 1.0 for pose and hold gestures
    pub intensity: f64,
    pub hand: Handedness,
    /// Human-readable status line, advisory only
    pub status: String,
}

impl GestureEvent {
    #[must_use]
    pub fn new(kind: GestureKind, command: Command, intensity: f64, hand: Handedness, status: String) -> Self {
        Self {
            kind,
            command,
            intensity,
            hand,
            status,
        }
    }
}
