//! Per-gesture cooldown table.
//!
//! A continuous 30 Hz landmark stream would otherwise re-fire the same
//! gesture on every frame it stays plausible.

use crate::clock::Timestamp;
use crate::events::GestureKind;
use log::trace;
use std::collections::HashMap;

/// Cooldown gate keyed by gesture kind
#[derive(Debug, Clone)]
pub struct Debouncer {
    default_cooldown: f64,
    cooldowns: HashMap<GestureKind, f64>,
    last_fired: HashMap<GestureKind, Timestamp>,
}

impl Debouncer {
    /// Same cooldown for every kind
    #[must_use]
    pub fn new(default_cooldown: f64) -> Self {
        Self {
            default_cooldown,
            cooldowns: HashMap::new(),
            last_fired: HashMap::new(),
        }
    }

    /// Per-kind cooldowns; kinds missing from the map use `default_cooldown`
    #[must_use]
    pub fn with_cooldowns(default_cooldown: f64, cooldowns: HashMap<GestureKind, f64>) -> Self {
        Self {
            default_cooldown,
            cooldowns,
            last_fired: HashMap::new(),
        }
    }

    /// Refractory period for `kind`
    #[must_use]
    pub fn cooldown(&self, kind: GestureKind) -> f64 {
        self.cooldowns.get(&kind).copied().unwrap_or(self.default_cooldown)
    }

    /// Override the refractory period for one kind
    pub fn set_cooldown(&mut self, kind: GestureKind, seconds: f64) {
        self.cooldowns.insert(kind, seconds);
    }

    /// True if `kind` never fired or its cooldown has fully elapsed
    #[must_use]
    pub fn can_trigger(&self, kind: GestureKind, now: Timestamp) -> bool {
        match self.last_fired.get(&kind) {
            Some(&last) => now - last > self.cooldown(kind),
            None => true,
        }
    }

    /// Record that `kind` fired at `now`
    pub fn mark_triggered(&mut self, kind: GestureKind, now: Timestamp) {
        trace!("{} fired at {:.3}s", kind, now);
        self.last_fired.insert(kind, now);
    }

    /// Check and mark in one step; returns whether the gesture may fire
    pub fn try_trigger(&mut self, kind: GestureKind, now: Timestamp) -> bool {
        if self.can_trigger(kind, now) {
            self.mark_triggered(kind, now);
            true
        } else {
            false
        }
    }

    /// Last firing time of `kind`
    #[must_use]
    pub fn last_fired(&self, kind: GestureKind) -> Option<Timestamp> {
        self.last_fired.get(&kind).copied()
    }

    /// Forget every firing
    pub fn reset(&mut self) {
        self.last_fired.clear();
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_COOLDOWN)
    }
}
