//! Playlist progress tracking
//!
//! Tracks elapsed playback position for the active playlist by
//! extrapolating between collaborator snapshots, and owns the
//! three-phase scrub transaction (begin / update / end).

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Minimum interval between pre-seek requests while scrubbing
const PRESEEK_INTERVAL: Duration = Duration::from_millis(200);

/// Read-only progress view handed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Displayed position from track start
    pub position: Duration,

    /// Track duration; `Duration::ZERO` means unknown
    pub duration: Duration,

    /// Whether position is advancing
    pub is_playing: bool,

    /// Whether a scrub transaction is in progress
    pub is_scrubbing: bool,
}

#[derive(Debug, Clone, Copy)]
struct ScrubState {
    value: Duration,
    last_preseek: Option<Instant>,
}

/// Extrapolating progress tracker
///
/// Between collaborator snapshots the displayed position is computed as
/// `min(duration, position + (now - updated_at))` while playing, with
/// the cap skipped when the duration is unknown (zero). While a scrub
/// is active the local scrub value overrides the displayed position and
/// extrapolation is frozen.
///
/// All time-dependent methods take `now` explicitly so tests are
/// deterministic.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    active: bool,
    position: Duration,
    duration: Duration,
    playing: bool,
    updated_at: Option<Instant>,
    scrub: Option<ScrubState>,
}

impl ProgressTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        Self {
            active: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            playing: false,
            updated_at: None,
            scrub: None,
        }
    }

    /// Whether a playlist item is being tracked
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a scrub transaction is in progress
    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    /// Track duration; zero means unknown
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Begin tracking a freshly activated item
    ///
    /// Duration may be unknown (zero) until the first collaborator
    /// snapshot arrives.
    pub fn begin(&mut self, duration: Duration, now: Instant) {
        self.active = true;
        self.position = Duration::ZERO;
        self.duration = duration;
        self.playing = true;
        self.updated_at = Some(now);
        self.scrub = None;
    }

    /// Ingest a position snapshot from the audio collaborator
    ///
    /// Ignored while scrubbing: the local scrub value owns the display
    /// until the transaction ends.
    pub fn update(&mut self, position: Duration, duration: Duration, playing: bool, now: Instant) {
        if !self.active || self.scrub.is_some() {
            return;
        }
        self.position = position;
        self.duration = duration;
        self.playing = playing;
        self.updated_at = Some(now);
    }

    /// Pause or resume extrapolation
    pub fn set_playing(&mut self, playing: bool, now: Instant) {
        if !self.active {
            return;
        }
        // Fold the extrapolated position into the snapshot before the
        // clock basis changes
        self.position = self.displayed(now);
        self.updated_at = Some(now);
        self.playing = playing;
    }

    /// Stop tracking (playlist deactivated)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The position to display
    pub fn displayed(&self, now: Instant) -> Duration {
        if let Some(scrub) = &self.scrub {
            return self.clamp_to_duration(scrub.value);
        }
        if !self.active || !self.playing {
            return self.position;
        }
        let elapsed = self
            .updated_at
            .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
        self.clamp_to_duration(self.position + elapsed)
    }

    /// Remaining time, `None` when the duration is unknown
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.duration == Duration::ZERO {
            return None;
        }
        Some(self.duration.saturating_sub(self.displayed(now)))
    }

    /// Begin a scrub transaction
    ///
    /// Freezes extrapolation and hands display control to the scrub
    /// value, seeded from the current displayed position.
    pub fn begin_scrub(&mut self, now: Instant) {
        let seed = self.displayed(now);
        self.scrub = Some(ScrubState {
            value: seed,
            last_preseek: None,
        });
    }

    /// Update the scrub value
    ///
    /// Returns true when a throttled pre-seek should be issued to the
    /// audio collaborator (at most one per 200ms).
    pub fn update_scrub(&mut self, value: Duration, now: Instant) -> Result<bool> {
        let scrub = self.scrub.as_mut().ok_or(EngineError::NoScrubInProgress)?;
        scrub.value = value;

        let due = scrub
            .last_preseek
            .map_or(true, |at| now.saturating_duration_since(at) >= PRESEEK_INTERVAL);
        if due {
            scrub.last_preseek = Some(now);
        }
        Ok(due)
    }

    /// Commit the scrub and resume extrapolation from the new position
    ///
    /// Returns the committed (clamped) position.
    pub fn end_scrub(&mut self, value: Duration, now: Instant) -> Result<Duration> {
        if self.scrub.take().is_none() {
            return Err(EngineError::NoScrubInProgress);
        }
        let committed = self.clamp_to_duration(value);
        self.position = committed;
        self.updated_at = Some(now);
        Ok(committed)
    }

    /// Snapshot for the UI
    pub fn snapshot(&self, now: Instant) -> ProgressSnapshot {
        ProgressSnapshot {
            position: self.displayed(now),
            duration: self.duration,
            is_playing: self.active && self.playing,
            is_scrubbing: self.scrub.is_some(),
        }
    }

    fn clamp_to_duration(&self, value: Duration) -> Duration {
        if self.duration == Duration::ZERO {
            // Unknown duration: nothing to cap against
            value
        } else {
            value.min(self.duration)
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
