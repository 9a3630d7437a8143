//! Play history tracking
//!
//! Maintains a bounded, deduplicated most-recent-first log per sound
//! category, plus last-played wall-clock stamps for display labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::VecDeque;
use std::hash::Hash;

/// Bounded, deduplicated play history
///
/// Most recent entry is at the front. Recording an id that is already
/// present moves it to the front instead of duplicating it; the log is
/// trimmed from the back when it grows past `max_size`.
///
/// History is only mutated on activation, never on deactivation:
/// toggling a sound off leaves its history position untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryLog<Id> {
    /// Entries, most recent first
    entries: VecDeque<Id>,

    /// Maximum history size
    max_size: usize,
}

impl<Id: Clone + Eq> HistoryLog<Id> {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record an activation
    ///
    /// Moves `id` to the front, deduplicating, and trims the oldest
    /// entries past the size bound.
    pub fn record(&mut self, id: Id) {
        if let Some(pos) = self.entries.iter().position(|e| *e == id) {
            self.entries.remove(pos);
        }
        self.entries.push_front(id);
        self.entries.truncate(self.max_size);
    }

    /// Remove an id from history ("forget" or upstream deletion)
    ///
    /// Returns true if the id was present.
    pub fn forget(&mut self, id: &Id) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e == id) {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Position of an id in the log (0 = most recent)
    pub fn position(&self, id: &Id) -> Option<usize> {
        self.entries.iter().position(|e| e == id)
    }

    /// Check whether an id is in the log
    pub fn contains(&self, id: &Id) -> bool {
        self.entries.iter().any(|e| e == id)
    }

    /// Iterate entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.entries.iter()
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl<Id: Clone + Eq> Default for HistoryLog<Id> {
    fn default() -> Self {
        Self::new(30)
    }
}

/// Last-played wall-clock stamps
///
/// Feeds display recency text only; list ordering always comes from
/// [`HistoryLog`] positions, never from these stamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastPlayedMap<Id: Eq + Hash> {
    stamps: HashMap<Id, DateTime<Utc>>,
}

impl<Id: Clone + Eq + Hash> Default for LastPlayedMap<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + Eq + Hash> LastPlayedMap<Id> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            stamps: HashMap::new(),
        }
    }

    /// Stamp an activation time
    pub fn stamp(&mut self, id: Id, at: DateTime<Utc>) {
        self.stamps.insert(id, at);
    }

    /// Get the last-played time for an id
    pub fn get(&self, id: &Id) -> Option<DateTime<Utc>> {
        self.stamps.get(id).copied()
    }

    /// Remove a stamp
    pub fn forget(&mut self, id: &Id) {
        self.stamps.remove(id);
    }

    /// Number of stamped ids
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Check if no stamps are recorded
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

/// Human-readable recency label for a last-played stamp
///
/// Pure function; whoever owns the display refresh cadence calls it
/// with the current time, so the engine carries no UI ticking state.
pub fn recency_label(now: DateTime<Utc>, last_played: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(last_played);

    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{minutes} minutes ago")
        };
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        };
    }

    let days = elapsed.num_days();
    if days < 7 {
        return if days == 1 {
            "yesterday".to_string()
        } else {
            format!("{days} days ago")
        };
    }

    let weeks = days / 7;
    if weeks == 1 {
        "1 week ago".to_string()
    } else {
        format!("{weeks} weeks ago")
    }
}
