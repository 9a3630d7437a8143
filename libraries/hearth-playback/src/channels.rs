//! Per-category play state
//!
//! Atmosphere loops and sound effects are multi-select toggle sets;
//! music has a richer single-active lifecycle with a start guard and
//! supersede semantics for in-flight activations.

use hearth_core::PlaylistId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Set of currently-active item ids for one category
///
/// Toggle is idempotent over pairs: toggling the same id twice returns
/// membership to its original state. History bookkeeping lives outside
/// this type and only reacts to activating transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSet<Id: Eq + Hash> {
    active: HashSet<Id>,
}

impl<Id: Clone + Eq + Hash> ChannelSet<Id> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            active: HashSet::new(),
        }
    }

    /// Flip membership. Returns the new active state of `id`.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.active.remove(&id) {
            false
        } else {
            self.active.insert(id);
            true
        }
    }

    /// Check whether an id is active
    pub fn contains(&self, id: &Id) -> bool {
        self.active.contains(id)
    }

    /// Number of active ids
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Check whether nothing is active
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Iterate active ids (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.active.iter()
    }

    /// Deactivate everything ("panic stop"). History is untouched.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl<Id: Clone + Eq + Hash + Ord> ChannelSet<Id> {
    /// Active ids in deterministic (lexicographic) order
    pub fn sorted(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.active.iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl<Id: Clone + Eq + Hash> Default for ChannelSet<Id> {
    fn default() -> Self {
        Self::new()
    }
}

/// Token identifying one in-flight playlist start
///
/// A completion carrying a stale token (a newer start was issued since)
/// must be discarded by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartToken(u64);

/// Single-active playlist lifecycle
///
/// At most one playlist item is active at a time. Starting playback may
/// suspend (remote fetch), so activation is a begin/commit protocol:
/// `begin_start` hands out a generation token, and only a completion
/// carrying the latest token may commit. A second start request for the
/// same id while one is in flight is a guarded no-op; a request for a
/// *different* id supersedes the in-flight one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistState {
    /// Currently active playlist item
    active: Option<PlaylistId>,

    /// Whether the active item is audibly playing
    playing: bool,

    /// In-flight start target, if any
    starting: Option<PlaylistId>,

    /// Generation counter for supersede detection
    generation: u64,
}

impl PlaylistState {
    /// Create with nothing active
    pub fn new() -> Self {
        Self {
            active: None,
            playing: false,
            starting: None,
            generation: 0,
        }
    }

    /// Currently active playlist item
    pub fn active(&self) -> Option<&PlaylistId> {
        self.active.as_ref()
    }

    /// Whether the active item is playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a start is in flight
    pub fn is_starting(&self) -> bool {
        self.starting.is_some()
    }

    /// The in-flight start target, if any
    pub fn starting_id(&self) -> Option<&PlaylistId> {
        self.starting.as_ref()
    }

    /// Begin a start attempt
    ///
    /// Returns `None` if the same id is already starting (guarded
    /// no-op). A different id supersedes the in-flight attempt: the
    /// generation advances so the older completion will be discarded.
    pub fn begin_start(&mut self, id: PlaylistId) -> Option<StartToken> {
        if self.starting.as_ref() == Some(&id) {
            return None;
        }
        self.generation += 1;
        self.starting = Some(id);
        Some(StartToken(self.generation))
    }

    /// Commit a completed start
    ///
    /// Returns true if the token is current and the target became
    /// active; false if the attempt was superseded and must be
    /// discarded.
    pub fn commit_start(&mut self, token: StartToken) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.active = self.starting.take();
        self.playing = true;
        true
    }

    /// Abort a failed start, if it is still the current attempt
    ///
    /// Returns true if the attempt was current (caller rolls back to
    /// pre-attempt values); false for a superseded attempt.
    pub fn abort_start(&mut self, token: StartToken) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.starting = None;
        true
    }

    /// Deactivate the current item. Returns the id that was active.
    pub fn deactivate(&mut self) -> Option<PlaylistId> {
        self.playing = false;
        self.active.take()
    }

    /// Restore a previously captured active item (rollback path)
    pub fn restore(&mut self, active: Option<PlaylistId>, playing: bool) {
        self.active = active;
        self.playing = playing;
    }

    /// Set the playing/paused flag for the active item
    pub fn set_playing(&mut self, playing: bool) {
        if self.active.is_some() {
            self.playing = playing;
        }
    }
}

impl Default for PlaylistState {
    fn default() -> Self {
        Self::new()
    }
}
