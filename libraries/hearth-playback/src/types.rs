//! Core types for the playback coordination engine

use crate::progress::ProgressSnapshot;
use hearth_core::{EffectId, LoopId, PlaylistId};
use serde::{Deserialize, Serialize};

/// Configuration for the playback coordinator
///
/// Seeded from persisted values at engine startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum history size per category (default: 30)
    pub history_size: usize,

    /// Initial master level (0.0-1.0, default: 1.0)
    pub master_volume: f32,

    /// Initial music level (0.0-1.0, default: 1.0)
    pub music_volume: f32,

    /// Initial atmosphere level (0.0-1.0, default: 1.0)
    pub atmosphere_volume: f32,

    /// Initial effects level (0.0-1.0, default: 1.0)
    pub effects_volume: f32,

    /// Whether sound effects duck music/atmosphere (default: true)
    pub ducking_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_size: 30,
            master_volume: 1.0,
            music_volume: 1.0,
            atmosphere_volume: 1.0,
            effects_volume: 1.0,
            ducking_enabled: true,
        }
    }
}

/// Outcome of a playlist toggle
///
/// Guarded no-ops and collaborator failures are outcomes, not errors;
/// nothing here is fatal and every outcome is recoverable by re-issuing
/// the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaylistOutcome {
    /// The playlist became active and is playing
    Started,

    /// The active playlist was deactivated
    Stopped,

    /// A start for the same playlist is already in flight (no-op)
    AlreadyStarting,

    /// This start was superseded by a newer request and discarded
    Superseded,

    /// The audio collaborator could not start playback; state rolled
    /// back to pre-attempt values
    Failed,

    /// Remote playback requires an entitlement the user lacks
    UpgradeRequired,
}

/// Playlist lifecycle view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    /// Currently active playlist item
    pub active: Option<PlaylistId>,

    /// Whether the active item is audibly playing
    pub is_playing: bool,

    /// Whether a start is in flight
    pub is_starting: bool,
}

/// Volume levels view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSnapshot {
    /// Master level
    pub master: f32,

    /// Music level
    pub music: f32,

    /// Atmosphere level
    pub atmosphere: f32,

    /// Effects level
    pub effects: f32,

    /// Whether master output is silent
    pub is_muted: bool,
}

/// Immutable view of the whole engine, handed to the presentation layer
///
/// The UI never holds references into the coordinator; it observes
/// these owned snapshots and issues intents back through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Active atmosphere loops, lexicographic order
    pub active_loops: Vec<LoopId>,

    /// Active sound effects, lexicographic order
    pub active_effects: Vec<EffectId>,

    /// Playlist lifecycle
    pub playlist: PlaylistSnapshot,

    /// Volume levels
    pub volumes: VolumeSnapshot,

    /// Whether ducking attenuation is active
    pub duck_active: bool,

    /// Whether ducking is enabled by the user
    pub ducking_enabled: bool,

    /// Playlist progress
    pub progress: ProgressSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.history_size, 30);
        assert_eq!(config.master_volume, 1.0);
        assert!(config.ducking_enabled);
    }
}
