//! Engine events
//!
//! Event-based communication for UI synchronization. The coordinator
//! queues events as state changes land; the UI drains the queue with
//! `PlaybackCoordinator::take_events` and re-renders from snapshots.

use hearth_core::{ChannelKind, EffectId, GainChannel, LoopId, PlaylistId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback coordination engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An atmosphere loop was toggled
    LoopToggled {
        /// Loop id
        id: LoopId,
        /// New active state
        active: bool,
    },

    /// A sound effect was toggled
    EffectToggled {
        /// Effect id
        id: EffectId,
        /// New active state
        active: bool,
    },

    /// The active playlist changed (`None` = stopped)
    PlaylistChanged {
        /// New active playlist, if any
        id: Option<PlaylistId>,
    },

    /// A playlist activation failed; state rolled back
    PlaylistStartFailed {
        /// The playlist that failed to start
        id: PlaylistId,
    },

    /// The active playlist was paused or resumed
    PlaylistPlayingChanged {
        /// Whether the playlist is now playing
        is_playing: bool,
    },

    /// A volume channel changed
    VolumeChanged {
        /// Which channel
        channel: GainChannel,
        /// New (clamped) level
        value: f32,
    },

    /// The duck flag flipped
    DuckingChanged {
        /// Whether ducking attenuation is now active
        active: bool,
    },

    /// A scrub committed a seek
    Seeked {
        /// Committed position in milliseconds
        position_ms: u64,
    },

    /// All items in a category were stopped
    AllStopped {
        /// The category that was cleared
        kind: ChannelKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_round_trip_through_serde() {
        let event = EngineEvent::LoopToggled {
            id: LoopId::new("rain"),
            active: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
