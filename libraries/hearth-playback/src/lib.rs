//! Hearth - Playback Coordination
//!
//! Platform-agnostic playback coordination for Hearth, a tabletop-RPG
//! soundscape mixer.
//!
//! This crate decides *what* should be playing, at *what* relative
//! levels, and in *what* order it is presented:
//! - Per-category play/stop state (atmosphere loops, sound effects,
//!   one active music playlist)
//! - Four-channel volume mixing with system-volume sync
//! - Automatic ducking of music/atmosphere while effects play
//! - Bounded, deterministically-ordered recency lists
//! - Playlist progress tracking with scrub transactions
//!
//! # Architecture
//!
//! `hearth-playback` never decodes or mixes audio. It issues intents to
//! an [`AudioSink`](hearth_core::AudioSink) collaborator and ingests
//! its progress/system-volume reports. All mutable state is owned by
//! [`PlaybackCoordinator`]; the UI observes owned snapshots and drains
//! an event queue.
//!
//! # Example
//!
//! ```rust,no_run
//! use hearth_playback::{EngineConfig, PlaybackCoordinator};
//! use hearth_core::{AudioSink, Entitlements, LoopId};
//! use std::sync::Arc;
//!
//! # fn collaborators() -> (Arc<dyn AudioSink>, Arc<dyn Entitlements>) { unimplemented!() }
//! let (sink, entitlements) = collaborators();
//! let mut engine = PlaybackCoordinator::new(EngineConfig::default(), sink, entitlements);
//!
//! // Toggle an atmosphere loop on
//! let active = engine.toggle_loop(&LoopId::new("rain"));
//! assert!(active);
//!
//! // Read-only view for the UI
//! let snapshot = engine.snapshot();
//! assert_eq!(snapshot.active_loops.len(), 1);
//! ```

#![forbid(unsafe_code)]

mod channels;
mod coordinator;
mod ducking;
mod error;
mod events;
mod history;
mod progress;
mod recency;
mod types;
mod volume;

// Public exports
pub use channels::{ChannelSet, PlaylistState, StartToken};
pub use coordinator::{PendingStart, PlaybackCoordinator, PlaylistToggle, StartCompletion};
pub use ducking::DuckingCoordinator;
pub use error::{EngineError, Result};
pub use events::EngineEvent;
pub use history::{recency_label, HistoryLog, LastPlayedMap};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use recency::{playlist_recent_list, recent_list, RECENT_CAP};
pub use types::{
    EngineConfig, EngineSnapshot, PlaylistOutcome, PlaylistSnapshot, VolumeSnapshot,
};
pub use volume::{VolumeMixer, SYSTEM_VOLUME_EPSILON};
