//! Hearth Core
//!
//! Core types, traits, and error handling for Hearth, a tabletop-RPG
//! soundscape mixer.
//!
//! This crate defines the seams between the playback coordination
//! engine and its collaborators:
//! - **Domain Types**: `LibraryItem`, `ChannelKind`, ID newtypes
//! - **Collaborator Traits**: `AudioSink`, `Catalog`, `BookmarkStore`,
//!   `Entitlements`
//! - **Error Handling**: Unified `HearthError` and `Result` types
//!
//! The engine itself lives in `hearth-playback`; actual audio I/O,
//! catalog storage, and bookmark persistence are implemented by
//! platform crates behind the traits defined here.

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{HearthError, Result};
pub use traits::{AudioSink, BookmarkStore, Catalog, Entitlements};
pub use types::{ChannelKind, EffectId, GainChannel, LibraryItem, LoopId, PlaylistId};
