//! Domain types for Hearth

mod ids;
mod item;

pub use ids::{EffectId, LoopId, PlaylistId};
pub use item::{ChannelKind, GainChannel, LibraryItem};
